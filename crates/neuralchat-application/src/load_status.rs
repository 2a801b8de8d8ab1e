/// Progress of the most recent load of a store.
///
/// A failed load still leaves the store empty; the status lets a view tell
/// "nothing here yet" apart from "could not fetch".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// What happened to the result of a load call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result replaced the store contents; holds the number of entries.
    Applied(usize),
    /// The store was cleared without contacting the gateway.
    Cleared,
    /// The gateway failed; the store is now empty.
    Failed,
    /// The result arrived after the user moved to another session and was dropped.
    Discarded,
}
