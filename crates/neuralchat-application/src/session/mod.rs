//! Session-level state: which chat is open and whether the user is logged in.

mod active;
mod probe;

pub use active::ActiveSession;
pub use probe::SessionProbe;
