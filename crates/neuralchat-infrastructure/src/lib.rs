//! Infrastructure layer: the HTTP gateway to the chat server and local
//! configuration loading.

pub mod config_service;
pub mod dto;
pub mod http_gateway;
pub mod paths;

pub use crate::config_service::ConfigService;
pub use crate::http_gateway::HttpChatGateway;
pub use crate::paths::NeuralChatPaths;
