pub mod auth;
pub mod client;
pub mod common;
pub mod error;
pub mod http;
pub mod websocket;

pub use auth::{AccountType, Credential, WebDetail};
pub use client::{EventHandler, Td365};
pub use error::{Result, TdError};
pub use http::client::{AuthInfo, TdRestClient};
pub use websocket::TdWebSocketClient;

// Re-export the domain crate so consumers only depend on one name.
pub use td_types as types;
