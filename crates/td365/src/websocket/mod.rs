pub mod base_client;
pub mod client;
pub mod models;

pub use client::{SessionPhase, TdWebSocketClient};
