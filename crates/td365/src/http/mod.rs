pub mod base_client;
pub mod client;
pub mod cookies;
pub mod models;
