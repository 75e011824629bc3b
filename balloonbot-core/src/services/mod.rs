// src/services/mod.rs
pub mod chat_bridge;

pub use chat_bridge::{ChatSessionBridge, DEFAULT_CONNECT_TIMEOUT};
