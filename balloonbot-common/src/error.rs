// ================================================================
// File: balloonbot-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Connection or timeout failure on an HTTP call.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-200 response, or a body that is structurally unusable.
    #[error("Protocol error (HTTP {status}): {message}")]
    Protocol { status: u16, message: String },

    /// The channel endpoint answered but gave us nothing we can connect to.
    #[error("Channel resolution failed: {0}")]
    Resolution(String),

    #[error("Chat session error: {0}")]
    Session(String),

    #[error("Notification send error: {0}")]
    NotificationSend(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
