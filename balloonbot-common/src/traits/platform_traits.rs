// File: balloonbot-common/src/traits/platform_traits.rs

use async_trait::async_trait;

use crate::Error;
use crate::models::{BroadcastStatus, ChannelInfo, ChatEvent, SessionCredential};

/// The two anonymous metadata endpoints the poller depends on.
#[async_trait]
pub trait BroadcastApi: Send + Sync {
    async fn fetch_status(&self, broadcaster_id: &str) -> Result<BroadcastStatus, Error>;
    async fn resolve_channel(&self, broadcaster_id: &str) -> Result<ChannelInfo, Error>;
}

/// Opens chat sessions. Implemented by the platform chat client; replaced by
/// fakes in tests.
#[async_trait]
pub trait ChatConnector: Send + Sync {
    async fn connect(&self, credential: &SessionCredential) -> Result<Box<dyn ChatSession>, Error>;
}

/// One open chat connection.
#[async_trait]
pub trait ChatSession: Send {
    /// Next event from the connection, or `None` once it has closed.
    async fn next_event(&mut self) -> Option<ChatEvent>;

    /// Tears down any background I/O the session owns.
    fn shutdown(&mut self);
}
