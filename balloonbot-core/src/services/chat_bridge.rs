//! src/services/chat_bridge.rs
//!
//! Runs one chat session on its own task and forwards balloon gifts to the
//! notification sink.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

use balloonbot_common::models::{ChatEvent, SessionCredential};
use balloonbot_common::traits::{ChatConnector, ChatSession, NotificationSink};

use crate::Error;

/// How long opening the chat connection may take before the hand-off fails.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct ChatSessionBridge {
    connector: Arc<dyn ChatConnector>,
    sink: Arc<dyn NotificationSink>,
    connect_timeout: Duration,
}

impl ChatSessionBridge {
    pub fn new(connector: Arc<dyn ChatConnector>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            connector,
            sink,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Connects with `credential` and spawns the task that drives the session.
    ///
    /// Returns as soon as the connection is open, or fails with
    /// `Error::Session` once the connect timeout elapses. The returned handle
    /// finishes when the session ends, which is how the poller learns it can
    /// hand off again.
    pub async fn open(&self, credential: SessionCredential) -> Result<JoinHandle<()>, Error> {
        let session = timeout(self.connect_timeout, self.connector.connect(&credential))
            .await
            .map_err(|_| {
                Error::Session(format!(
                    "chat connect timed out after {:?}",
                    self.connect_timeout
                ))
            })?
            .map_err(|e| match e {
                Error::Session(_) => e,
                other => Error::Session(other.to_string()),
            })?;

        info!(
            "[ChatBridge] session opened for '{}' (room {})",
            credential.broadcaster_id, credential.chat_room_id
        );
        Ok(tokio::spawn(Self::drive(session, self.sink.clone())))
    }

    /// Pumps events until the session closes.
    pub async fn drive(mut session: Box<dyn ChatSession>, sink: Arc<dyn NotificationSink>) {
        while let Some(event) = session.next_event().await {
            Self::handle_event(sink.as_ref(), event).await;
        }
        session.shutdown();
        info!("[ChatBridge] session ended.");
    }

    pub async fn handle_event(sink: &dyn NotificationSink, event: ChatEvent) {
        match event {
            ChatEvent::Connected(true) => info!("Chatting connect"),
            ChatEvent::Connected(false) => warn!("[ChatBridge] chat disconnected"),
            ChatEvent::Balloon(balloon) => {
                info!("nick : {}, count : {}", balloon.user_name, balloon.count);
                debug!(
                    "[ChatBridge] balloon bj={} user_id={} at {}",
                    balloon.broadcaster_id,
                    balloon.user_id,
                    balloon.received_at.to_rfc3339()
                );
                if let Err(e) = sink.notify_balloon(&balloon.user_name, balloon.count).await {
                    error!("OnBalloon error : {}", e);
                }
            }
        }
    }
}
