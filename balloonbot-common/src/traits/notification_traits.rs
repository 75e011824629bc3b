// File: balloonbot-common/src/traits/notification_traits.rs

use async_trait::async_trait;

use crate::Error;

/// Fire-and-forget outbound notifications to the local control surface.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify_balloon(&self, user_name: &str, count: i32) -> Result<(), Error>;
}
