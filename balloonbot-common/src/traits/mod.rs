// File: balloonbot-common/src/traits/mod.rs
pub mod platform_traits;
pub mod notification_traits;

pub use platform_traits::{BroadcastApi, ChatConnector, ChatSession};
pub use notification_traits::NotificationSink;
