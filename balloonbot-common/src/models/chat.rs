// File: balloonbot-common/src/models/chat.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A paid balloon gift seen in chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalloonEvent {
    pub broadcaster_id: String,
    pub user_id: String,
    pub user_name: String,
    pub count: i32,
    pub received_at: DateTime<Utc>,
}

/// Events a chat session emits while it is open. The session is over once
/// its event stream yields `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    Connected(bool),
    Balloon(BalloonEvent),
}
