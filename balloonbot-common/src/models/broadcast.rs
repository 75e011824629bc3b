// File: balloonbot-common/src/models/broadcast.rs

use serde::{Deserialize, Serialize};

/// Opaque capability flag the chat service expects at login.
pub const CAPABILITY_FLAG: &str = "524304";

/// Snapshot of a broadcaster's station, taken fresh on every poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastStatus {
    /// Zero when the channel is offline.
    pub broadcast_id: i64,
    pub title: String,
}

impl BroadcastStatus {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn live(broadcast_id: i64, title: &str) -> Self {
        Self {
            broadcast_id,
            title: title.to_string(),
        }
    }

    /// A broadcast is live whenever the platform hands out a non-zero id.
    /// The title is not used: it can linger after the stream ends.
    pub fn is_live(&self) -> bool {
        self.broadcast_id != 0
    }
}

/// Chat-room parameters returned by the live-player endpoint.
/// Only valid for the session they were resolved for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub chat_server_host: String,
    pub chat_server_port: String,
    pub chat_room_id: String,
    pub fan_ticket: String,
}

/// Everything the chat client needs to open one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub broadcaster_id: String,
    pub chat_room_id: String,
    pub capability_flag: String,
    pub fan_ticket: String,
    pub websocket_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_broadcast_id_is_offline() {
        assert!(!BroadcastStatus::offline().is_live());
        assert!(!BroadcastStatus::live(0, "title left over from last stream").is_live());
    }

    #[test]
    fn any_nonzero_broadcast_id_is_live() {
        for id in [1, 42, 271_828_182, -1, i64::MAX] {
            assert!(BroadcastStatus::live(id, "").is_live(), "id {id} should be live");
        }
    }
}
