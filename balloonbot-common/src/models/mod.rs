// File: balloonbot-common/src/models/mod.rs
pub mod broadcast;
pub mod chat;

pub use broadcast::{BroadcastStatus, ChannelInfo, SessionCredential, CAPABILITY_FLAG};
pub use chat::{BalloonEvent, ChatEvent};
