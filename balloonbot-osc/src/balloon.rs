//! balloonbot-osc/src/balloon.rs
//!
//! The balloon notification message:
//!   /osc/ballon <name: string> <count: int32>

use rosc::{OscMessage, OscPacket, OscType};

/// Address the control surface listens on. The spelling is what the
/// receiving side matches against.
pub const BALLOON_ADDRESS: &str = "/osc/ballon";

#[derive(Debug, Clone, PartialEq)]
pub struct BalloonMessage {
    pub user_name: String,
    pub count: i32,
}

impl BalloonMessage {
    pub fn new(user_name: &str, count: i32) -> Self {
        Self {
            user_name: user_name.to_string(),
            count,
        }
    }

    pub fn to_packet(&self) -> OscPacket {
        OscPacket::Message(OscMessage {
            addr: BALLOON_ADDRESS.to_string(),
            args: vec![
                OscType::String(self.user_name.clone()),
                OscType::Int(self.count),
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_keep_name_then_count_order() {
        let OscPacket::Message(msg) = BalloonMessage::new("bob", 100).to_packet() else {
            panic!("expected a message");
        };
        assert_eq!(msg.addr, BALLOON_ADDRESS);
        assert_eq!(msg.args[0], OscType::String("bob".into()));
        assert_eq!(msg.args[1], OscType::Int(100));
    }
}
