//! src/platforms/afreeca/packet.rs
//!
//! Chat packet framing. Every packet is
//!
//! ```text
//! ESC TAB | service (4 digits) | body length (6 digits) | option (2 digits) | body
//! ```
//!
//! and the body is a list of fields separated by form feeds (0x0C). Only the
//! handful of services the bridge needs are modelled.

use balloonbot_common::models::BalloonEvent;

pub const PACKET_START: [u8; 2] = [0x1b, 0x09];
pub const FIELD_SEPARATOR: char = '\x0c';
pub const HEADER_LEN: usize = 14;

pub const SVC_KEEPALIVE: u16 = 0;
pub const SVC_LOGIN: u16 = 1;
pub const SVC_JOIN: u16 = 2;
pub const SVC_BALLOON: u16 = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPacket {
    pub service: u16,
    pub option: String,
    pub fields: Vec<String>,
}

pub fn encode_packet(service: u16, body: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&PACKET_START);
    out.extend_from_slice(format!("{:04}{:06}00", service, body.len()).as_bytes());
    out.extend_from_slice(body.as_bytes());
    out
}

pub fn keepalive_packet() -> Vec<u8> {
    encode_packet(SVC_KEEPALIVE, "\x0c")
}

pub fn login_packet(capability_flag: &str) -> Vec<u8> {
    encode_packet(SVC_LOGIN, &format!("\x0c\x0c\x0c{capability_flag}\x0c"))
}

pub fn join_packet(chat_room_id: &str, fan_ticket: &str) -> Vec<u8> {
    encode_packet(SVC_JOIN, &format!("\x0c{chat_room_id}\x0c{fan_ticket}\x0c0\x0c\x0c"))
}

/// Returns `None` for anything that is not a well-formed chat packet.
pub fn decode_packet(data: &[u8]) -> Option<ChatPacket> {
    if data.len() < HEADER_LEN || data[..2] != PACKET_START {
        return None;
    }
    let header = std::str::from_utf8(&data[2..HEADER_LEN]).ok()?;
    if !header.is_ascii() {
        return None;
    }
    let service: u16 = header[0..4].parse().ok()?;
    let option = header[10..12].to_string();

    let body = String::from_utf8_lossy(&data[HEADER_LEN..]);
    // bodies start with a separator, so the first split is always empty
    let fields = body
        .split(FIELD_SEPARATOR)
        .skip(1)
        .map(|f| f.to_string())
        .collect();

    Some(ChatPacket { service, option, fields })
}

/// Balloon body: `bj id, sender id, sender nickname, count, ...`.
pub fn parse_balloon(packet: &ChatPacket) -> Option<BalloonEvent> {
    if packet.service != SVC_BALLOON || packet.fields.len() < 4 {
        return None;
    }
    let count = packet.fields[3].trim().parse::<i32>().ok()?;
    Some(BalloonEvent {
        broadcaster_id: packet.fields[0].clone(),
        user_id: packet.fields[1].clone(),
        user_name: packet.fields[2].clone(),
        count,
        received_at: chrono::Utc::now(),
    })
}
