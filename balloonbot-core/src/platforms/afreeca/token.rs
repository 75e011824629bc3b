// File: src/platforms/afreeca/token.rs
//
// Turns a resolved channel into the credential the chat client consumes.

use balloonbot_common::models::{CAPABILITY_FLAG, ChannelInfo, SessionCredential};

use crate::Error;

pub const WEBSOCKET_PATH: &str = "/Websocket";

/// The published `CHPT` is the data port; chat websockets listen one above it.
pub fn websocket_url(host: &str, data_port: u16) -> Result<String, Error> {
    let ws_port = data_port
        .checked_add(1)
        .ok_or_else(|| Error::Resolution(format!("chat port {data_port} out of range")))?;
    Ok(format!("wss://{host}:{ws_port}{WEBSOCKET_PATH}"))
}

pub fn build_credential(broadcaster_id: &str, channel: &ChannelInfo) -> Result<SessionCredential, Error> {
    let host = channel.chat_server_host.trim();
    if host.is_empty() {
        return Err(Error::Resolution("empty chat server host".to_string()));
    }
    let port: u16 = channel
        .chat_server_port
        .trim()
        .parse()
        .map_err(|_| Error::Resolution(format!("bad chat port '{}'", channel.chat_server_port)))?;

    Ok(SessionCredential {
        broadcaster_id: broadcaster_id.to_string(),
        chat_room_id: channel.chat_room_id.clone(),
        capability_flag: CAPABILITY_FLAG.to_string(),
        fan_ticket: channel.fan_ticket.clone(),
        websocket_url: Some(websocket_url(host, port)?),
    })
}
