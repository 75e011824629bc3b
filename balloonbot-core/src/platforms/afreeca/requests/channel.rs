// ========================================================
// File: src/platforms/afreeca/requests/channel.rs
// ========================================================
use serde_json::Value;
use tracing::debug;

use balloonbot_common::models::ChannelInfo;

use crate::Error;
use crate::http::HttpClient;

use super::{body_snippet, json_i64, json_string};

pub fn live_api_url(base: &str, broadcaster_id: &str) -> String {
    format!(
        "{}/afreeca/player_live_api.php?bjid={}",
        base.trim_end_matches('/'),
        urlencoding::encode(broadcaster_id)
    )
}

/// Asks the live-player endpoint for the chat server and room of the current
/// broadcast.
///
/// An answer without a host or port is reported as `Error::Resolution`; the
/// caller would otherwise build a URL nobody listens on.
pub async fn resolve_channel_info(
    http: &dyn HttpClient,
    base: &str,
    broadcaster_id: &str,
) -> Result<ChannelInfo, Error> {
    let form = vec![
        ("bid".to_string(), broadcaster_id.to_string()),
        ("player_type".to_string(), "html5".to_string()),
    ];

    let resp = http.post_form(live_api_url(base, broadcaster_id), form).await?;
    if !resp.is_ok() {
        return Err(Error::Protocol {
            status: resp.status,
            message: format!(
                "live api request for '{}' => {}",
                broadcaster_id,
                body_snippet(&resp.body)
            ),
        });
    }

    let info = parse_channel_body(&resp.body)?;
    if info.chat_server_host.trim().is_empty() || info.chat_server_port.trim().is_empty() {
        return Err(Error::Resolution(format!(
            "no chat server for '{}' (host='{}', port='{}')",
            broadcaster_id, info.chat_server_host, info.chat_server_port
        )));
    }

    debug!(
        "channel '{}': chat={}:{}, room={}",
        broadcaster_id, info.chat_server_host, info.chat_server_port, info.chat_room_id
    );
    Ok(info)
}

/// Reads `CHANNEL.{CHDOMAIN,CHPT,CHATNO,FTK}`.
///
/// `CHANNEL.RESULT` is 1 for a joinable broadcast; when present with any other
/// value the platform has refused us and the fields are meaningless.
pub fn parse_channel_body(body: &str) -> Result<ChannelInfo, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| Error::Protocol {
        status: 200,
        message: format!("live api body is not JSON: {e}"),
    })?;

    let channel = value.get("CHANNEL").ok_or_else(|| Error::Protocol {
        status: 200,
        message: "live api body has no CHANNEL object".to_string(),
    })?;

    if let Some(result) = channel.get("RESULT") {
        let code = json_i64(Some(result));
        if code != 1 {
            return Err(Error::Resolution(format!("live api RESULT={code}")));
        }
    }

    Ok(ChannelInfo {
        chat_server_host: json_string(channel.get("CHDOMAIN")),
        chat_server_port: json_string(channel.get("CHPT")),
        chat_room_id: json_string(channel.get("CHATNO")),
        fan_ticket: json_string(channel.get("FTK")),
    })
}
