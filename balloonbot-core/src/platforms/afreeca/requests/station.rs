// ========================================================
// File: src/platforms/afreeca/requests/station.rs
// ========================================================
use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use balloonbot_common::models::BroadcastStatus;

use crate::Error;
use crate::http::HttpClient;
use crate::platforms::afreeca::USER_AGENT;

use super::{body_snippet, json_i64, json_string};

pub fn station_url(base: &str, broadcaster_id: &str) -> String {
    format!(
        "{}/api/{}/station",
        base.trim_end_matches('/'),
        urlencoding::encode(broadcaster_id)
    )
}

/// Fetches the station document for `broadcaster_id` and extracts the current
/// broadcast. No retries here; the poller simply tries again next cycle.
pub async fn fetch_station_status(
    http: &dyn HttpClient,
    base: &str,
    broadcaster_id: &str,
) -> Result<BroadcastStatus, Error> {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("User-Agent".to_string(), USER_AGENT.to_string());

    let resp = http.get(station_url(base, broadcaster_id), headers).await?;
    if !resp.is_ok() {
        return Err(Error::Protocol {
            status: resp.status,
            message: format!(
                "station request for '{}' => {}",
                broadcaster_id,
                body_snippet(&resp.body)
            ),
        });
    }

    let status = parse_station_body(&resp.body)?;
    debug!(
        "station '{}': broad_no={}, title='{}'",
        broadcaster_id, status.broadcast_id, status.title
    );
    Ok(status)
}

/// Reads `broad.broad_no` and `broad.broad_title`. An offline channel has a
/// null or missing `broad`, which yields the offline status rather than an
/// error.
pub fn parse_station_body(body: &str) -> Result<BroadcastStatus, Error> {
    let value: Value = serde_json::from_str(body).map_err(|e| Error::Protocol {
        status: 200,
        message: format!("station body is not JSON: {e}"),
    })?;

    let broad = value.get("broad");
    Ok(BroadcastStatus {
        broadcast_id: json_i64(broad.and_then(|b| b.get("broad_no"))),
        title: json_string(broad.and_then(|b| b.get("broad_title"))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_station_reads_broad_fields() {
        let body = r#"{"station":{"user_id":"bj"},"broad":{"broad_no":261234567,"broad_title":"evening stream"}}"#;
        let status = parse_station_body(body).unwrap();
        assert_eq!(status.broadcast_id, 261234567);
        assert_eq!(status.title, "evening stream");
        assert!(status.is_live());
    }

    #[test]
    fn offline_station_has_null_broad() {
        let status = parse_station_body(r#"{"station":{},"broad":null}"#).unwrap();
        assert_eq!(status, BroadcastStatus::offline());
        assert!(!status.is_live());
    }

    #[test]
    fn missing_fields_default_instead_of_failing() {
        let status = parse_station_body(r#"{"broad":{"broad_title":"only a title"}}"#).unwrap();
        assert_eq!(status.broadcast_id, 0);
        assert_eq!(status.title, "only a title");

        let status = parse_station_body("{}").unwrap();
        assert_eq!(status, BroadcastStatus::offline());
    }

    #[test]
    fn garbage_body_is_a_protocol_error() {
        let err = parse_station_body("<html>").unwrap_err();
        assert!(matches!(err, Error::Protocol { status: 200, .. }));
    }

    #[test]
    fn url_escapes_the_broadcaster_id() {
        assert_eq!(
            station_url("https://bjapi.afreecatv.com/", "some bj"),
            "https://bjapi.afreecatv.com/api/some%20bj/station"
        );
    }
}
