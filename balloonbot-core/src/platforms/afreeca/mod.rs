//! src/platforms/afreeca/mod.rs
//!
//! AfreecaTV integration: the two anonymous metadata endpoints, the session
//! credential derivation and a minimal chat client.

pub mod client;
pub mod packet;
pub mod requests;
pub mod token;

use std::sync::Arc;

use async_trait::async_trait;

use balloonbot_common::models::{BroadcastStatus, ChannelInfo};
use balloonbot_common::traits::BroadcastApi;

use crate::Error;
use crate::http::HttpClient;

pub use client::{AfreecaChatClient, AfreecaChatConnector};
pub use token::build_credential;

pub const DEFAULT_STATION_API_BASE: &str = "https://bjapi.afreecatv.com";
pub const DEFAULT_LIVE_API_BASE: &str = "https://live.afreecatv.com";

/// Sent on every metadata request; the station API rejects bare clients.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0";

/// Base URLs for the metadata endpoints. Overridable so tests and proxies can
/// point the client elsewhere.
#[derive(Debug, Clone)]
pub struct AfreecaEndpoints {
    pub station_base: String,
    pub live_base: String,
}

impl Default for AfreecaEndpoints {
    fn default() -> Self {
        Self {
            station_base: DEFAULT_STATION_API_BASE.to_string(),
            live_base: DEFAULT_LIVE_API_BASE.to_string(),
        }
    }
}

/// `BroadcastApi` backed by the public AfreecaTV endpoints.
pub struct AfreecaApi {
    http: Arc<dyn HttpClient>,
    endpoints: AfreecaEndpoints,
}

impl AfreecaApi {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self::with_endpoints(http, AfreecaEndpoints::default())
    }

    pub fn with_endpoints(http: Arc<dyn HttpClient>, endpoints: AfreecaEndpoints) -> Self {
        Self { http, endpoints }
    }
}

#[async_trait]
impl BroadcastApi for AfreecaApi {
    async fn fetch_status(&self, broadcaster_id: &str) -> Result<BroadcastStatus, Error> {
        requests::station::fetch_station_status(
            self.http.as_ref(),
            &self.endpoints.station_base,
            broadcaster_id,
        )
        .await
    }

    async fn resolve_channel(&self, broadcaster_id: &str) -> Result<ChannelInfo, Error> {
        requests::channel::resolve_channel_info(
            self.http.as_ref(),
            &self.endpoints.live_base,
            broadcaster_id,
        )
        .await
    }
}
