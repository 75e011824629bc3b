//! HTTP client abstraction for the platform requests.
//!
//! The station and channel requests only need a status code and a body, so
//! the trait exposes exactly that. Tests swap in a canned implementation from
//! `test_utils` instead of talking to the real endpoints.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tracing::trace;

use crate::Error;

/// Raw HTTP answer: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error>;

    /// POST with an `application/x-www-form-urlencoded` body.
    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<HttpResponse, Error>;
}

/// Default per-request deadline.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    async fn read_response(resp: reqwest::Response) -> Result<HttpResponse, Error> {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Network(format!("reading body failed: {e}")))?;
        trace!("HTTP {} => {} bytes", status, body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn get(&self, url: String, headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        let mut request = self.client.get(&url);
        for (key, value) in headers {
            request = request.header(&key, value);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| Error::Network(format!("GET {url} failed: {e}")))?;
        Self::read_response(resp).await
    }

    async fn post_form(&self, url: String, form: Vec<(String, String)>) -> Result<HttpResponse, Error> {
        let resp = self
            .client
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::Network(format!("POST {url} failed: {e}")))?;
        Self::read_response(resp).await
    }
}
