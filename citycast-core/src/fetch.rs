use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::TransportError;

/// Provider endpoint; a city code is appended as the last path segment.
pub const DEFAULT_BASE_URL: &str = "http://t.weather.itboy.net/api/weather/city";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The transport seam: fetch the raw body behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync + Debug {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// `<base>/<code>`, tolerating a trailing slash on the base.
pub fn city_url(base_url: &str, city_code: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), city_code)
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let request_failed = |source| TransportError::Request { url: url.to_owned(), source };

        let res = self.http.get(url).send().await.map_err(request_failed)?;

        let status = res.status();
        debug!(%url, %status, "forecast response");

        let body = res.bytes().await.map_err(request_failed)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        Ok(body.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
