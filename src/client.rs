//! Shared HTTP client for storefront, community, and exchange reads.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::error::ScanError;
use crate::util::env::env_parse;

/// Thin wrapper around one [`reqwest::Client`]; all fetches in a run share
/// its connection pool and timeout.
#[derive(Clone)]
pub struct StoreClient {
    http: Client,
}

impl StoreClient {
    pub fn new() -> Self {
        // Sane default timeout to avoid indefinite hangs on slow endpoints.
        let timeout_secs: u64 = env_parse("HTTP_TIMEOUT_SECS", 15);
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("cardhunt/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }

    /// GET returning parsed JSON. Non-2xx statuses count as transport
    /// failures; the URL rides along for the run-level error report.
    pub async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, ScanError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ScanError::Transport {
                url: url.to_string(),
                source,
            })?;
        resp.json::<Value>().await.map_err(|source| ScanError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// GET returning the raw body.
    pub async fn get_text(&self, url: &str) -> Result<String, ScanError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|source| ScanError::Transport {
                url: url.to_string(),
                source,
            })?;
        resp.text().await.map_err(|source| ScanError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

impl Default for StoreClient {
    fn default() -> Self {
        Self::new()
    }
}
