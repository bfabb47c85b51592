//! Shared REST plumbing: one pooled HTTP client plus the `{success, data,
//! message?, error?}` envelope every backend endpoint wraps its payload in.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

pub fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

/// Response envelope used by every REST endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Best-effort error text from a non-success envelope body.
/// Preference order mirrors the backend contract: message, then error.
#[derive(Debug, Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn envelope_error(message: Option<String>, error: Option<String>, fallback: &str) -> anyhow::Error {
    anyhow!(message
        .or(error)
        .unwrap_or_else(|| fallback.to_string()))
}

/// Thin typed wrapper around the backend REST base URL.
///
/// Deliberately retry-free: claim/eligibility calls must reach the backend at
/// most once per action, and duplicate-claim rejection is backend-owned.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        log::debug!("[api] GET {} {:?}", path, query);
        let res = http_client()
            .get(self.url(path))
            .query(query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("Request failed: {e}"))?;
        Self::decode(res).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        log::debug!("[api] POST {}", path);
        let res = http_client()
            .post(self.url(path))
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("Request failed: {e}"))?;
        Self::decode(res).await
    }

    /// POST where the response payload (if any) is not worth keeping.
    /// Tolerates a success envelope with no `data` field.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        log::debug!("[api] POST {}", path);
        let res = http_client()
            .post(self.url(path))
            .json(body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| anyhow!("Request failed: {e}"))?;
        let status = res.status();
        if !status.is_success() {
            let body: ErrorBody = res.json().await.unwrap_or_default();
            return Err(envelope_error(
                body.message,
                body.error,
                &format!("http {status}"),
            ));
        }
        let envelope: ApiEnvelope<serde_json::Value> = res
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse API response: {e}"))?;
        if envelope.success {
            Ok(())
        } else {
            Err(envelope_error(
                envelope.message,
                envelope.error,
                "API request failed",
            ))
        }
    }

    async fn decode<T: DeserializeOwned>(res: reqwest::Response) -> Result<T> {
        let status = res.status();
        if !status.is_success() {
            // The backend reports domain errors with non-2xx statuses too;
            // surface its message verbatim when the body carries one.
            let body: ErrorBody = res.json().await.unwrap_or_default();
            return Err(envelope_error(
                body.message,
                body.error,
                &format!("http {status}"),
            ));
        }

        let envelope: ApiEnvelope<T> = res
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse API response: {e}"))?;

        if envelope.success {
            envelope
                .data
                .ok_or_else(|| anyhow!("API response missing data"))
        } else {
            Err(envelope_error(
                envelope.message,
                envelope.error,
                "API request failed",
            ))
        }
    }
}
