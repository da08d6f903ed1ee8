//! Pinata HTTP client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use profile_ledger_core::Cid;

use crate::error::{PublishError, Result};
use crate::traits::{PinResult, Publisher};

/// Default JSON pinning endpoint.
pub const DEFAULT_JSON_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinJSONToIPFS";

/// Default file pinning endpoint.
pub const DEFAULT_FILE_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "pinata_api_key";
const API_SECRET_HEADER: &str = "pinata_secret_api_key";

/// Multipart field carrying uploaded files.
const FILE_FIELD: &str = "file";

/// Configuration for [`PinataClient`].
#[derive(Clone)]
pub struct PinataConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub json_endpoint: String,
    pub file_endpoint: String,
    pub request_timeout: Duration,
}

impl PinataConfig {
    /// Check whether both credentials are set and non-empty.
    pub fn has_credentials(&self) -> bool {
        matches!(
            (self.api_key.as_deref(), self.api_secret.as_deref()),
            (Some(k), Some(s)) if !k.is_empty() && !s.is_empty()
        )
    }
}

impl Default for PinataConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            json_endpoint: DEFAULT_JSON_ENDPOINT.to_string(),
            file_endpoint: DEFAULT_FILE_ENDPOINT.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl fmt::Debug for PinataConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinataConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("json_endpoint", &self.json_endpoint)
            .field("file_endpoint", &self.file_endpoint)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Success body returned by both pinning endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinataResponse {
    ipfs_hash: String,
    #[serde(default)]
    pin_size: u64,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
}

impl From<PinataResponse> for PinResult {
    fn from(response: PinataResponse) -> Self {
        Self {
            content_id: Cid::new(response.ipfs_hash),
            size_bytes: response.pin_size,
            pinned_at: response.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// Publisher backed by the Pinata pinning API.
///
/// Missing credentials do not prevent construction; each publish call then
/// fails locally with [`PublishError::Unavailable`] without touching the
/// network.
pub struct PinataClient {
    config: PinataConfig,
    http: Client,
}

impl PinataClient {
    /// Create a new client.
    pub fn new(config: PinataConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PublishError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Get the configuration.
    pub fn config(&self) -> &PinataConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match (self.config.api_key.as_deref(), self.config.api_secret.as_deref()) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => Ok(request
                .header(API_KEY_HEADER, key)
                .header(API_SECRET_HEADER, secret)),
            _ => Err(PublishError::Unavailable(
                "pinning credentials not configured".into(),
            )),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<PinResult> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, timeout = e.is_timeout(), "pinning request failed");
            PublishError::Unavailable(e.to_string())
        })?;
        read_pin_response(response).await
    }
}

async fn read_pin_response(response: Response) -> Result<PinResult> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to read rejection body");
            format!("<unreadable response body: {e}>")
        });
        warn!(status = status.as_u16(), body = %body, "pinning network rejected request");
        return Err(PublishError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: PinataResponse = response
        .json()
        .await
        .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;
    Ok(parsed.into())
}

#[async_trait]
impl Publisher for PinataClient {
    async fn publish_json(&self, payload: &Value) -> Result<PinResult> {
        let request = self
            .authorized(self.http.post(&self.config.json_endpoint))?
            .json(&json!({ "pinataContent": payload }));

        let result = self.send(request).await?;
        info!(cid = %result.content_id, size_bytes = result.size_bytes, "pinned JSON");
        Ok(result)
    }

    async fn publish_file(
        &self,
        bytes: Bytes,
        mime_type: &str,
        filename: &str,
    ) -> Result<PinResult> {
        let size = bytes.len();
        let part = Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|e| PublishError::InvalidRequest(format!("mime type {mime_type}: {e}")))?;
        let request = self
            .authorized(self.http.post(&self.config.file_endpoint))?
            .multipart(Form::new().part(FILE_FIELD, part));

        debug!(filename, mime_type, size, "uploading file");
        let result = self.send(request).await?;
        info!(cid = %result.content_id, size_bytes = result.size_bytes, "pinned file");
        Ok(result)
    }
}
