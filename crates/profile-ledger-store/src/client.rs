//! HTTP client for a remote document store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use profile_ledger_core::{DocId, Document};

use crate::error::{Result, StoreError};
use crate::records::StoreRecord;
use crate::service::{DocumentResponse, DocumentSubmitter, SubmitReceipt};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the store's HTTP surface.
#[derive(Debug, Clone)]
pub struct StoreClient {
    base_url: String,
    http: Client,
}

impl StoreClient {
    /// Create a client for the store at `base_url` (e.g. `http://10.0.2.2:3000`).
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { base_url, http })
    }

    /// Submit a document to the store.
    pub async fn submit(&self, document: &Document) -> Result<SubmitReceipt> {
        let response = self
            .http
            .post(format!("{}/store", self.base_url))
            .json(document)
            .send()
            .await
            .map_err(transport_error)?;

        let receipt: SubmitReceipt = read_json(response).await?;
        info!(doc_id = %receipt.doc_id, cid = %receipt.cid, "document submitted");
        Ok(receipt)
    }

    /// Look up a stored record by document id.
    pub async fn lookup(&self, doc_id: &DocId) -> Result<StoreRecord> {
        let response = self
            .http
            .get(format!("{}/document/{doc_id}", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            debug!(doc_id = %doc_id, "document not found");
            return Err(StoreError::NotFound);
        }

        let body: DocumentResponse = read_json(response).await?;
        Ok(StoreRecord {
            doc_id: *doc_id,
            document: body.doc,
            cid: body.cid,
        })
    }

    /// Check that the store is reachable.
    pub async fn health(&self) -> Result<()> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait]
impl DocumentSubmitter for StoreClient {
    async fn submit_document(&self, document: &Document) -> Result<SubmitReceipt> {
        self.submit(document).await
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_else(|e| {
        warn!(error = %e, "failed to read error body from store");
        format!("<unreadable response body: {e}>")
    });
    Err(StoreError::Remote {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    ensure_success(response)
        .await?
        .json()
        .await
        .map_err(|e| StoreError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_ledger_core::{Cid, PROFILE_KIND};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample() -> Document {
        Document {
            kind: PROFILE_KIND.into(),
            owner_id: "02ab".into(),
            name: "Alex".into(),
            bio: "hi".into(),
            avatar_cid: None,
            created_at: 1_700_000_000_000,
            signature: None,
        }
    }

    fn client_for(server: &MockServer) -> StoreClient {
        StoreClient::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_submit_posts_document() {
        let server = MockServer::start().await;
        let doc_id = DocId::new_random();
        Mock::given(method("POST"))
            .and(path("/store"))
            .and(body_json(serde_json::to_value(sample()).unwrap()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"docId": doc_id.to_string(), "cid": "QmDoc"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let receipt = client_for(&server).submit(&sample()).await.unwrap();

        assert_eq!(receipt.doc_id, doc_id);
        assert_eq!(receipt.cid, Cid::new("QmDoc"));
    }

    #[tokio::test]
    async fn test_submit_failure_is_remote_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/store"))
            .respond_with(
                ResponseTemplate::new(502)
                    .set_body_string(r#"{"error":"pin failed","detail":"Invalid API key"}"#),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).submit(&sample()).await.unwrap_err();
        match err {
            StoreError::Remote { status, body } => {
                assert_eq!(status, 502);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreadable_error_body_is_reported() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            stream
                .set_read_timeout(Some(Duration::from_millis(200)))
                .unwrap();
            let mut buf = [0u8; 4096];
            while matches!(stream.read(&mut buf), Ok(n) if n > 0) {}
            // declares more body than it sends, then closes
            let _ = stream.write_all(b"HTTP/1.1 502 Bad Gateway\r\nContent-Length: 64\r\n\r\npin");
        });

        let client = StoreClient::new(format!("http://{addr}"), Duration::from_secs(5)).unwrap();
        match client.submit(&sample()).await.unwrap_err() {
            StoreError::Remote { status, body } => {
                assert_eq!(status, 502);
                assert!(body.starts_with("<unreadable response body"), "{body}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_lookup_found_and_missing() {
        let server = MockServer::start().await;
        let found = DocId::new_random();
        let missing = DocId::new_random();
        Mock::given(method("GET"))
            .and(path(format!("/document/{found}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"doc": sample(), "cid": "QmDoc"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/document/{missing}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let record = client.lookup(&found).await.unwrap();
        assert_eq!(record.document, sample());
        assert_eq!(record.doc_id, found);

        assert!(matches!(
            client.lookup(&missing).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_unavailable() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();

        let client = StoreClient::new(format!("http://{addr}"), Duration::from_secs(1)).unwrap();
        assert!(matches!(
            client.submit(&sample()).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        assert!(client_for(&server).health().await.is_ok());
    }
}
