//! HTTP surface of the document store.
//!
//! Routes:
//!
//! - `POST /store`: body is a JSON document; answers `{docId, cid}`.
//! - `GET /document/:id`: answers `{doc, cid}` or `404 {"error": "not found"}`.
//! - `GET /health`: liveness probe.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use profile_ledger_core::{DocId, Document};
use profile_ledger_pin::Publisher;

use crate::error::{Result, StoreError};
use crate::service::{DocumentResponse, DocumentStore, SubmitReceipt};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Build the router for a shared document store.
pub fn router<P: Publisher + 'static>(store: Arc<DocumentStore<P>>) -> Router {
    Router::new()
        .route("/store", post(store_document::<P>))
        .route("/document/:id", get(get_document::<P>))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn store_document<P: Publisher>(
    State(store): State<Arc<DocumentStore<P>>>,
    payload: std::result::Result<Json<Document>, JsonRejection>,
) -> Result<Json<SubmitReceipt>> {
    let Json(document) = payload.map_err(|e| StoreError::BadRequest(e.body_text()))?;
    store.submit(document).await.map(Json)
}

async fn get_document<P: Publisher>(
    State(store): State<Arc<DocumentStore<P>>>,
    Path(id): Path<String>,
) -> Result<Json<DocumentResponse>> {
    // only the canonical spelling of a minted id ever resolves
    let doc_id: DocId = id.parse().map_err(|_| StoreError::NotFound)?;
    let record = store.lookup(&doc_id).await?;
    Ok(Json(record.into()))
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use profile_ledger_pin::{MemoryPublisher, PublishError};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn sample_body() -> String {
        r#"{"type":"profile","ownerId":"02ab","name":"Alex","bio":"hi","avatarCid":null,"createdAt":1700000000000}"#
            .to_string()
    }

    fn post_store(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/store")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get_path(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_store_then_fetch_round_trip() {
        let app = router(Arc::new(DocumentStore::new(MemoryPublisher::new())));

        let response = app.clone().oneshot(post_store(sample_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let receipt = json_body(response).await;
        let doc_id = receipt["docId"].as_str().unwrap().to_string();
        let cid = receipt["cid"].as_str().unwrap().to_string();
        assert_eq!(doc_id.len(), 36);
        assert!(!cid.is_empty());

        let response = app
            .oneshot(get_path(&format!("/document/{doc_id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let expected = format!(r#"{{"doc":{},"cid":"{cid}"}}"#, sample_body());
        assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), expected);
    }

    #[tokio::test]
    async fn test_pin_rejection_is_502_with_detail() {
        let publisher = Arc::new(MemoryPublisher::new());
        publisher.fail_with(PublishError::Rejected {
            status: 401,
            body: "Invalid API key".into(),
        });
        let store = Arc::new(DocumentStore::new(Arc::clone(&publisher)));
        let app = router(Arc::clone(&store));

        let response = app.oneshot(post_store(sample_body())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await,
            json!({"error": "pin failed", "detail": "Invalid API key"})
        );
        assert_eq!(store.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids_are_404() {
        let store = Arc::new(DocumentStore::new(MemoryPublisher::new()));
        let document: Document = serde_json::from_str(&sample_body()).unwrap();
        let receipt = store.submit(document).await.unwrap();
        let canonical = receipt.doc_id.to_string();
        let app = router(store);

        for uri in [
            format!("/document/{}", DocId::new_random()),
            "/document/not-a-uuid".to_string(),
            format!("/document/{}", canonical.to_uppercase()),
            format!("/document/{}", canonical.replace('-', "")),
            format!("/document/%7B{canonical}%7D"),
            format!("/document/urn:uuid:{canonical}"),
        ] {
            let response = app.clone().oneshot(get_path(&uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(json_body(response).await, json!({"error": "not found"}));
        }

        let response = app
            .oneshot(get_path(&format!("/document/{canonical}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let app = router(Arc::new(DocumentStore::new(MemoryPublisher::new())));

        let response = app.oneshot(post_store("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_signature_rejected_is_422() {
        let store = DocumentStore::with_config(
            MemoryPublisher::new(),
            crate::service::StoreConfig {
                verify_signatures: true,
            },
        );
        let app = router(Arc::new(store));

        let response = app.oneshot(post_store(sample_body())).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(Arc::new(DocumentStore::new(MemoryPublisher::new())));
        let response = app.oneshot(get_path("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}
