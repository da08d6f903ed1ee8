//! Canonical JSON encodings.
//!
//! Two encodings matter:
//!
//! - The **signing payload**: compact JSON of `{name, bio, avatarCid}` with the
//!   keys in exactly that order and `avatarCid` written as `null` when absent.
//!   Signer and verifier must both produce these bytes from the document's own
//!   field values.
//! - The **published form** of a document: a `serde_json::Value` whose object
//!   keys are kept sorted, so re-serializing the same document always yields
//!   the same bytes for the pinning network.

use serde::Serialize;
use serde_json::Value;

use crate::error::{CoreError, Result};

/// The fields covered by a document signature, in signing order.
///
/// Field order is part of the wire contract: serde_json writes struct fields
/// in declaration order.
#[derive(Serialize)]
struct SignedFields<'a> {
    name: &'a str,
    bio: &'a str,
    #[serde(rename = "avatarCid")]
    avatar_cid: Option<&'a str>,
}

/// Encode the signed subset of a document.
pub fn signing_payload(name: &str, bio: &str, avatar_cid: Option<&str>) -> Result<Vec<u8>> {
    let fields = SignedFields {
        name,
        bio,
        avatar_cid,
    };
    serde_json::to_vec(&fields).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Convert any serializable payload into its canonical JSON value.
pub fn to_canonical_value<T: Serialize + ?Sized>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload).map_err(|e| CoreError::EncodingError(e.to_string()))
}

/// Encode a JSON value to bytes.
///
/// Object keys come out sorted because `serde_json::Map` is ordered by key.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CoreError::EncodingError(e.to_string()))
}
