//! Strong type definitions for Profile Ledger.
//!
//! Identifiers are newtypes so a document id can never be passed where a
//! content id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::document::CONTENT_URI_SCHEME;
use crate::error::CoreError;

/// Opaque identifier minted by the document store for each submission.
///
/// A random (v4) UUID; its textual form is the 36-character hyphenated
/// representation. Distinct from a [`Cid`]: resubmitting the same document
/// yields a new `DocId`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(Uuid);

impl DocId {
    /// Mint a fresh random identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Debug for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocId({})", self.0)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for DocId {
    type Err = CoreError;

    /// Accepts only the canonical lowercase hyphenated form, so every id has
    /// exactly one textual spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| CoreError::InvalidDocId(format!("{s}: {e}")))?;
        if id.to_string() != s {
            return Err(CoreError::InvalidDocId(format!(
                "{s}: not in canonical hyphenated lowercase form"
            )));
        }
        Ok(id)
    }
}

/// A content identifier returned by the pinning network.
///
/// Treated as an opaque string: this crate never derives CIDs itself.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(String);

impl Cid {
    /// Wrap a content identifier string.
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The content-addressed URI form, e.g. `ipfs://<cid>`.
    pub fn to_uri(&self) -> String {
        format!("{CONTENT_URI_SCHEME}{}", self.0)
    }

    /// Parse the URI form back into a bare identifier.
    ///
    /// Returns `None` when the scheme prefix is missing or nothing follows it.
    pub fn from_uri(uri: &str) -> Option<Self> {
        uri.strip_prefix(CONTENT_URI_SCHEME)
            .filter(|rest| !rest.is_empty())
            .map(Self::new)
    }
}

impl fmt::Debug for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cid({})", self.0)
    }
}

impl fmt::Display for Cid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Cid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Cid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_display_is_36_chars() {
        let id = DocId::new_random();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text.matches('-').count(), 4);
    }

    #[test]
    fn test_doc_id_parse_roundtrip() {
        let id = DocId::new_random();
        let parsed: DocId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_doc_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<DocId>().is_err());
        assert!("".parse::<DocId>().is_err());
    }

    #[test]
    fn test_doc_id_rejects_alternate_spellings() {
        let id = DocId::new_random();
        let canonical = id.to_string();

        for alias in [
            canonical.to_uppercase(),
            canonical.replace('-', ""),
            format!("{{{canonical}}}"),
            format!("urn:uuid:{canonical}"),
        ] {
            assert!(alias.parse::<DocId>().is_err(), "accepted {alias}");
        }
    }

    #[test]
    fn test_doc_ids_are_unique() {
        let a = DocId::new_random();
        let b = DocId::new_random();
        assert_ne!(a, b);
    }

    #[test]
    fn test_cid_uri() {
        let cid = Cid::new("QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG");
        assert_eq!(
            cid.to_uri(),
            "ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"
        );
        assert_eq!(Cid::from_uri(&cid.to_uri()), Some(cid));
    }

    #[test]
    fn test_cid_from_uri_requires_scheme() {
        assert_eq!(Cid::from_uri("QmFoo"), None);
        assert_eq!(Cid::from_uri("ipfs://"), None);
        assert_eq!(Cid::from_uri("https://QmFoo"), None);
    }

    #[test]
    fn test_cid_serializes_as_plain_string() {
        let cid = Cid::new("bafy123");
        assert_eq!(serde_json::to_string(&cid).unwrap(), "\"bafy123\"");
    }
}
