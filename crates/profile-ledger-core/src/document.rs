//! Document: a user-authored record, signed by its owner's device key.
//!
//! A document is immutable once signed. Changing any covered field
//! (`name`, `bio`, `avatarCid`) invalidates the signature and requires
//! re-signing through a fresh [`DocumentBuilder`].

use serde::{Deserialize, Serialize};

use crate::canonical::signing_payload;
use crate::crypto::{verify, Keypair, PublicKey, Signature};
use crate::error::Result;
use crate::types::Cid;

/// Type tag of profile documents.
pub const PROFILE_KIND: &str = "profile";

/// URI scheme prefix wrapped around content identifiers stored in documents.
pub const CONTENT_URI_SCHEME: &str = "ipfs://";

/// A user-authored document.
///
/// Serialized field order is fixed: `type`, `ownerId`, `name`, `bio`,
/// `avatarCid`, `createdAt`, `signature`. `avatarCid` is always present
/// (`null` when there is no avatar); `signature` is omitted until signed.
///
/// `owner_id` is kept as the hex text it arrived with so a document received
/// from the network round-trips unchanged; use [`Document::owner_key`] to
/// parse it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    pub kind: String,
    pub owner_id: String,
    pub name: String,
    pub bio: String,
    pub avatar_cid: Option<String>,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
}

impl Document {
    /// The canonical bytes the signature covers.
    pub fn signing_payload(&self) -> Result<Vec<u8>> {
        signing_payload(&self.name, &self.bio, self.avatar_cid.as_deref())
    }

    /// Parse the owner's public key.
    pub fn owner_key(&self) -> Result<PublicKey> {
        PublicKey::from_hex(&self.owner_id)
    }

    /// Check whether a signature is attached (not whether it is valid).
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// Check whether this is a profile document.
    pub fn is_profile(&self) -> bool {
        self.kind == PROFILE_KIND
    }

    /// The bare avatar content identifier, without the URI scheme.
    pub fn avatar_content_id(&self) -> Option<Cid> {
        self.avatar_cid.as_deref().and_then(Cid::from_uri)
    }
}

/// Verify the signature embedded in a document against its `ownerId`.
///
/// Returns `false` when the document is unsigned, the owner id is not a valid
/// public key, or the signature does not match the canonical payload.
pub fn verify_document(document: &Document) -> bool {
    let Some(signature) = &document.signature else {
        return false;
    };
    let Ok(owner) = document.owner_key() else {
        return false;
    };
    let Ok(payload) = document.signing_payload() else {
        return false;
    };
    verify(&payload, signature.as_bytes(), &owner)
}

/// Builder for creating documents.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    kind: String,
    name: String,
    bio: String,
    avatar_cid: Option<String>,
    created_at: i64,
}

impl DocumentBuilder {
    /// Start a document of an arbitrary type.
    pub fn new(kind: impl Into<String>, name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            bio: bio.into(),
            avatar_cid: None,
            created_at: 0,
        }
    }

    /// Start a profile document.
    pub fn profile(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self::new(PROFILE_KIND, name, bio)
    }

    /// Attach an avatar, stored as `ipfs://<cid>`.
    pub fn avatar(mut self, cid: &Cid) -> Self {
        self.avatar_cid = Some(cid.to_uri());
        self
    }

    /// Set the creation timestamp (Unix milliseconds).
    pub fn created_at(mut self, ts: i64) -> Self {
        self.created_at = ts;
        self
    }

    /// Build an unsigned document owned by `owner`.
    pub fn unsigned(self, owner: &PublicKey) -> Document {
        Document {
            kind: self.kind,
            owner_id: owner.to_hex(),
            name: self.name,
            bio: self.bio,
            avatar_cid: self.avatar_cid,
            created_at: self.created_at,
            signature: None,
        }
    }

    /// Build and sign the document with `keypair`.
    ///
    /// The signature covers the canonical `{name, bio, avatarCid}` payload,
    /// so the avatar must already be attached.
    pub fn sign(self, keypair: &Keypair) -> Result<Document> {
        let mut document = self.unsigned(keypair.public_key());
        let payload = document.signing_payload()?;
        document.signature = Some(keypair.sign(&payload)?);
        Ok(document)
    }
}
