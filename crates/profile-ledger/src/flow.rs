//! ProfileRegistrationFlow: sign and submit a profile from this device.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use profile_ledger_core::{Cid, DocId, Document, DocumentBuilder};
use profile_ledger_custody::{KeyCustody, SecretStore};
use profile_ledger_pin::Publisher;
use profile_ledger_store::DocumentSubmitter;

use crate::error::{FlowError, Result};

/// Filename used for avatars that do not come from a file.
pub const DEFAULT_AVATAR_FILENAME: &str = "avatar.jpg";

/// Mime type used for avatars that do not come from a file.
pub const DEFAULT_AVATAR_MIME: &str = "image/jpeg";

/// Binary avatar content to pin alongside a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarSource {
    pub bytes: Bytes,
    pub mime_type: String,
    pub filename: String,
}

impl AvatarSource {
    /// Wrap raw image bytes, assumed to be a JPEG named `avatar.jpg`.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: DEFAULT_AVATAR_MIME.to_string(),
            filename: DEFAULT_AVATAR_FILENAME.to_string(),
        }
    }

    /// Override the mime type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Override the upload filename.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Read an avatar from a local file.
    ///
    /// The mime type is guessed from the extension and the upload keeps the
    /// file's own name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|source| FlowError::Avatar {
            path: PathBuf::from(path),
            source,
        })?;

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(DEFAULT_AVATAR_FILENAME);

        Ok(Self::new(bytes)
            .with_mime_type(guess_mime_type(path))
            .with_filename(filename))
    }
}

/// Guess an image mime type from a file extension.
pub fn guess_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

/// What the user entered for their profile.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub name: String,
    pub bio: String,
    pub avatar: Option<AvatarSource>,
}

impl ProfileInput {
    /// A profile without an avatar.
    pub fn new(name: impl Into<String>, bio: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: bio.into(),
            avatar: None,
        }
    }

    /// Attach an avatar.
    pub fn with_avatar(mut self, avatar: AvatarSource) -> Self {
        self.avatar = Some(avatar);
        self
    }
}

/// A profile accepted by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProfile {
    pub doc_id: DocId,
    pub cid: Cid,
    pub document: Document,
}

/// Registers profiles signed by this device's key.
///
/// Holds no locks of its own. Custody keeps first-use key creation atomic
/// at the secret store.
pub struct ProfileRegistrationFlow<S: SecretStore, P, D> {
    custody: KeyCustody<S>,
    publisher: P,
    submitter: D,
}

impl<S, P, D> ProfileRegistrationFlow<S, P, D>
where
    S: SecretStore,
    P: Publisher,
    D: DocumentSubmitter,
{
    /// Create a new flow.
    pub fn new(custody: KeyCustody<S>, publisher: P, submitter: D) -> Self {
        Self {
            custody,
            publisher,
            submitter,
        }
    }

    /// Get the key custody.
    pub fn custody(&self) -> &KeyCustody<S> {
        &self.custody
    }

    /// Sign a profile with the device key and submit it.
    ///
    /// Fails with [`FlowError::WalletNotReady`] before anything is uploaded
    /// when the device key cannot be loaded or created. Nothing is retried.
    pub async fn save_profile(&self, input: ProfileInput) -> Result<SavedProfile> {
        let keypair = self
            .custody
            .get_or_create_keypair()
            .await
            .map_err(FlowError::WalletNotReady)?;

        let mut builder =
            DocumentBuilder::profile(input.name, input.bio).created_at(Utc::now().timestamp_millis());

        if let Some(avatar) = input.avatar {
            debug!(
                filename = %avatar.filename,
                mime_type = %avatar.mime_type,
                size_bytes = avatar.bytes.len(),
                "pinning avatar"
            );
            let pinned = self
                .publisher
                .publish_file(avatar.bytes, &avatar.mime_type, &avatar.filename)
                .await?;
            builder = builder.avatar(&pinned.content_id);
        }

        let document = builder.sign(&keypair)?;
        let receipt = self.submitter.submit_document(&document).await?;

        info!(
            doc_id = %receipt.doc_id,
            cid = %receipt.cid,
            owner_id = %document.owner_id,
            "profile saved"
        );
        Ok(SavedProfile {
            doc_id: receipt.doc_id,
            cid: receipt.cid,
            document,
        })
    }
}
