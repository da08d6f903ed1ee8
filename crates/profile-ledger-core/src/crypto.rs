//! Cryptographic primitives for Profile Ledger.
//!
//! Wraps secp256k1 ECDSA signing and SHA-256 hashing with strong types.
//! Messages are always hashed with SHA-256 first and the 32-byte digest is
//! signed as a prehash, so any verifier that recomputes the digest over the
//! same canonical bytes reproduces the check.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::Zeroizing;

use crate::error::{CoreError, Result};

/// Length of a raw private key in bytes.
pub const PRIVATE_KEY_LEN: usize = 32;

/// Length of a SEC1 compressed public key in bytes.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Length of a compact `r || s` signature in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest(pub [u8; 32]);

impl Sha256Digest {
    /// Compute the SHA-256 digest of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Sha256Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Compute the digest that signatures are made over.
pub fn digest(message: &[u8]) -> Sha256Digest {
    Sha256Digest::hash(message)
}

/// Draw a fresh private key from the operating system's CSPRNG.
///
/// Candidates that are not a valid non-zero scalar below the curve order are
/// discarded and redrawn. The returned buffer is wiped on drop.
pub fn random_secret() -> Zeroizing<[u8; PRIVATE_KEY_LEN]> {
    let mut secret = Zeroizing::new([0u8; PRIVATE_KEY_LEN]);
    loop {
        OsRng.fill_bytes(secret.as_mut());
        if SigningKey::from_slice(secret.as_ref()).is_ok() {
            return secret;
        }
    }
}

/// A secp256k1 private key.
///
/// Opaque handle: the secret scalar cannot be read back out, and `Debug`
/// never prints it. The underlying key material is zeroized on drop.
#[derive(Clone)]
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Parse a raw 32-byte secret.
    ///
    /// Fails with [`CoreError::InvalidKey`] if the length is wrong or the
    /// bytes are not a valid scalar (zero, or not below the curve order).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PRIVATE_KEY_LEN {
            return Err(CoreError::InvalidKey);
        }
        let signing_key = SigningKey::from_slice(bytes).map_err(|_| CoreError::InvalidKey)?;
        Ok(Self { signing_key })
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_verifying_key(self.signing_key.verifying_key())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// A 33-byte SEC1 compressed secp256k1 public key.
///
/// Its lowercase hex form is the `ownerId` carried by documents.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey(pub [u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.to_encoded_point(true);
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(point.as_bytes());
        Self(bytes)
    }

    /// Parse from SEC1 compressed bytes, checking the point is on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PUBLIC_KEY_LEN {
            return Err(CoreError::InvalidPublicKey(format!(
                "expected {PUBLIC_KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let key = VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| CoreError::InvalidPublicKey("not a curve point".into()))?;
        Ok(Self::from_verifying_key(&key))
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidPublicKey(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Signature bytes as carried by a document.
///
/// Produced signatures are always 64-byte compact `r || s` with low S, but
/// any byte string is representable so that documents received from the
/// outside round-trip unchanged; a malformed value simply fails [`verify`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        hex::decode(s)
            .map(Self)
            .map_err(|e| CoreError::InvalidSignatureEncoding(e.to_string()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Signature({}...)", &hex[..hex.len().min(16)])
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

/// Sign `message` with `private_key`.
///
/// The message must already be the canonical serialization of exactly the
/// fields the signature covers; this function only hashes and signs.
pub fn sign(message: &[u8], private_key: &PrivateKey) -> Result<Signature> {
    let digest = digest(message);
    let signature: EcdsaSignature = private_key
        .signing_key
        .sign_prehash(digest.as_bytes())
        .map_err(|_| CoreError::InvalidKey)?;
    Ok(Signature(signature.to_bytes().to_vec()))
}

/// Check `signature` over `message` against `public_key`.
///
/// Never fails: malformed signatures and keys simply yield `false`.
pub fn verify(message: &[u8], signature: &[u8], public_key: &PublicKey) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_sec1_bytes(public_key.as_bytes()) else {
        return false;
    };
    let Ok(signature) = EcdsaSignature::from_slice(signature) else {
        return false;
    };
    verifying_key
        .verify_prehash(digest(message).as_bytes(), &signature)
        .is_ok()
}

/// A device signing keypair.
///
/// The public key is derived from the private key once at construction and
/// the pair is immutable afterwards.
#[derive(Clone)]
pub struct Keypair {
    private_key: PrivateKey,
    public_key: PublicKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut OsRng);
        Self::from_private_key(PrivateKey { signing_key })
    }

    /// Build a keypair from a private key, deriving the public key.
    pub fn from_private_key(private_key: PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            private_key,
            public_key,
        }
    }

    /// Create from a raw 32-byte secret.
    pub fn from_seed(seed: &[u8; PRIVATE_KEY_LEN]) -> Result<Self> {
        PrivateKey::from_bytes(seed).map(Self::from_private_key)
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the private key handle, for passing to [`sign`].
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        sign(message, &self.private_key)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key)
    }
}
