//! Golden test vectors for deterministic verification.
//!
//! These vectors pin down the byte-level behaviour other implementations
//! (the mobile client in particular) must agree with: key derivation, the
//! message digest, and the signed payload encoding.

use profile_ledger_core::{digest, signing_payload, Keypair};

/// A private scalar and its compressed public key.
#[derive(Debug, Clone)]
pub struct KeyVector {
    pub name: &'static str,
    pub private_key_hex: &'static str,
    pub public_key_hex: &'static str,
}

/// A SHA-256 known answer.
#[derive(Debug, Clone)]
pub struct DigestVector {
    pub name: &'static str,
    pub message: &'static [u8],
    pub digest_hex: &'static str,
}

/// Signing payload inputs and the exact bytes they encode to.
#[derive(Debug, Clone)]
pub struct PayloadVector {
    pub name: &'static str,
    pub profile_name: &'static str,
    pub bio: &'static str,
    pub avatar_cid: Option<&'static str>,
    pub expected: &'static str,
}

/// secp256k1 key derivation vectors.
pub fn key_vectors() -> Vec<KeyVector> {
    vec![
        KeyVector {
            name: "generator point (k = 1)",
            private_key_hex: "0000000000000000000000000000000000000000000000000000000000000001",
            public_key_hex: "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        },
        KeyVector {
            name: "doubled generator (k = 2)",
            private_key_hex: "0000000000000000000000000000000000000000000000000000000000000002",
            public_key_hex: "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5",
        },
    ]
}

/// SHA-256 known answers.
pub fn digest_vectors() -> Vec<DigestVector> {
    vec![
        DigestVector {
            name: "empty message",
            message: b"",
            digest_hex: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
        },
        DigestVector {
            name: "abc",
            message: b"abc",
            digest_hex: "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
        },
    ]
}

/// Signing payload encodings.
pub fn payload_vectors() -> Vec<PayloadVector> {
    vec![
        PayloadVector {
            name: "no avatar",
            profile_name: "Alex",
            bio: "hi",
            avatar_cid: None,
            expected: r#"{"name":"Alex","bio":"hi","avatarCid":null}"#,
        },
        PayloadVector {
            name: "with avatar",
            profile_name: "Alex",
            bio: "hi",
            avatar_cid: Some("ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"),
            expected: r#"{"name":"Alex","bio":"hi","avatarCid":"ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG"}"#,
        },
        PayloadVector {
            name: "escaped characters",
            profile_name: "Zoë \"Z\"",
            bio: "line\nbreak",
            avatar_cid: None,
            expected: "{\"name\":\"Zoë \\\"Z\\\"\",\"bio\":\"line\\nbreak\",\"avatarCid\":null}",
        },
    ]
}

/// Check every vector, reporting the first mismatch.
pub fn verify_all_vectors() -> Result<(), String> {
    for vector in key_vectors() {
        let seed: [u8; 32] = hex::decode(vector.private_key_hex)
            .map_err(|e| format!("{}: {e}", vector.name))?
            .try_into()
            .map_err(|_| format!("{}: private key is not 32 bytes", vector.name))?;
        let keypair = Keypair::from_seed(&seed).map_err(|e| format!("{}: {e}", vector.name))?;
        let actual = keypair.public_key().to_hex();
        if actual != vector.public_key_hex {
            return Err(format!(
                "{}: expected {}, got {actual}",
                vector.name, vector.public_key_hex
            ));
        }
    }

    for vector in digest_vectors() {
        let actual = digest(vector.message).to_hex();
        if actual != vector.digest_hex {
            return Err(format!(
                "{}: expected {}, got {actual}",
                vector.name, vector.digest_hex
            ));
        }
    }

    for vector in payload_vectors() {
        let bytes = signing_payload(vector.profile_name, vector.bio, vector.avatar_cid)
            .map_err(|e| format!("{}: {e}", vector.name))?;
        if bytes != vector.expected.as_bytes() {
            return Err(format!(
                "{}: expected {}, got {}",
                vector.name,
                vector.expected,
                String::from_utf8_lossy(&bytes)
            ));
        }
    }

    Ok(())
}
