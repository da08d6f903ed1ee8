//! Proptest generators for property-based testing.

use proptest::prelude::*;

use profile_ledger_core::{Cid, Document, DocumentBuilder, Keypair, PublicKey};

/// Generate a random keypair.
///
/// Seeds that are not valid scalars (zero, or above the group order) are
/// filtered out; they are vanishingly rare.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_filter_map("seed is not a valid scalar", |seed| {
        Keypair::from_seed(&seed).ok()
    })
}

/// Generate a random public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| *kp.public_key())
}

/// Generate a display name, including non-ASCII and JSON-escaped characters.
pub fn profile_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z][A-Za-z ]{0,31}".prop_map(String::from),
        "\\PC{0,24}".prop_map(String::from),
        Just("A \"quoted\" name".to_string()),
    ]
}

/// Generate a biography, possibly empty or multi-line.
pub fn bio() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z ]{1,80}".prop_map(String::from),
        "\\PC{0,40}\n\\PC{0,40}".prop_map(String::from),
    ]
}

/// Generate a content identifier.
pub fn cid() -> impl Strategy<Value = Cid> {
    "Qm[1-9A-HJ-NP-Za-km-z]{44}".prop_map(Cid::new)
}

/// Generate a creation timestamp in milliseconds.
pub fn created_at() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800_000i64
}

/// Parameters for generating a document.
#[derive(Debug, Clone)]
pub struct DocumentParams {
    pub keypair: Keypair,
    pub name: String,
    pub bio: String,
    pub avatar: Option<Cid>,
    pub created_at: i64,
}

impl Arbitrary for DocumentParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            keypair(),
            profile_name(),
            bio(),
            proptest::option::of(cid()),
            created_at(),
        )
            .prop_map(|(keypair, name, bio, avatar, created_at)| DocumentParams {
                keypair,
                name,
                bio,
                avatar,
                created_at,
            })
            .boxed()
    }
}

/// Generate a signed profile document from parameters.
pub fn document_from_params(params: &DocumentParams) -> Document {
    let mut builder = DocumentBuilder::profile(params.name.clone(), params.bio.clone())
        .created_at(params.created_at);

    if let Some(avatar) = &params.avatar {
        builder = builder.avatar(avatar);
    }

    builder
        .sign(&params.keypair)
        .expect("signing generated document failed")
}
