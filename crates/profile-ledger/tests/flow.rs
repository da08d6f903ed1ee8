//! End-to-end registration through an in-process document store.

use std::sync::Arc;

use profile_ledger::custody::{KeyCustody, SqliteSecretStore};
use profile_ledger::pin::PublishError;
use profile_ledger::store::StoreConfig;
use profile_ledger::{
    verify_document, AvatarSource, FlowError, ProfileInput, ProfileRegistrationFlow,
};
use profile_ledger_testkit::TestFixture;

#[tokio::test]
async fn test_saved_profile_is_retrievable_and_signed_by_device() {
    let fixture = TestFixture::new();
    fixture.install_device_key().await.unwrap();
    let flow = ProfileRegistrationFlow::new(
        fixture.custody(),
        Arc::clone(&fixture.publisher),
        Arc::clone(&fixture.store),
    );

    let saved = flow
        .save_profile(ProfileInput::new("Alex", "hi").with_avatar(AvatarSource::new(&b"img"[..])))
        .await
        .unwrap();

    assert_eq!(saved.document.owner_id, fixture.public_key().to_hex());
    assert!(verify_document(&saved.document));

    let record = fixture.store.lookup(&saved.doc_id).await.unwrap();
    assert_eq!(record.document, saved.document);
    assert_eq!(record.cid, saved.cid);

    // avatar and document are both pinned
    assert_eq!(fixture.publisher.pinned_count(), 2);
    let avatar = saved.document.avatar_content_id().unwrap();
    assert_eq!(&fixture.publisher.get(&avatar).unwrap().bytes[..], b"img");
}

#[tokio::test]
async fn test_keystore_file_keeps_identity_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let keystore = dir.path().join("device.db");
    let fixture = TestFixture::new();

    let mut owners = Vec::new();
    for bio in ["first run", "second run"] {
        let flow = ProfileRegistrationFlow::new(
            KeyCustody::new(SqliteSecretStore::open(&keystore).unwrap()),
            Arc::clone(&fixture.publisher),
            Arc::clone(&fixture.store),
        );
        let saved = flow.save_profile(ProfileInput::new("Alex", bio)).await.unwrap();
        owners.push(saved.document.owner_id);
    }

    assert_eq!(owners[0], owners[1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_saves_share_one_identity() {
    let fixture = TestFixture::new();
    let flow = Arc::new(ProfileRegistrationFlow::new(
        fixture.custody(),
        Arc::clone(&fixture.publisher),
        Arc::clone(&fixture.store),
    ));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let flow = Arc::clone(&flow);
            tokio::spawn(async move {
                flow.save_profile(ProfileInput::new(format!("user {i}"), "hi"))
                    .await
            })
        })
        .collect();

    let mut owners = Vec::new();
    for handle in handles {
        owners.push(handle.await.unwrap().unwrap().document.owner_id);
    }

    assert!(owners.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(fixture.secrets.write_count(), 1);
    assert_eq!(fixture.store.len().await.unwrap(), 16);
}

#[tokio::test]
async fn test_avatar_pin_failure_stops_before_submit() {
    let fixture = TestFixture::new();
    fixture
        .publisher
        .fail_with(PublishError::Unavailable("connection refused".into()));
    let flow = ProfileRegistrationFlow::new(
        fixture.custody(),
        Arc::clone(&fixture.publisher),
        Arc::clone(&fixture.store),
    );

    let err = flow
        .save_profile(ProfileInput::new("Alex", "hi").with_avatar(AvatarSource::new(&b"img"[..])))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FlowError::Publish(PublishError::Unavailable(_))
    ));
    assert_eq!(fixture.store.len().await.unwrap(), 0);
}

#[tokio::test]
async fn test_verifying_store_accepts_flow_documents() {
    let fixture = TestFixture::with_store_config(StoreConfig {
        verify_signatures: true,
    });
    let flow = ProfileRegistrationFlow::new(
        fixture.custody(),
        Arc::clone(&fixture.publisher),
        Arc::clone(&fixture.store),
    );

    let saved = flow
        .save_profile(ProfileInput::new("Zoë", "line one\nline two"))
        .await
        .unwrap();

    assert!(fixture.store.config().verify_signatures);
    assert!(fixture.store.lookup(&saved.doc_id).await.is_ok());
}
