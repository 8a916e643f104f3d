//! Contract Test: Linked Records & Idempotency
//!
//! Constraints verified:
//! - A record with a stored redirectId is updated, never created again
//! - Repeated syncs never create duplicate remote redirects
//! - Update responses without a Location header keep the stored redirectId
//! - `update` returns the remote response as-is and records nothing itself

mod common;

use common::*;
use helpscout_core::traits::{ApiResponse, MetadataStore};
use helpscout_core::{Error, HELPSCOUT_META_KEY, MemoryMetadataStore, SyncAction};
use serde_json::json;

const PERMALINK: &str = "https://example.com/install-guide";

#[tokio::test]
async fn linked_record_is_updated_not_created() {
    let store = MemoryMetadataStore::new();
    store
        .set(
            42,
            HELPSCOUT_META_KEY,
            &json!({"slug": "install", "number": 7, "redirectId": "xyz"}),
        )
        .await
        .unwrap();
    let transport = MockDocsTransport::new("unused");
    let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

    let outcome = sync.create(42).await.expect("sync succeeds");

    assert_eq!(outcome.action, SyncAction::Updated);
    assert_eq!(transport.count(Method::Post), 0, "Linked record must not be created again");
    assert_eq!(transport.count(Method::Put), 1);

    let call = &transport.calls()[0];
    assert_eq!(call.path, "redirects/xyz");
    assert_eq!(
        call.body,
        r#"{"siteId":"S1","urlMapping":"/article/7-install","redirect":"https://example.com/install-guide"}"#
    );
}

#[tokio::test]
async fn second_sync_routes_through_update() {
    let store = MemoryMetadataStore::new();
    store
        .set(42, HELPSCOUT_META_KEY, &json!({"slug": "install", "number": 7}))
        .await
        .unwrap();
    let transport = MockDocsTransport::new("xyz");
    let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

    let first = sync.create(42).await.expect("first sync succeeds");
    let second = sync.create(42).await.expect("second sync succeeds");

    assert_eq!(first.action, SyncAction::Created);
    assert_eq!(second.action, SyncAction::Updated);

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!((calls[0].method, calls[0].path.as_str()), (Method::Post, "redirects"));
    assert_eq!((calls[1].method, calls[1].path.as_str()), (Method::Put, "redirects/xyz"));
    assert_eq!(calls[0].body, calls[1].body, "Both calls carry the same body");

    // The update response has no Location header; the ID must survive
    assert_eq!(
        store.get(42, HELPSCOUT_META_KEY).await.unwrap(),
        Some(json!({"slug": "install", "number": 7, "redirectId": "xyz"}))
    );
    assert_eq!(second.data.redirect_id.as_deref(), Some("xyz"));
}

#[tokio::test]
async fn many_syncs_create_exactly_once() {
    let store = MemoryMetadataStore::new();
    store
        .set(9, HELPSCOUT_META_KEY, &json!({"slug": "a", "number": 1}))
        .await
        .unwrap();
    let transport = MockDocsTransport::new("r9");
    let sync = synchronizer(&store, &transport, &[(9, "https://example.com/a")]);

    for _ in 0..5 {
        sync.create(9).await.expect("sync succeeds");
    }

    assert_eq!(transport.count(Method::Post), 1);
    assert_eq!(transport.count(Method::Put), 4);
}

#[tokio::test]
async fn update_response_with_new_location_replaces_id() {
    let store = MemoryMetadataStore::new();
    store
        .set(
            42,
            HELPSCOUT_META_KEY,
            &json!({"slug": "install", "number": 7, "redirectId": "old"}),
        )
        .await
        .unwrap();
    let transport = MockDocsTransport::new("unused");
    transport.set_put_reply(MockReply::Respond(created("new")));
    let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

    let outcome = sync.create(42).await.expect("sync succeeds");

    assert_eq!(outcome.data.redirect_id.as_deref(), Some("new"));
}

#[tokio::test]
async fn failed_update_leaves_metadata_unchanged() {
    let linked = json!({"slug": "install", "number": 7, "redirectId": "xyz"});

    for reply in [
        MockReply::Respond(ApiResponse::new(404)),
        MockReply::Fail("timed out".to_string()),
    ] {
        let store = MemoryMetadataStore::new();
        store.set(42, HELPSCOUT_META_KEY, &linked).await.unwrap();
        let transport = MockDocsTransport::new("unused");
        transport.set_put_reply(reply);
        let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

        let err = sync.create(42).await.unwrap_err();

        assert!(err.is_request_failed(), "got {:?}", err);
        assert_eq!(err.to_string(), "Request was not successful.");
        assert_eq!(transport.count(Method::Post), 0);
        assert_eq!(
            store.get(42, HELPSCOUT_META_KEY).await.unwrap(),
            Some(linked.clone())
        );
    }
}

#[tokio::test]
async fn linked_record_without_slug_makes_no_request() {
    let store = MemoryMetadataStore::new();
    store
        .set(42, HELPSCOUT_META_KEY, &json!({"redirectId": "xyz"}))
        .await
        .unwrap();
    let transport = MockDocsTransport::new("unused");
    let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

    let err = sync.create(42).await.unwrap_err();

    assert!(matches!(err, Error::MissingSlugData { record_id: 42 }));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn empty_stored_redirect_id_counts_as_unlinked() {
    let store = MemoryMetadataStore::new();
    store
        .set(
            42,
            HELPSCOUT_META_KEY,
            &json!({"slug": "install", "number": 7, "redirectId": ""}),
        )
        .await
        .unwrap();
    let transport = MockDocsTransport::new("xyz");
    let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

    let outcome = sync.create(42).await.expect("sync succeeds");

    assert_eq!(outcome.action, SyncAction::Created);
    assert_eq!(transport.count(Method::Post), 1);
    assert_eq!(outcome.data.redirect_id.as_deref(), Some("xyz"));
}

#[tokio::test]
async fn update_returns_response_verbatim_without_recording() {
    let store = MemoryMetadataStore::new();
    store
        .set(42, HELPSCOUT_META_KEY, &json!({"slug": "install", "number": 7}))
        .await
        .unwrap();
    let transport = MockDocsTransport::new("unused");
    let not_found = ApiResponse::new(404).with_body(r#"{"error":"Not Found"}"#);
    transport.set_put_reply(MockReply::Respond(not_found.clone()));
    let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

    let response = sync.update("abc", 42).await.expect("transport answered");

    assert_eq!(response, not_found);
    assert_eq!(transport.calls()[0].path, "redirects/abc");
    // update() never writes metadata, even when the caller's ID is new
    assert_eq!(
        store.get(42, HELPSCOUT_META_KEY).await.unwrap(),
        Some(json!({"slug": "install", "number": 7}))
    );
}

#[tokio::test]
async fn update_without_slug_makes_no_request() {
    let store = MemoryMetadataStore::new();
    let transport = MockDocsTransport::new("unused");
    let sync = synchronizer(&store, &transport, &[(42, PERMALINK)]);

    let err = sync.update("abc", 42).await.unwrap_err();

    assert!(err.is_missing_slug());
    assert_eq!(err.failure_body(), json!({"error": "something went wrong."}));
    assert_eq!(transport.call_count(), 0);
}
