//! End-to-end loading behavior against the in-memory store

use async_trait::async_trait;
use secretcfg::{
    ConfigTree, LoadError, MemoryStore, SecretInfo, SecretPayload, SecretStore, StoreError,
    WithSecretsOptions, with_secrets,
};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};

fn config(value: Value) -> ConfigTree {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Store that fails every call; used to prove calls do or do not happen.
struct FailingStore;

#[async_trait]
impl SecretStore for FailingStore {
    fn provider_name(&self) -> &'static str {
        "failing"
    }

    async fn list_secrets(
        &self,
        parent: &str,
        _filter: Option<&str>,
    ) -> Result<Vec<SecretInfo>, StoreError> {
        Err(StoreError::ListFailed {
            parent: parent.to_string(),
            message: "listing unavailable".to_string(),
        })
    }

    async fn access_secret_version(
        &self,
        name: &str,
    ) -> Result<Option<SecretPayload>, StoreError> {
        Err(StoreError::AccessFailed {
            name: name.to_string(),
            message: "access unavailable".to_string(),
        })
    }
}

/// Wrapper counting fetches against an inner store.
struct CountingStore {
    inner: MemoryStore,
    accesses: AtomicUsize,
}

impl CountingStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            accesses: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SecretStore for CountingStore {
    fn provider_name(&self) -> &'static str {
        "counting"
    }

    async fn list_secrets(
        &self,
        parent: &str,
        filter: Option<&str>,
    ) -> Result<Vec<SecretInfo>, StoreError> {
        self.inner.list_secrets(parent, filter).await
    }

    async fn access_secret_version(
        &self,
        name: &str,
    ) -> Result<Option<SecretPayload>, StoreError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.inner.access_secret_version(name).await
    }
}

#[tokio::test]
async fn placeholder_is_replaced_with_payload() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v1".as_slice());

    let input = config(json!({"serverRuntimeConfig": {"a": "{GoogleSecret:s1}"}}));
    let options = WithSecretsOptions::new("proj");

    let merged = with_secrets(&store, &options, input).await.unwrap();
    assert_eq!(
        Value::Object(merged),
        json!({"serverRuntimeConfig": {"a": "v1"}})
    );
}

#[tokio::test]
async fn placeholder_replaces_the_whole_field_value() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v1".as_slice());

    let input = config(json!({
        "serverRuntimeConfig": {"a": "prefix {GoogleSecret:s1} suffix"}
    }));
    let merged = with_secrets(&store, &WithSecretsOptions::new("proj"), input)
        .await
        .unwrap();

    // No sub-string substitution: the fetched value replaces the field.
    assert_eq!(merged["serverRuntimeConfig"]["a"], json!("v1"));
}

#[tokio::test]
async fn mapping_writes_to_double_underscore_path() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v1".as_slice());

    let options = WithSecretsOptions::new("proj").map_secret("s1", "serverRuntimeConfig__x");
    let merged = with_secrets(&store, &options, config(json!({})))
        .await
        .unwrap();

    assert_eq!(
        Value::Object(merged),
        json!({"serverRuntimeConfig": {"x": "v1"}})
    );
}

#[tokio::test]
async fn mapping_with_multiple_paths_writes_the_same_value_everywhere() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v".as_slice());

    let options =
        WithSecretsOptions::new("proj").map_secret("s1", ["a.b", "a__c"].as_slice());
    let merged = with_secrets(&store, &options, config(json!({})))
        .await
        .unwrap();

    assert_eq!(Value::Object(merged), json!({"a": {"b": "v", "c": "v"}}));
}

#[tokio::test]
async fn disabled_returns_input_unchanged_without_store_calls() {
    let input = config(json!({
        "serverRuntimeConfig": {"a": "{GoogleSecret:s1}"},
        "other": {"kept": "yes"}
    }));
    let options = WithSecretsOptions::new("proj")
        .map_secret("s1", "a.b")
        .enabled(false);

    // FailingStore errors on any call; Ok proves listing never ran.
    let merged = with_secrets(&FailingStore, &options, input.clone())
        .await
        .unwrap();
    assert_eq!(merged, input);
}

#[tokio::test]
async fn empty_payload_leaves_destination_unchanged() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"".as_slice());

    let input = config(json!({"serverRuntimeConfig": {"a": "{GoogleSecret:s1}"}}));
    let options = WithSecretsOptions::new("proj").map_secret("s1", "serverRuntimeConfig.b");

    let merged = with_secrets(&store, &options, input.clone()).await.unwrap();
    assert_eq!(merged, input);
}

#[tokio::test]
async fn listing_failure_propagates_by_default() {
    let result = with_secrets(
        &FailingStore,
        &WithSecretsOptions::new("proj"),
        config(json!({})),
    )
    .await;
    assert!(matches!(result, Err(LoadError::Store(_))));
}

#[tokio::test]
async fn continue_on_error_returns_input_when_listing_fails() {
    let input = config(json!({"serverRuntimeConfig": {"a": "{GoogleSecret:s1}"}}));
    let options = WithSecretsOptions::new("proj").continue_on_error(true);

    let merged = with_secrets(&FailingStore, &options, input.clone())
        .await
        .unwrap();
    assert_eq!(merged, input);
}

#[tokio::test]
async fn continue_on_error_keeps_earlier_writes_when_a_fetch_fails() {
    let mut store = MemoryStore::new();
    // "a-first" is listed first and writes; the second secret's pinned
    // version is missing and aborts the run.
    store.insert("proj", "a-first", "latest", b"one".as_slice());
    store.insert("proj", "b-second", "latest", b"two".as_slice());

    let options = WithSecretsOptions::new("proj")
        .map_secret("a-first", "out.first")
        .map_secret("b-second", "out.second")
        .pin_version("b-second", "99")
        .continue_on_error(true);

    let merged = with_secrets(&store, &options, config(json!({})))
        .await
        .unwrap();
    assert_eq!(merged["out"]["first"], json!("one"));
    assert_eq!(merged["out"].get("second"), None);
}

#[tokio::test]
async fn client_side_filter_skips_both_mechanisms() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v1".as_slice());

    let input = config(json!({"serverRuntimeConfig": {"a": "{GoogleSecret:s1}"}}));
    let options = WithSecretsOptions::new("proj")
        .map_secret("s1", "serverRuntimeConfig.b")
        .with_secret_filter(|secret| secret.short_name() != "s1");

    let merged = with_secrets(&store, &options, input.clone()).await.unwrap();
    assert_eq!(merged, input);
}

#[tokio::test]
async fn mapping_fetches_pinned_version_and_placeholder_fetches_its_own() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"latest-value".as_slice());
    store.insert("proj", "s1", "2", b"pinned-value".as_slice());
    store.insert("proj", "s1", "5", b"placeholder-value".as_slice());

    let input = config(json!({"serverRuntimeConfig": {"a": "{GoogleSecret:s1:5}"}}));
    let options = WithSecretsOptions::new("proj")
        .map_secret("s1", "serverRuntimeConfig.b")
        .pin_version("s1", "2");

    let merged = with_secrets(&store, &options, input).await.unwrap();
    assert_eq!(merged["serverRuntimeConfig"]["b"], json!("pinned-value"));
    assert_eq!(
        merged["serverRuntimeConfig"]["a"],
        json!("placeholder-value")
    );
}

#[tokio::test]
async fn secrets_without_mapping_or_placeholder_are_not_fetched() {
    let mut store = MemoryStore::new();
    store.insert("proj", "wanted", "latest", b"v".as_slice());
    store.insert("proj", "unrelated", "latest", b"x".as_slice());
    let store = CountingStore::new(store);

    let options = WithSecretsOptions::new("proj").map_secret("wanted", "out.value");
    let merged = with_secrets(&store, &options, config(json!({})))
        .await
        .unwrap();

    assert_eq!(merged["out"]["value"], json!("v"));
    assert_eq!(store.accesses.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn multiple_placeholder_occurrences_fetch_once_each() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v1".as_slice());
    store.insert("proj", "s1", "2", b"v2".as_slice());
    let store = CountingStore::new(store);

    let input = config(json!({
        "serverRuntimeConfig": {"a": "{GoogleSecret:s1}"},
        "publicRuntimeConfig": {"b": "{GoogleSecret:s1:2}"}
    }));
    let merged = with_secrets(&store, &WithSecretsOptions::new("proj"), input)
        .await
        .unwrap();

    assert_eq!(merged["serverRuntimeConfig"]["a"], json!("v1"));
    assert_eq!(merged["publicRuntimeConfig"]["b"], json!("v2"));
    assert_eq!(store.accesses.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn write_conflict_is_skipped_and_the_rest_still_lands() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v".as_slice());

    let input = config(json!({"blocked": "leaf", "open": {}}));
    let options =
        WithSecretsOptions::new("proj").map_secret("s1", ["blocked.x", "open.x"].as_slice());

    let merged = with_secrets(&store, &options, input).await.unwrap();
    assert_eq!(merged["blocked"], json!("leaf"));
    assert_eq!(merged["open"]["x"], json!("v"));
}

#[tokio::test]
async fn project_may_already_carry_the_projects_prefix() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v1".as_slice());

    let options = WithSecretsOptions::new("projects/proj").map_secret("s1", "out.x");
    let merged = with_secrets(&store, &options, config(json!({})))
        .await
        .unwrap();
    assert_eq!(merged["out"]["x"], json!("v1"));
}

#[tokio::test]
async fn untouched_top_level_keys_survive_the_merge() {
    let mut store = MemoryStore::new();
    store.insert("proj", "s1", "latest", b"v1".as_slice());

    let input = config(json!({
        "serverRuntimeConfig": {"a": "{GoogleSecret:s1}"},
        "webpack": {"custom": true}
    }));
    let merged = with_secrets(&store, &WithSecretsOptions::new("proj"), input)
        .await
        .unwrap();
    assert_eq!(merged["webpack"], json!({"custom": true}));
}
