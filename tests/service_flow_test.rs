//! Full service flow over the in-memory store, including a snapshot restart.

use nalu_link_lib::config::NaluConfig;
use nalu_link_lib::data_structures::collision_resolver::ResolutionStrategy;
use nalu_link_lib::error::NaluError;
use nalu_link_lib::service::{LinkService, LinkStore, MemoryLinkStore};
use tempfile::tempdir;

fn config() -> NaluConfig {
    let mut config = NaluConfig::default();
    config.service.base_url = "https://nalu.example".to_string();
    config.structures.top_k = 2;
    config
}

#[tokio::test]
async fn test_shorten_redirect_and_rank() {
    let service = LinkService::new(MemoryLinkStore::new(), &config());

    let first = service.shorten("https://example.com/one", None).await.unwrap();
    let second = service.shorten("https://example.com/two", None).await.unwrap();
    let third = service.shorten("https://example.org/three", None).await.unwrap();

    assert_eq!(first.code, "1");
    assert_eq!(second.code, "2");
    assert_eq!(third.short_url, "https://nalu.example/3");

    for _ in 0..3 {
        service.resolve_redirect("2").await.unwrap();
    }
    service.resolve_redirect("1").await.unwrap();
    service.resolve_redirect("3").await.unwrap();
    service.resolve_redirect("3").await.unwrap();

    let top: Vec<_> = service
        .top_links()
        .into_iter()
        .map(|record| (record.short_code.unwrap_or_default(), record.clicks))
        .collect();
    assert_eq!(top, vec![("2".to_string(), 3), ("3".to_string(), 2)]);

    let hits = service.search("https://example.com", None);
    assert_eq!(hits[0].url, "https://example.com/two");
    assert_eq!(hits[0].frequency, 3);

    let store_top = service.store().get_top_records(1).await.unwrap();
    assert_eq!(store_top[0].short_code.as_deref(), Some("2"));
}

#[tokio::test]
async fn test_existing_code_collides_with_derived_one() {
    let store = MemoryLinkStore::new();
    // A record that was hand-assigned the code the next id would derive.
    let id = store.insert_record("https://manual.example").await.unwrap();
    store.update_code(id, "2", false, None).await.unwrap();

    let service = LinkService::new(store, &config());
    service.rehydrate().await.unwrap();

    let outcome = service
        .shorten("https://example.com/next", Some(ResolutionStrategy::Append))
        .await
        .unwrap();

    assert!(outcome.collision_detected);
    assert_eq!(outcome.code, "21");
    assert_eq!(outcome.strategy_used.as_deref(), Some("append_counter"));

    let record = service.store().get_by_code("21").await.unwrap().unwrap();
    assert!(record.collision_resolved);
    assert_eq!(record.resolution_strategy.as_deref(), Some("append_counter"));
}

#[tokio::test]
async fn test_snapshot_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("links.json");

    {
        let service = LinkService::new(MemoryLinkStore::open(&path).await.unwrap(), &config());
        service.shorten("https://example.com/keep", None).await.unwrap();
        service.resolve_redirect("1").await.unwrap();
        service.store().save().await.unwrap();
    }

    let service = LinkService::new(MemoryLinkStore::open(&path).await.unwrap(), &config());
    assert_eq!(service.rehydrate().await.unwrap(), 1);

    let again = service.shorten("https://example.com/keep", None).await.unwrap();
    assert_eq!(again.code, "1");
    assert!(again.cached);
    assert_eq!(service.top_links()[0].clicks, 1);

    assert!(service.delete_link("1").await.unwrap());
    assert!(matches!(
        service.resolve_redirect("1").await,
        Err(NaluError::NotFound(_))
    ));
}
