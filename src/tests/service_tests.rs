//! Tests for the link service against a mocked store.

use mockall::predicate::eq;

use crate::config::NaluConfig;
use crate::data_structures::collision_resolver::{CollisionError, ResolutionStrategy};
use crate::error::{NaluError, StoreError};
use crate::service::{LinkRecord, LinkService, MockLinkStore};
use crate::tests::CountingReporter;

fn service(store: MockLinkStore) -> LinkService<MockLinkStore> {
    LinkService::new(store, &NaluConfig::default())
}

fn coded_record(id: i64, url: &str, code: &str, clicks: u64) -> LinkRecord {
    let mut record = LinkRecord::new(id, url);
    record.short_code = Some(code.to_string());
    record.clicks = clicks;
    record
}

#[tokio::test]
async fn test_shorten_new_url_then_cache_hit() {
    let mut store = MockLinkStore::new();
    store
        .expect_get_by_original()
        .with(eq("https://example.com/a"))
        .times(1)
        .returning(|_| Ok(None));
    store
        .expect_insert_record()
        .times(1)
        .returning(|_| Ok(125));
    store
        .expect_update_code()
        .withf(|id, code, resolved, strategy| {
            *id == 125 && code == "21" && !*resolved && strategy.is_none()
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let service = service(store);

    let outcome = service.shorten("https://example.com/a", None).await.unwrap();
    assert_eq!(outcome.code, "21");
    assert_eq!(outcome.short_url, "http://localhost:8000/21");
    assert!(!outcome.collision_detected);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.strategy_used, None);
    assert!(!outcome.cached);

    // The second request never reaches the store.
    let again = service.shorten("https://example.com/a", None).await.unwrap();
    assert_eq!(again.code, "21");
    assert!(again.cached);

    let state = service.state();
    assert_eq!(
        state.codes.lock().get("21").map(String::as_str),
        Some("https://example.com/a")
    );
    assert!(state.trie.lock().search("https://example.com/a"));
}

#[tokio::test]
async fn test_shorten_resolves_collision_with_default_strategy() {
    let mut store = MockLinkStore::new();
    store.expect_get_by_original().returning(|_| Ok(None));
    store.expect_insert_record().returning(|_| Ok(125));
    store
        .expect_update_code()
        .withf(|id, code, resolved, strategy| {
            *id == 125 && code == "22" && *resolved && *strategy == Some(ResolutionStrategy::Linear)
        })
        .times(1)
        .returning(|_, _, _, _| Ok(()));

    let service = service(store);
    service
        .state()
        .codes
        .lock()
        .put("21".to_string(), "https://taken.com".to_string());

    let outcome = service.shorten("https://example.com/b", None).await.unwrap();

    assert_eq!(outcome.code, "22");
    assert!(outcome.collision_detected);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.strategy_used.as_deref(), Some("linear_probing"));

    let stats = service.stats();
    assert_eq!(stats.collision_resolver.total_collisions, 1);
    assert_eq!(stats.collision_resolver.linear_probing_used, 1);
}

#[tokio::test]
async fn test_shorten_with_append_strategy() {
    let mut store = MockLinkStore::new();
    store.expect_get_by_original().returning(|_| Ok(None));
    store.expect_insert_record().returning(|_| Ok(125));
    store
        .expect_update_code()
        .withf(|_, code, _, strategy| code == "211" && *strategy == Some(ResolutionStrategy::Append))
        .returning(|_, _, _, _| Ok(()));

    let service = service(store);
    service
        .state()
        .codes
        .lock()
        .put("21".to_string(), "https://taken.com".to_string());

    let outcome = service
        .shorten("https://example.com/c", Some(ResolutionStrategy::Append))
        .await
        .unwrap();

    assert_eq!(outcome.code, "211");
    assert_eq!(outcome.strategy_used.as_deref(), Some("append_counter"));
}

#[tokio::test]
async fn test_shorten_exhausted_collision() {
    let mut store = MockLinkStore::new();
    store.expect_get_by_original().returning(|_| Ok(None));
    store.expect_insert_record().returning(|_| Ok(125));

    let mut config = NaluConfig::default();
    config.structures.max_collision_attempts = 2;
    let service = LinkService::new(store, &config);
    {
        let mut codes = service.state().codes.lock();
        for code in ["21", "22", "23"] {
            codes.put(code.to_string(), "https://taken.com".to_string());
        }
    }

    let err = service
        .shorten("https://example.com/d", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NaluError::Collision(CollisionError::Exhausted { attempts: 2, .. })
    ));
}

#[tokio::test]
async fn test_shorten_rejects_invalid_urls_before_touching_the_store() {
    let service = service(MockLinkStore::new());

    for url in [
        "",
        "example.com",
        "ftp://example.com/file",
        "https://",
        "mailto:someone@example.com",
    ] {
        assert!(
            matches!(
                service.shorten(url, None).await,
                Err(NaluError::InvalidUrl { .. })
            ),
            "{url} should be rejected"
        );
    }

    let too_long = format!("https://example.com/{}", "a".repeat(2048));
    assert!(matches!(
        service.shorten(&too_long, None).await,
        Err(NaluError::InvalidUrl { .. })
    ));
}

#[tokio::test]
async fn test_shorten_reuses_stored_code() {
    let mut store = MockLinkStore::new();
    store
        .expect_get_by_original()
        .returning(|url| Ok(Some(coded_record(7, url, "abc", 4))));

    let service = service(store);
    let outcome = service.shorten("https://example.com/e", None).await.unwrap();

    assert_eq!(outcome.code, "abc");
    assert!(!outcome.cached);
    assert_eq!(
        service.state().trie.lock().frequency("https://example.com/e"),
        Some(4)
    );
    assert!(service.state().cache.lock().contains("https://example.com/e"));
}

#[tokio::test]
async fn test_failed_store_update_releases_reserved_code() {
    let mut store = MockLinkStore::new();
    store.expect_get_by_original().returning(|_| Ok(None));
    store.expect_insert_record().returning(|_| Ok(1));
    store
        .expect_update_code()
        .returning(|_, _, _, _| Err(StoreError::Unavailable("down".to_string())));

    let service = service(store);
    let err = service
        .shorten("https://example.com/f", None)
        .await
        .unwrap_err();

    assert!(matches!(err, NaluError::Store(StoreError::Unavailable(_))));
    assert!(!service.state().codes.lock().contains("1"));
    assert!(!service.state().cache.lock().contains("https://example.com/f"));
}

#[tokio::test]
async fn test_redirect_from_table_records_analytics() {
    let mut store = MockLinkStore::new();
    store
        .expect_increment_clicks()
        .with(eq("abc"))
        .times(1)
        .returning(|_| Ok(3));
    store
        .expect_get_by_code()
        .with(eq("abc"))
        .times(1)
        .returning(|code| Ok(Some(coded_record(1, "https://a.com", code, 3))));

    let service = service(store);
    service
        .state()
        .codes
        .lock()
        .put("abc".to_string(), "https://a.com".to_string());
    service
        .state()
        .trie
        .lock()
        .insert("https://a.com", 2)
        .unwrap();

    let url = service.resolve_redirect("abc").await.unwrap();

    assert_eq!(url, "https://a.com");
    assert_eq!(service.state().trie.lock().frequency("https://a.com"), Some(3));

    let top = service.top_links();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].short_code.as_deref(), Some("abc"));
    assert_eq!(top[0].clicks, 3);
}

#[tokio::test]
async fn test_redirect_falls_back_to_store() {
    let mut store = MockLinkStore::new();
    store
        .expect_get_by_code()
        .times(2)
        .returning(|code| Ok(Some(coded_record(2, "https://b.com", code, 1))));
    store.expect_increment_clicks().returning(|_| Ok(1));

    let service = service(store);
    let url = service.resolve_redirect("xyz").await.unwrap();

    assert_eq!(url, "https://b.com");
    assert!(service.state().codes.lock().contains("xyz"));
    assert!(service.state().cache.lock().contains("https://b.com"));
}

#[tokio::test]
async fn test_redirect_unknown_code() {
    let mut store = MockLinkStore::new();
    store.expect_get_by_code().returning(|_| Ok(None));

    let service = service(store);
    let err = service.resolve_redirect("nope").await.unwrap_err();

    assert!(matches!(err, NaluError::NotFound(code) if code == "nope"));
}

#[tokio::test]
async fn test_analytics_failure_does_not_fail_redirect() {
    let mut store = MockLinkStore::new();
    store
        .expect_increment_clicks()
        .returning(|_| Err(StoreError::Unavailable("down".to_string())));

    let reporter = CountingReporter::shared();
    let service = service(store).with_reporter(reporter.clone());
    service
        .state()
        .codes
        .lock()
        .put("abc".to_string(), "https://a.com".to_string());

    let url = service.resolve_redirect("abc").await.unwrap();

    assert_eq!(url, "https://a.com");
    assert_eq!(reporter.count(), 1);
    assert_eq!(reporter.traced(), 1);
    assert!(service.top_links().is_empty());
}

#[tokio::test]
async fn test_rehydrate_skips_uncoded_records() {
    let records = vec![
        coded_record(1, "https://a.com/x", "1", 5),
        coded_record(2, "https://a.com/y", "2", 9),
        LinkRecord::new(3, "https://a.com/pending"),
    ];
    let mut store = MockLinkStore::new();
    store
        .expect_get_all_records()
        .times(1)
        .returning(move || Ok(records.clone()));

    let service = service(store);
    assert_eq!(service.rehydrate().await.unwrap(), 2);

    let stats = service.stats();
    assert_eq!(stats.hash_table.size, 2);
    assert_eq!(stats.lru_cache.size, 2);
    assert_eq!(stats.trie.total_urls, 2);

    let hits = service.search("https://a.com", None);
    let urls: Vec<_> = hits.iter().map(|hit| hit.url.as_str()).collect();
    assert_eq!(urls, vec!["https://a.com/y", "https://a.com/x"]);

    let top: Vec<_> = service
        .top_links()
        .into_iter()
        .map(|record| (record.short_code, record.clicks))
        .collect();
    assert_eq!(
        top,
        vec![(Some("2".to_string()), 9), (Some("1".to_string()), 5)]
    );
}

#[tokio::test]
async fn test_rehydrate_replaces_previous_state() {
    let mut store = MockLinkStore::new();
    let mut calls = 0;
    store.expect_get_all_records().times(2).returning(move || {
        calls += 1;
        if calls == 1 {
            Ok(vec![
                coded_record(1, "https://a.com/x", "1", 5),
                coded_record(2, "https://a.com/y", "2", 9),
            ])
        } else {
            Ok(vec![coded_record(2, "https://a.com/y", "2", 11)])
        }
    });

    let service = service(store);
    assert_eq!(service.rehydrate().await.unwrap(), 2);
    service
        .state()
        .codes
        .lock()
        .put("stale".to_string(), "https://stale.example".to_string());

    assert_eq!(service.rehydrate().await.unwrap(), 1);

    let state = service.state();
    assert!(!state.codes.lock().contains("1"));
    assert!(!state.codes.lock().contains("stale"));
    assert!(!state.cache.lock().contains("https://a.com/x"));
    assert!(!state.trie.lock().search("https://a.com/x"));
    assert_eq!(state.trie.lock().frequency("https://a.com/y"), Some(11));

    let top: Vec<_> = service
        .top_links()
        .into_iter()
        .map(|record| (record.short_code, record.clicks))
        .collect();
    assert_eq!(top, vec![(Some("2".to_string()), 11)]);
}

#[tokio::test]
async fn test_delete_link_clears_every_structure() {
    let mut store = MockLinkStore::new();
    store
        .expect_get_all_records()
        .returning(|| Ok(vec![coded_record(1, "https://a.com", "1", 2)]));
    store
        .expect_delete_record()
        .with(eq("1"))
        .times(1)
        .returning(|_| Ok(true));

    let service = service(store);
    service.rehydrate().await.unwrap();

    assert!(service.delete_link("1").await.unwrap());

    let state = service.state();
    assert!(!state.codes.lock().contains("1"));
    assert!(!state.cache.lock().contains("https://a.com"));
    assert!(!state.trie.lock().search("https://a.com"));
    assert!(service.top_links().is_empty());
}

#[test]
fn test_search_uses_configured_limit() {
    let service = service(MockLinkStore::new());
    {
        let mut trie = service.state().trie.lock();
        for i in 0..8u64 {
            trie.insert(&format!("https://example.com/{i}"), i).unwrap();
        }
    }

    assert_eq!(service.search("https://example.com", None).len(), 5);
    assert_eq!(service.search("https://example.com", Some(2)).len(), 2);
    assert!(service.search("", None).is_empty());
}

proptest::proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(32))]

    // Property: every generated URL passes validation
    #[test]
    fn prop_generated_urls_are_accepted(url in crate::tests::url_strategy()) {
        let service = service(MockLinkStore::new());
        proptest::prop_assert!(service.validate_url(&url).is_ok());
    }

    // Property: rehydration loads one table entry per distinct code and
    // never tracks more than top_k links
    #[test]
    fn prop_rehydrate_matches_records(
        records in proptest::collection::vec(crate::tests::record_strategy(), 0..40)
    ) {
        let mut distinct: Vec<String> = records
            .iter()
            .filter_map(|record| record.short_code.clone())
            .collect();
        distinct.sort();
        distinct.dedup();

        let mut store = MockLinkStore::new();
        let served = records.clone();
        store
            .expect_get_all_records()
            .returning(move || Ok(served.clone()));
        let service = service(store);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let loaded = runtime.block_on(service.rehydrate()).unwrap();

        proptest::prop_assert_eq!(loaded, records.len());
        proptest::prop_assert_eq!(service.state().codes.lock().len(), distinct.len());
        proptest::prop_assert!(service.top_links().len() <= 10);
    }
}
