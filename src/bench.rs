//! Workload helpers shared by the Criterion benchmarks.

use crate::config::NaluConfig;
use crate::service::{LinkService, MemoryLinkStore};

/// `count` distinct URLs sharing a handful of hosts, so prefix searches have
/// something to find.
pub fn sample_urls(count: usize) -> Vec<String> {
    const HOSTS: [&str; 4] = [
        "https://example.com",
        "https://docs.example.org",
        "http://blog.example.net",
        "https://shop.example.io",
    ];

    (0..count)
        .map(|i| format!("{}/page/{i}", HOSTS[i % HOSTS.len()]))
        .collect()
}

/// A service over an empty in-memory store with default settings.
pub fn memory_service() -> LinkService<MemoryLinkStore> {
    LinkService::new(MemoryLinkStore::new(), &NaluConfig::default())
}
