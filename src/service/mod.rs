//! Link service: the operations a URL shortener front end calls.
//!
//! [`LinkService`] owns a [`LinkStore`] and the in-memory [`LinkState`]. Writes
//! go to the store first and then to the structures; reads are served from
//! the structures and fall back to the store.

pub mod record;
pub mod state;
pub mod store;

use std::sync::Arc;

use serde::Serialize;
use tracing_error::SpanTrace;
use url::Url;

use crate::config::{NaluConfig, ServiceConfig, StructuresConfig};
use crate::data_structures::base62;
use crate::data_structures::collision_resolver::{CollisionStats, ResolutionStrategy};
use crate::data_structures::kona_lru_cache::LruCacheStats;
use crate::data_structures::niihau_trie::TrieStats;
use crate::data_structures::puka_hash_table::HashTableStats;
use crate::error::{report_error, ErrorContext, ErrorReporter, NaluError, NaluResult};

pub use record::LinkRecord;
pub use state::LinkState;
pub use store::{LinkStore, MemoryLinkStore};

#[cfg(test)]
pub use store::MockLinkStore;

/// Result of shortening a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortenOutcome {
    pub original_url: String,
    pub code: String,
    pub short_url: String,
    /// Whether the derived code was already taken
    pub collision_detected: bool,
    /// Candidates tried; 1 when no collision occurred
    pub attempts: u32,
    /// Resolution strategy name, set only after a collision
    pub strategy_used: Option<String>,
    /// Whether the code came straight from the recency cache
    pub cached: bool,
}

/// One prefix search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub frequency: u64,
}

/// Statistics across all in-memory structures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStats {
    pub hash_table: HashTableStats,
    pub lru_cache: LruCacheStats,
    pub trie: TrieStats,
    pub collision_resolver: CollisionStats,
}

/// URL shortener operations over a store and the in-memory structures.
pub struct LinkService<S> {
    store: S,
    state: LinkState,
    structures: StructuresConfig,
    service: ServiceConfig,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl<S: LinkStore> LinkService<S> {
    /// Creates a service with empty structures sized from `config`.
    pub fn new(store: S, config: &NaluConfig) -> Self {
        Self {
            store,
            state: LinkState::new(&config.structures),
            structures: config.structures.clone(),
            service: config.service.clone(),
            reporter: None,
        }
    }

    /// Sends swallowed failures to `reporter` instead of the process-wide one.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The in-memory structures.
    pub fn state(&self) -> &LinkState {
        &self.state
    }

    /// Rebuilds the structures from every coded record in the store.
    ///
    /// Whatever the structures held before is discarded, collision counters
    /// included. Records without a short code are skipped.
    ///
    /// # Returns
    ///
    /// The number of records loaded.
    pub async fn rehydrate(&self) -> NaluResult<usize> {
        let records = self.store.get_all_records().await?;
        let mut loaded = 0;

        self.state.clear();

        {
            let mut codes = self.state.codes.lock();
            let mut cache = self.state.cache.lock();
            let mut trie = self.state.trie.lock();
            let mut top_links = self.state.top_links.lock();

            for record in &records {
                let Some(code) = record.short_code.as_deref() else {
                    continue;
                };

                codes.put(code.to_string(), record.original_url.clone());
                cache.put(record.original_url.clone(), code.to_string());
                if let Err(e) = trie.insert(&record.original_url, record.clicks) {
                    tracing::warn!(code, error = %e, "URL left out of the search index");
                }
                top_links.add_or_update(code, record.clicks, record.clone());
                loaded += 1;
            }
        }

        tracing::info!(
            records = records.len(),
            loaded,
            codes = self.state.codes.lock().len(),
            trie_urls = self.state.trie.lock().len(),
            top_tracked = self.state.top_links.lock().len(),
            "Rehydrated link structures"
        );
        Ok(loaded)
    }

    /// Shortens `url`, reusing an existing code when the URL is known.
    ///
    /// `strategy` falls back to the configured default. A new code is the
    /// store id in base 62; if that is already taken the collision is
    /// resolved before the code is written back to the store.
    pub async fn shorten(
        &self,
        url: &str,
        strategy: Option<ResolutionStrategy>,
    ) -> NaluResult<ShortenOutcome> {
        self.validate_url(url)?;
        let strategy = strategy.unwrap_or(self.structures.default_strategy);

        let cached = self.state.cache.lock().get(url).cloned();
        if let Some(code) = cached {
            tracing::debug!(url, code = %code, "Shorten served from cache");
            return Ok(self.outcome(url, code, false, 1, None, true));
        }

        if let Some(record) = self.store.get_by_original(url).await? {
            if let Some(code) = record.short_code {
                self.state.cache.lock().put(url.to_string(), code.clone());
                self.state.codes.lock().put(code.clone(), url.to_string());
                self.index_url(url, record.clicks);
                return Ok(self.outcome(url, code, false, 1, None, false));
            }
        }

        let id = self.store.insert_record(url).await?;
        let derived = base62::encode_signed(id)?;

        // Detection, resolution and reservation happen under one lock so
        // concurrent requests cannot claim the same code.
        let (code, attempts, resolved_with) = {
            let mut codes = self.state.codes.lock();
            let mut resolver = self.state.resolver.lock();
            if resolver.detect(&*codes, &derived) {
                let resolution = resolver.resolve(
                    &*codes,
                    &derived,
                    strategy,
                    self.structures.max_collision_attempts,
                )?;
                codes.put(resolution.code.clone(), url.to_string());
                (resolution.code, resolution.attempts, Some(resolution.strategy))
            } else {
                codes.put(derived.clone(), url.to_string());
                (derived, 1, None)
            }
        };
        let collision_detected = resolved_with.is_some();

        if let Err(e) = self
            .store
            .update_code(id, &code, collision_detected, resolved_with)
            .await
        {
            self.state.codes.lock().delete(code.as_str());
            return Err(e.into());
        }

        self.state.cache.lock().put(url.to_string(), code.clone());
        self.index_url(url, 0);

        tracing::debug!(url, code = %code, id, collision_detected, attempts, "Shortened URL");
        Ok(self.outcome(
            url,
            code,
            collision_detected,
            attempts,
            resolved_with.map(|s| s.resolved_name().to_string()),
            false,
        ))
    }

    /// Returns the URL behind `code` and records the click.
    ///
    /// Click analytics failures are logged and reported; they never fail the
    /// redirect.
    pub async fn resolve_redirect(&self, code: &str) -> NaluResult<String> {
        let known = self.state.codes.lock().get(code).cloned();
        let original_url = match known {
            Some(url) => url,
            None => {
                let record = self
                    .store
                    .get_by_code(code)
                    .await?
                    .ok_or_else(|| NaluError::NotFound(code.to_string()))?;
                self.state
                    .codes
                    .lock()
                    .put(code.to_string(), record.original_url.clone());
                self.state
                    .cache
                    .lock()
                    .put(record.original_url.clone(), code.to_string());
                record.original_url
            }
        };

        self.record_click(code, &original_url).await;
        Ok(original_url)
    }

    /// Collects statistics from every structure.
    pub fn stats(&self) -> ServiceStats {
        ServiceStats {
            hash_table: self.state.codes.lock().stats(),
            lru_cache: self.state.cache.lock().stats(),
            trie: self.state.trie.lock().stats(),
            collision_resolver: self.state.resolver.lock().stats(),
        }
    }

    /// Stored URLs starting with `prefix`, most clicked first.
    ///
    /// `max_results` falls back to the configured default.
    pub fn search(&self, prefix: &str, max_results: Option<usize>) -> Vec<SearchHit> {
        let limit = max_results.unwrap_or(self.structures.max_search_results);
        self.state
            .trie
            .lock()
            .search_prefix(prefix, limit)
            .into_iter()
            .map(|(url, frequency)| SearchHit { url, frequency })
            .collect()
    }

    /// The most clicked links tracked in memory, highest first.
    ///
    /// Each record's `clicks` is the count last seen by the tracker.
    pub fn top_links(&self) -> Vec<LinkRecord> {
        self.state
            .top_links
            .lock()
            .top_k()
            .into_iter()
            .map(|(clicks, mut record)| {
                record.clicks = clicks;
                record
            })
            .collect()
    }

    /// Deletes the link behind `code` from the store and every structure.
    ///
    /// # Returns
    ///
    /// `true` if the code was known to the store or the structures.
    pub async fn delete_link(&self, code: &str) -> NaluResult<bool> {
        let in_store = self.store.delete_record(code).await?;

        let removed_url = self.state.codes.lock().remove(code);
        if let Some(url) = &removed_url {
            self.state.cache.lock().delete(url.as_str());
            self.state.trie.lock().delete(url);
        }
        self.state.top_links.lock().remove(code);

        tracing::debug!(code, in_store, "Deleted link");
        Ok(in_store || removed_url.is_some())
    }

    /// Accepts only absolute http(s) URLs with a host, within the configured length.
    pub fn validate_url(&self, url: &str) -> NaluResult<()> {
        let length = url.chars().count();
        if length == 0 {
            return Err(NaluError::invalid_url(url, "URL is empty"));
        }
        if length > self.structures.max_url_length {
            return Err(NaluError::invalid_url(
                url,
                format!(
                    "URL exceeds {} characters",
                    self.structures.max_url_length
                ),
            ));
        }

        let parsed = Url::parse(url).map_err(|e| NaluError::invalid_url(url, e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(NaluError::invalid_url(
                url,
                format!("unsupported scheme '{}'", parsed.scheme()),
            ));
        }
        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(NaluError::invalid_url(url, "URL has no host"));
        }
        Ok(())
    }

    async fn record_click(&self, code: &str, original_url: &str) {
        let clicks = match self.store.increment_clicks(code).await {
            Ok(clicks) => clicks,
            Err(e) => {
                self.report_analytics_failure(code, e.into());
                return;
            }
        };

        self.state.trie.lock().update_frequency(original_url);

        match self.store.get_by_code(code).await {
            Ok(Some(record)) => self
                .state
                .top_links
                .lock()
                .add_or_update(code, clicks, record),
            Ok(None) => tracing::debug!(code, "Record vanished before ranking update"),
            Err(e) => self.report_analytics_failure(code, e.into()),
        }
    }

    fn index_url(&self, url: &str, frequency: u64) {
        let mut trie = self.state.trie.lock();
        if trie.search(url) {
            return;
        }
        if let Err(e) = trie.insert(url, frequency) {
            tracing::warn!(url, error = %e, "URL left out of the search index");
        }
    }

    fn report_analytics_failure(&self, code: &str, error: NaluError) {
        tracing::warn!(code, error = %error, "Click analytics update failed");
        let context = ErrorContext::new(error, "link_service::analytics")
            .with_details(format!("short code {code}"))
            .with_trace(SpanTrace::capture().to_string());
        match &self.reporter {
            Some(reporter) => reporter.report(context),
            None => report_error(context),
        }
    }

    fn outcome(
        &self,
        url: &str,
        code: String,
        collision_detected: bool,
        attempts: u32,
        strategy_used: Option<String>,
        cached: bool,
    ) -> ShortenOutcome {
        ShortenOutcome {
            original_url: url.to_string(),
            short_url: self.service.short_url(&code),
            code,
            collision_detected,
            attempts,
            strategy_used,
            cached,
        }
    }
}
