//! In-memory state shared by every service operation.

use parking_lot::Mutex;

use crate::config::StructuresConfig;
use crate::data_structures::alii_heap::TopKTracker;
use crate::data_structures::collision_resolver::CollisionResolver;
use crate::data_structures::kona_lru_cache::KonaLruCache;
use crate::data_structures::niihau_trie::{NiihauTrie, NiihauTrieConfig};
use crate::data_structures::puka_hash_table::PukaHashTable;
use crate::service::record::LinkRecord;

/// The five structures behind the shortener, each behind its own lock.
///
/// Locks are taken in field order when more than one is needed, and no guard
/// lives across an `.await`.
#[derive(Debug)]
pub struct LinkState {
    /// Short code → original URL
    pub codes: Mutex<PukaHashTable<String, String>>,

    /// Collision counters
    pub resolver: Mutex<CollisionResolver>,

    /// Original URL → short code, bounded
    pub cache: Mutex<KonaLruCache<String, String>>,

    /// URL prefix index with click frequencies
    pub trie: Mutex<NiihauTrie>,

    /// Most clicked records by short code
    pub top_links: Mutex<TopKTracker<LinkRecord>>,
}

impl LinkState {
    /// Builds empty structures sized from `config`.
    pub fn new(config: &StructuresConfig) -> Self {
        Self {
            codes: Mutex::new(PukaHashTable::with_capacity(config.hash_table_capacity)),
            resolver: Mutex::new(CollisionResolver::new()),
            cache: Mutex::new(KonaLruCache::new(config.lru_capacity)),
            trie: Mutex::new(NiihauTrie::with_config(NiihauTrieConfig {
                max_depth: config.max_url_length,
            })),
            top_links: Mutex::new(TopKTracker::new(config.top_k)),
        }
    }

    /// Empties every structure and zeroes the collision counters.
    pub fn clear(&self) {
        self.codes.lock().clear();
        self.resolver.lock().reset_stats();
        self.cache.lock().clear();
        self.trie.lock().clear();
        self.top_links.lock().clear();
    }
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new(&StructuresConfig::default())
    }
}
