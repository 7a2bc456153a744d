//! Data structures behind the Nalu Link shortener.
//!
//! Every structure here is written from scratch and owns its data directly:
//! - [`puka_hash_table`]: chained hash table mapping short codes to URLs
//! - [`kona_lru_cache`]: bounded recency cache in front of the store
//! - [`niihau_trie`]: character trie for URL prefix search
//! - [`alii_heap`]: min-heap and top-K tracker for popular links
//! - [`collision_resolver`]: short-code collision handling
//! - [`base62`]: the short-code alphabet and codec
//!
//! None of them synchronize internally; the service layer wraps each one in
//! its own lock.

pub mod alii_heap;
pub mod base62;
pub mod collision_resolver;
pub mod kona_lru_cache;
pub mod niihau_trie;
pub mod puka_hash_table;

// Re-export common data structures
pub use alii_heap::{AliiHeap, TopKTracker, TrackedPayload};
pub use base62::Base62Error;
pub use collision_resolver::{
    CodeRegistry, CollisionError, CollisionResolver, CollisionStats, Resolution,
    ResolutionStrategy,
};
pub use kona_lru_cache::{KonaLruCache, LruCacheStats};
pub use niihau_trie::{NiihauTrie, NiihauTrieError, NiihauTrieResult, TrieStats};
pub use puka_hash_table::{HashTableStats, PukaHashTable};
