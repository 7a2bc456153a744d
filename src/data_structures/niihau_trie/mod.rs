//! Niihau URL Trie Implementation
//!
//! This module provides a prefix tree over URLs with per-entry access
//! frequencies. It powers autocomplete: a prefix query returns the matching
//! URLs ordered by how often they have been visited.
//!
//! Paths are case-folded while the original spelling of each URL is kept at
//! its terminal node.

mod error;
mod node;

use serde::Serialize;

pub use error::NiihauTrieError;
use node::TrieNode;

/// Result type for Niihau Trie operations
pub type NiihauTrieResult<T> = Result<T, NiihauTrieError>;

/// Configuration options for the Niihau URL Trie
#[derive(Debug, Clone)]
pub struct NiihauTrieConfig {
    /// Maximum number of characters in a stored URL.
    /// Bounds the depth of the tree.
    pub max_depth: usize,
}

impl Default for NiihauTrieConfig {
    fn default() -> Self {
        Self { max_depth: 2048 }
    }
}

/// Point-in-time statistics for a [`NiihauTrie`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrieStats {
    /// Number of stored URLs
    pub total_urls: usize,
    /// Number of nodes, root included
    pub total_nodes: usize,
    /// `total_nodes / total_urls`, two decimals
    pub avg_nodes_per_url: f64,
}

/// Niihau URL Trie is a prefix tree for URL search and autocomplete.
///
/// Key features:
/// * Case-insensitive paths, original-case results
/// * Frequency-ranked prefix search
/// * Deletion prunes dead branches
/// * Iterative traversal, deletion and teardown, so depth is bounded only by
///   `max_depth` and not by the thread's stack
#[derive(Debug)]
pub struct NiihauTrie {
    /// The root node of the trie
    root: TrieNode,

    /// Number of terminal nodes
    total_urls: usize,

    /// Configuration options
    config: NiihauTrieConfig,
}

impl NiihauTrie {
    /// Creates a new empty `NiihauTrie` with default configuration.
    pub fn new() -> Self {
        Self::with_config(NiihauTrieConfig::default())
    }

    /// Creates a new empty `NiihauTrie` with the specified configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the trie.
    ///
    /// # Returns
    ///
    /// A new `NiihauTrie` instance.
    pub fn with_config(config: NiihauTrieConfig) -> Self {
        Self {
            root: TrieNode::new(),
            total_urls: 0,
            config,
        }
    }

    /// Inserts a URL with the given frequency.
    ///
    /// Reinserting an existing URL overwrites its frequency and stored
    /// spelling; it does not accumulate.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to insert.
    /// * `frequency` - Initial access frequency.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - `true` if the URL was new, `false` if it was already stored.
    /// * `Err(NiihauTrieError)` - If the URL is empty or too long.
    pub fn insert(&mut self, url: &str, frequency: u64) -> NiihauTrieResult<bool> {
        if url.is_empty() {
            return Err(NiihauTrieError::EmptyKey);
        }

        let folded = url.to_lowercase();

        // Check depth limit before insertion
        if folded.chars().count() > self.config.max_depth {
            return Err(NiihauTrieError::KeyTooLong {
                key: url.to_string(),
                max_depth: self.config.max_depth,
            });
        }

        let mut node = &mut self.root;
        for c in folded.chars() {
            node = node.child_or_insert(c);
        }

        let is_new = !node.is_terminal();
        node.url = Some(url.to_string());
        node.frequency = frequency;

        if is_new {
            self.total_urls += 1;
        }
        Ok(is_new)
    }

    /// Exact, case-insensitive membership test.
    pub fn search(&self, url: &str) -> bool {
        self.find_node(&url.to_lowercase())
            .is_some_and(TrieNode::is_terminal)
    }

    /// Returns the frequency stored for `url`, if present.
    pub fn frequency(&self, url: &str) -> Option<u64> {
        self.find_node(&url.to_lowercase())
            .filter(|node| node.is_terminal())
            .map(|node| node.frequency)
    }

    /// Finds URLs starting with `prefix`, most frequent first.
    ///
    /// An empty prefix matches nothing. Ties keep lexicographic order of the
    /// case-folded paths.
    ///
    /// # Arguments
    ///
    /// * `prefix` - The prefix to search for.
    /// * `max_results` - Maximum number of results.
    ///
    /// # Returns
    ///
    /// `(url, frequency)` pairs sorted by descending frequency.
    pub fn search_prefix(&self, prefix: &str, max_results: usize) -> Vec<(String, u64)> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let Some(start) = self.find_node(&prefix.to_lowercase()) else {
            return Vec::new();
        };

        let mut results = Self::collect(start);
        results.sort_by(|a, b| b.1.cmp(&a.1));
        results.truncate(max_results);
        results
    }

    /// Increments the frequency of a stored URL.
    ///
    /// # Returns
    ///
    /// `true` if the URL was found, `false` otherwise.
    pub fn update_frequency(&mut self, url: &str) -> bool {
        let mut node = &mut self.root;
        for c in url.to_lowercase().chars() {
            match node.child_mut(c) {
                Some(next) => node = next,
                None => return false,
            }
        }

        if !node.is_terminal() {
            return false;
        }
        node.frequency += 1;
        true
    }

    /// Removes a URL, pruning nodes left without children or a terminal mark.
    ///
    /// # Returns
    ///
    /// `true` if the URL was removed, `false` if it wasn't found.
    pub fn delete(&mut self, url: &str) -> bool {
        let chars: Vec<char> = url.to_lowercase().chars().collect();

        // Nothing longer than max_depth can have been inserted.
        if chars.is_empty() || chars.len() > self.config.max_depth {
            return false;
        }

        // Walk down once to find the shallowest edge whose whole subtree is
        // the path being removed: no other terminal and no side branches.
        let mut cut = None;
        let mut node = &self.root;
        for (depth, &c) in chars.iter().enumerate() {
            let Some(child) = node.child(c) else {
                return false;
            };
            let dead = if depth + 1 == chars.len() {
                child.children.is_empty()
            } else {
                !child.is_terminal() && child.children.len() == 1
            };
            cut = match (dead, cut) {
                (false, _) => None,
                (true, None) => Some(depth),
                (true, kept) => kept,
            };
            node = child;
        }
        if !node.is_terminal() {
            return false;
        }

        let removed = match cut {
            Some(depth) => match Self::descend_mut(&mut self.root, &chars[..depth]) {
                Some(parent) => {
                    parent.remove_child(chars[depth]);
                    true
                }
                None => false,
            },
            None => match Self::descend_mut(&mut self.root, &chars) {
                Some(target) => {
                    target.url = None;
                    target.frequency = 0;
                    true
                }
                None => false,
            },
        };

        if removed {
            self.total_urls -= 1;
        }
        removed
    }

    /// Returns every stored URL in path order.
    pub fn all_urls(&self) -> Vec<String> {
        Self::collect(&self.root)
            .into_iter()
            .map(|(url, _)| url)
            .collect()
    }

    /// Returns the number of URLs in the trie.
    pub fn len(&self) -> usize {
        self.total_urls
    }

    /// Checks if the trie is empty.
    pub fn is_empty(&self) -> bool {
        self.total_urls == 0
    }

    /// Clears all entries from the trie.
    pub fn clear(&mut self) {
        self.root = TrieNode::new();
        self.total_urls = 0;
    }

    /// Collects statistics with a full traversal of the tree.
    pub fn stats(&self) -> TrieStats {
        let mut total_nodes = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            total_nodes += 1;
            stack.extend(node.children.iter().map(|(_, child)| child));
        }

        let avg_nodes_per_url = if self.total_urls > 0 {
            (total_nodes as f64 / self.total_urls as f64 * 100.0).round() / 100.0
        } else {
            0.0
        };

        TrieStats {
            total_urls: self.total_urls,
            total_nodes,
            avg_nodes_per_url,
        }
    }

    fn find_node(&self, folded: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in folded.chars() {
            node = node.child(c)?;
        }
        Some(node)
    }

    fn descend_mut<'a>(node: &'a mut TrieNode, path: &[char]) -> Option<&'a mut TrieNode> {
        path.iter().try_fold(node, |node, &c| node.child_mut(c))
    }

    /// Gathers every terminal entry below `start` with an explicit stack.
    fn collect(start: &TrieNode) -> Vec<(String, u64)> {
        let mut results = Vec::new();
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            if let Some(url) = &node.url {
                results.push((url.clone(), node.frequency));
            }
            // Reversed so the smallest edge is popped first.
            stack.extend(node.children.iter().rev().map(|(_, child)| child));
        }

        results
    }
}

impl Default for NiihauTrie {
    fn default() -> Self {
        Self::new()
    }
}
