//! Node implementation for the Niihau URL Trie.
//!
//! Each node owns its children outright. Edges are kept in a vector sorted by
//! character, so lookups are a binary search and traversal order is stable.
//! A single URL can nest tens of thousands of nodes, so dropping and
//! formatting never recurse into children.

use std::fmt;

/// A node in the Niihau URL Trie.
///
/// Each node represents one case-folded character of a URL path. Terminal
/// nodes hold the URL as it was originally inserted together with its
/// access frequency.
#[derive(Default)]
pub struct TrieNode {
    /// Child edges sorted by character
    pub children: Vec<(char, TrieNode)>,

    /// Original-case URL ending at this node, if any
    pub url: Option<String>,

    /// Access frequency of the URL ending here
    pub frequency: u64,
}

impl TrieNode {
    /// Creates a new empty trie node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a complete URL ends at this node.
    pub fn is_terminal(&self) -> bool {
        self.url.is_some()
    }

    /// A node that is neither terminal nor has children can be pruned.
    pub fn is_prunable(&self) -> bool {
        !self.is_terminal() && self.children.is_empty()
    }

    /// Returns the child reached through `c`.
    pub fn child(&self, c: char) -> Option<&TrieNode> {
        self.children
            .binary_search_by_key(&c, |(edge, _)| *edge)
            .ok()
            .map(|i| &self.children[i].1)
    }

    /// Returns the child reached through `c` for mutation.
    pub fn child_mut(&mut self, c: char) -> Option<&mut TrieNode> {
        match self.children.binary_search_by_key(&c, |(edge, _)| *edge) {
            Ok(i) => Some(&mut self.children[i].1),
            Err(_) => None,
        }
    }

    /// Returns the child reached through `c`, creating it if needed.
    pub fn child_or_insert(&mut self, c: char) -> &mut TrieNode {
        let i = match self.children.binary_search_by_key(&c, |(edge, _)| *edge) {
            Ok(i) => i,
            Err(i) => {
                self.children.insert(i, (c, TrieNode::new()));
                i
            }
        };
        &mut self.children[i].1
    }

    /// Drops the edge labelled `c` together with its subtree.
    pub fn remove_child(&mut self, c: char) {
        if let Ok(i) = self.children.binary_search_by_key(&c, |(edge, _)| *edge) {
            self.children.remove(i);
        }
    }
}

impl Drop for TrieNode {
    fn drop(&mut self) {
        // Detach every descendant onto a heap-allocated stack; each popped
        // node is dropped with no children left.
        let mut stack: Vec<TrieNode> = self.children.drain(..).map(|(_, child)| child).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.drain(..).map(|(_, child)| child));
        }
    }
}

impl fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieNode")
            .field("edges", &self.children.iter().map(|(c, _)| *c).collect::<String>())
            .field("url", &self.url)
            .field("frequency", &self.frequency)
            .finish()
    }
}
