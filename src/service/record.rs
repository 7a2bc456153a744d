//! The stored shape of a shortened link.

use serde::{Deserialize, Serialize};

use crate::data_structures::alii_heap::TrackedPayload;

/// One row of the link store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Store-assigned identifier; the short code is derived from it
    pub id: i64,

    /// The URL a short code redirects to
    pub original_url: String,

    /// Final short code, absent until the record has been assigned one
    #[serde(default)]
    pub short_code: Option<String>,

    /// Number of redirects served
    #[serde(default)]
    pub clicks: u64,

    /// Whether the derived code collided and had to be replaced
    #[serde(default)]
    pub collision_resolved: bool,

    /// Name of the strategy that produced the code after a collision
    #[serde(default)]
    pub resolution_strategy: Option<String>,
}

impl LinkRecord {
    /// A fresh record without a short code.
    pub fn new<U: Into<String>>(id: i64, original_url: U) -> Self {
        Self {
            id,
            original_url: original_url.into(),
            short_code: None,
            clicks: 0,
            collision_resolved: false,
            resolution_strategy: None,
        }
    }
}

impl TrackedPayload for LinkRecord {
    fn identity(&self) -> Option<&str> {
        self.short_code.as_deref()
    }
}
