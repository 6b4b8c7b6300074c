use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder written for text columns the API did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Opaque identifier joining a search hit to its detail lookup (a video id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One hit returned by the search capability.
///
/// `id` is `None` when the upstream entry carried no usable identifier
/// (e.g. a channel or playlist hit); such entries are skipped before fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: Option<ItemId>,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub published_at: Option<String>,
}

/// Enriched per-item data returned by a successful detail lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub comments: Option<u64>,
}

/// Successfully fetched details keyed by identifier.
///
/// A missing key means the lookup failed or was skipped, never that it is pending.
pub type DetailMapping = HashMap<ItemId, DetailRecord>;

/// Fixed five-column row written to the export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Views")]
    pub views: u64,
    #[serde(rename = "Likes")]
    pub likes: u64,
    #[serde(rename = "Comments")]
    pub comments: u64,
}
