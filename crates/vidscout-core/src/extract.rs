//! Flattening of fetched details into fixed-schema export rows.

use crate::models::{DetailRecord, FlatRecord, NOT_AVAILABLE};

/// Convert one fetched detail into a flat row.
///
/// Total: absent text fields become [`NOT_AVAILABLE`], absent counters become 0.
pub fn extract(detail: DetailRecord) -> FlatRecord {
    FlatRecord {
        title: text_or_default(detail.title),
        channel: text_or_default(detail.channel),
        views: detail.views.unwrap_or(0),
        likes: detail.likes.unwrap_or(0),
        comments: detail.comments.unwrap_or(0),
    }
}

fn text_or_default(value: Option<String>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s,
        _ => NOT_AVAILABLE.to_string(),
    }
}

impl From<DetailRecord> for FlatRecord {
    fn from(detail: DetailRecord) -> Self {
        extract(detail)
    }
}
