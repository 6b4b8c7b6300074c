use reqwest::Client;
use serde::{Deserialize, Deserializer};
use url::Url;
use vidscout_core::error::AppError;
use vidscout_core::models::{DetailRecord, ItemId, SearchResult};
use vidscout_core::traits::{DetailFetcher, SearchProvider};

use crate::config::YouTubeConfig;
use crate::response::{decode, send_error};

/// Largest page the search endpoint will return.
pub const MAX_PAGE_SIZE: u32 = 50;

/// YouTube Data API v3 client.
///
/// Serves both the keyword search and the per-video statistics lookup.
/// Each request is bounded by the configured timeout and never retried.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    config: YouTubeConfig,
}

impl YouTubeClient {
    pub fn new(config: YouTubeConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("vidscout/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<Url, AppError> {
        let base = format!("{}/{}", self.config.base_url, resource);
        let key = [("key", self.config.api_key.as_str())];
        Url::parse_with_params(&base, params.iter().chain(key.iter()))
            .map_err(|e| AppError::ConfigError(format!("Invalid API URL '{base}': {e}")))
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = self.endpoint(resource, params)?;
        let timeout_secs = self.config.timeout.as_secs();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| send_error(e.without_url(), timeout_secs))?;

        decode(response, resource, timeout_secs).await
    }
}

impl SearchProvider for YouTubeClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>, AppError> {
        let max_results = max_results.clamp(1, MAX_PAGE_SIZE).to_string();
        let page: SearchResponse = self
            .get(
                "search",
                &[
                    ("part", "snippet"),
                    ("type", "video"),
                    ("q", query),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        Ok(page
            .items
            .unwrap_or_default()
            .into_iter()
            .map(SearchItem::into_result)
            .collect())
    }
}

impl DetailFetcher for YouTubeClient {
    async fn fetch(&self, id: &ItemId) -> Result<Option<DetailRecord>, AppError> {
        tracing::debug!(%id, "Fetching video details");
        let list: VideoListResponse = self
            .get(
                "videos",
                &[("part", "statistics,snippet"), ("id", id.as_str())],
            )
            .await?;

        Ok(list
            .items
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(VideoItem::into_detail))
    }
}

// ---- YouTube API types ----

#[derive(Deserialize)]
struct SearchResponse {
    items: Option<Vec<SearchItem>>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<Snippet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: Option<String>,
    channel_title: Option<String>,
    published_at: Option<String>,
}

impl SearchItem {
    fn into_result(self) -> SearchResult {
        let snippet = self.snippet.unwrap_or_default();
        SearchResult {
            id: self.id.and_then(|i| i.video_id).map(ItemId::from),
            title: snippet.title,
            channel: snippet.channel_title,
            published_at: snippet.published_at,
        }
    }
}

#[derive(Deserialize)]
struct VideoListResponse {
    items: Option<Vec<VideoItem>>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: Option<Snippet>,
    statistics: Option<Statistics>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default, deserialize_with = "lenient_count")]
    view_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    like_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_count")]
    comment_count: Option<u64>,
}

impl VideoItem {
    fn into_detail(self) -> DetailRecord {
        let snippet = self.snippet.unwrap_or_default();
        let stats = self.statistics.unwrap_or_default();
        DetailRecord {
            title: snippet.title,
            channel: snippet.channel_title,
            views: stats.view_count,
            likes: stats.like_count,
            comments: stats.comment_count,
        }
    }
}

/// Counters arrive as decimal strings; accept numbers too and treat anything
/// unparsable as absent.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        Some(serde_json::Value::Number(n)) => n.as_u64(),
        _ => None,
    })
}
