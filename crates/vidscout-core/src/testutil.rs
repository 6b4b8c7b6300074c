//! Stand-ins for the YouTube and Drive clients.
//!
//! Each mock is scripted per video id (detail, missing, error, panic, delay)
//! and records what it was asked for, so aggregation and pipeline tests can
//! check call counts and peak concurrency.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::AppError;
use crate::models::{DetailRecord, ItemId, SearchResult};
use crate::traits::{DetailFetcher, SearchProvider, Uploader};

// ---------------------------------------------------------------------------
// MockSearch
// ---------------------------------------------------------------------------

/// Mock search provider returning a fixed result list.
#[derive(Clone)]
pub struct MockSearch {
    results: Arc<Mutex<Option<Result<Vec<SearchResult>, AppError>>>>,
    /// Recorded `(query, max_results)` calls.
    pub calls: Arc<Mutex<Vec<(String, u32)>>>,
}

impl MockSearch {
    pub fn new(results: Vec<SearchResult>) -> Self {
        Self {
            results: Arc::new(Mutex::new(Some(Ok(results)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            results: Arc::new(Mutex::new(Some(Err(error)))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl SearchProvider for MockSearch {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchResult>, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        self.results
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

// ---------------------------------------------------------------------------
// MockDetailFetcher
// ---------------------------------------------------------------------------

enum MockResponse {
    Detail(DetailRecord),
    Missing,
    Error(AppError),
    Panic,
}

/// Mock detail fetcher with per-identifier responses.
///
/// Identifiers without a configured response get a detail whose title is the
/// identifier itself. Tracks how many lookups were in flight at once.
#[derive(Clone)]
pub struct MockDetailFetcher {
    responses: Arc<Mutex<HashMap<ItemId, MockResponse>>>,
    delay: Duration,
    pub calls: Arc<Mutex<Vec<ItemId>>>,
    in_flight: Arc<AtomicUsize>,
    pub max_in_flight: Arc<AtomicUsize>,
}

impl MockDetailFetcher {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn respond(self, id: &str, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(ItemId::from(id), response);
        self
    }

    pub fn with_detail(self, id: &str, detail: DetailRecord) -> Self {
        self.respond(id, MockResponse::Detail(detail))
    }

    pub fn with_missing(self, id: &str) -> Self {
        self.respond(id, MockResponse::Missing)
    }

    pub fn with_error(self, id: &str, error: AppError) -> Self {
        self.respond(id, MockResponse::Error(error))
    }

    pub fn with_panic(self, id: &str) -> Self {
        self.respond(id, MockResponse::Panic)
    }

    /// Hold every lookup open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockDetailFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailFetcher for MockDetailFetcher {
    async fn fetch(&self, id: &ItemId) -> Result<Option<DetailRecord>, AppError> {
        self.calls.lock().unwrap().push(id.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let response = self.responses.lock().unwrap().remove(id);
        match response {
            Some(MockResponse::Detail(detail)) => Ok(Some(detail)),
            Some(MockResponse::Missing) => Ok(None),
            Some(MockResponse::Error(e)) => Err(e),
            Some(MockResponse::Panic) => panic!("mock fetcher panicked for {id}"),
            None => Ok(Some(DetailRecord {
                title: Some(id.to_string()),
                channel: Some("Mock Channel".into()),
                views: Some(1),
                likes: Some(1),
                comments: Some(1),
            })),
        }
    }
}

// ---------------------------------------------------------------------------
// MockUploader
// ---------------------------------------------------------------------------

/// Mock uploader that records uploaded paths.
///
/// Honors the uploader contract: a missing file fails with `FileNotFound`
/// without counting as an upload attempt.
#[derive(Clone)]
pub struct MockUploader {
    remote_id: String,
    error: Arc<Mutex<Option<AppError>>>,
    pub uploaded: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockUploader {
    pub fn succeeding(remote_id: &str) -> Self {
        Self {
            remote_id: remote_id.to_string(),
            error: Arc::new(Mutex::new(None)),
            uploaded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        Self {
            remote_id: String::new(),
            error: Arc::new(Mutex::new(Some(error))),
            uploaded: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl Uploader for MockUploader {
    async fn upload(&self, path: &Path) -> Result<String, AppError> {
        if !path.exists() {
            return Err(AppError::FileNotFound(path.to_path_buf()));
        }
        self.uploaded.lock().unwrap().push(path.to_path_buf());
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.remote_id.clone())
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// A well-formed search hit for `id`.
pub fn search_result(id: &str) -> SearchResult {
    SearchResult {
        id: Some(ItemId::from(id)),
        title: Some(format!("Video {id}")),
        channel: Some("Mock Channel".into()),
        published_at: Some("2024-01-01T00:00:00Z".into()),
    }
}

/// A fully populated detail record.
pub fn detail(title: &str, views: u64) -> DetailRecord {
    DetailRecord {
        title: Some(title.to_string()),
        channel: Some("Mock Channel".into()),
        views: Some(views),
        likes: Some(views / 10),
        comments: Some(views / 100),
    }
}
