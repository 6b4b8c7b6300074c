use std::future::Future;
use std::path::Path;

use crate::error::AppError;
use crate::models::{DetailRecord, ItemId, SearchResult};

/// Searches the remote catalog by keyword.
pub trait SearchProvider: Send + Sync + Clone {
    fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> impl Future<Output = Result<Vec<SearchResult>, AppError>> + Send;
}

/// Performs one detail lookup for one identifier.
///
/// `Ok(None)` means the endpoint answered but had no detail for the item.
/// Implementations apply their own per-request timeout and never retry.
pub trait DetailFetcher: Send + Sync + Clone + 'static {
    fn fetch(
        &self,
        id: &ItemId,
    ) -> impl Future<Output = Result<Option<DetailRecord>, AppError>> + Send;
}

/// Pushes a finished export file to remote storage.
pub trait Uploader: Send + Sync + Clone {
    /// Uploads the file at `path` and returns the remote identifier.
    ///
    /// Must fail with [`AppError::FileNotFound`] before any network work
    /// when `path` does not exist.
    fn upload(&self, path: &Path) -> impl Future<Output = Result<String, AppError>> + Send;
}

/// Fills the uploader slot of a [`crate::pipeline::ReportService`] built
/// with `new`, which never uploads. Called directly it only confirms the
/// export exists and returns an empty remote id.
#[derive(Debug, Clone)]
pub struct NullUploader;

impl Uploader for NullUploader {
    async fn upload(&self, path: &Path) -> Result<String, AppError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(AppError::FileNotFound(path.to_path_buf()));
        }
        Ok(String::new())
    }
}
