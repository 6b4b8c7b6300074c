use std::path::Path;

use crate::aggregate::{AggregatorConfig, Batch, FanOutAggregator};
use crate::error::{AppError, PipelineError, Stage};
use crate::export::{CsvExporter, ExportOutcome};
use crate::models::ItemId;
use crate::traits::{DetailFetcher, SearchProvider, Uploader};

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub query: Option<String>,
    /// Search hits returned (0 when identifiers were given directly).
    pub found: usize,
    /// Hits dropped for lack of an identifier.
    pub skipped: usize,
    pub fetched: usize,
    pub failed: usize,
    pub unavailable: usize,
    pub export: ExportOutcome,
    /// Remote identifier when the export was uploaded.
    pub remote_id: Option<String>,
}

/// Runs one report: search, fan out detail lookups, write the CSV and
/// optionally hand it to an [`Uploader`].
///
/// The YouTube and Drive clients plug in through the core traits, so the
/// mocks in [`crate::testutil`] can stand in for either API.
pub struct ReportService<S, F, U>
where
    S: SearchProvider,
    F: DetailFetcher,
    U: Uploader,
{
    search: S,
    aggregator: FanOutAggregator<F>,
    exporter: CsvExporter,
    uploader: Option<U>,
}

impl<S, F, U> ReportService<S, F, U>
where
    S: SearchProvider,
    F: DetailFetcher,
    U: Uploader,
{
    /// Create a new ReportService that keeps exports local.
    pub fn new(search: S, fetcher: F, config: AggregatorConfig) -> Self {
        Self {
            search,
            aggregator: FanOutAggregator::with_config(fetcher, config),
            exporter: CsvExporter::new(),
            uploader: None,
        }
    }

    /// Create a new ReportService that uploads every written export.
    pub fn with_uploader(search: S, fetcher: F, config: AggregatorConfig, uploader: U) -> Self {
        Self {
            uploader: Some(uploader),
            ..Self::new(search, fetcher, config)
        }
    }

    /// Search for `query` and export statistics for every hit.
    pub async fn run(
        &self,
        query: &str,
        max_results: u32,
        destination: &Path,
    ) -> Result<RunReport, PipelineError> {
        tracing::info!(%query, max_results, "Searching");
        let results = self
            .search
            .search(query, max_results)
            .await
            .map_err(|e| PipelineError::new(Stage::Search, e))?;
        tracing::info!(found = results.len(), "Search complete");

        let batch = self
            .aggregator
            .aggregate_results(&results)
            .await
            .map_err(|e| PipelineError::new(Stage::Aggregate, e))?;

        let mut report = self.finish(batch, destination).await?;
        report.query = Some(query.to_string());
        report.found = results.len();
        Ok(report)
    }

    /// Export statistics for explicitly named identifiers, skipping search.
    pub async fn run_ids(
        &self,
        ids: Vec<ItemId>,
        destination: &Path,
    ) -> Result<RunReport, PipelineError> {
        let mut present = Vec::with_capacity(ids.len());
        let mut skipped = 0;
        for (position, id) in ids.into_iter().enumerate() {
            if id.as_str().trim().is_empty() {
                skipped += 1;
                tracing::warn!(position, "Blank identifier, skipping");
            } else {
                present.push(id);
            }
        }

        let mut batch = self
            .aggregator
            .aggregate(present)
            .await
            .map_err(|e| PipelineError::new(Stage::Aggregate, e))?;
        batch.skipped = skipped;

        self.finish(batch, destination).await
    }

    async fn finish(&self, batch: Batch, destination: &Path) -> Result<RunReport, PipelineError> {
        let skipped = batch.skipped;
        let fetched = batch.details.len();
        let failed = batch.failures.len();
        let unavailable = batch.unavailable.len();

        let records = batch.into_records();
        let export = self
            .exporter
            .export(&records, destination)
            .map_err(|e| PipelineError::new(Stage::Export, e))?;

        let remote_id = match (&self.uploader, export.path()) {
            (Some(uploader), Some(path)) => {
                tracing::info!(path = %path.display(), "Uploading export");
                let id = uploader
                    .upload(path)
                    .await
                    .map_err(|e| PipelineError::new(Stage::Upload, e))?;
                tracing::info!(remote_id = %id, "Upload complete");
                Some(id)
            }
            (Some(_), None) => {
                tracing::info!("Nothing exported, skipping upload");
                None
            }
            (None, _) => None,
        };

        Ok(RunReport {
            query: None,
            found: 0,
            skipped,
            fetched,
            failed,
            unavailable,
            export,
            remote_id,
        })
    }
}

/// Convenience for callers that only need to know whether the upload failed
/// because the credential was rejected.
pub fn is_auth_failure(err: &PipelineError) -> bool {
    err.stage == Stage::Upload && matches!(err.source, AppError::AuthError(_))
}
