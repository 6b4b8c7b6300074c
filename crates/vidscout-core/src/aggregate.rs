//! Concurrent fan-out of detail lookups over one batch of identifiers.
//!
//! Every identifier gets its own task in a [`JoinSet`]; a semaphore caps how
//! many lookups are in flight at once. Results are collected only after every
//! task has settled, and the mapping is built afterwards on the calling task,
//! so no state is shared between lookups.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::{AppError, FetchFailure};
use crate::extract::extract;
use crate::models::{DetailMapping, DetailRecord, FlatRecord, ItemId, SearchResult};
use crate::traits::DetailFetcher;

/// Default cap on concurrent lookups: one full search page.
pub const DEFAULT_MAX_CONCURRENCY: usize = 50;

/// Configuration for [`FanOutAggregator`].
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    max_concurrency: usize,
}

impl AggregatorConfig {
    pub fn new(max_concurrency: usize) -> Result<Self, AppError> {
        if max_concurrency == 0 {
            return Err(AppError::ConfigError(
                "max_concurrency must be at least 1".into(),
            ));
        }
        Ok(Self { max_concurrency })
    }

    /// Maximum number of detail lookups in flight at once.
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Everything one batch produced.
#[derive(Debug, Default)]
pub struct Batch {
    /// Details for every identifier whose lookup succeeded.
    pub details: DetailMapping,
    /// Lookups that failed; these identifiers are absent from `details`.
    pub failures: Vec<FetchFailure>,
    /// Lookups that succeeded but returned no detail.
    pub unavailable: Vec<ItemId>,
    /// Search entries dropped before fetch because they had no identifier.
    pub skipped: usize,
    /// De-duplicated identifiers in the order they were requested.
    order: Vec<ItemId>,
}

impl Batch {
    pub fn requested(&self) -> &[ItemId] {
        &self.order
    }

    /// Flatten the fetched details into export rows, in request order.
    pub fn into_records(self) -> Vec<FlatRecord> {
        let mut details = self.details;
        self.order
            .iter()
            .filter_map(|id| details.remove(id))
            .map(extract)
            .collect()
    }
}

type Settled = (ItemId, Result<Option<DetailRecord>, AppError>);

/// Issues one lookup per identifier concurrently and gathers the survivors.
#[derive(Clone)]
pub struct FanOutAggregator<F: DetailFetcher> {
    fetcher: F,
    config: AggregatorConfig,
}

impl<F: DetailFetcher> FanOutAggregator<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, AggregatorConfig::default())
    }

    pub fn with_config(fetcher: F, config: AggregatorConfig) -> Self {
        Self { fetcher, config }
    }

    /// Aggregate details for a list of search hits.
    ///
    /// Hits without a usable identifier are logged and skipped before any
    /// lookup is issued.
    pub async fn aggregate_results(&self, results: &[SearchResult]) -> Result<Batch, AppError> {
        let (ids, skipped) = collect_ids(results);
        let mut batch = self.aggregate(ids).await?;
        batch.skipped = skipped;
        Ok(batch)
    }

    /// Fetch details for every identifier and wait for all of them to settle.
    ///
    /// Per-item failures are logged and recorded in [`Batch::failures`]; the
    /// batch still succeeds. Only a failure of the task machinery itself
    /// returns `Err`, in which case no partial mapping is surfaced.
    pub async fn aggregate(&self, ids: Vec<ItemId>) -> Result<Batch, AppError> {
        if self.config.max_concurrency == 0 {
            return Err(AppError::ConfigError(
                "max_concurrency must be at least 1".into(),
            ));
        }

        let order = dedup(ids);
        if order.is_empty() {
            tracing::debug!("Empty batch, nothing to fetch");
            return Ok(Batch::default());
        }

        tracing::info!(
            count = order.len(),
            max_concurrency = self.config.max_concurrency,
            "Fetching details"
        );

        let settled = self.fan_out(&order).await?;

        let mut batch = Batch {
            order,
            ..Default::default()
        };
        for (id, result) in settled {
            match result {
                Ok(Some(detail)) => {
                    batch.details.insert(id, detail);
                }
                Ok(None) => {
                    tracing::debug!(%id, "No detail available");
                    batch.unavailable.push(id);
                }
                Err(cause) => {
                    tracing::warn!(
                        %id,
                        error = %cause,
                        transport = cause.is_transport(),
                        "Detail lookup failed, skipping"
                    );
                    batch.failures.push(FetchFailure { id, cause });
                }
            }
        }

        tracing::info!(
            fetched = batch.details.len(),
            failed = batch.failures.len(),
            unavailable = batch.unavailable.len(),
            "Batch settled"
        );
        Ok(batch)
    }

    async fn fan_out(&self, ids: &[ItemId]) -> Result<Vec<Settled>, AppError> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut tasks = JoinSet::new();

        for id in ids.iter().cloned() {
            let fetcher = self.fetcher.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::AggregationError(format!("semaphore closed: {e}")))?;
                let result = fetcher.fetch(&id).await;
                Ok::<Settled, AppError>((id, result))
            });
        }

        let mut settled = Vec::with_capacity(ids.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(entry)) => settled.push(entry),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Aborting batch");
                    tasks.abort_all();
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Fetch task did not complete, aborting batch");
                    tasks.abort_all();
                    return Err(AppError::AggregationError(format!(
                        "fetch task failed: {e}"
                    )));
                }
            }
        }
        Ok(settled)
    }
}

/// Pull identifiers out of search hits, counting the ones without one.
pub fn collect_ids(results: &[SearchResult]) -> (Vec<ItemId>, usize) {
    let mut ids = Vec::with_capacity(results.len());
    let mut skipped = 0;

    for (position, result) in results.iter().enumerate() {
        match &result.id {
            Some(id) if !id.as_str().trim().is_empty() => ids.push(id.clone()),
            _ => {
                skipped += 1;
                tracing::warn!(
                    position,
                    title = result.title.as_deref().unwrap_or("<untitled>"),
                    "Search result has no identifier, skipping"
                );
            }
        }
    }
    (ids, skipped)
}

fn dedup(ids: Vec<ItemId>) -> Vec<ItemId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.into_iter()
        .filter(|id| {
            let fresh = seen.insert(id.clone());
            if !fresh {
                tracing::debug!(%id, "Duplicate identifier in batch");
            }
            fresh
        })
        .collect()
}
