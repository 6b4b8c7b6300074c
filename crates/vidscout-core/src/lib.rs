pub mod aggregate;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod pipeline;
pub mod testutil;
pub mod traits;
pub mod util;

pub use aggregate::{AggregatorConfig, Batch, FanOutAggregator};
pub use error::{AppError, FetchFailure, PipelineError, Stage};
pub use export::{CsvExporter, ExportOutcome};
pub use models::{DetailMapping, DetailRecord, FlatRecord, ItemId, SearchResult};
pub use pipeline::{ReportService, RunReport};
pub use traits::{DetailFetcher, NullUploader, SearchProvider, Uploader};
