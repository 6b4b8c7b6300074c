use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::ItemId;

/// Application-wide error types for vidscout.
#[derive(Error, Debug)]
pub enum AppError {
    /// Remote API answered with a non-success status.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Network/connection error.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Credential was rejected by the remote service.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// A local file required by the operation does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The fan-out machinery itself failed; the whole batch is void.
    #[error("Aggregation failed: {0}")]
    AggregationError(String),

    /// Writing the export file failed.
    #[error("Failed to write {}: {message}", .path.display())]
    ExportError { path: PathBuf, message: String },

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

impl AppError {
    /// Returns true for failures of the network transport rather than the
    /// remote service's answer.
    pub fn is_transport(&self) -> bool {
        match self {
            AppError::NetworkError(_) | AppError::Timeout(_) => true,
            AppError::HttpError(msg) => {
                msg.contains("timeout") || msg.contains("connect") || msg.contains("reset")
            }
            _ => false,
        }
    }
}

/// A single detail lookup that did not settle successfully.
#[derive(Debug)]
pub struct FetchFailure {
    pub id: ItemId,
    pub cause: AppError,
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup for {} failed: {}", self.id, self.cause)
    }
}

impl std::error::Error for FetchFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Pipeline stage a caller-visible failure originated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Aggregate,
    Export,
    Upload,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Search => write!(f, "search"),
            Stage::Aggregate => write!(f, "aggregate"),
            Stage::Export => write!(f, "export"),
            Stage::Upload => write!(f, "upload"),
        }
    }
}

/// An [`AppError`] tagged with the stage that produced it.
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: AppError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: AppError) -> Self {
        Self { stage, source }
    }
}
