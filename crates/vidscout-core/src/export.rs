//! CSV export of flat records.
//!
//! Rows are written into a temporary file next to the destination and only
//! renamed into place after the final flush, so the destination path either
//! holds the complete export or is left as it was.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::AppError;
use crate::models::FlatRecord;
use crate::util::ensure_csv_extension;

/// Column labels of the export file, in order.
pub const HEADER: [&str; 5] = ["Title", "Channel", "Views", "Likes", "Comments"];

/// Result of an export that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Nothing to write; the destination was not touched.
    NoData,
    /// The file at `path` now holds the header plus `rows` data rows.
    Written { path: PathBuf, rows: usize },
}

impl ExportOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ExportOutcome::NoData => None,
            ExportOutcome::Written { path, .. } => Some(path),
        }
    }
}

/// Writes flat records to a comma-delimited UTF-8 file.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    /// Export `records` to `destination`, appending `.csv` if needed.
    pub fn export(
        &self,
        records: &[FlatRecord],
        destination: &Path,
    ) -> Result<ExportOutcome, AppError> {
        if records.is_empty() {
            tracing::info!(destination = %destination.display(), "No records to export");
            return Ok(ExportOutcome::NoData);
        }

        let path = ensure_csv_extension(destination);
        tracing::info!(path = %path.display(), rows = records.len(), "Writing export");

        write_atomically(&path, records).map_err(|message| AppError::ExportError {
            path: path.clone(),
            message,
        })?;

        tracing::info!(path = %path.display(), "Export written");
        Ok(ExportOutcome::Written {
            path,
            rows: records.len(),
        })
    }
}

fn write_atomically(path: &Path, records: &[FlatRecord]) -> Result<(), String> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| format!("cannot create directory: {e}"))?;
    }

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| format!("cannot create file: {e}"))?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        for record in records {
            writer.serialize(record).map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())?;
    }
    tmp.as_file_mut()
        .flush()
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| e.to_string())?;

    set_shared_permissions(tmp.as_file()).map_err(|e| e.to_string())?;

    tmp.persist(path).map_err(|e| e.error.to_string())?;
    Ok(())
}

/// Temp files are created owner-only; exports are meant to be picked up by
/// other tools, so give them the usual `rw-r--r--`.
#[cfg(unix)]
fn set_shared_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_shared_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}
