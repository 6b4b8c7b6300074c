use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

/// Make sure `path` ends in `.csv`, appending the extension if absent.
///
/// Example: `"out"` → `"out.csv"`, `"out.csv"` → `"out.csv"`,
/// `"report.txt"` → `"report.txt.csv"`
pub fn ensure_csv_extension(path: &Path) -> PathBuf {
    let has_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if has_csv {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(".csv");
    PathBuf::from(name)
}

/// Insert a `_YYYYmmdd_HHMM` stamp before the file extension.
///
/// Example: `"videos.csv"` at 2024-03-05 14:07 → `"videos_20240305_1407.csv"`
pub fn timestamped<Tz: TimeZone>(path: &Path, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = at.format("%Y%m%d_%H%M");
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    let file_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}_{stamp}.{ext}"),
        None => format!("{stem}_{stamp}"),
    };
    path.with_file_name(file_name)
}
