//! Report types returned by store operations.
//!
//! All of them serialize to JSON for `list --json` and scripted use, and
//! implement `Display` for the interactive prompt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::format::RasterFormat;
use crate::record::ImageRecord;

/// Outcome of an ingest call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    /// Keys of the records that were inserted, in insertion order
    pub added: Vec<String>,

    /// Candidates that were skipped, with the reason
    pub failed: Vec<IngestFailure>,

    /// Pixel bytes added to the store
    pub bytes_added: u64,
}

/// A file that could not be ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a preview or export call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    /// Directory the files were written to
    pub dir: PathBuf,

    /// Files written
    pub written: Vec<PathBuf>,

    /// Records that could not be written; they stay resident
    pub failed: Vec<ExportFailure>,

    /// Records evicted from memory after a successful write
    pub evicted: usize,

    /// Pixel bytes released by eviction
    pub freed_bytes: u64,
}

/// A record that could not be written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFailure {
    pub key: String,
    pub message: String,
}

/// Snapshot of the store for `list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputListing {
    /// Number of resident images
    pub count: usize,

    /// Sum of resident pixel buffer sizes in bytes
    pub total_bytes: u64,

    /// Per-image rows in store order
    pub images: Vec<ListedImage>,
}

/// One row of an [`InputListing`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListedImage {
    pub key: String,
    pub source_path: PathBuf,
    pub format: RasterFormat,
    pub width: u32,
    pub height: u32,
    pub channels: usize,
    pub bytes: u64,
    pub modified: bool,
}

impl From<&ImageRecord> for ListedImage {
    fn from(record: &ImageRecord) -> Self {
        Self {
            key: record.key().to_string(),
            source_path: record.source_path().to_path_buf(),
            format: record.format(),
            width: record.width(),
            height: record.height(),
            channels: record.layout().channels(),
            bytes: record.byte_size(),
            modified: record.is_modified(),
        }
    }
}

impl<'a> FromIterator<&'a ImageRecord> for InputListing {
    fn from_iter<I: IntoIterator<Item = &'a ImageRecord>>(iter: I) -> Self {
        let images: Vec<ListedImage> = iter.into_iter().map(ListedImage::from).collect();
        Self {
            count: images.len(),
            total_bytes: images.iter().map(|i| i.bytes).sum(),
            images,
        }
    }
}

impl fmt::Display for InputListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.images.is_empty() {
            return writeln!(f, "Input is empty.");
        }

        writeln!(f, "Images in input ({}):", self.count)?;
        for image in &self.images {
            writeln!(
                f,
                "  - {} ({}x{}, {}){}",
                image.key,
                image.width,
                image.height,
                format_bytes(image.bytes),
                if image.modified { " [modified]" } else { "" }
            )?;
        }
        writeln!(f, "Total: {}", format_bytes(self.total_bytes))
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Added {} image(s) ({})",
            self.added.len(),
            format_bytes(self.bytes_added)
        )?;
        for failure in &self.failed {
            writeln!(f, "  [FAIL] {}: {}", failure.path.display(), failure.message)?;
        }
        Ok(())
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.written {
            let name = path.file_name().unwrap_or(path.as_os_str());
            writeln!(f, "  [OK] {}", name.to_string_lossy())?;
        }
        for failure in &self.failed {
            writeln!(f, "  [FAIL] {}: {}", failure.key, failure.message)?;
        }
        writeln!(
            f,
            "Wrote {} of {} to {}",
            self.written.len(),
            self.written.len() + self.failed.len(),
            self.dir.display()
        )?;
        if self.evicted > 0 {
            writeln!(
                f,
                "Cleared {} image(s) from input ({} freed)",
                self.evicted,
                format_bytes(self.freed_bytes)
            )?;
        }
        Ok(())
    }
}

/// Human-readable byte count using binary units, e.g. `1.5 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}
