//! Ingest: discover → validate → decode → insert.

use std::path::Path;

use crate::codec::Codec;
use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::format;
use crate::record::ImageRecord;
use crate::store::ImageStore;
use crate::types::{IngestFailure, IngestReport};

use super::discovery::FileDiscovery;
use super::validate::Validator;

/// Progress notifications emitted while ingesting.
#[derive(Debug)]
pub enum IngestEvent<'a> {
    /// Number of candidate files about to be decoded
    Discovered { total: usize },
    /// A record was inserted
    Added { key: &'a str, bytes: u64 },
    /// A candidate was skipped
    Failed {
        path: &'a Path,
        error: &'a PipelineError,
    },
}

/// Loads images from disk into an [`ImageStore`].
#[derive(Debug, Clone)]
pub struct Ingestor {
    discovery: FileDiscovery,
    validator: Validator,
}

impl Ingestor {
    pub fn new(limits: LimitsConfig) -> Self {
        Self {
            discovery: FileDiscovery::new(),
            validator: Validator::new(limits),
        }
    }

    /// Ingest a file or the direct entries of a directory.
    ///
    /// A single file must have a recognized extension and decode cleanly.
    /// For a directory every candidate is tried independently and failures
    /// are skipped; the call fails only if nothing was inserted.
    pub fn ingest(
        &self,
        codec: &dyn Codec,
        store: &mut ImageStore,
        path: &Path,
        on_event: &mut dyn FnMut(IngestEvent<'_>),
    ) -> PipelineResult<IngestReport> {
        if !path.exists() {
            return Err(PipelineError::PathNotFound(path.to_path_buf()));
        }

        if path.is_file() {
            return self.ingest_file(codec, store, path, on_event);
        }

        if !path.is_dir() {
            return Err(PipelineError::PathNotFound(path.to_path_buf()));
        }

        let files = self.discovery.discover(path);
        tracing::debug!(
            "Discovered {} image(s) in {:?} ({} bytes on disk)",
            files.len(),
            path,
            FileDiscovery::total_size(&files)
        );
        on_event(IngestEvent::Discovered { total: files.len() });

        let mut report = IngestReport::default();
        for file in &files {
            match self.load(codec, &file.path) {
                Ok(record) => Self::insert(store, record, &mut report, on_event),
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", file.path, e);
                    on_event(IngestEvent::Failed {
                        path: &file.path,
                        error: &e,
                    });
                    report.failed.push(IngestFailure {
                        path: file.path.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            "Added {} image(s) from folder ({} failed)",
            report.added.len(),
            report.failed.len()
        );

        if report.added.is_empty() {
            return Err(PipelineError::NothingIngested {
                path: path.to_path_buf(),
                failed: report.failed.len(),
            });
        }
        Ok(report)
    }

    fn ingest_file(
        &self,
        codec: &dyn Codec,
        store: &mut ImageStore,
        path: &Path,
        on_event: &mut dyn FnMut(IngestEvent<'_>),
    ) -> PipelineResult<IngestReport> {
        if !format::is_supported(path) {
            return Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("none")
                    .to_string(),
            });
        }

        on_event(IngestEvent::Discovered { total: 1 });
        let record = match self.load(codec, path) {
            Ok(record) => record,
            Err(e) => {
                on_event(IngestEvent::Failed { path, error: &e });
                return Err(e);
            }
        };

        let mut report = IngestReport::default();
        Self::insert(store, record, &mut report, on_event);
        Ok(report)
    }

    /// Validate and decode one file into a record. Nothing touches the store.
    fn load(&self, codec: &dyn Codec, path: &Path) -> PipelineResult<ImageRecord> {
        self.validator.validate(path)?;
        let decoded = codec.decode(path)?;
        self.validator
            .check_dimensions(path, decoded.width, decoded.height)?;
        ImageRecord::new(path.to_path_buf(), decoded)
    }

    fn insert(
        store: &mut ImageStore,
        record: ImageRecord,
        report: &mut IngestReport,
        on_event: &mut dyn FnMut(IngestEvent<'_>),
    ) {
        let key = record.key().to_string();
        let bytes = record.byte_size();
        store.insert(record);

        tracing::debug!("Added: {}", key);
        on_event(IngestEvent::Added { key: &key, bytes });
        report.bytes_added += bytes;
        report.added.push(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageCodec;
    use image::{Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str, side: u32) {
        RgbImage::from_pixel(side, side, Rgb([10, 120, 240]))
            .save_with_format(dir.join(name), image::ImageFormat::Png)
            .unwrap();
    }

    fn ingest(path: &Path, store: &mut ImageStore) -> PipelineResult<IngestReport> {
        Ingestor::new(LimitsConfig::default()).ingest(
            &ImageCodec::default(),
            store,
            path,
            &mut |_| {},
        )
    }

    #[test]
    fn test_missing_path() {
        let mut store = ImageStore::new();
        let err = ingest(Path::new("/definitely/not/here"), &mut store).unwrap_err();
        assert!(matches!(err, PipelineError::PathNotFound(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_single_file_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let mut store = ImageStore::new();
        let err = ingest(&path, &mut store).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::UnsupportedFormat { ref format, .. } if format == "txt"
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_single_file_decode_failure_creates_no_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let mut store = ImageStore::new();
        let err = ingest(&path, &mut store).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_single_file_added() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "Photo.PNG", 3);

        let mut store = ImageStore::new();
        let report = ingest(&dir.path().join("Photo.PNG"), &mut store).unwrap();
        assert_eq!(report.added, vec!["photo.png"]);
        assert_eq!(report.bytes_added, 27);
        assert_eq!(store.ram_usage(), 27);
        assert!(!store.get(0).unwrap().is_modified());
    }

    #[test]
    fn test_directory_skips_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "a.png", 2);
        write_png(dir.path(), "c.png", 4);
        std::fs::write(dir.path().join("b.png"), b"garbage").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"ignored").unwrap();

        let mut events = Vec::new();
        let mut store = ImageStore::new();
        let report = Ingestor::new(LimitsConfig::default())
            .ingest(&ImageCodec::default(), &mut store, dir.path(), &mut |e| {
                events.push(match e {
                    IngestEvent::Discovered { total } => format!("discovered {total}"),
                    IngestEvent::Added { key, .. } => format!("added {key}"),
                    IngestEvent::Failed { path, .. } => {
                        format!("failed {}", path.file_name().unwrap().to_string_lossy())
                    }
                })
            })
            .unwrap();

        assert_eq!(report.added, vec!["a.png", "c.png"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(
            events,
            vec!["discovered 3", "added a.png", "failed b.png", "added c.png"]
        );
    }

    #[test]
    fn test_directory_with_nothing_valid_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.jpg"), b"garbage").unwrap();

        let mut store = ImageStore::new();
        let err = ingest(dir.path(), &mut store).unwrap_err();
        assert!(matches!(err, PipelineError::NothingIngested { failed: 1, .. }));

        let empty = tempfile::tempdir().unwrap();
        let err = ingest(empty.path(), &mut store).unwrap_err();
        assert!(matches!(err, PipelineError::NothingIngested { failed: 0, .. }));
    }

    #[test]
    fn test_dimension_limit_skips_image() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "big.png", 8);

        let limits = LimitsConfig {
            max_image_dimension: 4,
            ..LimitsConfig::default()
        };
        let mut store = ImageStore::new();
        let err = Ingestor::new(limits)
            .ingest(
                &ImageCodec::default(),
                &mut store,
                &dir.path().join("big.png"),
                &mut |_| {},
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::ImageTooLarge { .. }));
        assert!(store.is_empty());
    }
}
