//! Preview and export: encode resident images to disk.
//!
//! Both operations select records the same way as the filter (all, or the
//! first match for a target), encode each one by its source format and keep
//! going when a single record fails. Export can additionally evict the
//! records it wrote.
//!
//! Keys are not unique. Within one pass only the first record with a given
//! key is written; later ones fail with `DuplicateDestination` and, on
//! export, stay resident.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::codec::Codec;
use crate::error::{PipelineError, PipelineResult};
use crate::store::ImageStore;
use crate::types::{ExportFailure, ExportReport};

/// Write the current pixels of the selected records into `preview_dir`.
///
/// Never removes records.
pub fn save_preview(
    codec: &dyn Codec,
    store: &ImageStore,
    preview_dir: &Path,
    target: Option<&str>,
) -> PipelineResult<ExportReport> {
    let indices = store.select(target)?;
    create_dir(preview_dir)?;

    tracing::debug!("Saving {} preview(s) to {:?}", indices.len(), preview_dir);
    write_selected(codec, store, preview_dir, &indices).into_report(preview_dir)
}

/// Write the selected records into `dest` and, if `clear`, evict every
/// record that was written. Records that failed to encode stay resident.
pub fn export_output(
    codec: &dyn Codec,
    store: &mut ImageStore,
    dest: &Path,
    clear: bool,
    target: Option<&str>,
) -> PipelineResult<ExportReport> {
    let indices = store.select(target)?;
    create_dir(dest)?;

    tracing::debug!("Exporting {} image(s) to {:?}", indices.len(), dest);
    let batch = write_selected(codec, store, dest, &indices);
    let exported: Vec<usize> = batch.written.iter().map(|(i, _)| *i).collect();
    let mut report = batch.into_report(dest)?;

    if clear {
        let removed = store.remove_many(&exported);
        report.evicted = removed.len();
        report.freed_bytes = removed.iter().map(|r| r.byte_size()).sum();
        tracing::debug!(
            "Cleared {} image(s) from input ({} bytes freed)",
            report.evicted,
            report.freed_bytes
        );
    }

    Ok(report)
}

/// Per-record outcomes of one preview/export pass.
struct Batch {
    written: Vec<(usize, PathBuf)>,
    failed: Vec<(String, PipelineError)>,
}

impl Batch {
    /// Succeeds if anything was written. When nothing was and exactly one
    /// record was attempted, its own error is returned.
    fn into_report(mut self, dir: &Path) -> PipelineResult<ExportReport> {
        if self.written.is_empty() {
            if self.failed.len() == 1 {
                if let Some((_, err)) = self.failed.pop() {
                    return Err(err);
                }
            }
            return Err(PipelineError::NothingWritten {
                dir: dir.to_path_buf(),
                failed: self.failed.len(),
            });
        }

        Ok(ExportReport {
            dir: dir.to_path_buf(),
            written: self.written.into_iter().map(|(_, p)| p).collect(),
            failed: self
                .failed
                .into_iter()
                .map(|(key, e)| ExportFailure {
                    key,
                    message: e.to_string(),
                })
                .collect(),
            evicted: 0,
            freed_bytes: 0,
        })
    }
}

fn write_selected(codec: &dyn Codec, store: &ImageStore, dir: &Path, indices: &[usize]) -> Batch {
    let mut batch = Batch {
        written: Vec::with_capacity(indices.len()),
        failed: Vec::new(),
    };
    let mut claimed: HashSet<PathBuf> = HashSet::with_capacity(indices.len());

    for &index in indices {
        let Some(record) = store.get(index) else {
            continue;
        };
        let dest = dir.join(record.key());
        if !claimed.insert(dest.clone()) {
            let e = PipelineError::DuplicateDestination { path: dest };
            tracing::warn!("[FAIL] {}: {}", record.key(), e);
            batch.failed.push((record.key().to_string(), e));
            continue;
        }

        let result = codec.encode(
            record.format(),
            record.width(),
            record.height(),
            record.layout(),
            record.pixels(),
            &dest,
        );

        match result {
            Ok(()) => {
                tracing::debug!("[OK] {}", record.key());
                batch.written.push((index, dest));
            }
            Err(e) => {
                tracing::warn!("[FAIL] {}: {}", record.key(), e);
                batch.failed.push((record.key().to_string(), e));
            }
        }
    }

    batch
}

fn create_dir(dir: &Path) -> PipelineResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| PipelineError::DirectoryCreate {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageCodec;
    use crate::record::{ChannelLayout, DecodedImage, ImageRecord};

    fn record(path: &str, fill: u8) -> ImageRecord {
        ImageRecord::new(
            path.into(),
            DecodedImage {
                width: 2,
                height: 2,
                layout: ChannelLayout::Rgb,
                pixels: vec![fill; 12],
            },
        )
        .unwrap()
    }

    fn store(paths: &[&str]) -> ImageStore {
        let mut store = ImageStore::new();
        for (i, p) in paths.iter().enumerate() {
            store.insert(record(p, i as u8 * 40));
        }
        store
    }

    #[test]
    fn test_export_empty_store_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let mut store = ImageStore::new();

        let err = export_output(&ImageCodec::default(), &mut store, &dest, true, None).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyStore));
        assert!(!dest.exists());
    }

    #[test]
    fn test_export_clear_keeps_unencodable_records() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let mut store = store(&["src/a.png", "src/b.gif", "src/C.BMP"]);
        let before = store.ram_usage();

        let report =
            export_output(&ImageCodec::default(), &mut store, &dest, true, None).unwrap();

        assert_eq!(report.written, vec![dest.join("a.png"), dest.join("c.bmp")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].key, "b.gif");
        assert_eq!(report.evicted, 2);
        assert_eq!(report.freed_bytes, 24);
        assert_eq!(store.ram_usage(), before - 24);

        let left: Vec<_> = store.iter().map(|r| r.key()).collect();
        assert_eq!(left, vec!["b.gif"]);
        assert!(!dest.join("b.gif").exists());
    }

    #[test]
    fn test_export_target_processes_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&["a.png", "b.png", "b.png"]);

        let report =
            export_output(&ImageCodec::default(), &mut store, dir.path(), true, Some("B.png"))
                .unwrap();
        assert_eq!(report.written.len(), 1);
        assert_eq!(report.evicted, 1);
        let left: Vec<_> = store.iter().map(|r| r.key()).collect();
        assert_eq!(left, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_export_duplicate_keys_keep_later_record_resident() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let mut store = ImageStore::new();
        store.insert(record("one/dup.png", 10));
        store.insert(record("two/dup.png", 200));

        let report =
            export_output(&ImageCodec::default(), &mut store, &dest, true, None).unwrap();

        assert_eq!(report.written, vec![dest.join("dup.png")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].key, "dup.png");
        assert_eq!(report.evicted, 1);

        assert_eq!(store.len(), 1);
        let left = store.get(0).unwrap();
        assert_eq!(left.source_path(), Path::new("two/dup.png"));
        assert_eq!(left.pixels()[0], 200);

        let on_disk = image::open(dest.join("dup.png")).unwrap().to_rgb8();
        assert_eq!(on_disk.get_pixel(0, 0).0, [10, 10, 10]);
    }

    #[test]
    fn test_export_duplicate_target_suffix_writes_second_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ImageStore::new();
        store.insert(record("one/dup.png", 10));
        store.insert(record("two/dup.png", 200));

        let report = export_output(
            &ImageCodec::default(),
            &mut store,
            dir.path(),
            true,
            Some("dup.png#2"),
        )
        .unwrap();
        assert_eq!(report.written.len(), 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().pixels()[0], 10);
    }

    #[test]
    fn test_export_unknown_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&["a.png"]);
        let err = export_output(&ImageCodec::default(), &mut store, dir.path(), true, Some("x.png"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::TargetNotFound(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_export_single_unencodable_target_reports_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&["anim.gif"]);
        let err = export_output(&ImageCodec::default(), &mut store, dir.path(), true, None)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Encode { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_export_all_failed_batch() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&["a.gif", "b.tga", "c.webp"]);
        let err = export_output(&ImageCodec::default(), &mut store, dir.path(), true, None)
            .unwrap_err();
        assert!(matches!(err, PipelineError::NothingWritten { failed: 3, .. }));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_export_directory_create_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let mut store = store(&["a.png"]);

        let err = export_output(
            &ImageCodec::default(),
            &mut store,
            &blocker.join("sub"),
            true,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryCreate { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_reexport_without_clear_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&["a.png", "b.jpg", "c.bmp"]);
        let codec = ImageCodec::default();

        let first = export_output(&codec, &mut store, dir.path(), false, None).unwrap();
        let bytes_first: Vec<Vec<u8>> = first
            .written
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect();

        let second = export_output(&codec, &mut store, dir.path(), false, None).unwrap();
        let bytes_second: Vec<Vec<u8>> = second
            .written
            .iter()
            .map(|p| std::fs::read(p).unwrap())
            .collect();

        assert_eq!(first.written, second.written);
        assert_eq!(bytes_first, bytes_second);
        assert_eq!(store.len(), 3);
        assert_eq!(second.evicted, 0);
    }

    #[test]
    fn test_preview_never_evicts() {
        let dir = tempfile::tempdir().unwrap();
        let preview = dir.path().join("preview");
        let store = store(&["a.png", "b.gif"]);

        let report = save_preview(&ImageCodec::default(), &store, &preview, None).unwrap();
        assert_eq!(report.written, vec![preview.join("a.png")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(store.len(), 2);
    }
}
