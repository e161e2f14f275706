//! The working set: one image store plus the codec and configuration used
//! to fill and drain it.

use std::path::Path;

use crate::codec::{Codec, ImageCodec};
use crate::config::Config;
use crate::error::PipelineResult;
use crate::filter::Grayscale;
use crate::pipeline::{self, IngestEvent, Ingestor};
use crate::store::ImageStore;
use crate::types::{ExportReport, IngestReport, InputListing};

/// Entry point for every store operation.
///
/// Operations run one at a time to completion; a failed call leaves the
/// store exactly as the completed part of it left it.
pub struct Workspace {
    config: Config,
    store: ImageStore,
    codec: Box<dyn Codec>,
    ingestor: Ingestor,
}

impl Workspace {
    /// Create an empty workspace using the `image` crate codec.
    pub fn new(config: Config) -> Self {
        let codec = ImageCodec::new(config.export.jpeg_quality);
        Self::with_codec(config, Box::new(codec))
    }

    /// Create an empty workspace with a custom codec.
    pub fn with_codec(config: Config, codec: Box<dyn Codec>) -> Self {
        tracing::debug!("Initializing workspace v{}", crate::VERSION);
        Self {
            ingestor: Ingestor::new(config.limits.clone()),
            config,
            store: ImageStore::new(),
            codec,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Ingest a file or directory.
    pub fn add_input(&mut self, path: &Path) -> PipelineResult<IngestReport> {
        self.add_input_with_progress(path, |_| {})
    }

    /// Ingest a file or directory, reporting each file as it is handled.
    pub fn add_input_with_progress<F>(
        &mut self,
        path: &Path,
        mut on_event: F,
    ) -> PipelineResult<IngestReport>
    where
        F: FnMut(IngestEvent<'_>),
    {
        self.ingestor
            .ingest(self.codec.as_ref(), &mut self.store, path, &mut on_event)
    }

    /// Blend the selected records toward grayscale. Returns how many records
    /// were filtered.
    pub fn apply_grayscale(
        &mut self,
        target: Option<&str>,
        intensity: f64,
    ) -> PipelineResult<usize> {
        let indices = self.store.select(target)?;
        let filter = Grayscale::new(intensity);

        tracing::debug!(
            "Applying grayscale at {}% to {} image(s)",
            filter.intensity(),
            indices.len()
        );
        for &index in &indices {
            if let Some(record) = self.store.get_mut(index) {
                filter.apply(record);
                tracing::debug!("[OK] {}", record.key());
            }
        }
        Ok(indices.len())
    }

    /// Write the selected records to the configured preview directory.
    pub fn save_preview(&self, target: Option<&str>) -> PipelineResult<ExportReport> {
        pipeline::save_preview(
            self.codec.as_ref(),
            &self.store,
            &self.config.preview_dir(),
            target,
        )
    }

    /// Write the selected records to `dest`, evicting the written ones if
    /// `clear` is set.
    pub fn export_output(
        &mut self,
        dest: &Path,
        clear: bool,
        target: Option<&str>,
    ) -> PipelineResult<ExportReport> {
        pipeline::export_output(self.codec.as_ref(), &mut self.store, dest, clear, target)
    }

    /// Snapshot of the resident images.
    pub fn list_input(&self) -> InputListing {
        self.store.iter().collect()
    }

    /// Bytes held by resident pixel buffers.
    pub fn ram_usage(&self) -> u64 {
        self.store.ram_usage()
    }
}
