//! Greyroom Core - in-memory batch image editing.
//!
//! Images are decoded from disk into an in-memory working set, filtered in
//! place, and written back out, optionally evicting what was written.
//!
//! # Architecture
//!
//! ```text
//! Ingest (discover → validate → decode) → ImageStore → Grayscale → Preview / Export (+ evict)
//! ```
//!
//! The [`ImageStore`] is the only owner of pixel buffers. Records move into it
//! on ingest and are dropped when evicted; nothing else keeps a reference.
//!
//! # Usage
//!
//! ```rust,no_run
//! use greyroom_core::{Config, Workspace};
//! use std::path::Path;
//!
//! fn main() -> greyroom_core::Result<()> {
//!     let mut ws = Workspace::new(Config::load()?);
//!     ws.add_input(Path::new("./photos"))?;
//!     ws.apply_grayscale(None, 60.0)?;
//!     let report = ws.export_output(Path::new("./out"), true, None)?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod store;
pub mod types;
pub mod workspace;

// Re-exports for convenient access
pub use codec::{Codec, ImageCodec};
pub use config::Config;
pub use error::{ConfigError, GreyroomError, PipelineError, PipelineResult, Result};
pub use filter::Grayscale;
pub use format::RasterFormat;
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::IngestEvent;
pub use record::{ChannelLayout, DecodedImage, ImageRecord};
pub use store::ImageStore;
pub use types::{format_bytes, ExportReport, IngestReport, InputListing, ListedImage};
pub use workspace::Workspace;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
