//! Pipeline stages around the image store.
//!
//! - **discovery**: Find image files in a directory
//! - **validate**: Size and dimension limits
//! - **ingest**: Decode files and insert records
//! - **export**: Preview and export records, with optional eviction

pub mod discovery;
pub mod export;
pub mod ingest;
pub mod validate;

// Re-exports for convenient access
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use export::{export_output, save_preview};
pub use ingest::{IngestEvent, Ingestor};
pub use validate::Validator;
