//! Error types for the Greyroom image pipeline.
//!
//! Errors are organized by concern: configuration loading, and the pipeline
//! operations that touch the image store (ingest, filter, preview, export).
//! Every variant carries enough context (path, key, format) to be printed
//! straight to the user.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Greyroom operations.
#[derive(Error, Debug)]
pub enum GreyroomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised by store operations and the stages around them.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Extension not recognized for the requested direction
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Image encoding or writing failed
    #[error("Encode error for {path}: {message}")]
    Encode { path: PathBuf, message: String },

    /// Operation needs at least one resident image
    #[error("Input is empty. Use: -i @\"path\"")]
    EmptyStore,

    /// No resident image matches the requested key
    #[error("Image not found: {0}")]
    TargetNotFound(String),

    /// Destination directory could not be created
    #[error("Failed to create directory {path}: {message}")]
    DirectoryCreate { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Pixel buffer does not match its declared geometry
    #[error("Invalid pixel buffer for {path}: expected {expected} bytes, got {actual}")]
    InvalidBuffer {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// An earlier record in the same batch already wrote this file
    #[error("Skipped {path}: another image with the same name was already written in this batch")]
    DuplicateDestination { path: PathBuf },

    /// A batch ingest inserted nothing
    #[error("No images added from {path} ({failed} failed)")]
    NothingIngested { path: PathBuf, failed: usize },

    /// A preview or export batch wrote nothing
    #[error("Nothing written to {dir} ({failed} failed)")]
    NothingWritten { dir: PathBuf, failed: usize },
}

/// Convenience type alias for Greyroom results.
pub type Result<T> = std::result::Result<T, GreyroomError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
