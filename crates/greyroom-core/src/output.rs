//! Rendering of listings and reports as text, JSON or JSON Lines.

use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

use crate::types::InputListing;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (the `Display` impl)
    Text,
    /// Single JSON object
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Writes reports to an underlying writer in one [`OutputFormat`].
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects [`OutputFormat::Json`].
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write one report. JSON Lines writes it as a single line.
    pub fn write<T: Serialize + Display>(&mut self, item: &T) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => write!(self.writer, "{}", item)?,
            OutputFormat::Json if self.pretty => {
                serde_json::to_writer_pretty(&mut self.writer, item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
            OutputFormat::Json | OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        Ok(())
    }

    /// Write a listing. JSON Lines emits one object per image.
    pub fn write_listing(&mut self, listing: &InputListing) -> io::Result<()> {
        if self.format != OutputFormat::JsonLines {
            return self.write(listing);
        }
        for image in &listing.images {
            serde_json::to_writer(&mut self.writer, image).map_err(io::Error::other)?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
