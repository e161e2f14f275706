//! A decoded image resident in memory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};
use crate::format::RasterFormat;

/// Interleaved channel layout of an 8-bit pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelLayout {
    /// Single luminance channel
    Gray,
    /// Luminance + alpha
    GrayAlpha,
    /// Red, green, blue
    Rgb,
    /// Red, green, blue, alpha
    Rgba,
}

impl ChannelLayout {
    /// Layout for a channel count in 1..=4.
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(Self::Gray),
            2 => Some(Self::GrayAlpha),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Number of bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::GrayAlpha => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, Self::GrayAlpha | Self::Rgba)
    }
}

/// Raw output of the codec: geometry plus an interleaved 8-bit buffer.
#[derive(Debug)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub layout: ChannelLayout,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Bytes the buffer must hold for this geometry.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.layout.channels()
    }
}

/// One image owned by the store.
///
/// Deliberately not `Clone`: a record, and the pixel buffer inside it, has
/// exactly one owner. Dropping the record frees the buffer.
#[derive(Debug)]
pub struct ImageRecord {
    source_path: PathBuf,
    key: String,
    format: RasterFormat,
    width: u32,
    height: u32,
    layout: ChannelLayout,
    pixels: Vec<u8>,
    modified: bool,
}

impl ImageRecord {
    /// Take ownership of a decoded buffer loaded from `source_path`.
    ///
    /// Fails with `UnsupportedFormat` if the path has no recognized
    /// extension, and with `InvalidBuffer` if the buffer length does not
    /// equal `width * height * channels` or a dimension is zero.
    pub fn new(source_path: PathBuf, decoded: DecodedImage) -> PipelineResult<Self> {
        let format = RasterFormat::from_path(&source_path).ok_or_else(|| {
            PipelineError::UnsupportedFormat {
                format: extension_of(&source_path),
                path: source_path.clone(),
            }
        })?;

        let expected = decoded.expected_len();
        if decoded.width == 0 || decoded.height == 0 || decoded.pixels.len() != expected {
            return Err(PipelineError::InvalidBuffer {
                path: source_path,
                expected,
                actual: decoded.pixels.len(),
            });
        }

        Ok(Self {
            key: key_for(&source_path),
            source_path,
            format,
            width: decoded.width,
            height: decoded.height,
            layout: decoded.layout,
            pixels: decoded.pixels,
            modified: false,
        })
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Lowercased file name used for lookup and as the output file name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Format of the source file, which decides the encoder on output.
    pub fn format(&self) -> RasterFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Resident size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> u64 {
        self.pixels.len() as u64
    }

    /// Mutate the buffer in place and mark the record modified.
    ///
    /// The closure gets a slice, so it cannot change the buffer length.
    pub fn edit_pixels<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut [u8], ChannelLayout),
    {
        edit(&mut self.pixels, self.layout);
        self.modified = true;
    }
}

/// Store key for a source path: its file name, lowercased.
pub fn key_for(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(width: u32, height: u32, layout: ChannelLayout) -> DecodedImage {
        DecodedImage {
            width,
            height,
            layout,
            pixels: vec![0; width as usize * height as usize * layout.channels()],
        }
    }

    #[test]
    fn test_key_is_lowercased_file_name() {
        assert_eq!(key_for(Path::new("/tmp/Shots/Beach.PNG")), "beach.png");
        assert_eq!(key_for(Path::new("plain.jpg")), "plain.jpg");
    }

    #[test]
    fn test_new_record_is_unmodified() {
        let record =
            ImageRecord::new("in/Photo.JPG".into(), decoded(4, 3, ChannelLayout::Rgb)).unwrap();
        assert_eq!(record.key(), "photo.jpg");
        assert_eq!(record.format(), RasterFormat::Jpeg);
        assert_eq!(record.byte_size(), 36);
        assert!(!record.is_modified());
    }

    #[test]
    fn test_new_rejects_mismatched_buffer() {
        let mut image = decoded(4, 4, ChannelLayout::Rgba);
        image.pixels.pop();
        let err = ImageRecord::new("a.png".into(), image).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidBuffer {
                expected: 64,
                actual: 63,
                ..
            }
        ));
    }

    #[test]
    fn test_new_rejects_unknown_extension() {
        let err = ImageRecord::new("a.heic".into(), decoded(1, 1, ChannelLayout::Gray)).unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_edit_marks_modified_and_keeps_length() {
        let mut record =
            ImageRecord::new("a.png".into(), decoded(2, 2, ChannelLayout::GrayAlpha)).unwrap();
        record.edit_pixels(|px, layout| {
            assert_eq!(layout, ChannelLayout::GrayAlpha);
            px.fill(7);
        });
        assert!(record.is_modified());
        assert_eq!(record.pixels(), &[7; 8]);
    }

    #[test]
    fn test_layout_from_count() {
        assert_eq!(ChannelLayout::from_count(3), Some(ChannelLayout::Rgb));
        assert_eq!(ChannelLayout::from_count(0), None);
        assert_eq!(ChannelLayout::from_count(5), None);
        assert!(ChannelLayout::Rgba.has_alpha());
        assert!(!ChannelLayout::Rgb.has_alpha());
    }
}
