//! Raster format table: which extensions are recognized, and which formats
//! can be decoded on ingest versus encoded on preview/export.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Raster formats known to the pipeline.
///
/// Every variant is decodable. Only [`Png`](Self::Png), [`Jpeg`](Self::Jpeg)
/// and [`Bmp`](Self::Bmp) have an encoder, so an image ingested as GIF, TGA,
/// WebP or TIFF stays resident after an export attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    Png,
    Jpeg,
    Bmp,
    Tga,
    Gif,
    WebP,
    Tiff,
}

impl RasterFormat {
    /// All formats, in dispatch-table order.
    pub const ALL: [RasterFormat; 7] = [
        Self::Png,
        Self::Jpeg,
        Self::Bmp,
        Self::Tga,
        Self::Gif,
        Self::WebP,
        Self::Tiff,
    ];

    /// Map a file extension (without dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "bmp" => Some(Self::Bmp),
            "tga" => Some(Self::Tga),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Map a path to a format by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether images of this format can be ingested.
    pub fn can_decode(self) -> bool {
        true
    }

    /// Whether images of this format can be written back to disk.
    pub fn can_encode(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg | Self::Bmp)
    }

    /// Lowercase name used in messages and listings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Bmp => "bmp",
            Self::Tga => "tga",
            Self::Gif => "gif",
            Self::WebP => "webp",
            Self::Tiff => "tiff",
        }
    }

    /// The matching `image` crate format, used by the codec.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tga => image::ImageFormat::Tga,
            Self::Gif => image::ImageFormat::Gif,
            Self::WebP => image::ImageFormat::WebP,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check if a path has an extension recognized for ingest.
pub fn is_supported(path: &Path) -> bool {
    RasterFormat::from_path(path).is_some_and(RasterFormat::can_decode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(RasterFormat::from_extension("JPG"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::from_extension("jpeg"), Some(RasterFormat::Jpeg));
        assert_eq!(RasterFormat::from_extension("Tif"), Some(RasterFormat::Tiff));
        assert_eq!(RasterFormat::from_extension("WEBP"), Some(RasterFormat::WebP));
        assert_eq!(RasterFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("test.jpg")));
        assert!(is_supported(Path::new("test.TGA")));
        assert!(is_supported(Path::new("dir/test.gif")));
        assert!(!is_supported(Path::new("test.heic")));
        assert!(!is_supported(Path::new("README")));
    }

    #[test]
    fn test_encode_capability_gap() {
        let writable: Vec<_> = RasterFormat::ALL
            .into_iter()
            .filter(|f| f.can_encode())
            .collect();
        assert_eq!(
            writable,
            vec![RasterFormat::Png, RasterFormat::Jpeg, RasterFormat::Bmp]
        );
        assert!(RasterFormat::ALL.iter().all(|f| f.can_decode()));
    }
}
