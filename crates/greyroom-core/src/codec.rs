//! Codec adapter: file ⇄ interleaved 8-bit pixel buffer.
//!
//! The store only talks to the [`Codec`] trait. [`ImageCodec`] is the
//! default implementation, backed by the `image` crate.

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::format::RasterFormat;
use crate::record::{ChannelLayout, DecodedImage};

/// Decode/encode capability consumed by the ingestor and exporter.
///
/// Implementations must not keep references to buffers after a call returns.
pub trait Codec {
    /// Decode the file at `path` into an 8-bit interleaved buffer.
    fn decode(&self, path: &Path) -> PipelineResult<DecodedImage>;

    /// Encode `pixels` as `format` and write the result to `path`.
    ///
    /// Formats without an encoder (`!format.can_encode()`) fail with
    /// [`PipelineError::Encode`].
    fn encode(
        &self,
        format: RasterFormat,
        width: u32,
        height: u32,
        layout: ChannelLayout,
        pixels: &[u8],
        path: &Path,
    ) -> PipelineResult<()>;
}

/// Default JPEG quality, matching what most editors write.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// [`Codec`] backed by the `image` crate.
#[derive(Debug, Clone)]
pub struct ImageCodec {
    jpeg_quality: u8,
}

impl Default for ImageCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageCodec {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    /// Decode from an in-memory byte buffer.
    ///
    /// Format is detected from content first and falls back to the
    /// extension, which TGA needs since it has no magic bytes.
    fn decode_bytes(bytes: Vec<u8>, path: &Path) -> PipelineResult<DecodedImage> {
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                path: path.to_path_buf(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        if reader.format().is_none() {
            let format =
                RasterFormat::from_path(path).ok_or_else(|| PipelineError::UnsupportedFormat {
                    path: path.to_path_buf(),
                    format: path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("unknown")
                        .to_string(),
                })?;
            reader.set_format(format.to_image_format());
        }

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(into_decoded(image))
    }

    fn encode_to_vec(
        &self,
        format: RasterFormat,
        width: u32,
        height: u32,
        layout: ChannelLayout,
        pixels: &[u8],
    ) -> Result<Vec<u8>, String> {
        let mut out = Vec::new();
        let result = match format {
            RasterFormat::Png => PngEncoder::new(&mut out).write_image(
                pixels,
                width,
                height,
                color_type(layout),
            ),
            RasterFormat::Jpeg => {
                let (opaque, layout) = strip_alpha(pixels, layout);
                JpegEncoder::new_with_quality(&mut out, self.jpeg_quality).write_image(
                    &opaque,
                    width,
                    height,
                    color_type(layout),
                )
            }
            RasterFormat::Bmp => BmpEncoder::new(&mut out).write_image(
                pixels,
                width,
                height,
                color_type(layout),
            ),
            other => return Err(format!("no encoder for {}", other)),
        };
        result.map_err(|e| e.to_string())?;
        Ok(out)
    }
}

impl Codec for ImageCodec {
    fn decode(&self, path: &Path) -> PipelineResult<DecodedImage> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read file: {}", e),
        })?;
        Self::decode_bytes(bytes, path)
    }

    fn encode(
        &self,
        format: RasterFormat,
        width: u32,
        height: u32,
        layout: ChannelLayout,
        pixels: &[u8],
        path: &Path,
    ) -> PipelineResult<()> {
        let encode_err = |message: String| PipelineError::Encode {
            path: path.to_path_buf(),
            message,
        };

        // Encode fully in memory so a failure never leaves a partial file.
        let bytes = self
            .encode_to_vec(format, width, height, layout, pixels)
            .map_err(encode_err)?;
        std::fs::write(path, bytes).map_err(|e| encode_err(format!("Cannot write file: {}", e)))
    }
}

/// Flatten a decoded image into one of the four 8-bit layouts.
fn into_decoded(image: DynamicImage) -> DecodedImage {
    let (width, height) = (image.width(), image.height());
    let layout = ChannelLayout::from_count(image.color().channel_count())
        .unwrap_or(ChannelLayout::Rgba);
    let pixels = match layout {
        ChannelLayout::Gray => image.into_luma8().into_raw(),
        ChannelLayout::GrayAlpha => image.into_luma_alpha8().into_raw(),
        ChannelLayout::Rgb => image.into_rgb8().into_raw(),
        ChannelLayout::Rgba => image.into_rgba8().into_raw(),
    };
    DecodedImage {
        width,
        height,
        layout,
        pixels,
    }
}

fn color_type(layout: ChannelLayout) -> ExtendedColorType {
    match layout {
        ChannelLayout::Gray => ExtendedColorType::L8,
        ChannelLayout::GrayAlpha => ExtendedColorType::La8,
        ChannelLayout::Rgb => ExtendedColorType::Rgb8,
        ChannelLayout::Rgba => ExtendedColorType::Rgba8,
    }
}

/// JPEG has no alpha channel: drop it, keeping color channels as-is.
fn strip_alpha(pixels: &[u8], layout: ChannelLayout) -> (Cow<'_, [u8]>, ChannelLayout) {
    match layout {
        ChannelLayout::GrayAlpha => (
            Cow::Owned(pixels.chunks_exact(2).map(|px| px[0]).collect()),
            ChannelLayout::Gray,
        ),
        ChannelLayout::Rgba => (
            Cow::Owned(
                pixels
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect(),
            ),
            ChannelLayout::Rgb,
        ),
        opaque => (Cow::Borrowed(pixels), opaque),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_decode_png_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 40]))
            .save(&path)
            .unwrap();

        let decoded = ImageCodec::default().decode(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.layout, ChannelLayout::Rgba);
        assert_eq!(decoded.pixels.len(), decoded.expected_len());
        assert_eq!(&decoded.pixels[..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_format_detected_by_content() {
        // A PNG saved under a .jpg name still decodes
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        RgbImage::from_pixel(2, 2, Rgb([1, 2, 3])).save(&png).unwrap();
        let misnamed = dir.path().join("misnamed.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        let decoded = ImageCodec::default().decode(&misnamed).unwrap();
        assert_eq!(decoded.layout, ChannelLayout::Rgb);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = ImageCodec::default().decode(&path).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_encode_without_encoder_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        let err = ImageCodec::default()
            .encode(RasterFormat::Gif, 1, 1, ChannelLayout::Rgb, &[0, 0, 0], &path)
            .unwrap_err();
        assert!(err.to_string().contains("no encoder for gif"));
        assert!(!path.exists());
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let pixels = [200u8, 100, 50, 0].repeat(16);
        let codec = ImageCodec::default();
        codec
            .encode(RasterFormat::Jpeg, 4, 4, ChannelLayout::Rgba, &pixels, &path)
            .unwrap();

        let decoded = codec.decode(&path).unwrap();
        assert_eq!(decoded.layout, ChannelLayout::Rgb);
        assert_eq!((decoded.width, decoded.height), (4, 4));
    }

    #[test]
    fn test_png_and_bmp_preserve_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let codec = ImageCodec::default();
        let pixels: Vec<u8> = (0..2 * 2 * 3).map(|i| (i * 20) as u8).collect();

        for (name, format) in [("a.png", RasterFormat::Png), ("a.bmp", RasterFormat::Bmp)] {
            let path = dir.path().join(name);
            codec
                .encode(format, 2, 2, ChannelLayout::Rgb, &pixels, &path)
                .unwrap();
            let decoded = codec.decode(&path).unwrap();
            assert_eq!(decoded.pixels, pixels, "{name}");
        }
    }

    #[test]
    fn test_strip_alpha_gray() {
        let (opaque, layout) = strip_alpha(&[9, 255, 8, 0], ChannelLayout::GrayAlpha);
        assert_eq!(layout, ChannelLayout::Gray);
        assert_eq!(&*opaque, &[9, 8]);
    }
}
