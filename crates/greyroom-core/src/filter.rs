//! Grayscale blend filter.
//!
//! Each pixel is interpolated between its original color and its Rec. 601
//! luma, `0.299 R + 0.587 G + 0.114 B`. Intensity 0 leaves the image
//! untouched; intensity 100 makes it fully gray. Alpha is never touched.

use crate::record::{ChannelLayout, ImageRecord};

/// Rec. 601 luma weights.
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

/// Grayscale filter with a blend intensity in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grayscale {
    blend: f64,
}

impl Grayscale {
    /// Build a filter from an intensity in percent, clamped into 0..=100.
    /// NaN is treated as 0.
    pub fn new(intensity: f64) -> Self {
        let intensity = if intensity.is_nan() {
            0.0
        } else {
            intensity.clamp(0.0, 100.0)
        };
        Self {
            blend: intensity / 100.0,
        }
    }

    /// Effective intensity after clamping, in percent.
    pub fn intensity(&self) -> f64 {
        self.blend * 100.0
    }

    /// Filter one record in place and mark it modified.
    pub fn apply(&self, record: &mut ImageRecord) {
        record.edit_pixels(|pixels, layout| self.apply_to_buffer(pixels, layout));
    }

    /// Filter an interleaved 8-bit buffer in place.
    pub fn apply_to_buffer(&self, pixels: &mut [u8], layout: ChannelLayout) {
        let stride = layout.channels();
        match layout {
            ChannelLayout::Gray | ChannelLayout::GrayAlpha => {
                for px in pixels.chunks_exact_mut(stride) {
                    let r = px[0];
                    px[0] = self.mix(r, luma(r, r, r));
                }
            }
            ChannelLayout::Rgb | ChannelLayout::Rgba => {
                for px in pixels.chunks_exact_mut(stride) {
                    let y = luma(px[0], px[1], px[2]);
                    px[0] = self.mix(px[0], y);
                    px[1] = self.mix(px[1], y);
                    px[2] = self.mix(px[2], y);
                }
            }
        }
    }

    fn mix(&self, channel: u8, luma: u8) -> u8 {
        let v = (1.0 - self.blend) * f64::from(channel) + self.blend * f64::from(luma);
        v.round().clamp(0.0, 255.0) as u8
    }
}

impl Default for Grayscale {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Rounded Rec. 601 luma of an 8-bit RGB triple.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let y = LUMA_R * f64::from(r) + LUMA_G * f64::from(g) + LUMA_B * f64::from(b);
    y.round().clamp(0.0, 255.0) as u8
}
