//! Image helpers: patch extraction, channel histograms, color quantization.

mod colors;
mod patch;

pub use colors::{extract_colors, histogram, Rgb};
pub use patch::extract_patches;

use anyhow::{ensure, Result};

/// Interleaved 8-bit raster: `channels` samples per pixel, rows top to bottom.
#[derive(Debug, Clone)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<u8>,
}

impl Image {
    /// Wraps raw interleaved pixel data.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        ensure!(
            (1..=4).contains(&channels),
            "expected 1 to 4 channels, got {channels}"
        );
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels));
        ensure!(
            expected == Some(data.len()),
            "{width}x{height}x{channels} image needs {:?} bytes, got {}",
            expected,
            data.len()
        );
        Ok(Image {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Borrows the raw interleaved samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Borrows the samples of the pixel at `(x, y)`.
    ///
    /// Callers must pass in-range coordinates; the image checks its own
    /// dimensions at construction.
    pub(crate) fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let offset = (y * self.width + x) * self.channels;
        &self.data[offset..offset + self.channels]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_checks_the_byte_count() {
        assert!(Image::new(2, 2, 3, vec![0; 12]).is_ok());
        assert!(Image::new(2, 2, 3, vec![0; 11]).is_err());
        assert!(Image::new(2, 2, 5, vec![0; 20]).is_err());
    }

    #[test]
    fn pixel_addresses_interleaved_samples() {
        let data: Vec<u8> = (0..12).collect();
        let image = Image::new(2, 2, 3, data).unwrap();
        assert_eq!(image.pixel(1, 0), &[3, 4, 5]);
        assert_eq!(image.pixel(0, 1), &[6, 7, 8]);
    }
}
