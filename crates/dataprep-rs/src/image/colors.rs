//! Channel histograms and median-cut palette extraction.

use anyhow::{ensure, Result};

use crate::tensor::{DType, Matrix, Scalar};

use super::Image;

/// One palette entry.
pub type Rgb = [u8; 3];

/// Counts sample values per channel.
///
/// Returns a `u32` matrix of shape `[channels, 256]`: row `c`, column `v`
/// holds how many pixels have value `v` in channel `c`.
pub fn histogram(image: &Image) -> Result<Matrix> {
    let mut out = Matrix::zeros(DType::U32, image.channels(), 256)?;
    for chunk in image.data().chunks_exact(image.channels()) {
        for (channel, &value) in chunk.iter().enumerate() {
            out.set_add(channel, value as usize, Scalar::U32(1))?;
        }
    }
    Ok(out)
}

/// Reduces an image to its `n_colors` most representative colors.
///
/// Classic median cut: start with one box holding every pixel, repeatedly
/// split the box whose widest channel spans the largest range at the median of
/// that channel, then average each box into a palette entry. Requires an RGB
/// or RGBA image; the alpha channel is ignored.
pub fn extract_colors(image: &Image, n_colors: usize) -> Result<Vec<Rgb>> {
    ensure!(n_colors > 0, "cannot extract a zero-color palette");
    ensure!(
        image.channels() >= 3,
        "palette extraction needs an RGB image, got {} channel(s)",
        image.channels()
    );
    ensure!(
        image.width() * image.height() > 0,
        "cannot extract a palette from an empty image"
    );
    let pixels: Vec<Rgb> = image
        .data()
        .chunks_exact(image.channels())
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let mut boxes = vec![pixels];
    while boxes.len() < n_colors {
        // Split the box with the widest channel spread; stop when every
        // remaining box is a single color.
        let candidate = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.len() > 1)
            .map(|(i, b)| {
                let (channel, range) = widest_channel(b);
                (i, channel, range)
            })
            .max_by_key(|&(_, _, range)| range);
        let Some((index, channel, range)) = candidate else {
            break;
        };
        if range == 0 {
            break;
        }
        let mut pixels = boxes.swap_remove(index);
        pixels.sort_unstable_by_key(|p| p[channel]);
        let upper = pixels.split_off(pixels.len() / 2);
        boxes.push(pixels);
        boxes.push(upper);
    }
    Ok(boxes.iter().map(|b| average_color(b)).collect())
}

fn widest_channel(pixels: &[Rgb]) -> (usize, u8) {
    let mut min = [u8::MAX; 3];
    let mut max = [u8::MIN; 3];
    for pixel in pixels {
        for c in 0..3 {
            min[c] = min[c].min(pixel[c]);
            max[c] = max[c].max(pixel[c]);
        }
    }
    (0..3)
        .map(|c| (c, max[c] - min[c]))
        .max_by_key(|&(_, range)| range)
        .unwrap_or((0, 0))
}

fn average_color(pixels: &[Rgb]) -> Rgb {
    let mut sums = [0u64; 3];
    for pixel in pixels {
        for c in 0..3 {
            sums[c] += pixel[c] as u64;
        }
    }
    let count = pixels.len().max(1) as u64;
    [
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> Image {
        // Two black and two white RGB pixels.
        let data = vec![
            0, 0, 0, 255, 255, 255, //
            255, 255, 255, 0, 0, 0,
        ];
        Image::new(2, 2, 3, data).unwrap()
    }

    #[test]
    fn histogram_counts_values_per_channel() {
        let image = checkerboard();
        let hist = histogram(&image).unwrap();
        assert_eq!(hist.shape(), [3, 256]);
        assert_eq!(hist.item(0, 0).unwrap(), Scalar::U32(2));
        assert_eq!(hist.item(0, 255).unwrap(), Scalar::U32(2));
        assert_eq!(hist.item(1, 128).unwrap(), Scalar::U32(0));
    }

    #[test]
    fn two_color_image_splits_into_its_two_colors() {
        let mut palette = extract_colors(&checkerboard(), 2).unwrap();
        palette.sort_unstable();
        assert_eq!(palette, vec![[0, 0, 0], [255, 255, 255]]);
    }

    #[test]
    fn uniform_image_stops_early() {
        let image = Image::new(2, 1, 3, vec![9, 9, 9, 9, 9, 9]).unwrap();
        let palette = extract_colors(&image, 4).unwrap();
        assert_eq!(palette, vec![[9, 9, 9]]);
    }

    #[test]
    fn grayscale_input_is_refused() {
        let image = Image::new(2, 1, 1, vec![0, 255]).unwrap();
        assert!(extract_colors(&image, 2).is_err());
    }
}
