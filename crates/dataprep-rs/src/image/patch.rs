//! Dense sliding-window patch extraction.

use anyhow::{ensure, Result};

use crate::tensor::{DType, Scalar, Tensor};

use super::Image;

/// Extracts every stride-1 window of `patch_width` x `patch_height` pixels.
///
/// Returns a `u8` tensor of shape `[n_patches, patch_height, patch_width,
/// channels]`. Windows are ordered row-major over their top-left corners, so
/// for a `w` x `h` image there are `(w - pw + 1) * (h - ph + 1)` patches.
pub fn extract_patches(image: &Image, patch_width: usize, patch_height: usize) -> Result<Tensor> {
    ensure!(
        patch_width > 0 && patch_height > 0,
        "patch dimensions must be nonzero, got {patch_width}x{patch_height}"
    );
    ensure!(
        patch_width <= image.width() && patch_height <= image.height(),
        "{patch_width}x{patch_height} patch does not fit a {}x{} image",
        image.width(),
        image.height()
    );
    let n_x = image.width() - patch_width + 1;
    let n_y = image.height() - patch_height + 1;
    let channels = image.channels();
    let shape = [n_x * n_y, patch_height, patch_width, channels];
    let mut out = Tensor::zeros(DType::U8, &shape)?;
    for py in 0..n_y {
        for px in 0..n_x {
            let patch = py * n_x + px;
            for dy in 0..patch_height {
                for dx in 0..patch_width {
                    let pixel = image.pixel(px + dx, py + dy);
                    for (c, &sample) in pixel.iter().enumerate() {
                        out.set_item(&[patch, dy, dx, c], Scalar::U8(sample))?;
                    }
                }
            }
        }
    }
    Ok(out)
}
