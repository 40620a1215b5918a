//! Reconstruction quality and compression ratio.

use crate::{ColorMode, RgbRaster};
use palette::Srgb;

/// Mean squared error between two images over the 3 color channels.
///
/// Only the rectangle common to both images is compared, that is,
/// the minimum of the widths by the minimum of the heights.
/// Returns `0.0` if that rectangle is empty.
#[must_use]
pub fn mse(original: &RgbRaster, reconstructed: &RgbRaster) -> f64 {
    let width = original.width().min(reconstructed.width());
    let height = original.height().min(reconstructed.height());
    if width == 0 || height == 0 {
        return 0.0;
    }

    let mut sum = 0u64;
    for (a, b) in rows(original, width, height).zip(rows(reconstructed, width, height)) {
        for (a, b) in a.iter().zip(b) {
            for (x, y) in [(a.red, b.red), (a.green, b.green), (a.blue, b.blue)] {
                let d = u64::from(x.abs_diff(y));
                sum += d * d;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    {
        sum as f64 / (f64::from(width) * f64::from(height) * 3.0)
    }
}

/// The first `height` rows of `image`, each cut to `width` pixels.
fn rows(image: &RgbRaster, width: u32, height: u32) -> impl Iterator<Item = &[Srgb<u8>]> {
    image
        .pixels()
        .chunks_exact(image.width().max(1) as usize)
        .take(height as usize)
        .map(move |row| &row[..width as usize])
}

/// The ratio of uncompressed size to compressed size for an image, in "X:1" form.
///
/// The uncompressed size is 3 samples per pixel. Each quantized 2×2 block costs one index.
/// In [`ColorMode::Rgb`], all three planes are quantized at full resolution.
/// In [`ColorMode::Yuv`], the two chroma planes are halved in each axis before quantization.
///
/// ```
/// # use blockvq::{compression_ratio, ColorMode};
/// assert_eq!(compression_ratio(8, 8, ColorMode::Rgb), 4.0);
/// assert_eq!(compression_ratio(8, 8, ColorMode::Yuv), 8.0);
/// ```
#[must_use]
pub fn compression_ratio(width: u32, height: u32, mode: ColorMode) -> f64 {
    let (w, h) = (f64::from(width), f64::from(height));
    let original = 3.0 * w * h;
    let compressed = match mode {
        ColorMode::Rgb => (w / 2.0) * (h / 2.0) * 3.0,
        ColorMode::Yuv => (w / 2.0) * (h / 2.0) + 2.0 * (w / 4.0) * (h / 4.0),
    };
    original / compressed
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::tests::random_raster;

    #[test]
    fn identical_images() {
        let image = random_raster(7, 5, 1);
        assert_eq!(mse(&image, &image), 0.0);
    }

    #[test]
    fn known_error() {
        let a = RgbRaster::from_fn(2, 2, |_, _| Srgb::new(10, 20, 30));
        let b = RgbRaster::from_fn(2, 2, |x, _| {
            if x == 0 {
                Srgb::new(13, 20, 30)
            } else {
                Srgb::new(10, 16, 30)
            }
        });
        // (2 * 9 + 2 * 16) / (2 * 2 * 3)
        assert_eq!(mse(&a, &b), 50.0 / 12.0);
        assert_eq!(mse(&b, &a), 50.0 / 12.0);
    }

    #[test]
    fn common_rectangle_only() {
        let a = RgbRaster::from_fn(4, 2, |x, _| Srgb::new(if x < 2 { 0 } else { 255 }, 0, 0));
        let b = RgbRaster::from_fn(2, 3, |_, _| Srgb::new(3, 0, 0));
        // 2x2 overlap, each pixel off by 3 in red
        assert_eq!(mse(&a, &b), 9.0 * 4.0 / 12.0);
        assert_eq!(mse(&a, &RgbRaster::default()), 0.0);
    }

    #[test]
    fn ratios() {
        assert_eq!(compression_ratio(8, 8, ColorMode::Rgb), 4.0);
        assert_eq!(compression_ratio(8, 8, ColorMode::Yuv), 8.0);
        assert_eq!(compression_ratio(640, 480, ColorMode::Rgb), 4.0);
        assert_eq!(compression_ratio(640, 480, ColorMode::Yuv), 8.0);
        assert_eq!(compression_ratio(4, 12, ColorMode::Yuv), 8.0);
    }
}
