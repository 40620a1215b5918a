//! Color plane extraction and recombination for the supported color modes.

use crate::{Plane, RgbRaster, VqError};
use palette::Srgb;
use std::fmt::Display;

/// The color pipeline used to split images into planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    /// Quantize the red, green, and blue planes directly.
    #[default]
    Rgb,
    /// Convert to YUV and quantize the luma plane at full resolution
    /// and the two chroma planes at half resolution in each axis.
    Yuv,
}

impl ColorMode {
    /// All supported color modes.
    pub const ALL: [Self; 2] = [Self::Rgb, Self::Yuv];

    /// Names of the three channels, in plane order.
    #[must_use]
    pub const fn channel_names(self) -> [&'static str; 3] {
        match self {
            ColorMode::Rgb => ["R", "G", "B"],
            ColorMode::Yuv => ["Y", "U", "V"],
        }
    }

    /// Returns whether the channel at `index` is subsampled before quantization.
    #[must_use]
    pub const fn is_subsampled(self, index: usize) -> bool {
        matches!(self, ColorMode::Yuv) && index > 0
    }

    /// The multiple both image dimensions must be of for the mode's planes
    /// to be split into whole blocks.
    #[must_use]
    pub const fn alignment(self) -> u32 {
        match self {
            ColorMode::Rgb => crate::BLOCK_SIDE,
            ColorMode::Yuv => crate::BLOCK_SIDE * 2,
        }
    }
}

impl Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ColorMode::Rgb => "RGB",
                ColorMode::Yuv => "YUV",
            }
        )
    }
}

/// Truncates toward zero, then keeps the low 8 bits.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn truncate_to_byte(value: f64) -> u8 {
    (value as i32) as u8
}

/// Converts one pixel to YUV.
///
/// Each component is truncated rather than rounded. Values outside of `0..=255`
/// (only possible for V) wrap around instead of saturating.
#[must_use]
pub fn rgb_to_yuv(color: Srgb<u8>) -> [u8; 3] {
    let r = f64::from(color.red);
    let g = f64::from(color.green);
    let b = f64::from(color.blue);

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = (-0.147 * r - 0.289 * g + 0.436 * b) + 128.0;
    let v = (0.615 * r - 0.515 * g - 0.100 * b) + 128.0;

    [truncate_to_byte(y), truncate_to_byte(u), truncate_to_byte(v)]
}

/// Converts one YUV sample back to RGB.
///
/// Each weighted chroma term is truncated to an integer on its own
/// and the sums are clamped to `0..=255`.
#[must_use]
pub fn yuv_to_rgb([y, u, v]: [u8; 3]) -> Srgb<u8> {
    #[allow(clippy::cast_possible_truncation)]
    fn term(weight: f64, value: i32) -> i32 {
        (weight * f64::from(value)) as i32
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn clamp(value: i32) -> u8 {
        value.clamp(0, 255) as u8
    }

    let y = i32::from(y);
    let u = i32::from(u) - 128;
    let v = i32::from(v) - 128;

    Srgb::new(
        clamp(y + term(1.140, v)),
        clamp(y - term(0.395, u) - term(0.581, v)),
        clamp(y + term(2.032, u)),
    )
}

/// Splits an image into three planes according to `mode`.
///
/// Every plane has the same dimensions as the image.
#[must_use]
pub fn extract_planes(image: &RgbRaster, mode: ColorMode) -> [Plane; 3] {
    let (width, height) = image.dimensions();
    let len = image.pixels().len();
    let mut planes = [(); 3].map(|()| Vec::with_capacity(len));

    let convert: fn(Srgb<u8>) -> [u8; 3] = match mode {
        ColorMode::Rgb => |c| [c.red, c.green, c.blue],
        ColorMode::Yuv => rgb_to_yuv,
    };

    for &pixel in image.pixels() {
        for (plane, sample) in planes.iter_mut().zip(convert(pixel)) {
            plane.push(sample);
        }
    }

    #[allow(clippy::expect_used)]
    {
        // each plane received exactly one sample per pixel
        planes.map(|samples| Plane::new(width, height, samples).expect("one sample per pixel"))
    }
}

/// Combines three planes into an image, inverting the conversion done by [`extract_planes`].
///
/// # Errors
/// Returns [`VqError::DimensionMismatch`] if the planes are not all the same size.
pub fn recombine_planes(planes: &[Plane; 3], mode: ColorMode) -> Result<RgbRaster, VqError> {
    let expected = planes[0].dimensions();
    for plane in &planes[1..] {
        if plane.dimensions() != expected {
            return Err(VqError::DimensionMismatch { expected, actual: plane.dimensions() });
        }
    }

    let convert: fn([u8; 3]) -> Srgb<u8> = match mode {
        ColorMode::Rgb => |[r, g, b]| Srgb::new(r, g, b),
        ColorMode::Yuv => yuv_to_rgb,
    };

    let [a, b, c] = planes.each_ref().map(Plane::samples);
    let pixels = a
        .iter()
        .zip(b)
        .zip(c)
        .map(|((&a, &b), &c)| convert([a, b, c]))
        .collect();

    let (width, height) = expected;

    #[allow(clippy::expect_used)]
    {
        // all three planes are width * height, so there is one pixel per sample
        Ok(RgbRaster::new(width, height, pixels).expect("one pixel per sample"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::tests::random_raster;

    #[test]
    fn rgb_round_trip_is_lossless() {
        let image = random_raster(6, 4, 1);
        let planes = extract_planes(&image, ColorMode::Rgb);
        assert_eq!(planes[1].get(5, 3), image.pixel(5, 3).map(|c| c.green));
        assert_eq!(recombine_planes(&planes, ColorMode::Rgb).unwrap(), image);
    }

    #[test]
    fn yuv_truncates() {
        assert_eq!(rgb_to_yuv(Srgb::new(0, 0, 0)), [0, 128, 128]);
        // gray: y evaluates to just over 100 and u, v to just over 128
        assert_eq!(rgb_to_yuv(Srgb::new(100, 100, 100)), [100, 128, 128]);
        // 0.299 * 10 + 0.587 * 20 + 0.114 * 30 = 18.15
        assert_eq!(rgb_to_yuv(Srgb::new(10, 20, 30))[0], 18);
    }

    #[test]
    fn yuv_v_wraps_out_of_range() {
        // v = 0.615 * 255 + 128 = 284.825 -> 284 -> 28
        assert_eq!(rgb_to_yuv(Srgb::new(255, 0, 0))[2], 28);
        // v = -0.515 * 255 - 0.1 * 255 + 128 = -28.825 -> -28 -> 228
        assert_eq!(rgb_to_yuv(Srgb::new(0, 255, 255))[2], 228);
    }

    #[test]
    fn yuv_to_rgb_truncates_terms_and_clamps() {
        assert_eq!(yuv_to_rgb([0, 128, 128]), Srgb::new(0, 0, 0));
        assert_eq!(yuv_to_rgb([200, 128, 128]), Srgb::new(200, 200, 200));
        // v' = 10: r = 100 + trunc(11.4), g = 100 - 0 - trunc(5.81), b = 100
        assert_eq!(yuv_to_rgb([100, 128, 138]), Srgb::new(111, 95, 100));
        // u' = -10: g = 100 - trunc(-3.95), b = 100 + trunc(-20.32)
        assert_eq!(yuv_to_rgb([100, 118, 128]), Srgb::new(100, 103, 80));
        assert_eq!(yuv_to_rgb([250, 255, 255]), Srgb::new(255, 127, 255));
        assert_eq!(yuv_to_rgb([5, 0, 0]), Srgb::new(0, 129, 0));
    }

    #[test]
    fn yuv_round_trip_is_close() {
        let image = random_raster(8, 8, 2);
        let planes = extract_planes(&image, ColorMode::Yuv);
        let round_trip = recombine_planes(&planes, ColorMode::Yuv).unwrap();
        for (a, b) in image.pixels().iter().zip(round_trip.pixels()) {
            // wrapped V samples cannot be recovered, skip strongly red or cyan pixels
            let v = 0.615 * f64::from(a.red) - 0.515 * f64::from(a.green) - 0.1 * f64::from(a.blue);
            if v.abs() < 120.0 {
                assert!(a.red.abs_diff(b.red) <= 5, "{a:?} {b:?}");
                assert!(a.green.abs_diff(b.green) <= 5, "{a:?} {b:?}");
                assert!(a.blue.abs_diff(b.blue) <= 5, "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn mismatched_planes() {
        let planes = [Plane::filled(4, 4, 0), Plane::filled(4, 4, 0), Plane::filled(2, 4, 0)];
        assert_eq!(
            recombine_planes(&planes, ColorMode::Yuv),
            Err(VqError::DimensionMismatch { expected: (4, 4), actual: (2, 4) })
        );
    }

    #[test]
    fn empty_image() {
        let planes = extract_planes(&RgbRaster::default(), ColorMode::Yuv);
        assert!(planes.iter().all(Plane::is_empty));
    }
}
