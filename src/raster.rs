//! Owned RGB images.

use palette::Srgb;
#[cfg(feature = "image")]
use {
    image::RgbImage,
    palette::cast::{ComponentsAs, IntoComponents},
};

/// A decoded RGB image stored as a flat, row-major list of pixels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RgbRaster {
    /// The number of columns.
    width: u32,
    /// The number of rows.
    height: u32,
    /// Row-major pixels, `width * height` in length.
    pixels: Vec<Srgb<u8>>,
}

impl RgbRaster {
    /// Creates a new [`RgbRaster`].
    /// Returns `None` if the length of `pixels` is not equal to `width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<Srgb<u8>>) -> Option<Self> {
        if pixels.len() == width as usize * height as usize {
            Some(Self { width, height, pixels })
        } else {
            None
        }
    }

    /// Creates an [`RgbRaster`] by calling `f(x, y)` for each pixel in row-major order.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Srgb<u8>) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            pixels.extend((0..width).map(|x| f(x, y)));
        }
        Self { width, height, pixels }
    }

    /// The number of columns in the image.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The number of rows in the image.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the pixel at `(x, y)`, or `None` if it is out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Returns the row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[Srgb<u8>] {
        &self.pixels
    }
}

#[cfg(feature = "image")]
impl RgbRaster {
    /// Copies the top-left region of `image` whose sides are the largest multiples of `multiple`.
    ///
    /// Returns `None` if either cropped side would be `0`.
    #[must_use]
    pub fn from_rgbimage_cropped(image: &RgbImage, multiple: u32) -> Option<Self> {
        let multiple = multiple.max(1);
        let width = image.width() / multiple * multiple;
        let height = image.height() / multiple * multiple;
        if width == 0 || height == 0 {
            return None;
        }

        let pixels: &[Srgb<u8>] = image.as_raw().as_slice().components_as();
        let stride = image.width() as usize;
        let mut cropped = Vec::with_capacity(width as usize * height as usize);
        for row in pixels.chunks_exact(stride).take(height as usize) {
            cropped.extend_from_slice(&row[..width as usize]);
        }

        Some(Self { width, height, pixels: cropped })
    }
}

#[cfg(feature = "image")]
impl From<&RgbImage> for RgbRaster {
    fn from(image: &RgbImage) -> Self {
        let pixels: &[Srgb<u8>] = image.as_raw().as_slice().components_as();
        Self {
            width: image.width(),
            height: image.height(),
            pixels: pixels.to_vec(),
        }
    }
}

#[cfg(feature = "image")]
impl From<RgbRaster> for RgbImage {
    fn from(raster: RgbRaster) -> Self {
        let RgbRaster { width, height, pixels } = raster;
        let buf: Vec<u8> = pixels.into_components();

        #[allow(clippy::expect_used)]
        {
            // pixels.len() is equal to width * height,
            // so buf is large enough by nature of its construction
            RgbImage::from_vec(width, height, buf).expect("large enough buffer")
        }
    }
}
