//! Owned single channel sample grids.

/// Index of `(x, y)` in a row-major buffer of the given width.
#[inline]
const fn offset(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// A rectangular grid of single byte samples for one color channel.
///
/// Samples are stored row-major in a flat buffer. A [`Plane`] is never mutated by a pipeline stage;
/// each stage produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Plane {
    /// The number of columns.
    width: u32,
    /// The number of rows.
    height: u32,
    /// Row-major samples, `width * height` in length.
    samples: Vec<u8>,
}

impl Plane {
    /// Creates a new [`Plane`] from row-major samples.
    /// Returns `None` if the length of `samples` is not equal to `width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Option<Self> {
        if samples.len() == width as usize * height as usize {
            Some(Self { width, height, samples })
        } else {
            None
        }
    }

    /// Creates a [`Plane`] where every sample is `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            samples: vec![value; width as usize * height as usize],
        }
    }

    /// Creates a [`Plane`] by calling `f(x, y)` for each sample in row-major order.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            samples.extend((0..width).map(|x| f(x, y)));
        }
        Self { width, height, samples }
    }

    /// The number of columns in the plane.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The number of rows in the plane.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the sample at `(x, y)`, or `None` if it is out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.samples[offset(self.width, x, y)])
        } else {
            None
        }
    }

    /// Returns the row-major samples.
    #[must_use]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Returns the row-major samples, consuming the plane.
    #[must_use]
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Returns the samples of row `y`.
    ///
    /// # Panics
    /// Panics if `y` is out of bounds.
    #[must_use]
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds for height {}", self.height);
        let start = offset(self.width, 0, y);
        &self.samples[start..(start + self.width as usize)]
    }

    /// Returns `true` if the plane has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// A grid of codebook indices, one per non-overlapping 2×2 region of a source [`Plane`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct QuantizedPlane {
    /// The number of block columns.
    width: u32,
    /// The number of block rows.
    height: u32,
    /// Row-major codeword indices.
    indices: Vec<u8>,
}

impl QuantizedPlane {
    /// Creates a new [`QuantizedPlane`] from row-major codeword indices.
    /// Returns `None` if the length of `indices` is not equal to `width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> Option<Self> {
        if indices.len() == width as usize * height as usize {
            Some(Self { width, height, indices })
        } else {
            None
        }
    }

    /// The number of block columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The number of block rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)` in blocks.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the index for block `(x, y)`, or `None` if it is out of bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.indices[offset(self.width, x, y)])
        } else {
            None
        }
    }

    /// Returns the row-major codeword indices.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(Plane::new(2, 2, vec![0; 3]).is_none());
        assert!(QuantizedPlane::new(3, 1, vec![0; 2]).is_none());
        assert!(Plane::new(0, 5, Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn accessors_are_bounds_checked() {
        let plane = Plane::from_fn(3, 2, |x, y| u8::try_from(y * 3 + x).unwrap());
        assert_eq!(plane.get(2, 1), Some(5));
        assert_eq!(plane.get(3, 0), None);
        assert_eq!(plane.get(0, 2), None);
        assert_eq!(plane.row(1), &[3, 4, 5]);
        assert_eq!(plane.samples(), &[0, 1, 2, 3, 4, 5]);
    }
}
