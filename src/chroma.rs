//! Chroma plane subsampling and upsampling.

use crate::Plane;

/// Halves a plane in each axis by keeping only the top-left sample of every 2×2 region.
///
/// The other three samples are discarded rather than averaged.
/// A trailing odd row or column is dropped.
#[must_use]
pub fn subsample(plane: &Plane) -> Plane {
    let (width, height) = plane.dimensions();
    Plane::from_fn(width / 2, height / 2, |x, y| plane.row(y * 2)[x as usize * 2])
}

/// Doubles a plane in each axis by copying every sample into a 2×2 region.
#[must_use]
pub fn upsample(plane: &Plane) -> Plane {
    let (width, height) = plane.dimensions();
    Plane::from_fn(width * 2, height * 2, |x, y| plane.row(y / 2)[(x / 2) as usize])
}
