//! Encoding planes into codeword indices and decoding them back.

use crate::{nearest::NearestCodeword, Block, Codebook, Plane, QuantizedPlane, VqError};

/// Replaces each non-overlapping 2×2 region of `plane` with the index of its nearest codeword.
///
/// The output has half the width and height of `plane`.
/// Ties between equally close codewords go to the lowest index.
/// A trailing odd row or column is not encoded.
///
/// # Errors
/// Returns [`VqError::EmptyCodebook`] if `codebook` has no codewords.
pub fn encode(plane: &Plane, codebook: &Codebook) -> Result<QuantizedPlane, VqError> {
    if codebook.is_empty() {
        return Err(VqError::EmptyCodebook);
    }

    let search = NearestCodeword::new(codebook.codewords());
    debug_assert!(!search.is_empty());

    let (width, height) = (plane.width() / 2, plane.height() / 2);
    let indices = crate::blocks(plane).map(|block| search.nearest(block)).collect();

    #[allow(clippy::expect_used)]
    {
        // blocks yields exactly (plane.width() / 2) * (plane.height() / 2) blocks
        Ok(QuantizedPlane::new(width, height, indices).expect("one index per block"))
    }
}

/// Reconstructs a plane by writing each index's codeword into its 2×2 region.
///
/// The output has twice the width and height of `quantized`.
///
/// # Errors
/// Returns [`VqError::InvalidIndex`] if any index is not less than `codebook.len()`.
/// This includes every index when `codebook` is empty.
pub fn decode(quantized: &QuantizedPlane, codebook: &Codebook) -> Result<Plane, VqError> {
    let (cols, rows) = quantized.dimensions();
    let codewords = quantized
        .indices()
        .iter()
        .map(|&index| {
            codebook.get(index).ok_or(VqError::InvalidIndex {
                index,
                codebook_len: codebook.len(),
            })
        })
        .collect::<Result<Vec<Block>, _>>()?;

    let (width, height) = (cols * 2, rows * 2);
    let mut samples = Vec::with_capacity(width as usize * height as usize);
    for row in codewords.chunks_exact(cols.max(1) as usize) {
        // top half of each block, then bottom half
        for half in [0, 2] {
            for codeword in row {
                samples.extend_from_slice(&codeword.0[half..(half + 2)]);
            }
        }
    }

    #[allow(clippy::expect_used)]
    {
        // every index wrote a 2x2 codeword in place
        Ok(Plane::new(width, height, samples).expect("four samples per index"))
    }
}
