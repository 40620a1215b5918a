//! Nearest codeword search shared by training and encoding.

use crate::{Block, Codeword};
use std::array;
use wide::{f32x8, CmpLt};

/// Codewords laid out 8 at a time for SIMD distance computation.
///
/// Every distance between two blocks is an integer no larger than `4 * 255^2`,
/// which `f32` represents exactly, so the search agrees with [`Block::squared_distance`].
#[derive(Debug, Clone)]
pub(crate) struct NearestCodeword {
    /// Component `c` of codeword `chunk * 8 + lane` lives at `chunks[chunk][c].as_array_ref()[lane]`.
    /// Lanes past the last codeword are filled with infinity so that they never win.
    chunks: Vec<[f32x8; 4]>,
}

impl NearestCodeword {
    pub(crate) fn new(codewords: &[Codeword]) -> Self {
        debug_assert!(codewords.len() <= crate::MAX_K);
        let chunks = codewords
            .chunks(8)
            .map(|chunk| {
                array::from_fn(|c| {
                    let mut lanes = [f32::INFINITY; 8];
                    for (lane, codeword) in lanes.iter_mut().zip(chunk) {
                        *lane = f32::from(codeword.0[c]);
                    }
                    f32x8::new(lanes)
                })
            })
            .collect();

        Self { chunks }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Returns the index of the codeword closest to `block`.
    ///
    /// A codeword only replaces the current best if it is strictly closer,
    /// so ties go to the lowest index. There must be at least one codeword.
    #[inline]
    pub(crate) fn nearest(&self, block: Block) -> u8 {
        debug_assert!(!self.is_empty(), "nearest codeword search over an empty codebook");
        let query = block.0.map(|c| f32x8::splat(f32::from(c)));

        let mut cur_chunk = f32x8::ZERO;
        let mut min_chunk = f32x8::ZERO;
        let mut min_distance = f32x8::splat(f32::INFINITY);

        for chunk in &self.chunks {
            let distance = query
                .iter()
                .zip(chunk)
                .map(|(&q, &c)| {
                    let diff = q - c;
                    diff * diff
                })
                .fold(f32x8::ZERO, |a, b| a + b);

            let mask = distance.cmp_lt(min_distance);
            min_chunk = mask.blend(cur_chunk, min_chunk);
            min_distance = mask.blend(distance, min_distance);
            cur_chunk += f32x8::ONE;
        }

        // Each lane holds its earliest minimum, now pick the lowest overall index among equal lanes.
        let mut best = (f32::INFINITY, usize::MAX);
        for (lane, (&distance, &chunk)) in min_distance
            .as_array_ref()
            .iter()
            .zip(min_chunk.as_array_ref())
            .enumerate()
        {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let index = chunk as usize * 8 + lane;
            if (distance, index) < best {
                best = (distance, index);
            }
        }

        #[allow(clippy::expect_used)]
        {
            // there are at most MAX_K codewords and at least one finite distance,
            // so the best index is a real codeword below 256
            u8::try_from(best.1).expect("codeword index fits in a byte")
        }
    }
}
