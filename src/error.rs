//! Error type for quantization and reconstruction.

use crate::ColorMode;
use thiserror::Error;

/// Errors reported by the encoding, decoding, and reconstruction stages.
///
/// Training never fails: an empty training set yields an empty [`Codebook`](crate::Codebook),
/// and the problem surfaces as [`VqError::EmptyCodebook`] once that codebook is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VqError {
    /// Quantization was attempted with a codebook that has no codewords.
    #[error("cannot quantize with an empty codebook")]
    EmptyCodebook,

    /// A quantized plane refers to a codeword that does not exist.
    #[error("codeword index {index} is out of range for a codebook of {codebook_len} codewords")]
    InvalidIndex {
        /// The offending index.
        index: u8,
        /// The number of codewords in the codebook.
        codebook_len: usize,
    },

    /// Planes that must share dimensions do not.
    #[error("plane dimensions {actual:?} do not match the expected {expected:?}")]
    DimensionMismatch {
        /// The expected `(width, height)`.
        expected: (u32, u32),
        /// The `(width, height)` that was found.
        actual: (u32, u32),
    },

    /// The image dimensions are not a multiple of the block alignment required by the color mode.
    #[error("image dimensions {width}x{height} are not a multiple of {multiple}")]
    UnalignedDimensions {
        /// The image width.
        width: u32,
        /// The image height.
        height: u32,
        /// The required alignment.
        multiple: u32,
    },

    /// A compressed image was produced for a different color mode than the codebooks.
    #[error("compressed image uses {actual} but the codebooks were trained for {expected}")]
    ModeMismatch {
        /// The color mode of the codebooks.
        expected: ColorMode,
        /// The color mode of the compressed image.
        actual: ColorMode,
    },
}
