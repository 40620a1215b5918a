//! A library for lossy image compression by vector quantization (VQ) of 2×2 pixel blocks.
//!
//! `blockvq` learns a small codebook of representative 2×2 blocks for each color channel
//! from a training corpus using k-means (Lloyd's algorithm). Images are then encoded as a grid of
//! codebook indices (one byte per block per channel) and reconstructed by codeword lookup.
//!
//! Two color pipelines are supported through [`ColorMode`]:
//! - [`ColorMode::Rgb`]: the red, green, and blue planes are quantized directly.
//! - [`ColorMode::Yuv`]: the image is converted to YUV and the chroma planes are subsampled
//!   by a factor of 2 in each axis before quantization, trading some fidelity for a higher
//!   compression ratio.
//!
//! # Features
//! To reduce dependencies and compile times, `blockvq` has several `cargo` features
//! that can be turned off or on:
//! - `pipelines`: exposes [`TrainingPipeline`] and [`Codebooks`] as the high-level API.
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! ```
//! # use blockvq::{ColorMode, KmeansOptions, RgbRaster, TrainingPipeline, VqError};
//! # use palette::Srgb;
//! # fn main() -> Result<(), VqError> {
//! let image = RgbRaster::from_fn(8, 8, |x, y| Srgb::new((x * 30) as u8, (y * 30) as u8, 128));
//!
//! let codebooks = TrainingPipeline::new(ColorMode::Yuv)
//!     .kmeans_options(KmeansOptions::new().codebook_size(16.into()).seed(42))
//!     .train([&image]);
//!
//! let evaluation = codebooks.evaluate(&image)?;
//! assert_eq!(evaluation.compression_ratio, 8.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Building Blocks
//! The individual stages are also exposed for finer control:
//! [`extract_planes`] and [`recombine_planes`] for color conversion,
//! [`TrainingSet`] for block sampling, [`kmeans::train`] for codebook training,
//! [`encode`] and [`decode`] for quantization, [`subsample`] and [`upsample`] for chroma planes,
//! and [`mse`] and [`compression_ratio`] for evaluation.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod block;
mod chroma;
mod colorspace;
mod error;
mod metrics;
mod nearest;
mod plane;
mod quantize;
mod raster;
mod types;

#[cfg(feature = "pipelines")]
mod api;

pub mod kmeans;

pub use block::*;
pub use chroma::{subsample, upsample};
pub use colorspace::*;
pub use error::VqError;
pub use kmeans::{Codebook, KmeansOptions};
pub use metrics::*;
pub use plane::*;
pub use quantize::{decode, encode};
pub use raster::RgbRaster;
pub use types::*;

#[cfg(feature = "pipelines")]
pub use api::*;

/// The maximum supported number of codewords in a codebook is `256`,
/// since each quantized block is stored as a single byte index.
pub const MAX_CODEWORDS: u16 = u8::MAX as u16 + 1;

/// `MAX_CODEWORDS` as a `usize` for array and `Vec` lengths.
pub(crate) const MAX_K: usize = MAX_CODEWORDS as usize;

/// The side length of a quantization block in pixels.
pub const BLOCK_SIDE: u32 = 2;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{Plane, RgbRaster};
    use palette::Srgb;
    use rand::{Rng, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    /// A deterministic plane of random samples.
    pub fn random_plane(width: u32, height: u32, seed: u64) -> Plane {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
        Plane::from_fn(width, height, |_, _| rng.gen())
    }

    /// A deterministic image of random pixels.
    pub fn random_raster(width: u32, height: u32, seed: u64) -> RgbRaster {
        let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
        RgbRaster::from_fn(width, height, |_, _| Srgb::new(rng.gen(), rng.gen(), rng.gen()))
    }

    /// A smooth gradient image, which quantizes well with few codewords.
    pub fn gradient_raster(width: u32, height: u32) -> RgbRaster {
        #[allow(clippy::cast_possible_truncation)]
        RgbRaster::from_fn(width, height, |x, y| {
            Srgb::new(
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x + y) * 127 / (width + height).max(1)) as u8,
            )
        })
    }

    /// A two color checkerboard with single pixel squares.
    pub fn checkerboard(width: u32, height: u32, a: Srgb<u8>, b: Srgb<u8>) -> RgbRaster {
        RgbRaster::from_fn(width, height, |x, y| if (x + y) % 2 == 0 { a } else { b })
    }
}
