//! Contains the [`Codebooks`] context used to compress, reconstruct, and evaluate images.

use crate::{
    compression_ratio, decode, encode, extract_planes, mse, recombine_planes, subsample, upsample,
    Codebook, ColorMode, QuantizedPlane, RgbRaster, VqError,
};

/// The trained codebooks for the three channels of a [`ColorMode`].
///
/// This is created once by [`TrainingPipeline::train`](crate::TrainingPipeline::train)
/// and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebooks {
    /// The color mode the codebooks were trained for.
    mode: ColorMode,
    /// One codebook per channel, in plane order.
    channels: [Codebook; 3],
}

/// An image encoded as codeword indices, one [`QuantizedPlane`] per channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedImage {
    /// The color mode used to split the image into planes.
    mode: ColorMode,
    /// The original image width.
    width: u32,
    /// The original image height.
    height: u32,
    /// The encoded planes. Chroma planes are subsampled in [`ColorMode::Yuv`].
    channels: [QuantizedPlane; 3],
}

impl CompressedImage {
    /// The color mode of the compressed image.
    #[must_use]
    pub const fn mode(&self) -> ColorMode {
        self.mode
    }

    /// The `(width, height)` of the original image.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The encoded planes in channel order.
    #[must_use]
    pub const fn channels(&self) -> &[QuantizedPlane; 3] {
        &self.channels
    }

    /// The compression ratio achieved for this image.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        compression_ratio(self.width, self.height, self.mode)
    }
}

/// The result of compressing and reconstructing a single image.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The image after a compression round trip.
    pub reconstructed: RgbRaster,
    /// The mean squared error between the original and reconstructed images.
    pub mse: f64,
    /// The compression ratio, as in "X:1".
    pub compression_ratio: f64,
}

/// Evaluations over a test corpus.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorpusReport {
    /// Evaluations in input order.
    pub evaluations: Vec<Evaluation>,
}

impl CorpusReport {
    /// The number of evaluated images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    /// Returns `true` if no images were evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    /// Average MSE over all images, or `None` for an empty corpus.
    #[must_use]
    pub fn mean_mse(&self) -> Option<f64> {
        self.mean(|e| e.mse)
    }

    /// Average compression ratio over all images, or `None` for an empty corpus.
    #[must_use]
    pub fn mean_compression_ratio(&self) -> Option<f64> {
        self.mean(|e| e.compression_ratio)
    }

    fn mean(&self, f: impl Fn(&Evaluation) -> f64) -> Option<f64> {
        if self.evaluations.is_empty() {
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            let len = self.evaluations.len() as f64;
            Some(self.evaluations.iter().map(f).sum::<f64>() / len)
        }
    }
}

impl Codebooks {
    /// Creates a [`Codebooks`] from already trained codebooks.
    #[must_use]
    pub const fn new(mode: ColorMode, channels: [Codebook; 3]) -> Self {
        Self { mode, channels }
    }

    /// The color mode the codebooks were trained for.
    #[must_use]
    pub const fn mode(&self) -> ColorMode {
        self.mode
    }

    /// The codebooks in channel order.
    #[must_use]
    pub const fn channels(&self) -> &[Codebook; 3] {
        &self.channels
    }

    /// Encodes an image into one grid of codeword indices per channel.
    ///
    /// # Errors
    /// Returns [`VqError::UnalignedDimensions`] if the image dimensions are not a multiple of
    /// [`ColorMode::alignment`], or [`VqError::EmptyCodebook`] if a channel has no codewords.
    pub fn compress(&self, image: &RgbRaster) -> Result<CompressedImage, VqError> {
        let Self { mode, channels } = self;
        let (width, height) = image.dimensions();
        let multiple = mode.alignment();
        if width % multiple != 0 || height % multiple != 0 {
            return Err(VqError::UnalignedDimensions { width, height, multiple });
        }

        let [a, b, c] = extract_planes(image, *mode);
        let [a, b, c] = [(0, a), (1, b), (2, c)].map(|(i, plane)| {
            let plane = if mode.is_subsampled(i) { subsample(&plane) } else { plane };
            encode(&plane, &channels[i])
        });

        Ok(CompressedImage {
            mode: *mode,
            width,
            height,
            channels: [a?, b?, c?],
        })
    }

    /// Reconstructs an image from its codeword indices.
    ///
    /// # Errors
    /// Returns [`VqError::ModeMismatch`] if `compressed` was produced for the other color mode,
    /// [`VqError::InvalidIndex`] if an index has no codeword,
    /// or [`VqError::DimensionMismatch`] if the channels do not describe the same image size.
    pub fn decompress(&self, compressed: &CompressedImage) -> Result<RgbRaster, VqError> {
        let Self { mode, channels } = self;
        if compressed.mode != *mode {
            return Err(VqError::ModeMismatch { expected: *mode, actual: compressed.mode });
        }

        let [a, b, c] = [0, 1, 2].map(|i| {
            let plane = decode(&compressed.channels[i], &channels[i])?;
            Ok::<_, VqError>(if mode.is_subsampled(i) { upsample(&plane) } else { plane })
        });
        let planes = [a?, b?, c?];

        let image = recombine_planes(&planes, *mode)?;
        if image.dimensions() == compressed.dimensions() {
            Ok(image)
        } else {
            Err(VqError::DimensionMismatch {
                expected: compressed.dimensions(),
                actual: image.dimensions(),
            })
        }
    }

    /// Compresses and then reconstructs an image.
    ///
    /// # Errors
    /// See [`Codebooks::compress`] and [`Codebooks::decompress`].
    pub fn reconstruct(&self, image: &RgbRaster) -> Result<RgbRaster, VqError> {
        self.decompress(&self.compress(image)?)
    }

    /// Reconstructs an image and measures the result.
    ///
    /// # Errors
    /// See [`Codebooks::compress`] and [`Codebooks::decompress`].
    pub fn evaluate(&self, image: &RgbRaster) -> Result<Evaluation, VqError> {
        let compressed = self.compress(image)?;
        let reconstructed = self.decompress(&compressed)?;
        let mse = mse(image, &reconstructed);
        let compression_ratio = compressed.compression_ratio();

        tracing::debug!(
            mode = %self.mode,
            width = image.width(),
            height = image.height(),
            mse,
            compression_ratio,
            "evaluated image"
        );

        Ok(Evaluation { reconstructed, mse, compression_ratio })
    }

    /// Evaluates every image of a test corpus in order.
    ///
    /// # Errors
    /// Stops at and returns the first error encountered (see [`Codebooks::evaluate`]).
    pub fn evaluate_all<'a>(
        &self,
        images: impl IntoIterator<Item = &'a RgbRaster>,
    ) -> Result<CorpusReport, VqError> {
        let evaluations = images
            .into_iter()
            .map(|image| self.evaluate(image))
            .collect::<Result<_, _>>()?;

        Ok(CorpusReport { evaluations })
    }
}
