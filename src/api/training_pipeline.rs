//! Contains the [`TrainingPipeline`] builder struct for the high level API.

use crate::{
    extract_planes, kmeans, subsample, ColorMode, Codebooks, KmeansOptions, RgbRaster, TrainingSet,
};
use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;
use std::array;

/// A builder struct to specify options for training per-channel codebooks from a corpus of images.
///
/// # Examples
/// ```
/// # use blockvq::{ColorMode, KmeansOptions, RgbRaster, TrainingPipeline};
/// # use palette::Srgb;
/// let corpus = vec![
///     RgbRaster::from_fn(8, 8, |x, _| Srgb::new((x * 32) as u8, 0, 255)),
///     RgbRaster::from_fn(8, 8, |_, y| Srgb::new(0, (y * 32) as u8, 64)),
/// ];
///
/// let codebooks = TrainingPipeline::new(ColorMode::Rgb)
///     .kmeans_options(KmeansOptions::new().codebook_size(32.into()).max_iterations(10))
///     .train(&corpus);
///
/// assert_eq!(codebooks.channels()[0].len(), 32);
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrainingPipeline {
    /// The color pipeline to train codebooks for.
    mode: ColorMode,
    /// Parameters for k-means, shared by all three channels.
    options: KmeansOptions,
}

impl TrainingPipeline {
    /// Creates a new [`TrainingPipeline`] with default [`KmeansOptions`].
    pub const fn new(mode: ColorMode) -> Self {
        Self { mode, options: KmeansOptions::new() }
    }

    /// Sets the color mode.
    pub fn mode(&mut self, mode: ColorMode) -> &mut Self {
        self.mode = mode;
        self
    }

    /// Sets the k-means options used for every channel.
    ///
    /// Each channel seeds its own random number generator with `seed ^ channel_index`.
    pub fn kmeans_options(&mut self, options: KmeansOptions) -> &mut Self {
        self.options = options;
        self
    }

    /// Collects the training blocks of every image, one [`TrainingSet`] per channel.
    ///
    /// In [`ColorMode::Yuv`], the chroma planes are subsampled before their blocks are collected.
    #[must_use]
    pub fn training_sets<'a>(
        &self,
        images: impl IntoIterator<Item = &'a RgbRaster>,
    ) -> [TrainingSet; 3] {
        let mode = self.mode;
        let mut sets = [(); 3].map(|()| TrainingSet::new());
        let mut count = 0usize;

        for image in images {
            let planes = extract_planes(image, mode);
            for (i, (set, plane)) in sets.iter_mut().zip(&planes).enumerate() {
                if mode.is_subsampled(i) {
                    set.extend_from_plane(&subsample(plane));
                } else {
                    set.extend_from_plane(plane);
                }
            }
            count += 1;
        }

        tracing::debug!(
            %mode,
            images = count,
            blocks = ?sets.each_ref().map(TrainingSet::len),
            "collected training blocks"
        );

        sets
    }

    /// Runs the pipeline, training one codebook per channel over all `images`.
    ///
    /// Channels without any training blocks get an empty codebook.
    pub fn train<'a>(&self, images: impl IntoIterator<Item = &'a RgbRaster>) -> Codebooks {
        let sets = self.training_sets(images);
        self.train_sets(&sets)
    }

    /// Trains one codebook per channel from already collected training sets.
    pub fn train_sets(&self, sets: &[TrainingSet; 3]) -> Codebooks {
        let names = self.mode.channel_names();
        let KmeansOptions { codebook_size, max_iterations, seed } = self.options;

        let channels = array::from_fn(|i| {
            let _span = tracing::debug_span!("channel", name = names[i]).entered();
            let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed ^ i as u64);
            kmeans::train(&sets[i], codebook_size, max_iterations, rng)
        });

        Codebooks::new(self.mode, channels)
    }
}
