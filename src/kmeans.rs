//! Codebook training using Lloyd's k-means algorithm over 2×2 blocks.
//!
//! Centroids are initialized by drawing `K` blocks uniformly at random (with replacement)
//! from the training set. Each iteration then assigns every block to its nearest centroid
//! and moves each centroid to the truncated integer mean of its members.
//! Training stops once an iteration reassigns no blocks or the iteration cap is reached.
//!
//! Randomness is only used for initialization and is always supplied by the caller
//! (or derived from [`KmeansOptions::seed`]), so training is reproducible.
//!
//! # Examples
//! ```
//! # use blockvq::{kmeans, Plane, TrainingSet, CodebookSize};
//! # use rand::SeedableRng;
//! # use rand_xoshiro::Xoroshiro128PlusPlus;
//! let plane = Plane::from_fn(16, 16, |x, y| ((x / 4 + y / 4) * 40) as u8);
//! let training = TrainingSet::from_plane(&plane);
//!
//! let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(0);
//! let codebook = kmeans::train(&training, CodebookSize::from(8), 20, rng);
//! assert_eq!(codebook.len(), 8);
//! ```

use crate::{
    nearest::NearestCodeword, AboveMaxLen, Block, Codeword, CodebookSize, TrainingSet,
    MAX_CODEWORDS, MAX_K,
};
use rand::{prelude::Distribution, Rng, SeedableRng};
use rand_distr::Uniform;
use rand_xoshiro::Xoroshiro128PlusPlus;

/// An ordered list of at most [`MAX_CODEWORDS`] codewords.
///
/// The position of a codeword is its quantization symbol.
/// A codebook is created once by training and is read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Codebook(Vec<Codeword>);

impl Codebook {
    /// Creates a new, empty [`Codebook`].
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Creates a new [`Codebook`] by truncating the input to a max length of [`MAX_CODEWORDS`].
    #[must_use]
    pub fn from_truncated(mut codewords: Vec<Codeword>) -> Self {
        codewords.truncate(MAX_K);
        Self(codewords)
    }

    /// Returns the codewords as a `Vec`.
    #[must_use]
    pub fn into_inner(self) -> Vec<Codeword> {
        self.0
    }

    /// Returns the codewords in index order.
    #[must_use]
    pub fn codewords(&self) -> &[Codeword] {
        &self.0
    }

    /// Returns the codeword with the given index, if it exists.
    #[must_use]
    pub fn get(&self, index: u8) -> Option<Codeword> {
        self.0.get(usize::from(index)).copied()
    }

    /// The number of codewords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the codebook has no codewords.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Codebook> for Vec<Codeword> {
    fn from(value: Codebook) -> Self {
        value.into_inner()
    }
}

impl TryFrom<Vec<Codeword>> for Codebook {
    type Error = AboveMaxLen<u16>;

    fn try_from(codewords: Vec<Codeword>) -> Result<Self, Self::Error> {
        if codewords.len() <= MAX_K {
            Ok(Self(codewords))
        } else {
            Err(AboveMaxLen(MAX_CODEWORDS))
        }
    }
}

/// A builder struct to specify the parameters for codebook training.
///
/// # Examples
/// ```
/// # use blockvq::KmeansOptions;
/// let options = KmeansOptions::new()
///     .codebook_size(64.into())
///     .max_iterations(10)
///     .seed(42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmeansOptions {
    /// The target number of codewords, `K`.
    pub(crate) codebook_size: CodebookSize,
    /// The maximum number of assignment/update iterations.
    pub(crate) max_iterations: u32,
    /// The seed value for the random number generator.
    pub(crate) seed: u64,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// The default iteration cap.
    pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            codebook_size: CodebookSize::MAX,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            seed: 0,
        }
    }

    /// Sets the target number of codewords per channel.
    ///
    /// Fewer codewords are produced if the training set has fewer blocks.
    ///
    /// The default codebook size is [`CodebookSize::MAX`].
    #[must_use]
    pub const fn codebook_size(mut self, codebook_size: CodebookSize) -> Self {
        self.codebook_size = codebook_size;
        self
    }

    /// Sets the maximum number of iterations to run.
    ///
    /// The default is [`KmeansOptions::DEFAULT_MAX_ITERATIONS`].
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Gets the target number of codewords.
    #[must_use]
    pub const fn get_codebook_size(&self) -> CodebookSize {
        self.codebook_size
    }

    /// Gets the iteration cap.
    #[must_use]
    pub const fn get_max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Gets the seed.
    #[must_use]
    pub const fn get_seed(&self) -> u64 {
        self.seed
    }

    /// Trains a codebook with these options, seeding a fresh random number generator from
    /// [`KmeansOptions::seed`].
    #[must_use]
    pub fn train(&self, training: &TrainingSet) -> Codebook {
        let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(self.seed);
        train(training, self.codebook_size, self.max_iterations, rng)
    }
}

struct State<'a> {
    blocks: &'a [Block],
    centroids: Vec<Codeword>,
    search: NearestCodeword,
    assignments: Vec<u8>,
}

impl<'a> State<'a> {
    fn new(blocks: &'a [Block], centroids: Vec<Codeword>) -> Self {
        Self {
            blocks,
            search: NearestCodeword::new(&centroids),
            centroids,
            assignments: vec![0; blocks.len()],
        }
    }

    /// Assigns each block to its nearest centroid, returning how many assignments changed.
    fn assign(&mut self) -> usize {
        let Self { blocks, search, assignments, .. } = self;
        let mut changed = 0;
        for (assignment, &block) in assignments.iter_mut().zip(blocks.iter()) {
            let nearest = search.nearest(block);
            if nearest != *assignment {
                *assignment = nearest;
                changed += 1;
            }
        }
        changed
    }

    /// Moves each centroid to the mean of its members, returning the number of empty clusters.
    ///
    /// Means are truncated toward zero. An empty cluster is reset to the zero codeword.
    fn update(&mut self) -> usize {
        let k = self.centroids.len();
        let mut sums = vec![[0u64; 4]; k];
        let mut counts = vec![0u64; k];

        for (&i, block) in self.assignments.iter().zip(self.blocks) {
            let i = usize::from(i);
            for (sum, c) in sums[i].iter_mut().zip(block.0) {
                *sum += u64::from(c);
            }
            counts[i] += 1;
        }

        let mut empty = 0;
        for ((centroid, sum), count) in self.centroids.iter_mut().zip(&sums).zip(counts) {
            *centroid = if count == 0 {
                empty += 1;
                Codeword::ZERO
            } else {
                Block(sum.map(|s| u8::try_from(s / count).unwrap_or(u8::MAX)))
            };
        }

        self.search = NearestCodeword::new(&self.centroids);
        empty
    }

    /// Runs up to `max_iterations` iterations, returning the number run and whether it converged.
    fn run(&mut self, max_iterations: u32) -> (u32, bool) {
        for iteration in 0..max_iterations {
            let changed = self.assign();
            // there is no previous assignment to compare against on the first pass
            if iteration > 0 && changed == 0 {
                return (iteration, true);
            }

            let empty = self.update();
            tracing::trace!(iteration, changed, empty, "k-means iteration");
        }
        (max_iterations, false)
    }
}

/// Trains a codebook of `min(k, training.len())` codewords.
///
/// Returns an empty [`Codebook`] if `training` is empty or `k` is `0`.
/// Initial centroids are drawn uniformly with replacement from `training` using `rng`,
/// so duplicates are possible. Codeword `i` of the output is always the centroid that
/// started as draw `i`.
#[must_use]
pub fn train<R>(
    training: &TrainingSet,
    k: CodebookSize,
    max_iterations: u32,
    rng: &mut R,
) -> Codebook
where
    R: Rng + ?Sized,
{
    let blocks = training.blocks();
    if blocks.is_empty() {
        tracing::debug!("empty training set, producing an empty codebook");
        return Codebook::empty();
    }

    let actual_k = k.as_usize().min(blocks.len());
    if actual_k == 0 {
        tracing::debug!(blocks = blocks.len(), "codebook size is 0, producing an empty codebook");
        return Codebook::empty();
    }

    let distribution = Uniform::new(0, blocks.len());
    let centroids = (0..actual_k)
        .map(|_| blocks[distribution.sample(rng)])
        .collect::<Vec<_>>();

    let mut state = State::new(blocks, centroids);
    let (iterations, converged) = state.run(max_iterations);

    tracing::debug!(
        blocks = blocks.len(),
        k = actual_k,
        iterations,
        converged,
        "trained codebook"
    );

    Codebook(state.centroids)
}
