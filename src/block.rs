//! 2×2 blocks and block sampling.

use crate::Plane;

/// The 4 samples of a 2×2 region in the order top-left, top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Block(pub [u8; 4]);

/// A codebook entry. Codewords have the same shape as the blocks they represent.
pub type Codeword = Block;

impl Block {
    /// The all-zero block.
    pub const ZERO: Self = Self([0; 4]);

    /// Creates a block where all 4 samples are `value`.
    #[must_use]
    pub const fn splat(value: u8) -> Self {
        Self([value; 4])
    }

    /// Returns the 4 samples of the block.
    #[must_use]
    pub const fn components(self) -> [u8; 4] {
        self.0
    }

    /// Sum of squared component differences between two blocks.
    #[must_use]
    pub fn squared_distance(self, other: Self) -> u32 {
        self.0
            .iter()
            .zip(other.0)
            .map(|(&a, b)| {
                let d = i32::from(a) - i32::from(b);
                d.unsigned_abs() * d.unsigned_abs()
            })
            .sum()
    }

    /// Reads the block whose top-left sample is at `(x, y)`.
    /// The caller guarantees `x + 1 < width` and `y + 1 < height`.
    #[inline]
    pub(crate) fn read(plane: &Plane, x: u32, y: u32) -> Self {
        let top = &plane.row(y)[x as usize..];
        let bottom = &plane.row(y + 1)[x as usize..];
        Self([top[0], top[1], bottom[0], bottom[1]])
    }
}

impl From<[u8; 4]> for Block {
    fn from(components: [u8; 4]) -> Self {
        Self(components)
    }
}

impl From<Block> for [u8; 4] {
    fn from(block: Block) -> Self {
        block.0
    }
}

/// Returns the non-overlapping 2×2 blocks of `plane` in row-major order.
///
/// A trailing row or column that cannot form a full block (odd height or width) is skipped.
pub fn blocks(plane: &Plane) -> impl Iterator<Item = Block> + '_ {
    let (width, height) = plane.dimensions();
    let (cols, rows) = (width / 2, height / 2);
    (0..rows).flat_map(move |by| (0..cols).map(move |bx| Block::read(plane, bx * 2, by * 2)))
}

/// The blocks collected for one logical channel across a training corpus.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrainingSet(Vec<Block>);

impl TrainingSet {
    /// Creates an empty [`TrainingSet`].
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Creates a [`TrainingSet`] holding the blocks of a single plane.
    #[must_use]
    pub fn from_plane(plane: &Plane) -> Self {
        Self(blocks(plane).collect())
    }

    /// Appends the blocks of `plane` in row-major order.
    pub fn extend_from_plane(&mut self, plane: &Plane) {
        let (width, height) = plane.dimensions();
        self.0.reserve((width / 2) as usize * (height / 2) as usize);
        self.0.extend(blocks(plane));
    }

    /// The number of blocks in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the blocks in insertion order.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }
}

impl From<Vec<Block>> for TrainingSet {
    fn from(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }
}

impl FromIterator<Block> for TrainingSet {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Block> for TrainingSet {
    fn extend<I: IntoIterator<Item = Block>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn blocks_are_row_major() {
        #[rustfmt::skip]
        let plane = Plane::new(4, 2, vec![
            1, 2, 3, 4,
            5, 6, 7, 8,
        ]).unwrap();

        let actual = blocks(&plane).collect::<Vec<_>>();
        assert_eq!(actual, vec![Block([1, 2, 5, 6]), Block([3, 4, 7, 8])]);
    }

    #[test]
    fn odd_edges_are_dropped() {
        let plane = Plane::from_fn(5, 3, |x, y| u8::try_from(y * 5 + x).unwrap());
        let set = TrainingSet::from_plane(&plane);
        assert_eq!(set.blocks(), &[Block([0, 1, 5, 6]), Block([2, 3, 7, 8])]);
    }

    #[test]
    fn empty_plane_has_no_blocks() {
        assert!(TrainingSet::from_plane(&Plane::default()).is_empty());
        assert_eq!(blocks(&Plane::filled(1, 7, 3)).count(), 0);
    }

    #[test]
    fn training_set_accumulates() {
        let mut set = TrainingSet::new();
        set.extend_from_plane(&Plane::filled(4, 4, 1));
        set.extend_from_plane(&Plane::filled(2, 2, 9));
        assert_eq!(set.len(), 5);
        assert_eq!(set.blocks()[4], Block::splat(9));
    }

    #[test]
    fn squared_distance() {
        assert_eq!(Block([0, 0, 0, 0]).squared_distance(Block([255; 4])), 4 * 255 * 255);
        assert_eq!(Block([1, 2, 3, 4]).squared_distance(Block([4, 3, 2, 1])), 9 + 1 + 1 + 9);
    }
}
