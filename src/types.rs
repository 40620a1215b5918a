//! Contains various types needed across the crate.

use crate::MAX_CODEWORDS;
use std::{
    error::Error,
    fmt::{Debug, Display},
};

/// An error type for when the length of an input (e.g., `Vec` or number)
/// is above the maximum supported value.
///
/// The inner value is the maximum supported value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AboveMaxLen<T>(pub T);

impl<T: Display> Display for AboveMaxLen<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "above the maximum length of {}", self.0)
    }
}

impl<T: Debug + Display> Error for AboveMaxLen<T> {}

/// This type is used to specify the (maximum) number of codewords to train per channel, `K`.
///
/// This is a simple new type wrapper around `u16` with the invariant that it must be
/// less than or equal to [`MAX_CODEWORDS`].
///
/// If a [`CodebookSize`] of `0` is provided to the trainer, an empty [`Codebook`](crate::Codebook)
/// will be returned.
///
/// # Examples
/// Use `into` to create [`CodebookSize`]s from `u8`s.
/// For `u16`s, use `try_into` or [`CodebookSize::from_clamped`].
///
/// ```
/// # use blockvq::{CodebookSize, AboveMaxLen};
/// # fn main() -> Result<(), AboveMaxLen<u16>> {
/// let size = CodebookSize::from(16);
/// let size = CodebookSize::try_from(256u16)?;
/// let size = CodebookSize::from_clamped(1024);
/// assert_eq!(size, CodebookSize::MAX);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct CodebookSize(u16);

impl CodebookSize {
    /// The maximum supported codebook size (given by [`MAX_CODEWORDS`]).
    pub const MAX: Self = Self(MAX_CODEWORDS);

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// Creates a [`CodebookSize`] by clamping the given `u16` to be less than or equal to [`MAX_CODEWORDS`].
    #[must_use]
    pub const fn from_clamped(value: u16) -> Self {
        if value <= MAX_CODEWORDS {
            Self(value)
        } else {
            Self(MAX_CODEWORDS)
        }
    }

    /// Returns the size as a `usize` for lengths and indexing.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl Default for CodebookSize {
    fn default() -> Self {
        Self::MAX
    }
}

impl From<CodebookSize> for u16 {
    fn from(val: CodebookSize) -> Self {
        val.into_inner()
    }
}

impl From<u8> for CodebookSize {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl TryFrom<u16> for CodebookSize {
    type Error = AboveMaxLen<u16>;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value <= MAX_CODEWORDS {
            Ok(CodebookSize(value))
        } else {
            Err(AboveMaxLen(MAX_CODEWORDS))
        }
    }
}

impl Display for CodebookSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codebook_size_bounds() {
        assert_eq!(CodebookSize::try_from(257u16), Err(AboveMaxLen(256)));
        assert_eq!(CodebookSize::try_from(256u16), Ok(CodebookSize::MAX));
        assert_eq!(CodebookSize::from_clamped(u16::MAX), CodebookSize::MAX);
        assert_eq!(CodebookSize::from(0).as_usize(), 0);
        assert_eq!(CodebookSize::default().to_string(), "256");
    }
}
