use std::fmt::{Display, Formatter};

use crate::error::{BitsubError, Result};

/// Widest pattern that fits in the u32 shift register.
pub const MAX_WIDTH: u8 = 32;

/// A fixed-width bit string. The first bit of the window is the most significant bit of `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern {
    value: u32,
    width: u8,
}

impl Pattern {
    /// Create a pattern, checking `1 <= width <= 32` and `value < 2^width`.
    pub fn new(value: u32, width: u8) -> Result<Self> {
        check_width(width, MAX_WIDTH)?;
        if value & !Self::mask(width) != 0 {
            return Err(BitsubError::InvalidPatternValue { value, width });
        }
        Ok(Self { value, width })
    }

    /// All-zero shift register of a width already validated by the caller.
    #[inline]
    pub(crate) fn zero(width: u8) -> Self {
        debug_assert!((1..=MAX_WIDTH).contains(&width));
        Self { value: 0, width }
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Mask covering the low `width` bits (1-32).
    #[inline]
    pub fn mask(width: u8) -> u32 {
        u32::MAX >> (32 - width as u32)
    }

    /// Slide the window one bit: drop the oldest bit and append `bit` as the newest.
    #[inline]
    #[must_use]
    pub fn shift_extend(self, bit: bool) -> Self {
        Self {
            value: (self.value << 1) & Self::mask(self.width) | bit as u32,
            width: self.width,
        }
    }

    /// The oldest bit in the window.
    #[inline]
    pub fn leading_bit(&self) -> bool {
        (self.value >> (self.width - 1)) & 1 == 1
    }

    /// The bits of the pattern in window order.
    pub fn bits(&self) -> impl Iterator<Item = bool> {
        let Self { value, width } = *self;
        (0..width).rev().map(move |k| (value >> k) & 1 == 1)
    }

    /// True when some proper prefix of the pattern equals its suffix of the same length,
    /// so two occurrences can overlap (`11111`, `1010`). `11110` cannot.
    pub fn overlaps_itself(&self) -> bool {
        (1..self.width).any(|shift| {
            let keep = Self::mask(self.width - shift);
            self.value >> shift == self.value & keep
        })
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:0w$b} ({} bits)",
            self.value,
            self.width,
            w = self.width as usize
        )
    }
}

/// Reject widths outside `1..=max`.
pub fn check_width(width: u8, max: u8) -> Result<()> {
    if width == 0 || width > max.min(MAX_WIDTH) {
        return Err(BitsubError::InvalidPatternWidth {
            width: width as u32,
            max: max.min(MAX_WIDTH) as u32,
        });
    }
    Ok(())
}
