use log::trace;
use rustc_hash::FxHashMap;

use super::pattern::{check_width, Pattern, MAX_WIDTH};
use crate::bitstream::bitbuffer::BitBuffer;
use crate::error::Result;

/// Widest histogram kept as a flat table (2^20 counters). Wider ones only store what occurs.
const DENSE_WIDTH_LIMIT: u8 = 20;

#[derive(Debug, Clone)]
enum Counts {
    Dense(Vec<u64>),
    Sparse(FxHashMap<u32, u64>),
}

/// Occurrence counts of every `width`-bit window of one buffer.
///
/// Counters are u64, wide enough for any buffer that fits in memory, so they never saturate.
#[derive(Debug, Clone)]
pub struct Histogram {
    width: u8,
    counts: Counts,
    total: u64,
}

impl Histogram {
    fn empty(width: u8) -> Self {
        let counts = if width <= DENSE_WIDTH_LIMIT {
            Counts::Dense(vec![0; 1 << width])
        } else {
            Counts::Sparse(FxHashMap::default())
        };
        Self {
            width,
            counts,
            total: 0,
        }
    }

    #[inline]
    fn add(&mut self, value: u32) {
        match &mut self.counts {
            Counts::Dense(table) => table[value as usize] += 1,
            Counts::Sparse(map) => *map.entry(value).or_insert(0) += 1,
        }
        self.total += 1;
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    /// Number of windows counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// False when the buffer was too short for a single window. An empty histogram says
    /// nothing about which patterns are absent.
    pub fn has_data(&self) -> bool {
        self.total > 0
    }

    /// Occurrences of `value` (0 for values that never occur or do not fit the width).
    pub fn count(&self, value: u32) -> u64 {
        match &self.counts {
            Counts::Dense(table) => table.get(value as usize).copied().unwrap_or(0),
            Counts::Sparse(map) => map.get(&value).copied().unwrap_or(0),
        }
    }

    /// Number of distinct patterns that occur.
    pub fn distinct(&self) -> usize {
        match &self.counts {
            Counts::Dense(table) => table.iter().filter(|&&c| c > 0).count(),
            Counts::Sparse(map) => map.len(),
        }
    }

    /// The highest-valued pattern that never occurs, if any.
    pub fn escape(&self) -> Option<Pattern> {
        self.escape_where(|_| true)
    }

    /// The highest-valued pattern that never occurs and satisfies `accept`.
    pub fn escape_where<F>(&self, accept: F) -> Option<Pattern>
    where
        F: Fn(Pattern) -> bool,
    {
        if !self.has_data() {
            return None;
        }
        let absent = |value: u32| match &self.counts {
            Counts::Dense(table) => table[value as usize] == 0,
            Counts::Sparse(map) => !map.contains_key(&value),
        };
        // Sparse maps hold only what occurs, so absent values turn up after a few lookups.
        (0..=Pattern::mask(self.width))
            .rev()
            .filter(|&value| absent(value))
            .filter_map(|value| Pattern::new(value, self.width).ok())
            .find(|&pattern| accept(pattern))
    }

    /// The pattern with the highest count and that count. Ties go to the smallest value.
    pub fn most_frequent(&self) -> Option<(Pattern, u64)> {
        if !self.has_data() {
            return None;
        }
        let (value, count) = match &self.counts {
            Counts::Dense(table) => table
                .iter()
                .enumerate()
                .fold((0, 0), |best, (v, &c)| if c > best.1 { (v as u32, c) } else { best }),
            Counts::Sparse(map) => map.iter().fold((0, 0), |best, (&v, &c)| {
                if c > best.1 || (c == best.1 && v < best.0) {
                    (v, c)
                } else {
                    best
                }
            }),
        };
        Some((Pattern::new(value, self.width).ok()?, count))
    }
}

/// Count every sliding `width`-bit window of `buffer` in a single pass.
///
/// The window is a shift register primed with the first `width - 1` bits; every further bit
/// is shifted in and the window it completes is counted. The window starting at the last
/// possible position is not counted, so the total is `len - width`. A buffer of `width` bits
/// or fewer yields an empty histogram.
pub fn compute_histogram(buffer: &BitBuffer, width: u8) -> Result<Histogram> {
    check_width(width, MAX_WIDTH)?;
    let mut histogram = Histogram::empty(width);
    let width_bits = width as usize;
    if buffer.len() <= width_bits {
        trace!(
            "No complete {}-bit window in a buffer of {} bits",
            width,
            buffer.len()
        );
        return Ok(histogram);
    }

    let mut bits = buffer.iter().take(buffer.len() - 1);
    let mut window = Pattern::zero(width);
    for bit in bits.by_ref().take(width_bits - 1) {
        window = window.shift_extend(bit);
    }
    for bit in bits {
        window = window.shift_extend(bit);
        histogram.add(window.value());
    }
    trace!(
        "Width {}: {} windows, {} distinct patterns",
        width,
        histogram.total(),
        histogram.distinct()
    );
    Ok(histogram)
}
