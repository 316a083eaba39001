//! BitReader: sequential reads of single bits and fixed-width fields from a BitBuffer.
//!
//! Fields are read most significant bit first, the same order BitWriter::out() writes them.
//!

use super::bitbuffer::BitBuffer;
use crate::analysis::pattern::Pattern;

/// Reads a BitBuffer from a cursor position.
#[derive(Debug)]
pub struct BitReader<'a> {
    source: &'a BitBuffer,
    cursor: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new BitReader positioned at the first bit.
    pub fn new(source: &'a BitBuffer) -> Self {
        Self::at(source, 0)
    }

    /// Creates a new BitReader positioned at bit `cursor`.
    pub fn at(source: &'a BitBuffer, cursor: usize) -> Self {
        Self {
            source,
            cursor: cursor.min(source.len()),
        }
    }

    /// Return Option<bool> *true* if the next bit is 1, *false* if 0, consuming the bit,
    /// or None if there is no more data to read
    pub fn bit(&mut self) -> Option<bool> {
        if self.cursor >= self.source.len() {
            return None;
        }
        let bit = self.source.bit(self.cursor);
        self.cursor += 1;
        Some(bit)
    }

    /// Return Option<u32> of the next n bits (n <= 32), or None if fewer than n bits remain.
    /// Nothing is consumed when the read fails.
    pub fn bint(&mut self, n: u8) -> Option<u32> {
        debug_assert!(n <= 32);
        if self.remaining() < n as usize {
            return None;
        }
        let mut result = 0_u64;
        for _ in 0..n {
            result = result << 1 | self.source.bit(self.cursor) as u64;
            self.cursor += 1;
        }
        Some(result as u32)
    }

    /// Read the next `width` bits as a pattern.
    pub fn pattern(&mut self, width: u8) -> Option<Pattern> {
        let value = self.bint(width)?;
        Pattern::new(value, width).ok()
    }

    /// Current bit position.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Bits left to read.
    pub fn remaining(&self) -> usize {
        self.source.len() - self.cursor
    }

    /// Everything from the cursor to the end of the buffer.
    pub fn rest(&self) -> impl Iterator<Item = bool> + 'a {
        let source = self.source;
        (self.cursor..source.len()).map(move |i| source.bit(i))
    }

    /// Debugging function. Report current position as bytes.bits.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.cursor / 8, self.cursor % 8)
    }
}
