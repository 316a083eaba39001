use super::bitbuffer::BitBuffer;
use crate::analysis::pattern::Pattern;

/// Builds a BitBuffer front to back. Bits gather in a queue and are moved into the
/// output a byte at a time; `finish()` trims the result to the exact number of bits written.
pub struct BitWriter {
    /// Output buffer holding completed bytes (LSB-first).
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
}

impl BitWriter {
    /// Create a new BitWriter with room for `bits` bits.
    pub fn new(bits: usize) -> Self {
        Self {
            output: Vec::with_capacity(bits / 8 + 1),
            queue: 0,
            q_bits: 0,
        }
    }

    /// Move all full bytes from the queue to the output.
    fn push_queue(&mut self) {
        while self.q_bits > 7 {
            self.output.push(self.queue as u8);
            self.queue >>= 8;
            self.q_bits -= 8;
        }
    }

    /// Append a single bit.
    #[inline]
    pub fn out_bit(&mut self, bit: bool) {
        self.queue |= (bit as u64) << self.q_bits;
        self.q_bits += 1;
        if self.q_bits == 64 {
            self.push_queue();
        }
    }

    /// Append the low `width` bits of `value` (1-32), most significant bit first.
    pub fn out(&mut self, value: u32, width: u8) {
        debug_assert!((1..=32).contains(&width));
        // The queue fills from its low end, so the first bit written must sit lowest.
        let reversed = value.reverse_bits() >> (32 - width as u32);
        self.push_queue();
        self.queue |= (reversed as u64) << self.q_bits;
        self.q_bits += width;
    }

    /// Append a pattern, first window bit first.
    #[inline]
    pub fn out_pattern(&mut self, pattern: &Pattern) {
        self.out(pattern.value(), pattern.width());
    }

    /// Total bits written so far.
    pub fn bits_written(&self) -> usize {
        self.output.len() * 8 + self.q_bits as usize
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.bits_written() / 8, self.bits_written() % 8)
    }

    /// Flush the queue and return the finished buffer, trimmed to the bits written.
    pub fn finish(mut self) -> BitBuffer {
        let len = self.bits_written();
        self.push_queue();
        if self.q_bits > 0 {
            // Unused queue bits are already zero.
            self.output.push(self.queue as u8);
        }
        debug_assert!(len <= self.output.len() * 8 && len + 8 > self.output.len() * 8);
        BitBuffer::from_raw(self.output, len).unwrap_or_default()
    }
}
