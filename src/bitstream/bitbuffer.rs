use crate::error::{BitsubError, Result};

/// A fixed-length, randomly addressable sequence of bits.
///
/// Bits are packed LSB-first: bit `8 * i + j` is bit `j` (value `1 << j`) of byte `i`.
/// Storage bits past `len` are always zero, so equal bit sequences have equal byte images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl BitBuffer {
    /// Expand a byte buffer into its bits. The result holds exactly `8 * bytes.len()` bits.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            len: bytes.len() * 8,
        }
    }

    /// Rebuild a buffer from a byte image and an exact bit length. Any bits of the image
    /// beyond `len` are cleared.
    pub fn from_raw(mut bytes: Vec<u8>, len: usize) -> Result<Self> {
        if len > bytes.len() * 8 {
            return Err(BitsubError::IndexOutOfRange {
                index: len,
                len: bytes.len() * 8,
            });
        }
        bytes.truncate((len + 7) / 8);
        let used = len % 8;
        if used != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xff >> (8 - used);
            }
        }
        Ok(Self { bytes, len })
    }

    /// Number of bits in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return the bit at `index`, or `IndexOutOfRange` outside `[0, len)`.
    pub fn get(&self, index: usize) -> Result<bool> {
        if index >= self.len {
            return Err(BitsubError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(self.bit(index))
    }

    /// Unchecked (beyond slice bounds) bit access for the scanning loops.
    #[inline]
    pub(crate) fn bit(&self, index: usize) -> bool {
        (self.bytes[index >> 3] >> (index & 7)) & 1 == 1
    }

    /// Iterate over every bit in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |i| self.bit(i))
    }

    /// Byte image of the buffer. The last byte is zero padded.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer, returning its byte image.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Count of padding bits (0-7) in the last byte of the image.
    #[inline]
    pub fn padding(&self) -> u8 {
        ((8 - self.len % 8) % 8) as u8
    }
}

#[cfg(test)]
mod test {
    use super::BitBuffer;
    use crate::error::BitsubError;

    #[test]
    fn lsb_first_test() {
        let bytes = [0b0000_0001_u8, 0b1000_0010];
        let bb = BitBuffer::from_bytes(&bytes);
        assert_eq!(bb.len(), 16);
        for i in 0..bytes.len() {
            for j in 0..8 {
                assert_eq!(
                    bb.get(8 * i + j).unwrap(),
                    (bytes[i] >> j) & 1 != 0,
                    "bit {} of byte {}",
                    j,
                    i
                );
            }
        }
        let bits: Vec<bool> = bb.iter().take(9).collect();
        assert_eq!(
            bits,
            vec![true, false, false, false, false, false, false, false, false]
        );
    }

    #[test]
    fn every_byte_value_test() {
        let bytes: Vec<u8> = (0..=255).collect();
        let bb = BitBuffer::from_bytes(&bytes);
        assert_eq!(bb.len(), 8 * 256);
        for (i, &byte) in bytes.iter().enumerate() {
            for j in 0..8 {
                assert_eq!(bb.get(8 * i + j).unwrap(), (byte >> j) & 1 != 0);
            }
        }
    }

    #[test]
    fn out_of_range_test() {
        let bb = BitBuffer::from_bytes(&[0xff]);
        assert!(bb.get(7).unwrap());
        assert!(matches!(
            bb.get(8),
            Err(BitsubError::IndexOutOfRange { index: 8, len: 8 })
        ));
        let empty = BitBuffer::from_bytes(&[]);
        assert!(empty.is_empty());
        assert!(empty.get(0).is_err());
    }

    #[test]
    fn from_raw_test() {
        let bb = BitBuffer::from_raw(vec![0xff, 0xff], 11).unwrap();
        assert_eq!(bb.len(), 11);
        assert_eq!(bb.as_bytes(), &[0xff, 0b0000_0111]);
        assert_eq!(bb.padding(), 5);
        assert!(BitBuffer::from_raw(vec![0xff], 9).is_err());
        assert_eq!(BitBuffer::from_raw(vec![1, 2, 3], 8).unwrap().as_bytes(), &[1]);
    }
}
