use log::{debug, trace};

use super::header::{header_bits, write_header};
use crate::analysis::pattern::Pattern;
use crate::bitstream::{bitbuffer::BitBuffer, bitwriter::BitWriter};

/// The transform: every greedy, non-overlapping `victim` window becomes `replacement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionSpec {
    pub victim: Pattern,
    pub replacement: Pattern,
}

impl SubstitutionSpec {
    pub fn new(victim: Pattern, replacement: Pattern) -> Self {
        Self {
            victim,
            replacement,
        }
    }

    /// Length of the header that records this spec.
    pub fn header_bits(&self) -> usize {
        header_bits(self.victim.width(), self.replacement.width())
    }
}

/// Size accounting for one substitution, without building the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    /// Victim windows replaced.
    pub matches: u64,
    /// Bits copied through unchanged, tail included.
    pub literal_bits: u64,
    pub header_bits: u64,
    pub original_bits: u64,
    pub encoded_bits: u64,
}

impl EncodeStats {
    /// Encoded length minus original length. Negative means the buffer shrank.
    pub fn delta(&self) -> i64 {
        self.encoded_bits as i64 - self.original_bits as i64
    }
}

/// One decision of the greedy scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// A full window equal to the target was consumed.
    Match,
    /// One bit passes through unchanged.
    Literal(bool),
}

/// Greedy left-to-right scan shared by the encoder, the size estimate and the decoder.
///
/// A shift register of `target.width()` bits follows the input. Once it is full it is
/// either a match (register emptied) or its oldest bit is passed through as a literal.
/// Bits left in a partly filled register at the end are passed through in order.
pub(crate) fn substitute<I, F>(bits: I, target: Pattern, mut emit: F)
where
    I: Iterator<Item = bool>,
    F: FnMut(Step),
{
    let width = target.width();
    let mut window = Pattern::zero(width);
    let mut filled = 0_u8;
    for bit in bits {
        window = window.shift_extend(bit);
        filled += 1;
        if filled == width {
            if window == target {
                emit(Step::Match);
                filled = 0;
            } else {
                emit(Step::Literal(window.leading_bit()));
                filled -= 1;
            }
        }
    }
    // Tail shorter than a window
    for k in (0..filled).rev() {
        emit(Step::Literal((window.value() >> k) & 1 == 1));
    }
}

/// Count what encode() would produce for `buffer` under `spec`.
pub fn measure(buffer: &BitBuffer, spec: &SubstitutionSpec) -> EncodeStats {
    let mut matches = 0_u64;
    let mut literal_bits = 0_u64;
    substitute(buffer.iter(), spec.victim, |step| match step {
        Step::Match => matches += 1,
        Step::Literal(_) => literal_bits += 1,
    });
    let header = spec.header_bits() as u64;
    EncodeStats {
        matches,
        literal_bits,
        header_bits: header,
        original_bits: buffer.len() as u64,
        encoded_bits: header + matches * spec.replacement.width() as u64 + literal_bits,
    }
}

/// Rewrite `buffer`: header first, then the input with each victim window replaced.
/// The original buffer is left untouched and the result is returned whether or not it
/// is smaller.
pub fn encode(buffer: &BitBuffer, spec: &SubstitutionSpec) -> BitBuffer {
    let mut bw = BitWriter::new(buffer.len() + spec.header_bits());
    write_header(&mut bw, spec);
    trace!("Header written, payload starts at {}", bw.loc());

    let mut matches = 0_u64;
    substitute(buffer.iter(), spec.victim, |step| match step {
        Step::Match => {
            bw.out_pattern(&spec.replacement);
            matches += 1;
        }
        Step::Literal(bit) => bw.out_bit(bit),
    });
    debug!(
        "Replaced {} occurrences of {} with {}: {} -> {} bits",
        matches,
        spec.victim,
        spec.replacement,
        buffer.len(),
        bw.bits_written()
    );
    bw.finish()
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{encode, measure, SubstitutionSpec};
    use crate::analysis::pattern::Pattern;
    use crate::bitstream::{bitbuffer::BitBuffer, bitreader::BitReader, bitwriter::BitWriter};
    use crate::substitution::header::read_header;

    fn spec(v: (u32, u8), r: (u32, u8)) -> SubstitutionSpec {
        SubstitutionSpec::new(
            Pattern::new(v.0, v.1).unwrap(),
            Pattern::new(r.0, r.1).unwrap(),
        )
    }

    fn bit_string(bb: &BitBuffer, from: usize) -> String {
        bb.iter()
            .skip(from)
            .map(|b| if b { '1' } else { '0' })
            .collect()
    }

    fn from_bit_string(s: &str) -> BitBuffer {
        let mut bw = BitWriter::new(s.len());
        s.chars().for_each(|c| bw.out_bit(c == '1'));
        bw.finish()
    }

    #[test]
    fn greedy_non_overlapping_test() {
        // 1111 1 with victim 11: matches at 0 and 2, tail bit copied.
        let input = from_bit_string("11111");
        let s = spec((0b11, 2), (0b0, 1));
        let out = encode(&input, &s);
        assert_eq!(bit_string(&out, s.header_bits()), "001");
        let stats = measure(&input, &s);
        assert_eq!(stats.matches, 2);
        assert_eq!(stats.literal_bits, 1);
        assert_eq!(stats.encoded_bits as usize, out.len());
    }

    #[test]
    fn literal_and_match_mix_test() {
        let input = from_bit_string("0101100110");
        let s = spec((0b110, 3), (0b11, 2));
        let out = encode(&input, &s);
        // 0 1 0 [110] 0 [110] -> 0 1 0 11 0 11
        assert_eq!(bit_string(&out, s.header_bits()), "01011011");
        let mut br = BitReader::new(&out);
        assert_eq!(read_header(&mut br).unwrap(), s);
    }

    #[test]
    fn header_only_for_short_buffer_test() {
        let input = from_bit_string("101");
        let s = spec((0xff, 8), (0, 1));
        let out = encode(&input, &s);
        assert_eq!(out.len(), s.header_bits() + 3);
        assert_eq!(bit_string(&out, s.header_bits()), "101");
        assert!(measure(&input, &s).delta() > 0);

        let empty = BitBuffer::from_bytes(&[]);
        assert_eq!(encode(&empty, &s).len(), s.header_bits());
    }

    #[test]
    fn deterministic_test() {
        let mut rng = StdRng::seed_from_u64(3);
        let data: Vec<u8> = (0..500).map(|_| rng.gen()).collect();
        let bb = BitBuffer::from_bytes(&data);
        let s = spec((0b1011, 4), (0b111, 3));
        let a = encode(&bb, &s);
        let b = encode(&bb, &s);
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_eq!(a.len(), b.len());
        assert_eq!(measure(&bb, &s).encoded_bits as usize, a.len());
    }

    #[test]
    fn planted_victims_test() {
        // Filler bits drawn from 0x55-masked bytes never hold two adjacent ones, so the only
        // 12-bit runs of ones are the planted ones.
        let mut rng = StdRng::seed_from_u64(42);
        let planted = 37;
        let mut bw = BitWriter::new(8000);
        for _ in 0..planted {
            let filler: u8 = rng.gen::<u8>() & 0x55;
            let run = rng.gen_range(1..5);
            for _ in 0..run {
                bw.out((filler as u32).reverse_bits() >> 24, 8);
            }
            bw.out(0xfff, 12);
        }
        bw.out(0, 8);
        let input = bw.finish();

        let s = spec((0xfff, 12), (0b0000, 4));
        let stats = measure(&input, &s);
        assert_eq!(stats.matches, planted);
        let out = encode(&input, &s);
        assert_eq!(
            out.len() as i64 - input.len() as i64,
            s.header_bits() as i64 - (planted as i64) * (12 - 4)
        );
        assert_eq!(out.len() as u64, stats.encoded_bits);
    }
}
