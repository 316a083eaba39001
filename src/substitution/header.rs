use super::encoder::SubstitutionSpec;
use crate::analysis::pattern::{Pattern, MAX_WIDTH};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{BitsubError, Result};

/// Bits in each width field. Widths 1-32 are stored biased by one.
pub const WIDTH_FIELD_BITS: u8 = 5;

/// Header length for the given pattern widths.
pub fn header_bits(victim_width: u8, replacement_width: u8) -> usize {
    2 * WIDTH_FIELD_BITS as usize + victim_width as usize + replacement_width as usize
}

fn write_pattern(bw: &mut BitWriter, pattern: &Pattern) {
    bw.out(pattern.width() as u32 - 1, WIDTH_FIELD_BITS);
    bw.out_pattern(pattern);
}

fn read_pattern(br: &mut BitReader<'_>) -> Result<Pattern> {
    let width = br
        .bint(WIDTH_FIELD_BITS)
        .ok_or(BitsubError::MalformedHeader("truncated width field"))? as u8
        + 1;
    debug_assert!(width <= MAX_WIDTH);
    br.pattern(width)
        .ok_or(BitsubError::MalformedHeader("truncated pattern value"))
}

/// Put the victim and replacement, each as (width - 1, value), onto the stream.
pub fn write_header(bw: &mut BitWriter, spec: &SubstitutionSpec) {
    write_pattern(bw, &spec.victim);
    write_pattern(bw, &spec.replacement);
}

/// Read back a header written by write_header().
pub fn read_header(br: &mut BitReader<'_>) -> Result<SubstitutionSpec> {
    let victim = read_pattern(br)?;
    let replacement = read_pattern(br)?;
    Ok(SubstitutionSpec {
        victim,
        replacement,
    })
}

#[cfg(test)]
mod test {
    use super::{header_bits, read_header, write_header};
    use crate::analysis::pattern::Pattern;
    use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
    use crate::error::BitsubError;
    use crate::substitution::encoder::SubstitutionSpec;

    fn spec(v: (u32, u8), r: (u32, u8)) -> SubstitutionSpec {
        SubstitutionSpec::new(
            Pattern::new(v.0, v.1).unwrap(),
            Pattern::new(r.0, r.1).unwrap(),
        )
    }

    #[test]
    fn layout_test() {
        let s = spec((0b101, 3), (0b1, 1));
        let mut bw = BitWriter::new(32);
        write_header(&mut bw, &s);
        let bb = bw.finish();
        assert_eq!(bb.len(), header_bits(3, 1));
        let bits: String = bb.iter().map(|b| if b { '1' } else { '0' }).collect();
        assert_eq!(bits, "00010".to_owned() + "101" + "00000" + "1");
    }

    #[test]
    fn round_trip_test() {
        for s in [
            spec((0, 1), (1, 1)),
            spec((u32::MAX, 32), (0x1234, 18)),
            spec((7, 9), (0x3f_ffff, 22)),
        ] {
            let mut bw = BitWriter::new(80);
            write_header(&mut bw, &s);
            let bb = bw.finish();
            assert_eq!(bb.len(), s.header_bits());
            let mut br = BitReader::new(&bb);
            assert_eq!(read_header(&mut br).unwrap(), s);
            assert_eq!(br.remaining(), 0);
        }
    }

    #[test]
    fn truncated_test() {
        let s = spec((0xabc, 12), (5, 3));
        let mut bw = BitWriter::new(40);
        write_header(&mut bw, &s);
        let bb = bw.finish();
        for cut in [0, 4, 10, 17, 20, bb.len() - 1] {
            let short = crate::bitstream::bitbuffer::BitBuffer::from_raw(
                bb.as_bytes().to_vec(),
                cut,
            )
            .unwrap();
            let mut br = BitReader::new(&short);
            assert!(
                matches!(read_header(&mut br), Err(BitsubError::MalformedHeader(_))),
                "cut at {}",
                cut
            );
        }
    }
}
