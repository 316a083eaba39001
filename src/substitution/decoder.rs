use log::debug;

use super::encoder::{substitute, Step};
use super::header::read_header;
use crate::bitstream::{bitbuffer::BitBuffer, bitreader::BitReader, bitwriter::BitWriter};
use crate::error::Result;

/// Undo encode(): read the header, then expand every greedy, non-overlapping occurrence of
/// the replacement back into the victim and copy all other bits.
///
/// The result equals the original only if the replacement never shows up in the bits the
/// encoder copied through (including across the edges of a replaced window). Callers that
/// need a guarantee compare the round trip, as the descending victim search does.
pub fn decode(encoded: &BitBuffer) -> Result<BitBuffer> {
    let mut br = BitReader::new(encoded);
    let spec = read_header(&mut br)?;
    debug!(
        "Decoding at {}: {} expands to {}",
        br.loc(),
        spec.replacement,
        spec.victim
    );

    let mut bw = BitWriter::new(br.remaining() * spec.victim.width() as usize);
    substitute(br.rest(), spec.replacement, |step| match step {
        Step::Match => bw.out_pattern(&spec.victim),
        Step::Literal(bit) => bw.out_bit(bit),
    });
    Ok(bw.finish())
}
