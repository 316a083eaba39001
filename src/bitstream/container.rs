//! Byte-aligned framing for bit buffers written to disk.
//!
//! Layout: the three magic bytes `BSB`, a method byte, a padding byte (0-7), then the
//! LSB-first byte image of the bit buffer. The padding byte records how many bits of the
//! last image byte are not part of the buffer.

use std::io::Write;

use log::trace;

use super::bitbuffer::BitBuffer;
use crate::error::{BitsubError, Result};

const MAGIC: &[u8; 3] = b"BSB";
const PREFIX_LEN: usize = 5;

/// How the payload of a container was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// The payload is the original data, byte for byte.
    Stored = 0,
    /// The payload is a substitution-encoded bit buffer, header included.
    Substituted = 1,
}

/// Write a framed bit buffer to `writer`.
pub fn write_container<W: Write>(writer: &mut W, method: Method, bits: &BitBuffer) -> Result<()> {
    trace!(
        "Writing {:?} container: {} bits, {} padding bits",
        method,
        bits.len(),
        bits.padding()
    );
    writer.write_all(MAGIC)?;
    writer.write_all(&[method as u8, bits.padding()])?;
    writer.write_all(bits.as_bytes())?;
    Ok(())
}

/// Parse a framed bit buffer, restoring its exact bit length.
pub fn read_container(data: &[u8]) -> Result<(Method, BitBuffer)> {
    if data.len() < PREFIX_LEN || &data[..3] != MAGIC {
        return Err(BitsubError::InvalidContainer("missing BSB signature"));
    }
    let method = match data[3] {
        0 => Method::Stored,
        1 => Method::Substituted,
        _ => return Err(BitsubError::InvalidContainer("unknown method")),
    };
    let padding = data[4] as usize;
    let payload = &data[PREFIX_LEN..];
    if padding > 7 || (payload.is_empty() && padding != 0) {
        return Err(BitsubError::InvalidContainer("bad padding"));
    }
    let len = payload.len() * 8 - padding;
    Ok((method, BitBuffer::from_raw(payload.to_vec(), len)?))
}
