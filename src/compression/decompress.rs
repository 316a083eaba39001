use std::fs;
use std::io::{self, Write};

use log::info;

use super::compress::create_output;
use crate::bitstream::container::{read_container, Method};
use crate::error::{BitsubError, Result};
use crate::substitution::decoder::decode;
use crate::tools::cli::{Output, SubOpts};

/// Restore the original bytes from a container.
pub fn decompress_bits(container: &[u8]) -> Result<Vec<u8>> {
    let (method, bits) = read_container(container)?;
    let restored = match method {
        Method::Stored => bits,
        Method::Substituted => decode(&bits)?,
    };
    if restored.len() % 8 != 0 {
        return Err(BitsubError::InvalidContainer(
            "decoded data is not a whole number of bytes",
        ));
    }
    Ok(restored.into_bytes())
}

/// Output file name for a decompressed file: strip `.bsb` and add `.out`.
pub fn decompressed_name(input: &str) -> String {
    let stem = input.strip_suffix(".bsb").unwrap_or(input);
    format!("{}.out", stem)
}

/// Decompress the file specified in opts (SubOpts).
pub fn decompress(opts: &SubOpts) -> Result<usize> {
    let data = fs::read(&opts.file)?;
    let restored = decompress_bits(&data)?;
    info!("Restored {} bytes from {}", restored.len(), opts.file);

    match opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&restored)?;
            lock.flush()?;
        }
        Output::File => {
            let fname = decompressed_name(&opts.file);
            let mut f_out = create_output(&fname, opts.force_overwrite)?;
            f_out.write_all(&restored)?;
            info!("Wrote {}", fname);
        }
    }
    Ok(restored.len())
}
