use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::analysis::selector::{descending_victim_search, SelectorConfig, Selection};
use crate::bitstream::bitbuffer::BitBuffer;
use crate::bitstream::container::{write_container, Method};
use crate::error::{BitsubError, Result};
use crate::substitution::encoder::encode;
use crate::tools::cli::{Output, SubOpts};
use crate::tools::report::Report;

/// What the pipeline did with a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The substitution shrank the buffer.
    Compressed { selection: Selection, output: BitBuffer },
    /// Nothing helped; `output` is the input, unchanged. `rejected` counts the shrinking
    /// substitutions that did not decode back to the input.
    Unchanged {
        output: BitBuffer,
        closest_delta: Option<i64>,
        rejected: u32,
    },
}

impl Outcome {
    pub fn output(&self) -> &BitBuffer {
        match self {
            Outcome::Compressed { output, .. } | Outcome::Unchanged { output, .. } => output,
        }
    }
}

/// Select a substitution for `buffer` and apply it. A negative result from the victim
/// search is not an error here: the input is handed back unchanged.
pub fn compress_bits(buffer: &BitBuffer, config: &SelectorConfig) -> Result<Outcome> {
    match descending_victim_search(buffer, config) {
        Ok(selection) => {
            let output = encode(buffer, &selection.spec);
            debug_assert_eq!(output.len() as u64, selection.stats.encoded_bits);
            Ok(Outcome::Compressed { selection, output })
        }
        Err(BitsubError::NoBeneficialSubstitution {
            closest_delta,
            rejected,
        }) => {
            warn!(
                "No substitution shrinks the input (closest delta {:?} bits, {} irreversible)",
                closest_delta, rejected
            );
            Ok(Outcome::Unchanged {
                output: buffer.clone(),
                closest_delta,
                rejected,
            })
        }
        Err(e) => Err(e),
    }
}

/// Output file name for a compressed file.
pub fn compressed_name(input: &str) -> String {
    format!("{}.bsb", input)
}

/// Create `fname` for writing, refusing to clobber an existing file unless forced.
pub(crate) fn create_output(fname: &str, force: bool) -> Result<File> {
    if !force && Path::new(fname).exists() {
        return Err(BitsubError::OutputExists(fname.to_string()));
    }
    Ok(File::create(fname)?)
}

/// Compress the input file defined in opts <SubOpts>.
pub fn compress(opts: &SubOpts) -> Result<Report> {
    let data = fs::read(&opts.file)?;
    info!("Read {} bytes from {}", data.len(), opts.file);

    let bits = BitBuffer::from_bytes(&data);
    let (method, outcome) = if bits.is_empty() {
        // Nothing to analyze in an empty file: store it.
        warn!("{} is empty, storing it unchanged", opts.file);
        (
            Method::Stored,
            Outcome::Unchanged {
                output: bits.clone(),
                closest_delta: None,
                rejected: 0,
            },
        )
    } else {
        match compress_bits(&bits, &opts.selector)? {
            compressed @ Outcome::Compressed { .. } => (Method::Substituted, compressed),
            unchanged => (Method::Stored, unchanged),
        }
    };

    match opts.output {
        Output::Stdout => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_container(&mut lock, method, outcome.output())?;
            lock.flush()?;
        }
        Output::File => {
            let fname = compressed_name(&opts.file);
            let mut f_out = create_output(&fname, opts.force_overwrite)?;
            write_container(&mut f_out, method, outcome.output())?;
            debug!("Wrote {} ({:?})", fname, method);
        }
    }

    let report = match outcome {
        Outcome::Compressed { selection, output } => Report {
            file: opts.file.clone(),
            original_bits: bits.len() as u64,
            new_bits: output.len() as u64,
            selection: Some(selection),
            closest_delta: None,
            rejected: 0,
        },
        Outcome::Unchanged {
            closest_delta,
            rejected,
            ..
        } => Report {
            file: opts.file.clone(),
            original_bits: bits.len() as u64,
            new_bits: bits.len() as u64,
            selection: None,
            closest_delta,
            rejected,
        },
    };
    Ok(report)
}
