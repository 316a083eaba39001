//! bitsub: lossless size reduction by single bit-pattern substitution.
//!
//! Version 0.1.0
//!
//! The input is treated as a plain sequence of bits. bitsub counts every sliding window of
//! every width, finds the narrowest pattern that never occurs (the escape), and then the
//! widest frequent pattern (the victim) whose replacement by the escape makes the data
//! shorter. The two patterns are recorded in a small header in front of the rewritten bits,
//! which is enough to reverse the substitution.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> bitsub -z test.txt`
//!
//! This will create the file test.txt.bsb. Random or already compressed data rarely has a
//! useful victim; such files are stored unchanged and the shortfall is reported.
//!
//! `$> bitsub -a test.txt` only reports the escape and the most frequent pattern.
//!
pub mod analysis;
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod substitution;
pub mod tools;

pub use error::{BitsubError, Result};
