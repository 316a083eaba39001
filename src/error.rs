//! Error type shared by every stage of the bit substitution pipeline.

use thiserror::Error;

/// Everything that can go wrong while analyzing, encoding or decoding a bit buffer.
#[derive(Debug, Error)]
pub enum BitsubError {
    /// A bit was addressed outside `[0, len)`.
    #[error("bit index {index} is out of range for a buffer of {len} bits")]
    IndexOutOfRange { index: usize, len: usize },

    /// Pattern widths must lie in `1..=max`.
    #[error("invalid pattern width {width} (expected 1..={max})")]
    InvalidPatternWidth { width: u32, max: u32 },

    /// The value has bits set above the pattern width.
    #[error("pattern value {value:#x} does not fit in {width} bits")]
    InvalidPatternValue { value: u32, width: u8 },

    /// The buffer holds no complete window at this width.
    #[error("a buffer of {bits} bits holds no complete {width}-bit window")]
    InsufficientData { bits: usize, width: u8 },

    /// Every pattern occurs at every width up to the limit.
    #[error("every pattern occurs at every width up to {max_width} bits")]
    NoEscapeFound { max_width: u8 },

    /// No width yields a reversible net reduction. Carries the smallest non-negative growth
    /// seen and the number of shrinking candidates that failed to decode back to the input.
    #[error(
        "no substitution shrinks the buffer (closest delta: {closest_delta:?} bits, \
         {rejected} irreversible)"
    )]
    NoBeneficialSubstitution {
        closest_delta: Option<i64>,
        rejected: u32,
    },

    #[error("malformed substitution header: {0}")]
    MalformedHeader(&'static str),

    #[error("invalid container: {0}")]
    InvalidContainer(&'static str),

    /// Refusing to replace an existing output file without --force.
    #[error("output file {0} already exists (use --force to overwrite)")]
    OutputExists(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BitsubError>;
