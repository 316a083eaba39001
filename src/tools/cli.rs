use std::{fmt::Display, fmt::Formatter};

use clap::Parser;
use log::{info, warn};

use crate::analysis::pattern::MAX_WIDTH;
use crate::analysis::selector::SelectorConfig;

/// Analyze, Zip, Unzip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Analyze,
    Zip,
    Unzip,
}
impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define the two output channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    File,
    Stdout,
}
impl Display for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Define all user settable options to control program behavior
#[derive(Debug, Clone)]
pub struct SubOpts {
    /// Name of the file to read for input
    pub file: String,
    /// Silently overwrite existing files with the same name
    pub force_overwrite: bool,
    /// Analyze/Compress/Decompress
    pub op_mode: Mode,
    /// Location where output is sent
    pub output: Output,
    /// Width search settings
    pub selector: SelectorConfig,
}

impl SubOpts {
    pub fn new() -> Self {
        Self {
            file: String::new(),
            force_overwrite: false,
            op_mode: Mode::Zip,
            output: Output::File,
            selector: SelectorConfig::default(),
        }
    }
}

impl Default for SubOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Command Line Interpretation - uses external CLAP crate.
#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Shrink a file by swapping its most frequent bit pattern for one it never uses",
    long_about = "
    bitsub looks for the narrowest bit pattern that never occurs in the input (the escape),
    then for the widest frequent pattern (the victim) whose replacement by the escape makes
    the input shorter. The substitution is recorded in a small header so it can be undone."
)]
pub struct Args {
    /// Filename of file to process
    #[clap()]
    filename: String,

    /// Report the escape pattern and the most frequent pattern only
    #[clap(short = 'a', long = "analyze")]
    analyze: bool,

    /// Perform compression on the input file (the default)
    #[clap(short = 'z', long = "compress")]
    compress: bool,

    /// Perform decompression on the input file
    #[clap(short = 'd', long = "decompress")]
    decompress: bool,

    /// Force overwriting output file
    #[clap(short = 'f', long = "force")]
    force: bool,

    /// Send output to the terminal
    #[clap(short = 'c', long = "stdout")]
    stdout: bool,

    /// Widest bit pattern examined, 1-32
    #[clap(short = 'w', long = "max-width", default_value_t = MAX_WIDTH)]
    max_width: u8,

    /// Measure candidate widths one at a time instead of in parallel
    #[clap(long = "sequential")]
    sequential: bool,

    /// Accept substitutions without checking that they decode back to the input
    #[clap(long = "no-verify")]
    no_verify: bool,

    /// Sets verbosity. -v0 is silent, -v5 is chatty
    #[clap(short = 'v', default_value_t = 3)]
    v: u8,
}

/// Put command line information from CLAP into our internal structure and set the log level.
pub fn subopts_init() -> SubOpts {
    opts_from_args(Args::parse())
}

fn opts_from_args(args: Args) -> SubOpts {
    let mut opts = SubOpts::new();
    opts.file = args.filename;
    if args.analyze {
        opts.op_mode = Mode::Analyze
    };
    if args.decompress {
        opts.op_mode = Mode::Unzip
    };
    if args.compress {
        opts.op_mode = Mode::Zip
    };
    opts.force_overwrite = args.force;
    if args.stdout {
        opts.output = Output::Stdout
    };
    opts.selector = SelectorConfig {
        max_width: args.max_width,
        parallel: !args.sequential,
        verify: !args.no_verify,
    };

    // Set the log level
    match args.v {
        0 => log::set_max_level(log::LevelFilter::Off),
        1 => log::set_max_level(log::LevelFilter::Error),
        2 => log::set_max_level(log::LevelFilter::Warn),
        3 => log::set_max_level(log::LevelFilter::Info),
        4 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    };

    // Below we report initialization status to the user
    info!("---- bitsub initialization start ----");
    info!("Verbosity set to {}", log::max_level());
    info!("Operational mode set to {}", opts.op_mode);
    info!("Getting input from the file {}", opts.file);
    if opts.output == Output::Stdout {
        warn!("Sending output to stdout")
    };
    info!("Maximum pattern width set to {}", opts.selector.max_width);
    if opts.force_overwrite {
        info!("Forcing file overwriting")
    };
    if !opts.selector.verify {
        warn!("Substitutions will not be checked for reversibility")
    };
    info!("---- bitsub initialization end ----\n");
    opts
}

#[cfg(test)]
mod test {
    use super::{opts_from_args, Args, Mode, Output};
    use clap::Parser;

    fn parse(args: &[&str]) -> super::SubOpts {
        opts_from_args(Args::try_parse_from(args).unwrap())
    }

    #[test]
    fn defaults_test() {
        let opts = parse(&["bitsub", "data.bin"]);
        assert_eq!(opts.file, "data.bin");
        assert_eq!(opts.op_mode, Mode::Zip);
        assert_eq!(opts.output, Output::File);
        assert_eq!(opts.selector.max_width, 32);
        assert!(opts.selector.parallel);
        assert!(opts.selector.verify);
    }

    #[test]
    fn flags_test() {
        let opts = parse(&[
            "bitsub",
            "-d",
            "-c",
            "-f",
            "-w",
            "20",
            "--sequential",
            "--no-verify",
            "-v",
            "0",
            "data.bin.bsb",
        ]);
        assert_eq!(opts.op_mode, Mode::Unzip);
        assert_eq!(opts.output, Output::Stdout);
        assert!(opts.force_overwrite);
        assert_eq!(opts.selector.max_width, 20);
        assert!(!opts.selector.parallel);
        assert!(!opts.selector.verify);

        assert_eq!(parse(&["bitsub", "--analyze", "x"]).op_mode, Mode::Analyze);
    }

    #[test]
    fn missing_file_test() {
        assert!(Args::try_parse_from(["bitsub", "-z"]).is_err());
    }
}
