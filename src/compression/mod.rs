//! The compression module drives the bitsub pipeline on files.
//!
//! Compression happens in the following steps:
//! - Expand the file into a BitBuffer, eight bits per byte, least significant bit first.
//! - Ascending escape search: find the narrowest width with a pattern that never occurs.
//! - Descending victim search: from the widest width down, take the most frequent pattern
//!   whose replacement by the escape yields a strictly shorter buffer.
//! - Substitution: write the header, then the input with every victim replaced.
//! - Framing: wrap the result in a container so its exact bit length survives on disk.
//!
//! When no width shrinks the input, the original bytes are stored unchanged.
//!
//! Decompression reads the container and, for substituted data, runs the decoder.
//!
//! Analysis mode only runs the escape search and reports what it found.
//!

pub mod analyze;
pub mod compress;
pub mod decompress;

use log::info;

use crate::error::Result;
use crate::tools::cli::{Mode, Output, SubOpts};

/// Run the operation selected in opts. Errors are returned, not logged.
pub fn run(opts: &SubOpts) -> Result<()> {
    match opts.op_mode {
        Mode::Analyze => analyze::analyze(opts).map(|_| ()),
        Mode::Zip => compress::compress(opts).map(|report| {
            if opts.output == Output::File {
                println!("{}", report)
            } else {
                info!("{}", report)
            }
        }),
        Mode::Unzip => decompress::decompress(opts).map(|_| ()),
    }
}

#[cfg(test)]
mod test {
    use super::run;
    use crate::error::BitsubError;
    use crate::tools::cli::{Mode, SubOpts};

    #[test]
    fn run_returns_errors_test() {
        let mut opts = SubOpts::new();
        opts.file = "no/such/file.bin".to_string();
        for mode in [Mode::Analyze, Mode::Zip, Mode::Unzip] {
            opts.op_mode = mode;
            assert!(matches!(run(&opts), Err(BitsubError::Io(_))));
        }
    }

    #[test]
    fn run_modes_test() {
        let dir = std::env::temp_dir().join(format!("bitsub-run-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("zeros.bin");
        std::fs::write(&input, vec![0_u8; 512]).unwrap();

        let mut opts = SubOpts::new();
        opts.file = input.to_string_lossy().into_owned();
        opts.op_mode = Mode::Zip;
        run(&opts).unwrap();
        opts.op_mode = Mode::Analyze;
        run(&opts).unwrap();
        opts.file = format!("{}.bsb", opts.file);
        opts.op_mode = Mode::Unzip;
        run(&opts).unwrap();
        assert_eq!(std::fs::read(dir.join("zeros.bin.out")).unwrap(), vec![0_u8; 512]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
