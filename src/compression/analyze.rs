use std::fs;

use log::{info, warn};

use crate::analysis::selector::{ascending_escape_search, EscapeSearch};
use crate::bitstream::bitbuffer::BitBuffer;
use crate::error::Result;
use crate::tools::cli::SubOpts;
use crate::tools::report::analysis_lines;

/// Report the escape pattern and the most frequent pattern of the file in opts.
/// Returns None for an empty file.
pub fn analyze(opts: &SubOpts) -> Result<Option<EscapeSearch>> {
    let data = fs::read(&opts.file)?;
    if data.is_empty() {
        warn!("{} is empty, nothing to analyze", opts.file);
        return Ok(None);
    }
    let bits = BitBuffer::from_bytes(&data);
    info!("Analyzing {} bits from {}", bits.len(), opts.file);

    let found = ascending_escape_search(&bits, &opts.selector)?;
    println!("{}", analysis_lines(&opts.file, bits.len(), &found));
    Ok(Some(found))
}

#[cfg(test)]
mod test {
    use super::analyze;
    use crate::analysis::pattern::Pattern;
    use crate::tools::cli::{Mode, SubOpts};

    #[test]
    fn analyze_file_test() {
        let dir = std::env::temp_dir().join(format!("bitsub-analyze-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("ones.bin");
        std::fs::write(&input, vec![0xff_u8; 100]).unwrap();
        let empty = dir.join("empty.bin");
        std::fs::write(&empty, b"").unwrap();

        let mut opts = SubOpts::new();
        opts.op_mode = Mode::Analyze;
        opts.file = input.to_string_lossy().into_owned();
        let found = analyze(&opts).unwrap().unwrap();
        assert_eq!(found.escape, Pattern::new(0, 1).unwrap());
        assert_eq!(found.victim, Some((Pattern::new(1, 1).unwrap(), 799)));

        opts.file = empty.to_string_lossy().into_owned();
        assert!(analyze(&opts).unwrap().is_none());

        opts.file = dir.join("missing.bin").to_string_lossy().into_owned();
        assert!(analyze(&opts).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
