use std::fmt::{Display, Formatter};

use crate::analysis::selector::{EscapeSearch, Selection};

/// Size-change summary printed after a compression run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub file: String,
    pub original_bits: u64,
    pub new_bits: u64,
    /// The substitution used, if any.
    pub selection: Option<Selection>,
    /// Smallest growth seen when nothing shrank the input.
    pub closest_delta: Option<i64>,
    /// Shrinking substitutions passed over because they did not decode back.
    pub rejected: u32,
}

impl Report {
    /// Bits saved. Negative when the output grew.
    pub fn saved_bits(&self) -> i64 {
        self.original_bits as i64 - self.new_bits as i64
    }

    /// Output size as a percentage of the input.
    pub fn ratio(&self) -> f64 {
        if self.original_bits == 0 {
            return 100.0;
        }
        self.new_bits as f64 / self.original_bits as f64 * 100.0
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.selection {
            Some(selection) => {
                writeln!(
                    f,
                    "{}: replaced {} ({} windows, {} replaced) with {}",
                    self.file,
                    selection.spec.victim,
                    selection.victim_count,
                    selection.stats.matches,
                    selection.spec.replacement
                )?;
            }
            None if self.rejected > 0 => {
                write!(
                    f,
                    "{}: {} shrinking substitutions were not reversible",
                    self.file, self.rejected
                )?;
                if let Some(delta) = self.closest_delta {
                    write!(f, " (closest other: +{} bits)", delta)?;
                }
                writeln!(f, "; stored unchanged")?;
            }
            None => {
                write!(f, "{}: no substitution shrinks this input", self.file)?;
                if let Some(delta) = self.closest_delta {
                    write!(f, " (closest: +{} bits)", delta)?;
                }
                writeln!(f, "; stored unchanged")?;
            }
        }
        write!(
            f,
            "{}: {} -> {} bits, {} bits saved ({:.2}%)",
            self.file,
            self.original_bits,
            self.new_bits,
            self.saved_bits(),
            self.ratio()
        )
    }
}

/// Escape and most frequent pattern lines for analysis mode.
pub fn analysis_lines(file: &str, bits: usize, found: &EscapeSearch) -> String {
    let mut out = format!(
        "{}: {} bits, {} widths examined\nEscape value = {} ({} bits)",
        file,
        bits,
        found.widths_examined,
        found.escape.value(),
        found.escape.width()
    );
    if let Some((victim, count)) = found.victim {
        out.push_str(&format!(
            "\nCompress value = {} ({} bits, {} times)",
            victim.value(),
            victim.width(),
            count
        ));
    }
    out
}

#[cfg(test)]
mod test {
    use super::{analysis_lines, Report};
    use crate::analysis::pattern::Pattern;
    use crate::analysis::selector::EscapeSearch;

    #[test]
    fn unchanged_report_test() {
        let report = Report {
            file: "random.bin".to_string(),
            original_bits: 8192,
            new_bits: 8192,
            selection: None,
            closest_delta: Some(17),
            rejected: 0,
        };
        assert_eq!(report.saved_bits(), 0);
        let text = report.to_string();
        assert!(text.contains("closest: +17 bits"));
        assert!(text.ends_with("8192 -> 8192 bits, 0 bits saved (100.00%)"));
    }

    #[test]
    fn irreversible_report_test() {
        let report = Report {
            file: "framed.bin".to_string(),
            original_bits: 16168,
            new_bits: 16168,
            selection: None,
            closest_delta: None,
            rejected: 27,
        };
        let text = report.to_string();
        assert!(text.starts_with("framed.bin: 27 shrinking substitutions were not reversible"));
        assert!(!text.contains("no substitution shrinks"));
    }

    #[test]
    fn ratio_test() {
        let report = Report {
            file: String::new(),
            original_bits: 8000,
            new_bits: 293,
            selection: None,
            closest_delta: None,
            rejected: 0,
        };
        assert_eq!(report.saved_bits(), 7707);
        assert!((report.ratio() - 3.6625).abs() < 1e-9);
    }

    #[test]
    fn analysis_lines_test() {
        let found = EscapeSearch {
            escape: Pattern::new(1, 1).unwrap(),
            victim: Some((Pattern::new(0, 1).unwrap(), 7999)),
            widths_examined: 1,
        };
        let text = analysis_lines("zeros", 8000, &found);
        assert!(text.contains("Escape value = 1 (1 bits)"));
        assert!(text.contains("Compress value = 0 (1 bits, 7999 times)"));
    }
}
