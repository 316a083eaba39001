use log::{debug, info, trace, warn};
use rayon::prelude::*;

use super::histogram::compute_histogram;
use super::pattern::{check_width, Pattern, MAX_WIDTH};
use crate::bitstream::{bitbuffer::BitBuffer, bitreader::BitReader};
use crate::error::{BitsubError, Result};
use crate::substitution::decoder::decode;
use crate::substitution::encoder::{encode, measure, EncodeStats, SubstitutionSpec};

/// Knobs for the width searches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorConfig {
    /// Widest pattern examined (1-32).
    pub max_width: u8,
    /// Evaluate candidate victim widths on the rayon pool.
    pub parallel: bool,
    /// Only accept a substitution that decodes back to the input.
    pub verify: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_width: MAX_WIDTH,
            parallel: true,
            verify: true,
        }
    }
}

/// Result of the ascending escape search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapeSearch {
    /// An absent pattern at the smallest width that has one.
    pub escape: Pattern,
    /// Most frequent pattern over every width examined, with its count.
    pub victim: Option<(Pattern, u64)>,
    /// Widths whose histograms were computed.
    pub widths_examined: u8,
}

/// A substitution that shrinks the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub spec: SubstitutionSpec,
    /// Occurrences of the victim among all (overlapping) windows.
    pub victim_count: u64,
    /// Exact accounting of the greedy substitution.
    pub stats: EncodeStats,
}

/// Widen the pattern one bit at a time until some pattern never occurs.
///
/// Along the way the most frequent pattern of every width competes on raw count; a later
/// width only takes over with a strictly larger count. Fails with `InsufficientData` as
/// soon as a width has no complete window (an empty buffer fails at width 1), and with
/// `NoEscapeFound` when every width up to `max_width` is saturated.
pub fn ascending_escape_search(buffer: &BitBuffer, config: &SelectorConfig) -> Result<EscapeSearch> {
    check_width(config.max_width, MAX_WIDTH)?;
    let mut victim: Option<(Pattern, u64)> = None;

    for width in 1..=config.max_width {
        let histogram = compute_histogram(buffer, width)?;
        if !histogram.has_data() {
            return Err(BitsubError::InsufficientData {
                bits: buffer.len(),
                width,
            });
        }
        if let Some((pattern, count)) = histogram.most_frequent() {
            if victim.map_or(true, |(_, best)| count > best) {
                victim = Some((pattern, count));
            }
        }
        if let Some(escape) = histogram.escape() {
            debug!("Escape {} found after {} widths", escape, width);
            return Ok(EscapeSearch {
                escape,
                victim,
                widths_examined: width,
            });
        }
        trace!("All {} patterns of width {} occur", 1_u64 << width, width);
    }
    Err(BitsubError::NoEscapeFound {
        max_width: config.max_width,
    })
}

/// The most frequent pattern at `width`, paired with `escape` and measured.
#[derive(Debug, Clone)]
struct Candidate {
    spec: SubstitutionSpec,
    victim_count: u64,
    stats: EncodeStats,
}

fn evaluate(buffer: &BitBuffer, escape: Pattern, width: u8) -> Result<Option<Candidate>> {
    let histogram = compute_histogram(buffer, width)?;
    let (victim, victim_count) = match histogram.most_frequent() {
        Some(found) => found,
        None => return Ok(None),
    };
    let spec = SubstitutionSpec::new(victim, escape);
    let stats = measure(buffer, &spec);
    trace!(
        "Width {}: victim {} x{} ({} greedy matches), delta {} bits",
        width,
        victim,
        victim_count,
        stats.matches,
        stats.delta()
    );
    Ok(Some(Candidate {
        spec,
        victim_count,
        stats,
    }))
}

fn round_trips(buffer: &BitBuffer, spec: &SubstitutionSpec) -> Result<bool> {
    Ok(decode(&encode(buffer, spec))? == *buffer)
}

/// Walks the candidates widest first and takes the first that shrinks the buffer,
/// remembering why the others were passed over.
struct Picker<'a> {
    buffer: &'a BitBuffer,
    verify: bool,
    closest_delta: Option<i64>,
    rejected: u32,
}

impl<'a> Picker<'a> {
    fn new(buffer: &'a BitBuffer, verify: bool) -> Self {
        Self {
            buffer,
            verify,
            closest_delta: None,
            rejected: 0,
        }
    }

    fn offer(&mut self, candidate: Option<Candidate>) -> Result<Option<Selection>> {
        let candidate = match candidate {
            Some(c) => c,
            None => return Ok(None),
        };
        let delta = candidate.stats.delta();
        if delta >= 0 {
            self.closest_delta = Some(self.closest_delta.map_or(delta, |d| d.min(delta)));
            return Ok(None);
        }
        if self.verify && !round_trips(self.buffer, &candidate.spec)? {
            warn!(
                "Skipping victim {}: {} also arises in the copied bits",
                candidate.spec.victim, candidate.spec.replacement
            );
            self.rejected += 1;
            return Ok(None);
        }
        Ok(Some(Selection {
            spec: candidate.spec,
            victim_count: candidate.victim_count,
            stats: candidate.stats,
        }))
    }

    fn give_up(self) -> BitsubError {
        BitsubError::NoBeneficialSubstitution {
            closest_delta: self.closest_delta,
            rejected: self.rejected,
        }
    }
}

/// Try victims from `max_width` down to one bit wider than `escape`.
///
/// In parallel mode the widths are measured in batches of one width per rayon thread, so at
/// most that many histograms are alive at once and the walk stops at the first batch that
/// yields a selection. Batches are picked from in descending order, like the sequential walk.
fn try_victims(
    picker: &mut Picker<'_>,
    escape: Pattern,
    config: &SelectorConfig,
) -> Result<Option<Selection>> {
    let buffer = picker.buffer;
    let widths: Vec<u8> = (escape.width() + 1..=config.max_width).rev().collect();
    if config.parallel {
        for batch in widths.chunks(rayon::current_num_threads().max(1)) {
            let measured: Vec<Result<Option<Candidate>>> = batch
                .par_iter()
                .map(|&width| evaluate(buffer, escape, width))
                .collect();
            for candidate in measured {
                if let Some(selection) = picker.offer(candidate?)? {
                    return Ok(Some(selection));
                }
            }
        }
    } else {
        for &width in &widths {
            if let Some(selection) = picker.offer(evaluate(buffer, escape, width)?)? {
                return Ok(Some(selection));
            }
        }
    }
    Ok(None)
}

/// An escape that the decoder can always tell apart from copied bits.
///
/// Starting at `from_width`, take the highest absent pattern that cannot overlap itself and
/// differs from the final window (the one window the histogram leaves out). A copied window
/// then never equals it, and no window straddling a replacement can either.
pub fn reversible_escape(
    buffer: &BitBuffer,
    from_width: u8,
    max_width: u8,
) -> Result<Option<Pattern>> {
    for width in from_width..max_width {
        let histogram = compute_histogram(buffer, width)?;
        if !histogram.has_data() {
            break;
        }
        let last = BitReader::at(buffer, buffer.len() - width as usize).bint(width);
        let found = histogram
            .escape_where(|p| !p.overlaps_itself() && Some(p.value()) != last);
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

/// Find the escape with the ascending search, then try victims from `max_width` down to one
/// bit wider than the escape. The first width whose substitution is strictly shorter than
/// the input wins.
///
/// With `config.verify`, a candidate must also decode back to the input. When every
/// shrinking candidate fails that check the walk is repeated once with the
/// `reversible_escape()`, which may be wider than the first escape.
///
/// With `config.parallel` widths are measured on the rayon pool; the choice is still made in
/// descending order, so the result matches the sequential search.
pub fn descending_victim_search(buffer: &BitBuffer, config: &SelectorConfig) -> Result<Selection> {
    let escape = ascending_escape_search(buffer, config)?.escape;
    info!(
        "Escape {}; trying victim widths {} down to {}",
        escape,
        config.max_width,
        escape.width() + 1
    );

    let mut picker = Picker::new(buffer, config.verify);
    let mut selection = try_victims(&mut picker, escape, config)?;
    if selection.is_none() && picker.rejected > 0 {
        match reversible_escape(buffer, escape.width(), config.max_width)? {
            Some(fallback) if fallback != escape => {
                info!(
                    "{} shrinking victims did not decode back; retrying with escape {}",
                    picker.rejected, fallback
                );
                selection = try_victims(&mut picker, fallback, config)?;
            }
            _ => debug!("No other reversible escape below {} bits", config.max_width),
        }
    }
    let selection = selection.ok_or_else(|| picker.give_up())?;

    info!(
        "Selected victim {} ({} matches): {} -> {} bits",
        selection.spec.victim,
        selection.stats.matches,
        selection.stats.original_bits,
        selection.stats.encoded_bits
    );
    Ok(selection)
}
