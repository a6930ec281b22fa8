// logcompact - core/select.rs
//
// Range selector: restricts the input to a line-number window and/or a
// timestamp window. Both windows are AND-combined when active.
// Core layer: operates on any iterator of lines, no file access.

use crate::core::model::{LineRange, LogLine, TimestampRange};
use crate::core::timestamp;
use crate::util::constants::RANGE_SEPARATOR;
use crate::util::error::RangeError;

/// Active range filters. Both `None` means every line is selected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeFilter {
    pub lines: Option<LineRange>,
    pub timestamps: Option<TimestampRange>,
}

impl RangeFilter {
    /// Returns true if no range is active.
    pub fn is_empty(&self) -> bool {
        self.lines.is_none() && self.timestamps.is_none()
    }

    /// Check a single line against every active range.
    ///
    /// Lines without a parseable timestamp never pass an active
    /// timestamp range.
    pub fn accepts(&self, line: &LogLine) -> bool {
        if let Some(range) = self.lines {
            if !range.contains(line.number) {
                return false;
            }
        }
        if let Some(range) = self.timestamps {
            match timestamp::timestamp_of(&line.text) {
                Some(ts) if range.contains(ts) => {}
                Some(_) => return false,
                None => {
                    tracing::trace!(
                        line = line.number,
                        "No timestamp prefix; excluded by timestamp range"
                    );
                    return false;
                }
            }
        }
        true
    }

    /// True once `number` is past the end of the line window; no later
    /// line can be selected.
    fn exhausted_at(&self, number: u64) -> bool {
        self.lines.is_some_and(|r| number > r.end())
    }
}

/// Counters collected while selecting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectStats {
    /// Lines pulled from the underlying reader.
    pub read: u64,
    /// Lines that passed every active range.
    pub selected: u64,
}

/// Lazy selector over a fallible line source.
///
/// Errors from the source are passed through untouched. Once the line
/// window is exhausted the source is no longer polled.
pub struct Selector<I> {
    inner: I,
    filter: RangeFilter,
    stats: SelectStats,
    done: bool,
}

impl<I> Selector<I> {
    pub fn new(inner: I, filter: RangeFilter) -> Self {
        Self {
            inner,
            filter,
            stats: SelectStats::default(),
            done: false,
        }
    }

    pub fn stats(&self) -> SelectStats {
        self.stats
    }
}

impl<I, E> Iterator for Selector<I>
where
    I: Iterator<Item = Result<LogLine, E>>,
{
    type Item = Result<LogLine, E>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match self.inner.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            self.stats.read += 1;

            if self.filter.exhausted_at(line.number) {
                tracing::debug!(line = line.number, "Line window exhausted; stopping read");
                self.done = true;
                break;
            }
            if self.filter.accepts(&line) {
                self.stats.selected += 1;
                return Some(Ok(line));
            }
        }
        None
    }
}

// =============================================================================
// Range argument parsing
// =============================================================================

/// Split `start-end` into its two trimmed halves.
///
/// The separator is the first `-` that is not the leading sign of the
/// start bound, so `-5--1` splits into `-5` and `-1`.
fn split_bounds(raw: &str) -> Result<(&str, &str), RangeError> {
    let trimmed = raw.trim();
    let skip = usize::from(trimmed.starts_with(['-', '+']));
    let pos = trimmed[skip..]
        .find(RANGE_SEPARATOR)
        .map(|p| p + skip)
        .ok_or_else(|| RangeError::MissingSeparator {
            raw: raw.to_string(),
        })?;
    Ok((trimmed[..pos].trim(), trimmed[pos + 1..].trim()))
}

/// Parse a `start-end` line-number window (1-based, inclusive).
pub fn parse_line_range(raw: &str) -> Result<LineRange, RangeError> {
    let (start, end) = split_bounds(raw)?;
    let parse = |bound: &str| {
        bound.parse::<u64>().map_err(|_| RangeError::InvalidBound {
            raw: raw.to_string(),
            bound: bound.to_string(),
        })
    };
    let (start, end) = (parse(start)?, parse(end)?);
    LineRange::new(start, end).map_err(|e| with_raw(e, raw))
}

/// Parse a `start-end` timestamp window (inclusive, finite floats).
pub fn parse_timestamp_range(raw: &str) -> Result<TimestampRange, RangeError> {
    let (start, end) = split_bounds(raw)?;
    let parse = |bound: &str| {
        bound.parse::<f64>().map_err(|_| RangeError::InvalidBound {
            raw: raw.to_string(),
            bound: bound.to_string(),
        })
    };
    let (start, end) = (parse(start)?, parse(end)?);
    TimestampRange::new(start, end).map_err(|e| with_raw(e, raw))
}

/// Replace the reconstructed range text in a constructor error with what
/// the user actually typed.
fn with_raw(err: RangeError, raw: &str) -> RangeError {
    let raw = raw.to_string();
    match err {
        RangeError::MissingSeparator { .. } => RangeError::MissingSeparator { raw },
        RangeError::InvalidBound { bound, .. } => RangeError::InvalidBound { raw, bound },
        RangeError::NonFinite { .. } => RangeError::NonFinite { raw },
        RangeError::ZeroLine { .. } => RangeError::ZeroLine { raw },
        RangeError::Inverted { .. } => RangeError::Inverted { raw },
    }
}
