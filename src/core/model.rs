// logcompact - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use crate::util::error::{LogCompactError, RangeError};

// =============================================================================
// Log line
// =============================================================================

/// A single line read from the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based position in the input file.
    pub number: u64,

    /// Line text with the terminator (`\n` or `\r\n`) removed.
    pub text: String,
}

impl LogLine {
    pub fn new(number: u64, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

// =============================================================================
// Timestamp
// =============================================================================

/// A timestamp parsed from a `TS: <float>` line prefix.
///
/// The raw token is kept so that rendering reproduces the input text
/// exactly (`100.0` stays `100.0`, not `100`).
#[derive(Debug, Clone, PartialEq)]
pub struct Timestamp {
    pub value: f64,
    pub raw: String,
}

// =============================================================================
// Range bounds
// =============================================================================

/// Inclusive, 1-based line-number window. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: u64,
    end: u64,
}

impl LineRange {
    pub fn new(start: u64, end: u64) -> Result<Self, RangeError> {
        let raw = format!("{start}-{end}");
        if start == 0 {
            return Err(RangeError::ZeroLine { raw });
        }
        if start > end {
            return Err(RangeError::Inverted { raw });
        }
        Ok(Self { start, end })
    }

    pub fn end(&self) -> u64 {
        self.end
    }

    pub fn contains(&self, number: u64) -> bool {
        (self.start..=self.end).contains(&number)
    }
}

/// Inclusive timestamp window with finite bounds. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampRange {
    start: f64,
    end: f64,
}

impl TimestampRange {
    pub fn new(start: f64, end: f64) -> Result<Self, RangeError> {
        let raw = format!("{start}-{end}");
        if !start.is_finite() || !end.is_finite() {
            return Err(RangeError::NonFinite { raw });
        }
        if start > end {
            return Err(RangeError::Inverted { raw });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }
}

// =============================================================================
// Keyword set
// =============================================================================

/// Ordered, de-duplicated list of case-sensitive split keywords.
///
/// Each keyword defines one output partition. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Parse a comma-separated keyword list.
    ///
    /// Entries are trimmed, empty entries are discarded, and repeated
    /// keywords keep their first position.
    pub fn parse(raw: &str) -> Result<Self, LogCompactError> {
        let mut keywords: Vec<String> = Vec::new();
        for kw in raw.split(constants::KEYWORD_LIST_SEPARATOR) {
            let kw = kw.trim();
            if kw.is_empty() || keywords.iter().any(|k| k == kw) {
                continue;
            }
            keywords.push(kw.to_string());
        }

        if keywords.is_empty() {
            return Err(LogCompactError::InvalidKeywords {
                raw: raw.to_string(),
                reason: "no keywords provided",
            });
        }
        if keywords.len() > constants::MAX_KEYWORDS {
            return Err(LogCompactError::InvalidKeywords {
                raw: raw.to_string(),
                reason: "too many keywords",
            });
        }
        Ok(Self { keywords })
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// What happens to a line that matches none of the split keywords.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnmatchedPolicy {
    /// The line is written nowhere.
    #[default]
    Drop,
    /// The line goes to an overflow partition with the given name.
    Keep { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_range_rejects_zero_and_inverted() {
        assert!(matches!(
            LineRange::new(0, 3),
            Err(RangeError::ZeroLine { .. })
        ));
        assert!(matches!(
            LineRange::new(4, 3),
            Err(RangeError::Inverted { .. })
        ));
        let r = LineRange::new(2, 2).unwrap();
        assert!(r.contains(2));
        assert!(!r.contains(1));
        assert!(!r.contains(3));
    }

    #[test]
    fn test_timestamp_range_inclusive_bounds() {
        let r = TimestampRange::new(100.0, 101.0).unwrap();
        assert!(r.contains(100.0));
        assert!(r.contains(101.0));
        assert!(!r.contains(101.0001));
        assert!(TimestampRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_keyword_set_trims_and_dedupes() {
        let set = KeywordSet::parse(" ERROR, WARNING,,ERROR ").unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["ERROR", "WARNING"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_keyword_set_empty_is_error() {
        assert!(matches!(
            KeywordSet::parse(" , ,"),
            Err(LogCompactError::InvalidKeywords { .. })
        ));
    }
}
