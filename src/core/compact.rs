// logcompact - core/compact.rs
//
// Compaction of consecutive duplicate lines.
//
// Two lines are duplicates when their comparison keys are equal: the text
// after the `TS: <float>` prefix, or the whole line when there is no
// prefix. A run of duplicates becomes one record carrying the repeat count
// and the lowest/highest timestamp seen in the run.
//
// Core layer: pure logic, no I/O.

use crate::core::model::{LogLine, Timestamp};
use crate::core::timestamp;
use crate::util::constants::TIMESTAMP_MARKER;

// =============================================================================
// Compacted record
// =============================================================================

/// One run of consecutive lines sharing a comparison key.
#[derive(Debug, Clone, PartialEq)]
pub struct CompactRecord {
    /// Comparison key shared by every line in the run.
    pub key: String,
    /// First line of the run, verbatim. Rendered as-is when `count == 1`.
    pub first_line: String,
    /// Number of lines in the run. Always >= 1.
    pub count: u64,
    /// Lowest timestamp seen in the run.
    pub earliest: Option<Timestamp>,
    /// Highest timestamp seen in the run.
    pub latest: Option<Timestamp>,
}

impl CompactRecord {
    fn start(line: String) -> Self {
        let (key, ts) = timestamp::split_key(&line);
        Self {
            key: key.to_string(),
            first_line: line,
            count: 1,
            earliest: ts.clone(),
            latest: ts,
        }
    }

    fn absorb(&mut self, ts: Option<Timestamp>) {
        self.count += 1;
        let Some(ts) = ts else { return };
        if self.earliest.as_ref().map_or(true, |e| ts.value < e.value) {
            self.earliest = Some(ts.clone());
        }
        if self.latest.as_ref().map_or(true, |l| ts.value > l.value) {
            self.latest = Some(ts);
        }
    }

    /// Render the record as a single output line.
    ///
    /// - one line: the original line, unchanged
    /// - repeated with timestamps: `TS: <key> (x<n>, TS: <first>-<last>)`
    /// - repeated without timestamps: `<key> (x<n>)`
    pub fn render(&self) -> String {
        if self.count == 1 {
            return self.first_line.clone();
        }
        match (&self.earliest, &self.latest) {
            (Some(first), Some(last)) => format!(
                "{TIMESTAMP_MARKER} {} (x{}, {TIMESTAMP_MARKER} {}-{})",
                self.key, self.count, first.raw, last.raw
            ),
            _ => format!("{} (x{})", self.key, self.count),
        }
    }
}

// =============================================================================
// Push-style compactor
// =============================================================================

/// Stateful compactor. States: no pending record / pending record present.
///
/// `push` returns the previous record whenever the key changes; `finish`
/// returns whatever is still pending at end of input.
#[derive(Debug, Default)]
pub struct Compactor {
    pending: Option<CompactRecord>,
    merged: u64,
}

impl Compactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next line. Returns the flushed record if the key changed.
    pub fn push(&mut self, line: String) -> Option<CompactRecord> {
        if let Some(pending) = self.pending.as_mut() {
            let (key, ts) = timestamp::split_key(&line);
            if key == pending.key {
                pending.absorb(ts);
                self.merged += 1;
                return None;
            }
        }
        self.pending.replace(CompactRecord::start(line))
    }

    /// Flush the final pending record, if any.
    pub fn finish(&mut self) -> Option<CompactRecord> {
        self.pending.take()
    }

    /// Number of input lines folded into an earlier line of the same run.
    pub fn merged(&self) -> u64 {
        self.merged
    }
}

// =============================================================================
// Iterator adapter
// =============================================================================

/// Lazy compaction over a fallible line source.
///
/// When disabled every line is passed through unchanged. Source errors are
/// yielded as soon as they are seen; the pending record is dropped in that
/// case since the run is aborted anyway.
pub struct Compacted<I> {
    inner: I,
    compactor: Option<Compactor>,
    exhausted: bool,
}

impl<I> Compacted<I> {
    pub fn new(inner: I, enabled: bool) -> Self {
        Self {
            inner,
            compactor: enabled.then(Compactor::new),
            exhausted: false,
        }
    }

    /// Lines merged into earlier records so far (0 when disabled).
    pub fn merged(&self) -> u64 {
        self.compactor.as_ref().map_or(0, Compactor::merged)
    }
}

impl<I, E> Iterator for Compacted<I>
where
    I: Iterator<Item = Result<LogLine, E>>,
{
    type Item = Result<String, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(compactor) = self.compactor.as_mut() else {
            return self.inner.next().map(|r| r.map(|line| line.text));
        };
        if self.exhausted {
            return None;
        }
        loop {
            match self.inner.next() {
                Some(Ok(line)) => {
                    if let Some(record) = compactor.push(line.text) {
                        return Some(Ok(record.render()));
                    }
                }
                Some(Err(e)) => return Some(Err(e)),
                None => {
                    self.exhausted = true;
                    return compactor.finish().map(|r| Ok(r.render()));
                }
            }
        }
    }
}

/// Compact an in-memory sequence of lines. Convenience for callers that
/// already hold the whole input.
pub fn compact_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut compactor = Compactor::new();
    let mut out: Vec<String> = lines
        .into_iter()
        .filter_map(|l| compactor.push(l.to_string()))
        .map(|r| r.render())
        .collect();
    out.extend(compactor.finish().map(|r| r.render()));
    out
}
