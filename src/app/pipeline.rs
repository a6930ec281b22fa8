// logcompact - app/pipeline.rs
//
// Single-pass run: reader -> range selector -> compactor -> splitter -> writer.
// Everything is lazy; at most one compacted record is held in memory.

use crate::app::writer::PartitionWriter;
use crate::core::compact::Compacted;
use crate::core::model::{KeywordSet, UnmatchedPolicy};
use crate::core::select::{RangeFilter, Selector};
use crate::core::split::SplitPlan;
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::{LogCompactError, Result};
use crate::util::logging;
use std::io;
use std::path::PathBuf;

/// Everything a run needs, already parsed and validated.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Output path, or base name when splitting.
    pub output: PathBuf,
    pub compact: bool,
    pub ranges: RangeFilter,
    pub keywords: Option<KeywordSet>,
    pub unmatched: UnmatchedPolicy,
    pub partition_separator: String,
}

impl RunOptions {
    /// Options for a plain copy of `input` to `output`.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            compact: false,
            ranges: RangeFilter::default(),
            keywords: None,
            unmatched: UnmatchedPolicy::Drop,
            partition_separator: constants::DEFAULT_PARTITION_SEPARATOR.to_string(),
        }
    }

    fn plan(&self) -> SplitPlan {
        match &self.keywords {
            Some(keywords) => SplitPlan::by_keywords(
                &self.output,
                keywords.clone(),
                &self.unmatched,
                &self.partition_separator,
            ),
            None => SplitPlan::single(&self.output),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines pulled from the input file.
    pub lines_read: u64,
    /// Lines that passed the range filters.
    pub lines_selected: u64,
    /// Lines folded into an earlier line by compaction.
    pub lines_merged: u64,
    /// Output lines that went to no file (split with unmatched lines dropped).
    pub lines_dropped: u64,
    /// Lines written, per output file.
    pub outputs: Vec<(PathBuf, u64)>,
}

/// Run the whole pipeline once.
///
/// All output files are created before the first line is read, so an
/// unwritable output fails the run before any work is done.
pub fn run(options: &RunOptions) -> Result<RunSummary> {
    tracing::info!(
        input = %options.input.display(),
        output = %options.output.display(),
        compact = options.compact,
        split = options.keywords.as_ref().map_or(0, KeywordSet::len),
        ranged = !options.ranges.is_empty(),
        "Processing log"
    );

    let reader = fs::open_input(&options.input)?;
    let plan = options.plan();

    // Creating an output truncates it; never let that be the input.
    if let Some(clash) = plan
        .partitions()
        .iter()
        .find(|p| fs::same_file(&p.path, &options.input))
    {
        return Err(LogCompactError::UnwritableOutput {
            path: clash.path.clone(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "output file is the input file",
            ),
        });
    }

    let mut writer = PartitionWriter::open(plan.partitions())?;

    let mut selected = Selector::new(reader, options.ranges);
    let mut compacted = Compacted::new(selected.by_ref(), options.compact);
    let mut dropped = 0u64;

    for line in compacted.by_ref() {
        let line = line?;
        let targets = plan.route(&line);
        if targets.is_empty() {
            tracing::trace!(line = logging::preview(&line), "Matched no keyword; dropped");
            dropped += 1;
            continue;
        }
        writer.write_line(&line, &targets)?;
    }

    let merged = compacted.merged();
    let stats = selected.stats();
    let outputs = writer.finish()?;

    let summary = RunSummary {
        lines_read: stats.read,
        lines_selected: stats.selected,
        lines_merged: merged,
        lines_dropped: dropped,
        outputs,
    };
    tracing::info!(
        read = summary.lines_read,
        selected = summary.lines_selected,
        merged = summary.lines_merged,
        dropped = summary.lines_dropped,
        files = summary.outputs.len(),
        "Processing complete"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.log");
        let result = run(&RunOptions::new(dir.path().join("missing.log"), &out));
        assert!(matches!(result, Err(LogCompactError::InputNotFound { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn test_output_same_as_input_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("app.log");
        std::fs::write(&input, "TS:1 A\nTS:2 A\nTS:3 B\n").unwrap();
        let mut options = RunOptions::new(&input, &input);
        options.compact = true;

        let result = run(&options);
        assert!(
            matches!(result, Err(LogCompactError::UnwritableOutput { .. })),
            "expected UnwritableOutput, got {result:?}"
        );
        assert_eq!(
            std::fs::read_to_string(&input).unwrap(),
            "TS:1 A\nTS:2 A\nTS:3 B\n"
        );
    }

    #[test]
    fn test_split_partition_resolving_to_input_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        // Base "app" with keyword "ERROR" names the partition "app_ERROR".
        let input = dir.path().join("app_ERROR");
        std::fs::write(&input, "ERROR x\n").unwrap();
        let mut options = RunOptions::new(&input, dir.path().join("app"));
        options.keywords = Some(KeywordSet::parse("ERROR").unwrap());

        assert!(matches!(
            run(&options),
            Err(LogCompactError::UnwritableOutput { .. })
        ));
        assert_eq!(std::fs::read_to_string(&input).unwrap(), "ERROR x\n");
    }

    #[test]
    fn test_summary_counts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.log");
        std::fs::write(&input, "TS:1 a\nTS:2 a\nTS:3 b\nTS:4 c\n").unwrap();
        let mut options = RunOptions::new(&input, dir.path().join("out"));
        options.compact = true;
        options.keywords = Some(KeywordSet::parse("a,b").unwrap());

        let summary = run(&options).unwrap();
        assert_eq!(summary.lines_read, 4);
        assert_eq!(summary.lines_selected, 4);
        assert_eq!(summary.lines_merged, 1);
        assert_eq!(summary.lines_dropped, 1);
        assert_eq!(
            summary.outputs,
            vec![
                (dir.path().join("out_a"), 1),
                (dir.path().join("out_b"), 1)
            ]
        );
    }
}
