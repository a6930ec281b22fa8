// logcompact - core/split.rs
//
// Keyword splitter: decides which output partitions each line belongs to,
// and how partition files are named.
// Core layer: pure logic, no I/O.

use crate::core::model::{KeywordSet, UnmatchedPolicy};
use std::path::{Path, PathBuf};

/// One output file of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Keyword or overflow name; `None` for the single unsplit output.
    pub name: Option<String>,
    /// Where the partition is written.
    pub path: PathBuf,
}

/// Routing plan for a run: the partitions to open and the rule for
/// assigning lines to them.
#[derive(Debug, Clone)]
pub struct SplitPlan {
    partitions: Vec<Partition>,
    keywords: Option<KeywordSet>,
    /// Index of the overflow partition, when unmatched lines are kept.
    overflow: Option<usize>,
}

impl SplitPlan {
    /// Everything goes to `output`.
    pub fn single(output: &Path) -> Self {
        Self {
            partitions: vec![Partition {
                name: None,
                path: output.to_path_buf(),
            }],
            keywords: None,
            overflow: None,
        }
    }

    /// One partition per keyword (in keyword order), plus an overflow
    /// partition last when the policy keeps unmatched lines.
    pub fn by_keywords(
        base: &Path,
        keywords: KeywordSet,
        policy: &UnmatchedPolicy,
        separator: &str,
    ) -> Self {
        let mut partitions: Vec<Partition> = keywords
            .iter()
            .map(|kw| Partition {
                name: Some(kw.to_string()),
                path: partition_path(base, kw, separator),
            })
            .collect();

        let overflow = match policy {
            UnmatchedPolicy::Drop => None,
            UnmatchedPolicy::Keep { name } => {
                // A keyword with the same name already owns that file.
                let existing = keywords.iter().position(|kw| kw == name.as_str());
                existing.or_else(|| {
                    partitions.push(Partition {
                        name: Some(name.clone()),
                        path: partition_path(base, name, separator),
                    });
                    Some(partitions.len() - 1)
                })
            }
        };

        Self {
            partitions,
            keywords: Some(keywords),
            overflow,
        }
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Indices of the partitions `line` is written to, in partition order.
    ///
    /// Unsplit: always `[0]`. Split: every keyword contained in the line;
    /// if none, the overflow partition or nothing.
    pub fn route(&self, line: &str) -> Vec<usize> {
        let Some(keywords) = &self.keywords else {
            return vec![0];
        };
        let hits: Vec<usize> = keywords
            .iter()
            .enumerate()
            .filter(|(_, kw)| line.contains(kw))
            .map(|(idx, _)| idx)
            .collect();
        if hits.is_empty() {
            return self.overflow.into_iter().collect();
        }
        hits
    }
}

/// Path of the partition `name` derived from the output base path.
///
/// `<stem><sep><name>` with the base's extension kept at the end:
/// `out` -> `out_ERROR`, `logs/run.log` -> `logs/run_ERROR.log`.
/// Path separators inside `name` are replaced so that a keyword can never
/// point outside the base's directory.
pub fn partition_path(base: &Path, name: &str, separator: &str) -> PathBuf {
    let safe: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match base.extension() {
        Some(ext) => format!("{stem}{separator}{safe}.{}", ext.to_string_lossy()),
        None => format!("{stem}{separator}{safe}"),
    };
    base.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(keywords: &str, policy: UnmatchedPolicy) -> SplitPlan {
        SplitPlan::by_keywords(
            Path::new("out"),
            KeywordSet::parse(keywords).unwrap(),
            &policy,
            "_",
        )
    }

    #[test]
    fn test_partition_naming() {
        assert_eq!(
            partition_path(Path::new("out"), "ERROR", "_"),
            PathBuf::from("out_ERROR")
        );
        assert_eq!(
            partition_path(Path::new("logs/run.log"), "WARN", "_"),
            PathBuf::from("logs/run_WARN.log")
        );
        assert_eq!(
            partition_path(Path::new("out"), "../etc/x", "."),
            PathBuf::from("out..._etc_x")
        );
    }

    #[test]
    fn test_single_routes_everything() {
        let plan = SplitPlan::single(Path::new("o.log"));
        assert_eq!(plan.partitions().len(), 1);
        assert_eq!(plan.route("anything"), vec![0]);
    }

    #[test]
    fn test_error_line_routed_info_line_dropped() {
        let plan = plan("ERROR,WARNING", UnmatchedPolicy::Drop);
        let paths: Vec<_> = plan.partitions().iter().map(|p| p.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("out_ERROR"), PathBuf::from("out_WARNING")]
        );
        assert_eq!(plan.route("TS:1 ERROR disk"), vec![0]);
        assert!(plan.route("TS:2 INFO ok").is_empty());
    }

    #[test]
    fn test_line_matching_several_keywords_goes_to_each() {
        let plan = plan("ERROR,disk", UnmatchedPolicy::Drop);
        assert_eq!(plan.route("ERROR disk full"), vec![0, 1]);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        let plan = plan("ERROR", UnmatchedPolicy::Drop);
        assert!(plan.route("error lowercase").is_empty());
    }

    #[test]
    fn test_unmatched_kept_in_overflow() {
        let plan = plan(
            "ERROR",
            UnmatchedPolicy::Keep {
                name: "other".to_string(),
            },
        );
        assert_eq!(plan.partitions()[1].path, PathBuf::from("out_other"));
        assert_eq!(plan.route("INFO fine"), vec![1]);
        assert_eq!(plan.route("ERROR bad"), vec![0]);
    }

    #[test]
    fn test_overflow_named_like_keyword_shares_its_file() {
        let plan = plan(
            "ERROR,misc",
            UnmatchedPolicy::Keep {
                name: "misc".to_string(),
            },
        );
        assert_eq!(plan.partitions().len(), 2);
        assert_eq!(plan.route("INFO fine"), vec![1]);
    }
}
