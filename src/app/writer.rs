// logcompact - app/writer.rs
//
// Partition writer: one buffered file handle per output file, opened up
// front and released when the writer is dropped (including on error paths).

use crate::core::split::Partition;
use crate::platform::fs::ensure_parent_dir;
use crate::util::constants;
use crate::util::error::LogCompactError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

struct Sink {
    path: PathBuf,
    out: BufWriter<File>,
    lines: u64,
}

/// Writes lines to the partitions of a run, in arrival order.
pub struct PartitionWriter {
    sinks: Vec<Sink>,
    /// Partition index -> sink index. Partitions resolving to the same
    /// path share one handle.
    slots: Vec<usize>,
}

impl PartitionWriter {
    /// Create (truncate) every partition file, creating parent directories
    /// as needed.
    pub fn open(partitions: &[Partition]) -> Result<Self, LogCompactError> {
        let mut sinks: Vec<Sink> = Vec::with_capacity(partitions.len());
        let mut slots = Vec::with_capacity(partitions.len());

        for partition in partitions {
            if let Some(idx) = sinks.iter().position(|s| s.path == partition.path) {
                tracing::warn!(
                    path = %partition.path.display(),
                    "Two partitions map to the same file; sharing it"
                );
                slots.push(idx);
                continue;
            }
            let file = create(&partition.path)?;
            tracing::debug!(
                path = %partition.path.display(),
                partition = partition.name.as_deref().unwrap_or("<output>"),
                "Opened output file"
            );
            sinks.push(Sink {
                path: partition.path.clone(),
                out: BufWriter::with_capacity(constants::OUTPUT_BUFFER_SIZE, file),
                lines: 0,
            });
            slots.push(sinks.len() - 1);
        }

        Ok(Self { sinks, slots })
    }

    /// Append `line` to each listed partition.
    ///
    /// Partitions sharing a file receive the line once.
    pub fn write_line(&mut self, line: &str, partitions: &[usize]) -> Result<(), LogCompactError> {
        let mut written: Vec<usize> = Vec::with_capacity(partitions.len());
        for &p in partitions {
            let idx = self.slots[p];
            if written.contains(&idx) {
                continue;
            }
            written.push(idx);

            let sink = &mut self.sinks[idx];
            writeln!(sink.out, "{line}").map_err(|e| LogCompactError::UnwritableOutput {
                path: sink.path.clone(),
                source: e,
            })?;
            sink.lines += 1;
        }
        Ok(())
    }

    /// Flush every file and return `(path, lines written)` per file.
    pub fn finish(self) -> Result<Vec<(PathBuf, u64)>, LogCompactError> {
        let mut counts = Vec::with_capacity(self.sinks.len());
        for mut sink in self.sinks {
            sink.out
                .flush()
                .map_err(|e| LogCompactError::UnwritableOutput {
                    path: sink.path.clone(),
                    source: e,
                })?;
            counts.push((sink.path, sink.lines));
        }
        Ok(counts)
    }
}

fn create(path: &Path) -> Result<File, LogCompactError> {
    let unwritable = |e| LogCompactError::UnwritableOutput {
        path: path.to_path_buf(),
        source: e,
    };
    ensure_parent_dir(path).map_err(unwritable)?;
    File::create(path).map_err(unwritable)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition(path: PathBuf) -> Partition {
        Partition { name: None, path }
    }

    #[test]
    fn test_writes_in_order_and_counts() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("nested").join("a.log");
        let b = dir.path().join("b.log");
        let mut w = PartitionWriter::open(&[partition(a.clone()), partition(b.clone())]).unwrap();
        w.write_line("one", &[0]).unwrap();
        w.write_line("two", &[0, 1]).unwrap();
        w.write_line("three", &[]).unwrap();
        let counts = w.finish().unwrap();

        assert_eq!(counts, vec![(a.clone(), 2), (b.clone(), 1)]);
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "one\ntwo\n");
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "two\n");
    }

    #[test]
    fn test_shared_path_receives_line_once() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("same.log");
        let mut w = PartitionWriter::open(&[partition(p.clone()), partition(p.clone())]).unwrap();
        w.write_line("x", &[0, 1]).unwrap();
        assert_eq!(w.finish().unwrap(), vec![(p.clone(), 1)]);
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "x\n");
    }

    #[test]
    fn test_unwritable_output_path() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file standing where a directory is needed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let result = PartitionWriter::open(&[partition(blocker.join("out.log"))]);
        assert!(matches!(
            result,
            Err(LogCompactError::UnwritableOutput { .. })
        ));
    }
}
