// logcompact - platform/fs.rs
//
// Filesystem access: opening the input log, lazy line reading, and
// preparing output directories.

use crate::core::model::LogLine;
use crate::util::constants;
use crate::util::error::LogCompactError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Open the input log file for buffered reading.
///
/// A missing file is `InputNotFound`; any other failure (permissions, the
/// path being a directory) is `InputRead`.
pub fn open_input(path: &Path) -> Result<LineReader<BufReader<File>>, LogCompactError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LogCompactError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => LogCompactError::InputRead {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    let is_dir = file.metadata().map(|m| m.is_dir()).unwrap_or(false);
    if is_dir {
        return Err(LogCompactError::InputRead {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path is a directory"),
        });
    }

    tracing::debug!(path = %path.display(), "Opened input log");
    Ok(LineReader::new(
        BufReader::with_capacity(constants::INPUT_BUFFER_SIZE, file),
        path.to_path_buf(),
    ))
}

/// Lazy, numbered line iterator over any buffered reader.
///
/// Strips `\n` and `\r\n` terminators. Invalid UTF-8 is replaced rather
/// than failing the run.
pub struct LineReader<R> {
    reader: R,
    path: PathBuf,
    number: u64,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R, path: PathBuf) -> Self {
        Self {
            reader,
            path,
            number: 0,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = Result<LogLine, LogCompactError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                self.number += 1;
                let text = match String::from_utf8_lossy(&self.buf) {
                    std::borrow::Cow::Borrowed(s) => s.to_string(),
                    std::borrow::Cow::Owned(s) => {
                        tracing::debug!(
                            path = %self.path.display(),
                            line = self.number,
                            "Replaced invalid UTF-8 in line"
                        );
                        s
                    }
                };
                Some(Ok(LogLine::new(self.number, text)))
            }
            Err(e) => Some(Err(LogCompactError::InputRead {
                path: self.path.clone(),
                source: e,
            })),
        }
    }
}

/// True when both paths exist and resolve to the same file.
///
/// A path that cannot be resolved (usually because it does not exist yet)
/// is never the same file as anything.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Create the parent directory of `path` if it does not exist yet.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            tracing::debug!(dir = %dir.display(), "Creating output directory");
            std::fs::create_dir_all(dir)
        }
        _ => Ok(()),
    }
}
