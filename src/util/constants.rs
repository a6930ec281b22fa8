// logcompact - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "logcompact";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "logcompact";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Timestamp prefix
// =============================================================================

/// Marker that introduces a timestamp at the start of a log line.
pub const TIMESTAMP_MARKER: &str = "TS:";

/// Separator between the two bounds of a range argument (`100-200`).
pub const RANGE_SEPARATOR: char = '-';

// =============================================================================
// Splitting
// =============================================================================

/// Separator placed between the output stem and the partition name.
pub const DEFAULT_PARTITION_SEPARATOR: &str = "_";

/// Partition name for lines that match no keyword (when kept).
pub const DEFAULT_UNMATCHED_NAME: &str = "unmatched";

/// Separator between keywords on the command line.
pub const KEYWORD_LIST_SEPARATOR: char = ',';

/// Maximum number of keywords accepted for a single split run.
/// Each keyword holds an open file handle for the whole run.
pub const MAX_KEYWORDS: usize = 256;

/// Maximum length of a partition separator or unmatched-partition name.
pub const MAX_PARTITION_NAME_LENGTH: usize = 64;

// =============================================================================
// I/O
// =============================================================================

/// Buffer capacity for each output file writer.
pub const OUTPUT_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

/// Buffer capacity for the input reader.
pub const INPUT_BUFFER_SIZE: usize = 64 * 1024; // 64 KB

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
