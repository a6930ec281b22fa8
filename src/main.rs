// logcompact - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading (platform default or --config)
// 3. Logging initialisation (debug mode support)
// 4. Pipeline run and exit code

use clap::Parser;
use logcompact::app::pipeline::{self, RunOptions, RunSummary};
use logcompact::core::model::KeywordSet;
use logcompact::core::select::{self, RangeFilter};
use logcompact::platform::config::{self, AppConfig};
use logcompact::util;
use logcompact::util::error::LogCompactError;
use std::path::PathBuf;
use std::process::ExitCode;

/// logcompact - merge repeated log lines, split by keyword, filter by range.
///
/// Lines may start with a `TS: <float>` timestamp; it is ignored when
/// comparing lines and used for --timestamp-range.
#[derive(Parser, Debug)]
#[command(name = "logcompact", version, about)]
struct Cli {
    /// Input log file.
    log: PathBuf,

    /// Output file, or base name for split outputs. Split files are named
    /// <stem>_<keyword> with the extension kept: out.log -> out_ERROR.log.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,

    /// Merge consecutive duplicate lines into one annotated line.
    #[arg(short = 'c', long = "compact")]
    compact: bool,

    /// Comma-separated keywords; writes one output file per keyword.
    #[arg(short = 's', long = "split", value_name = "KW1,KW2,...")]
    split: Option<String>,

    /// Line-number window to process, 1-based and inclusive (e.g. 100-200).
    #[arg(short = 't', long = "time-range", value_name = "START-END", allow_hyphen_values = true)]
    line_range: Option<String>,

    /// Timestamp window to process, inclusive (e.g. 100026.000-100050.500).
    #[arg(long = "timestamp-range", value_name = "START-END", allow_hyphen_values = true)]
    timestamp_range: Option<String>,

    /// Write lines matching no split keyword to <base>_unmatched instead of dropping them.
    #[arg(long = "keep-unmatched")]
    keep_unmatched: bool,

    /// Config file to use instead of the platform default.
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Do not print the run summary.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

impl Cli {
    /// Turn raw arguments plus config into validated run options.
    fn run_options(&self, config: &AppConfig) -> Result<RunOptions, LogCompactError> {
        let ranges = RangeFilter {
            lines: self
                .line_range
                .as_deref()
                .map(select::parse_line_range)
                .transpose()?,
            timestamps: self
                .timestamp_range
                .as_deref()
                .map(select::parse_timestamp_range)
                .transpose()?,
        };
        let keywords = self.split.as_deref().map(KeywordSet::parse).transpose()?;

        Ok(RunOptions {
            input: self.log.clone(),
            output: self.output.clone(),
            compact: self.compact || config.compact,
            ranges,
            keywords,
            unmatched: config.unmatched_policy(self.keep_unmatched),
            partition_separator: config.partition_separator.clone(),
        })
    }
}

fn print_summary(summary: &RunSummary) {
    eprintln!(
        "{} lines read, {} selected, {} merged, {} dropped",
        summary.lines_read, summary.lines_selected, summary.lines_merged, summary.lines_dropped
    );
    for (path, lines) in &summary.outputs {
        eprintln!("  {} ({lines} lines)", path.display());
    }
}

fn fail(err: &LogCompactError) -> ExitCode {
    tracing::error!(error = %err, "Run failed");
    eprintln!("Error: {err}");
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config is loaded before logging so its level can apply; its
    // warnings are reported once logging is up.
    let loaded = config::load(cli.config.as_deref());
    let level = loaded
        .as_ref()
        .ok()
        .and_then(|l| l.config.log_level.clone());
    util::logging::init(cli.debug, level.as_deref());

    tracing::debug!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "logcompact starting"
    );

    let config = match loaded {
        Ok(loaded) => {
            match &loaded.source {
                Some(path) => tracing::info!(path = %path.display(), "Loaded config.toml"),
                None => tracing::debug!("Using default configuration"),
            }
            for warning in &loaded.warnings {
                tracing::warn!(warning = %warning, "Config warning");
            }
            loaded.config
        }
        Err(e) => return fail(&LogCompactError::from(e)),
    };

    let options = match cli.run_options(&config) {
        Ok(options) => options,
        Err(e) => return fail(&e),
    };

    match pipeline::run(&options) {
        Ok(summary) => {
            if !cli.quiet {
                print_summary(&summary);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
