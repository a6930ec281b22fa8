// logcompact - platform/config.rs
//
// Platform config directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::UnmatchedPolicy;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Default location of `config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", constants::APP_ID)?;
    Some(proj_dirs.config_dir().join(constants::CONFIG_FILE_NAME))
}

// =============================================================================
// config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[compact]` section.
    pub compact: CompactSection,
    /// `[split]` section.
    pub split: SplitSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[compact]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CompactSection {
    /// Compact even without `--compact`.
    pub enabled: Option<bool>,
}

/// `[split]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct SplitSection {
    /// Text placed between the output stem and the keyword.
    pub separator: Option<String>,
    /// Keep lines matching no keyword in an overflow file.
    pub keep_unmatched: Option<bool>,
    /// Name of the overflow partition.
    pub unmatched_name: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated configuration derived from `config.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub compact: bool,
    pub partition_separator: String,
    pub keep_unmatched: bool,
    pub unmatched_name: String,
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            compact: false,
            partition_separator: constants::DEFAULT_PARTITION_SEPARATOR.to_string(),
            keep_unmatched: false,
            unmatched_name: constants::DEFAULT_UNMATCHED_NAME.to_string(),
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Unmatched-line policy, with the CLI flag able to force `Keep`.
    pub fn unmatched_policy(&self, keep_flag: bool) -> UnmatchedPolicy {
        if keep_flag || self.keep_unmatched {
            UnmatchedPolicy::Keep {
                name: self.unmatched_name.clone(),
            }
        } else {
            UnmatchedPolicy::Drop
        }
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Result of [`load`].
///
/// Loading happens before logging is initialised (the config can set the
/// log level), so nothing is logged here; the caller reports `source` and
/// `warnings` once tracing is up.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: AppConfig,
    /// Non-fatal problems; each one fell back to a default.
    pub warnings: Vec<String>,
    /// File the values came from. `None` when defaults were used.
    pub source: Option<PathBuf>,
}

/// Load configuration.
///
/// With an explicit path (from `--config`), a missing or unparseable file
/// is an error. Without one, the platform default is used: a missing file
/// means defaults, an unreadable or unparseable file means defaults plus a
/// warning.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = explicit {
        return Ok(from_raw(read_raw(path)?, path));
    }

    let Some(path) = default_config_path() else {
        return Ok(LoadedConfig::default());
    };
    if !path.exists() {
        return Ok(LoadedConfig::default());
    }
    match read_raw(&path) {
        Ok(raw) => Ok(from_raw(raw, &path)),
        Err(e) => Ok(LoadedConfig {
            warnings: vec![format!("{e}. Using defaults.")],
            ..Default::default()
        }),
    }
}

fn from_raw(raw: RawConfig, path: &Path) -> LoadedConfig {
    let (config, warnings) = validate(raw);
    LoadedConfig {
        config,
        warnings,
        source: Some(path.to_path_buf()),
    }
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Validate each field, accumulating warnings for values that fall back
/// to defaults.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(enabled) = raw.compact.enabled {
        config.compact = enabled;
    }

    if let Some(keep) = raw.split.keep_unmatched {
        config.keep_unmatched = keep;
    }

    if let Some(sep) = raw.split.separator {
        if valid_name_part(&sep, true) {
            config.partition_separator = sep;
        } else {
            warnings.push(format!(
                "[split] separator = \"{sep}\" must be at most {} characters with no path separators. \
                 Using default (\"{}\").",
                constants::MAX_PARTITION_NAME_LENGTH,
                constants::DEFAULT_PARTITION_SEPARATOR,
            ));
        }
    }

    if let Some(name) = raw.split.unmatched_name {
        if valid_name_part(&name, false) {
            config.unmatched_name = name;
        } else {
            warnings.push(format!(
                "[split] unmatched_name = \"{name}\" must be 1-{} characters with no path separators. \
                 Using default (\"{}\").",
                constants::MAX_PARTITION_NAME_LENGTH,
                constants::DEFAULT_UNMATCHED_NAME,
            ));
        }
    }

    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}

fn valid_name_part(s: &str, allow_empty: bool) -> bool {
    (allow_empty || !s.is_empty())
        && s.chars().count() <= constants::MAX_PARTITION_NAME_LENGTH
        && !s.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> (AppConfig, Vec<String>) {
        validate(toml::from_str(toml_src).unwrap())
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, warnings) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_sections_applied() {
        let (config, warnings) = parse(
            r#"
            [compact]
            enabled = true

            [split]
            separator = "."
            keep_unmatched = true
            unmatched_name = "rest"

            [logging]
            level = "DEBUG"

            [unknown]
            ignored = 1
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert!(config.compact);
        assert_eq!(config.partition_separator, ".");
        assert_eq!(
            config.unmatched_policy(false),
            UnmatchedPolicy::Keep {
                name: "rest".to_string()
            }
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let (config, warnings) = parse(
            r#"
            [split]
            separator = "a/b"
            unmatched_name = ""

            [logging]
            level = "loud"
            "#,
        );
        assert_eq!(warnings.len(), 3);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_cli_flag_forces_keep() {
        let config = AppConfig::default();
        assert_eq!(config.unmatched_policy(false), UnmatchedPolicy::Drop);
        assert_eq!(
            config.unmatched_policy(true),
            UnmatchedPolicy::Keep {
                name: constants::DEFAULT_UNMATCHED_NAME.to_string()
            }
        );
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_explicit_bad_toml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[compact\nenabled = ").unwrap();
        assert!(matches!(
            load(Some(&path)),
            Err(ConfigError::TomlParse { .. })
        ));
    }

    #[test]
    fn test_explicit_file_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[compact]\nenabled = true\n").unwrap();
        let loaded = load(Some(&path)).unwrap();
        assert!(loaded.config.compact);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.source, Some(path));
    }
}
