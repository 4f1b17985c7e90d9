//! Configuration file loading with precedence handling.

use super::ViewSettings;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "CHATVIEW_CONFIG";
/// Environment override for the wheel multiplier.
pub const WHEEL_MULTIPLIER_ENV: &str = "CHATVIEW_WHEEL_MULTIPLIER";
/// Environment override for the message capacity.
pub const CAPACITY_ENV: &str = "CHATVIEW_CAPACITY";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A setting is syntactically fine but out of range.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/chatview/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Maximum number of retained messages.
    #[serde(default)]
    pub message_capacity: Option<usize>,

    /// Animate the follow-scroll on new messages.
    #[serde(default)]
    pub smooth_scroll_new_messages: Option<bool>,

    /// Animate wheel and keyboard scrolling.
    #[serde(default)]
    pub smooth_scrolling: Option<bool>,

    /// Wheel delta multiplier.
    #[serde(default)]
    pub wheel_multiplier: Option<f64>,

    /// Pause while hovering.
    #[serde(default)]
    pub pause_on_hover: Option<bool>,

    /// Hover pause length in milliseconds.
    #[serde(default)]
    pub pause_duration_ms: Option<u64>,

    /// Require double click to open links.
    #[serde(default)]
    pub links_double_click_only: Option<bool>,

    /// Collapse threshold in lines (0 disables).
    #[serde(default)]
    pub collapse_threshold_lines: Option<usize>,

    /// Show timestamps.
    #[serde(default)]
    pub show_timestamps: Option<bool>,

    /// Timestamp format string.
    #[serde(default)]
    pub timestamp_format: Option<String>,

    /// Default follow mode (live tailing).
    #[serde(default)]
    pub follow: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Settings read by the channel view.
    pub view: ViewSettings,
    /// Follow mode.
    pub follow: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            view: ViewSettings::default(),
            follow: false,
            log_file_path: default_log_path(),
        }
    }
}

/// Overrides taken from command-line flags. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--capacity`
    pub capacity: Option<usize>,
    /// `--wheel-multiplier`
    pub wheel_multiplier: Option<f64>,
    /// `--follow`
    pub follow: Option<bool>,
    /// `--smooth-new-messages`
    pub smooth_scroll_new_messages: Option<bool>,
    /// `--pause-on-hover`
    pub pause_on_hover: Option<bool>,
    /// `--collapse-lines`
    pub collapse_threshold_lines: Option<usize>,
    /// `--no-timestamps`
    pub show_timestamps: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/chatview/chatview.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("chatview").join("chatview.log")
    } else {
        PathBuf::from("chatview.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/chatview/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("chatview").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CHATVIEW_CONFIG` environment variable
/// 3. Default path `~/.config/chatview/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    let view = defaults.view;
    ResolvedConfig {
        view: ViewSettings {
            message_capacity: config.message_capacity.unwrap_or(view.message_capacity),
            smooth_scroll_new_messages: config
                .smooth_scroll_new_messages
                .unwrap_or(view.smooth_scroll_new_messages),
            smooth_scrolling: config.smooth_scrolling.unwrap_or(view.smooth_scrolling),
            wheel_multiplier: config.wheel_multiplier.unwrap_or(view.wheel_multiplier),
            pause_on_hover: config.pause_on_hover.unwrap_or(view.pause_on_hover),
            pause_duration: config
                .pause_duration_ms
                .map(Duration::from_millis)
                .unwrap_or(view.pause_duration),
            links_double_click_only: config
                .links_double_click_only
                .unwrap_or(view.links_double_click_only),
            collapse_threshold_lines: config
                .collapse_threshold_lines
                .unwrap_or(view.collapse_threshold_lines),
            show_timestamps: config.show_timestamps.unwrap_or(view.show_timestamps),
            timestamp_format: config.timestamp_format.unwrap_or(view.timestamp_format),
        },
        follow: config.follow.unwrap_or(defaults.follow),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CHATVIEW_WHEEL_MULTIPLIER`: Override wheel multiplier
/// - `CHATVIEW_CAPACITY`: Override message capacity
///
/// # Errors
///
/// Returns `InvalidValue` when a variable is set but does not parse.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> Result<ResolvedConfig, ConfigError> {
    if let Ok(raw) = std::env::var(WHEEL_MULTIPLIER_ENV) {
        config.view.wheel_multiplier =
            raw.trim()
                .parse::<f64>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "wheel_multiplier",
                    reason: format!("{WHEEL_MULTIPLIER_ENV}={raw:?}: {e}"),
                })?;
    }

    if let Ok(raw) = std::env::var(CAPACITY_ENV) {
        config.view.message_capacity =
            raw.trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    field: "message_capacity",
                    reason: format!("{CAPACITY_ENV}={raw:?}: {e}"),
                })?;
    }

    Ok(config)
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: &CliOverrides) -> ResolvedConfig {
    if let Some(capacity) = cli.capacity {
        config.view.message_capacity = capacity;
    }
    if let Some(multiplier) = cli.wheel_multiplier {
        config.view.wheel_multiplier = multiplier;
    }
    if let Some(follow) = cli.follow {
        config.follow = follow;
    }
    if let Some(smooth) = cli.smooth_scroll_new_messages {
        config.view.smooth_scroll_new_messages = smooth;
    }
    if let Some(pause) = cli.pause_on_hover {
        config.view.pause_on_hover = pause;
    }
    if let Some(lines) = cli.collapse_threshold_lines {
        config.view.collapse_threshold_lines = lines;
    }
    if let Some(show) = cli.show_timestamps {
        config.view.show_timestamps = show;
    }
    config
}

/// Check ranges that the type system does not.
///
/// # Errors
///
/// Returns `InvalidValue` for a zero capacity or a non-positive multiplier.
pub fn validate(config: &ResolvedConfig) -> Result<(), ConfigError> {
    if config.view.message_capacity == 0 {
        return Err(ConfigError::InvalidValue {
            field: "message_capacity",
            reason: "must be at least 1".to_string(),
        });
    }
    let multiplier = config.view.wheel_multiplier;
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "wheel_multiplier",
            reason: format!("must be a positive number, got {multiplier}"),
        });
    }
    Ok(())
}

/// Run the whole precedence chain and validate the result.
///
/// # Errors
///
/// Propagates file, environment and validation errors.
pub fn resolve(
    config_path: Option<PathBuf>,
    cli: &CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_env_overrides(merge_config(file))?;
    let config = apply_cli_overrides(config, cli);
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
