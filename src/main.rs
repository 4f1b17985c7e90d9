//! chatview - Entry Point

use chatview::config::{self, CliOverrides};
use chatview::parser::ParseOptions;
use chatview::source::{detect_input_source, spawn_producer, Producer};
use chatview::state::ChannelView;
use chatview::store::{ChannelHandle, MessageStore};
use chatview::view::{ChatStyles, ColorConfig, TuiApp};
use chatview::view_state::CellMeasure;
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// chatview - scrollable terminal viewer for chat logs
#[derive(Parser, Debug)]
#[command(name = "chatview")]
#[command(version)]
#[command(about = "Scrollable terminal viewer for JSON-lines chat logs")]
pub struct Args {
    /// Path to chat log file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Follow the file for new messages (like tail -f)
    #[arg(short, long)]
    pub follow: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of messages kept in memory
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub capacity: Option<u64>,

    /// Multiplier applied to mouse wheel deltas
    #[arg(long)]
    pub wheel_multiplier: Option<f64>,

    /// Animate scrolling to newly arrived messages
    #[arg(long)]
    pub smooth_new_messages: bool,

    /// Hold the view still while the mouse moves over it
    #[arg(long)]
    pub pause_on_hover: bool,

    /// Collapse messages taller than this many lines
    #[arg(long)]
    pub collapse_lines: Option<usize>,

    /// Hide message timestamps
    #[arg(long)]
    pub no_timestamps: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    /// Flags that override file and environment settings.
    ///
    /// Boolean flags only override when given.
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            capacity: self.capacity.map(|c| c as usize),
            wheel_multiplier: self.wheel_multiplier,
            follow: self.follow.then_some(true),
            smooth_scroll_new_messages: self.smooth_new_messages.then_some(true),
            pause_on_hover: self.pause_on_hover.then_some(true),
            collapse_threshold_lines: self.collapse_lines,
            show_timestamps: self.no_timestamps.then_some(false),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = config::resolve(args.config.clone(), &args.overrides())?;

    chatview::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let source = detect_input_source(args.file.clone(), config.follow)?;

    let store = Arc::new(MessageStore::new(config.view.message_capacity));
    let (handle, receiver) = ChannelHandle::new(store.clone());
    let producer = Producer::new(handle, ParseOptions::from(&config.view));
    let stop = Arc::new(AtomicBool::new(false));
    let _producer_thread = spawn_producer(source, producer, stop.clone())?;

    let view = ChannelView::new(store, receiver, config.view.clone(), CellMeasure);
    let styles = ChatStyles::with_color_config(ColorConfig::from_env_and_args(args.no_color));

    let mut app = TuiApp::new(view, styles)?;
    let result = app.run();
    // The producer may be blocked on stdin; it is not joined.
    stop.store(true, Ordering::Relaxed);
    result?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["chatview", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["chatview", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["chatview"]);
        assert_eq!(args.file, None);
        assert!(!args.follow);
        assert_eq!(args.config, None);
        assert_eq!(args.capacity, None);
        assert_eq!(args.wheel_multiplier, None);
        assert!(!args.no_color);
        assert_eq!(args.overrides(), CliOverrides::default());
    }

    #[test]
    fn test_file_path_populates_file_field() {
        let args = Args::parse_from(["chatview", "chat.jsonl"]);
        assert_eq!(args.file, Some(PathBuf::from("chat.jsonl")));
    }

    #[test]
    fn test_follow_flag_short() {
        let args = Args::parse_from(["chatview", "-f"]);
        assert!(args.follow);
        assert_eq!(args.overrides().follow, Some(true));
    }

    #[test]
    fn test_capacity_flag() {
        let args = Args::parse_from(["chatview", "--capacity", "250"]);
        assert_eq!(args.overrides().capacity, Some(250));
    }

    #[test]
    fn test_capacity_rejects_zero() {
        let result = Args::try_parse_from(["chatview", "--capacity", "0"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_wheel_multiplier_flag() {
        let args = Args::parse_from(["chatview", "--wheel-multiplier", "2.5"]);
        assert_eq!(args.overrides().wheel_multiplier, Some(2.5));
    }

    #[test]
    fn test_no_timestamps_turns_timestamps_off() {
        let args = Args::parse_from(["chatview", "--no-timestamps"]);
        assert_eq!(args.overrides().show_timestamps, Some(false));
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "chatview",
            "chat.jsonl",
            "-f",
            "--pause-on-hover",
            "--smooth-new-messages",
            "--collapse-lines",
            "12",
            "--no-color",
        ]);
        let overrides = args.overrides();
        assert_eq!(args.file, Some(PathBuf::from("chat.jsonl")));
        assert!(args.no_color);
        assert_eq!(overrides.follow, Some(true));
        assert_eq!(overrides.pause_on_hover, Some(true));
        assert_eq!(overrides.smooth_scroll_new_messages, Some(true));
        assert_eq!(overrides.collapse_threshold_lines, Some(12));
    }

    #[test]
    fn test_cli_overrides_win_over_defaults() {
        let args = Args::parse_from(["chatview", "--capacity", "7", "--pause-on-hover"]);
        let resolved =
            config::loader::apply_cli_overrides(config::ResolvedConfig::default(), &args.overrides());
        assert_eq!(resolved.view.message_capacity, 7);
        assert!(resolved.view.pause_on_hover);
    }
}
