//! Input sources and the producer thread feeding the store.
//!
//! - `file`: complete-line reader with a debounced change watcher
//! - `stdin`: piped input
//!
//! The producer parses lines at the boundary and hands records to a
//! [`ChannelHandle`]; the UI thread never touches the input.

use crate::model::error::InputError;
use crate::model::{MessageId, MessageRecord};
use crate::parser::{parse_line_graceful, ParseOptions};
use crate::store::ChannelHandle;
use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

pub mod file;
pub mod stdin;

pub use file::FileSource;
pub use stdin::StdinSource;

/// Longest a follow loop blocks on the watcher before re-checking `stop`.
pub const FOLLOW_WAIT_TIMEOUT: Duration = Duration::from_millis(250);

/// Where chat lines come from.
#[derive(Debug)]
pub enum InputSource {
    /// A file; existing lines are history, later lines arrive live when following.
    File {
        /// Reader over the file.
        source: FileSource,
        /// Keep watching for appended lines.
        follow: bool,
    },
    /// Piped stdin, read until EOF.
    Stdin(StdinSource<std::io::Stdin>),
}

impl InputSource {
    /// Whether more lines may arrive after the initial read.
    pub fn is_live(&self) -> bool {
        match self {
            InputSource::File { follow, .. } => *follow,
            InputSource::Stdin(s) => !s.is_complete(),
        }
    }
}

/// Pick a source: the file when given, else piped stdin.
///
/// # Errors
///
/// Returns `InputError::FileNotFound` for a missing file and
/// `InputError::NoInput` when no file is given and stdin is a terminal.
pub fn detect_input_source(file: Option<PathBuf>, follow: bool) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File {
            source: FileSource::open(path)?,
            follow,
        }),
        None => Ok(InputSource::Stdin(StdinSource::new()?)),
    }
}

/// Parses lines and pushes the resulting records into the store.
#[derive(Debug)]
pub struct Producer {
    handle: ChannelHandle,
    options: ParseOptions,
    line_number: usize,
}

impl Producer {
    /// Producer writing through `handle`.
    pub fn new(handle: ChannelHandle, options: ParseOptions) -> Self {
        Self {
            handle,
            options,
            line_number: 0,
        }
    }

    /// Lines consumed so far.
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Deliver existing content as one history batch at the head.
    ///
    /// Returns the number of records parsed from `lines`.
    pub fn load_history(&mut self, lines: Vec<String>) -> usize {
        let records: Vec<MessageRecord> = lines
            .iter()
            .filter_map(|line| self.parse(line))
            .collect();
        let count = records.len();
        debug!(count, "loading history batch");
        self.handle.add_messages_at_start(records);
        count
    }

    /// Append one live line. Blank lines are skipped.
    pub fn push_line(&mut self, line: &str) -> Option<MessageId> {
        let record = self.parse(line)?;
        self.handle.add_message(record)
    }

    fn parse(&mut self, line: &str) -> Option<MessageRecord> {
        self.line_number += 1;
        parse_line_graceful(line, self.line_number, &self.options)
    }

    /// Pump a reader line by line until EOF or `stop`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` when reading fails.
    pub fn pump<R: Read>(
        &mut self,
        source: &mut StdinSource<R>,
        stop: &AtomicBool,
    ) -> Result<(), InputError> {
        while let Some(line) = source.read_line()? {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            self.push_line(&line);
        }
        Ok(())
    }

    /// Load a file's history, then follow it until `stop` if asked to.
    ///
    /// Following blocks on the file watcher, waking at most every
    /// `wait_timeout` to check `stop`. Lines are read only after a change
    /// notification.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` when reading fails or the watcher cannot be
    /// set up, and `InputError::FileDeleted` when the file disappears.
    pub fn follow_file(
        &mut self,
        source: &mut FileSource,
        follow: bool,
        stop: &AtomicBool,
        wait_timeout: Duration,
    ) -> Result<(), InputError> {
        if follow {
            // Watch first so writes during the history read are not missed.
            source.watch()?;
        }
        let history = source.read_new_lines()?;
        self.load_history(history);

        while follow && !stop.load(Ordering::Relaxed) {
            if !source.wait_for_change(wait_timeout)? {
                continue;
            }
            let lines = source.read_new_lines()?;
            trace!(count = lines.len(), "file changed");
            for line in lines {
                self.push_line(&line);
            }
        }
        Ok(())
    }
}

/// Run the producer for `source` on a named thread.
///
/// The thread ends at EOF, when `stop` is set (checked between lines and
/// watcher waits), or after an input error, which is logged.
///
/// # Errors
///
/// Returns the spawn error if the thread cannot be created.
pub fn spawn_producer(
    source: InputSource,
    mut producer: Producer,
    stop: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("chatview-producer".to_string())
        .spawn(move || {
            let result = match source {
                InputSource::File {
                    mut source,
                    follow,
                } => {
                    info!(path = %source.path().display(), follow, "reading file");
                    producer.follow_file(&mut source, follow, &stop, FOLLOW_WAIT_TIMEOUT)
                }
                InputSource::Stdin(mut source) => {
                    info!("reading stdin");
                    producer.pump(&mut source, &stop)
                }
            };
            match result {
                Ok(()) => info!(lines = producer.lines_read(), "producer finished"),
                Err(error) => warn!(%error, "producer stopped on input error"),
            }
        })
}
