//! File-based line source with debounced change watching for tailing.

use crate::model::error::InputError;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, Debouncer};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, warn};

/// Quiet period before a burst of writes is reported as one change.
pub const WATCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Debounced watcher over the followed file.
struct FileWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    events: Receiver<DebounceEventResult>,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher").finish_non_exhaustive()
    }
}

/// Reads complete lines from a file, remembering how far it got.
///
/// A trailing partial line is left for the next read, so a writer that is
/// halfway through a line is never split. Bytes that are not UTF-8 are
/// replaced rather than failing the read.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    position: u64,
    file: BufReader<File>,
    watcher: Option<FileWatcher>,
}

impl FileSource {
    /// Open `path` positioned at its start.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist.
    /// Returns `InputError::Io` for other I/O errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            position: 0,
            file: BufReader::new(file),
            watcher: None,
        })
    }

    /// Start watching the file for modifications.
    ///
    /// Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` if the platform watcher cannot be set up.
    pub fn watch(&mut self) -> Result<(), InputError> {
        if self.watcher.is_some() {
            return Ok(());
        }

        let (tx, rx) = std::sync::mpsc::channel();
        let mut debouncer = new_debouncer(WATCH_DEBOUNCE, tx).map_err(std::io::Error::other)?;
        notify::Watcher::watch(
            debouncer.watcher(),
            &self.path,
            RecursiveMode::NonRecursive,
        )
        .map_err(std::io::Error::other)?;
        debug!(path = %self.path.display(), "watching file");

        self.watcher = Some(FileWatcher {
            _debouncer: debouncer,
            events: rx,
        });
        Ok(())
    }

    /// Whether [`watch`](Self::watch) has been set up.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Block up to `timeout` for a change notification.
    ///
    /// Returns whether the file changed. Every notification already queued
    /// is drained, so one call covers a burst. Without a watcher this
    /// returns `false` immediately.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileDeleted` once the file is gone.
    pub fn wait_for_change(&mut self, timeout: Duration) -> Result<bool, InputError> {
        let Some(watcher) = &self.watcher else {
            return Ok(false);
        };

        let first = match watcher.events.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => return Ok(false),
            Err(RecvTimeoutError::Disconnected) => {
                warn!(path = %self.path.display(), "file watcher stopped");
                return Ok(false);
            }
        };

        let mut changed = false;
        for result in std::iter::once(first).chain(watcher.events.try_iter()) {
            match result {
                Ok(events) => changed |= !events.is_empty(),
                Err(error) => {
                    if let notify::ErrorKind::PathNotFound = error.kind {
                        return Err(InputError::FileDeleted);
                    }
                    warn!(%error, "file watcher error");
                }
            }
        }

        if changed && !self.path.exists() {
            return Err(InputError::FileDeleted);
        }
        Ok(changed)
    }

    /// Path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset just past the last complete line returned.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read lines appended since the previous call.
    ///
    /// A file that shrank (truncated or rotated) is re-read from the start.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn read_new_lines(&mut self) -> Result<Vec<String>, InputError> {
        let len = self.file.get_ref().metadata()?.len();
        if len < self.position {
            tracing::info!(path = %self.path.display(), "file truncated; rereading");
            self.position = 0;
        }

        self.file.seek(SeekFrom::Start(self.position))?;

        let mut lines = Vec::new();
        let mut buffer = Vec::new();

        loop {
            buffer.clear();
            let bytes_read = self.file.read_until(b'\n', &mut buffer)?;

            if bytes_read == 0 {
                break;
            }

            if buffer.ends_with(b"\n") {
                lines.push(decode_line(&buffer, self.position));
                self.position += bytes_read as u64;
            } else {
                // Partial line: leave it for the next poll.
                break;
            }
        }

        Ok(lines)
    }
}

/// Decode one raw line without its terminator.
///
/// Invalid UTF-8 is replaced with U+FFFD and logged with the line's offset.
pub(crate) fn decode_line(raw: &[u8], offset: u64) -> String {
    let line = String::from_utf8_lossy(raw);
    if matches!(line, Cow::Owned(_)) {
        warn!(offset, "line is not valid UTF-8; replacing invalid bytes");
    }
    line.trim_end_matches(['\n', '\r']).to_string()
}
