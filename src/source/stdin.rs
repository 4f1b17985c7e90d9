//! Stdin-based line source for piped input.

use super::file::decode_line;
use crate::model::error::InputError;
use std::io::{BufRead, BufReader, IsTerminal, Read};

/// Line reader over piped stdin (or any reader in tests).
///
/// Reads block; the source runs on the producer thread, never the UI loop.
pub struct StdinSource<R: Read> {
    reader: BufReader<R>,
    complete: bool,
    offset: u64,
}

impl StdinSource<std::io::Stdin> {
    /// Wrap the process stdin.
    ///
    /// # Errors
    ///
    /// Returns `InputError::NoInput` if stdin is an interactive terminal, so
    /// the view never waits on keyboard input nobody will type.
    pub fn new() -> Result<Self, InputError> {
        let stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(InputError::NoInput);
        }
        Ok(Self::from_reader(stdin))
    }
}

impl<R: Read> StdinSource<R> {
    /// Wrap an arbitrary reader.
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            complete: false,
            offset: 0,
        }
    }

    /// Read the next line, without its terminator.
    ///
    /// Returns `None` once EOF is reached; later calls keep returning `None`.
    /// Invalid UTF-8 is replaced, not reported.
    ///
    /// # Errors
    ///
    /// Returns `InputError::Io` for I/O errors.
    pub fn read_line(&mut self) -> Result<Option<String>, InputError> {
        if self.complete {
            return Ok(None);
        }

        let mut buffer = Vec::new();
        let bytes_read = self.reader.read_until(b'\n', &mut buffer)?;
        if bytes_read == 0 {
            self.complete = true;
            return Ok(None);
        }

        let line = decode_line(&buffer, self.offset);
        self.offset += bytes_read as u64;
        Ok(Some(line))
    }

    /// Whether EOF has been reached.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl<R: Read> std::fmt::Debug for StdinSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdinSource")
            .field("complete", &self.complete)
            .finish_non_exhaustive()
    }
}
