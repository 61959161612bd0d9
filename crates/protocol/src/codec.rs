//! Line-oriented reading and writing of protocol records.
//!
//! Every record is a single JSON object terminated by `\n`.

use crate::error::ProtocolError;
use crate::packets::{GameConfig, TurnInput, TurnOutput};
use serde::de::DeserializeOwned;
use std::io::{BufRead, Write};

/// Longest debug string the runner accepts; longer strings are cut.
pub const MAX_DEBUG_LEN: usize = 1000;

/// Reads protocol records from a buffered source.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    line: String,
}

impl<R: BufRead> LineReader<R> {
    /// Create a new reader over a buffered source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
        }
    }

    /// Read the match configuration, which must be the first record.
    pub fn read_config(&mut self) -> Result<GameConfig, ProtocolError> {
        self.read_record()?.ok_or(ProtocolError::UnexpectedEof)
    }

    /// Read the next turn. Returns `None` once the stream is closed.
    pub fn read_turn(&mut self) -> Result<Option<TurnInput>, ProtocolError> {
        self.read_record()
    }

    fn read_record<T: DeserializeOwned>(&mut self) -> Result<Option<T>, ProtocolError> {
        loop {
            self.line.clear();
            if self.inner.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            let trimmed = self.line.trim();
            // Blank lines between records are tolerated.
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Some(serde_json::from_str(trimmed)?));
        }
    }
}

/// Writes decisions, one JSON object per line.
#[derive(Debug)]
pub struct LineWriter<W> {
    inner: W,
}

impl<W: Write> LineWriter<W> {
    /// Create a new writer over a sink.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Serialize one decision, truncating the debug text, and flush.
    pub fn write_output(&mut self, output: &TurnOutput) -> Result<(), ProtocolError> {
        let mut output = output.clone();
        if let Some(debug) = output.debug.as_mut() {
            truncate_chars(debug, MAX_DEBUG_LEN);
        }
        serde_json::to_writer(&mut self.inner, &output)?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        Ok(())
    }

    /// Consume the writer and return the underlying sink.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

fn truncate_chars(text: &mut String, max: usize) {
    if let Some((cut, _)) = text.char_indices().nth(max) {
        text.truncate(cut);
    }
}
