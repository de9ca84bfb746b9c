//! Line input for the console loop.
//!
//! A terminal gets a rustyline editor with history; piped input is read line
//! by line with no prompt and no editing.

use std::io::BufRead;

use anyhow::Context;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};

/// Result of reading a line.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadResult {
    Line(String),
    /// Ctrl-C.
    Interrupted,
    /// Ctrl-D or end of piped input.
    Eof,
}

/// Source of console input lines.
pub trait LineEditor {
    /// Read one line, showing `prompt` where the editor supports it.
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<ReadResult>;

    /// Remember a line for history recall.
    fn add_history(&mut self, _line: &str) {}
}

/// Interactive terminal editor.
pub struct RustylineEditor {
    editor: Editor<(), DefaultHistory>,
}

impl RustylineEditor {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::builder().auto_add_history(false).build();
        let editor = Editor::with_config(config).context("cannot initialize line editor")?;
        Ok(Self { editor })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> anyhow::Result<ReadResult> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadResult::Line(line)),
            Err(ReadlineError::Interrupted) => Ok(ReadResult::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReadResult::Eof),
            Err(e) => Err(e).context("cannot read from terminal"),
        }
    }

    fn add_history(&mut self, line: &str) {
        let _ = self.editor.add_history_entry(line);
    }
}

/// Non-interactive input such as a pipe or redirected file.
pub struct PipedInput<R> {
    reader: R,
}

impl<R: BufRead> PipedInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineEditor for PipedInput<R> {
    fn read_line(&mut self, _prompt: &str) -> anyhow::Result<ReadResult> {
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .context("cannot read from stdin")?;
        if n == 0 {
            return Ok(ReadResult::Eof);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(ReadResult::Line(line))
    }
}
