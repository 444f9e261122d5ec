//! Line input for the interactive calculator using rustyline

use anyhow::{anyhow, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// What the user typed at a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Trimmed text (possibly empty)
    Text(String),
    /// Ctrl-D
    Eof,
    /// Ctrl-C
    Interrupted,
}

/// Readline wrapper with per-prompt labels
pub struct InputHandler {
    editor: DefaultEditor,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()?;
        Ok(InputHandler { editor })
    }

    /// Read one line after showing `prompt`
    pub fn read(&mut self, prompt: &str) -> Result<Line> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed);
                }
                Ok(Line::Text(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => Ok(Line::Eof),
            Err(err) => Err(anyhow!("Readline error: {}", err)),
        }
    }
}
