//! Where and how tsview prints: decoded states as json or a dimension table, tokens and
//! links as plain lines. `--quiet` suppresses everything; `-o` sends it to a file.

use anyhow::Result;
use std::fs;
use std::path::PathBuf;
use tablestate::prelude::SerializedViewState;

mod dimensions;

pub use dimensions::{DimensionRow, render_dimensions};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Pretty,
    Table,
    Quiet,
}

#[derive(Clone, Debug)]
pub struct Output {
    format: OutputFormat,
    path: Option<PathBuf>,
}

impl Output {
    pub fn new(format: OutputFormat, path: Option<PathBuf>) -> Self {
        Self { format, path }
    }

    /// A decoded view state: wire json (compact or pretty), or one row per present
    /// dimension.
    pub fn emit_state(&self, state: &SerializedViewState) -> Result<()> {
        let data = match self.format {
            OutputFormat::Quiet => return Ok(()),
            OutputFormat::Json => serde_json::to_string(state)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(state)?,
            OutputFormat::Table => render_dimensions(&DimensionRow::from_state(state)?),
        };
        self.write(&data)
    }

    /// Tokens and hrefs: the same in every format except quiet.
    pub fn emit_text(&self, text: &str) -> Result<()> {
        if self.format == OutputFormat::Quiet {
            return Ok(());
        }
        self.write(text)
    }

    fn write(&self, data: &str) -> Result<()> {
        let mut output = data.to_string();
        if !output.ends_with('\n') {
            output.push('\n');
        }

        match &self.path {
            Some(path) => fs::write(path, output)?,
            None => print!("{output}"),
        }
        Ok(())
    }
}
