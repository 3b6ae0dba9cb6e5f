use crate::cli::ShapeInput;
use crate::error::{CliError, CliResult};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

/// Where the shape text comes from.
pub enum InputSource {
    /// From a file on disk.
    File(PathBuf),
    /// From `--data`.
    Inline(String),
    /// From stdin (piped).
    Stdin,
}

/// Resolve the input source with priority: `--data` > `--file` > stdin.
pub fn resolve_input(input: &ShapeInput) -> CliResult<InputSource> {
    if let Some(d) = &input.data {
        return Ok(InputSource::Inline(d.clone()));
    }
    if let Some(f) = &input.file {
        return Ok(InputSource::File(f.clone()));
    }
    if !io::stdin().is_terminal() {
        return Ok(InputSource::Stdin);
    }
    Err(CliError::Usage(format!(
        "no shape data provided\n  {} pass --data, use --file for a file, or pipe via stdin",
        colored::Colorize::bold(colored::Colorize::cyan("help:"))
    )))
}

/// Read content from the resolved input source.
pub fn read_input(source: &InputSource) -> CliResult<String> {
    match source {
        InputSource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display()))),
        InputSource::Inline(s) => Ok(s.clone()),
        InputSource::Stdin => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
