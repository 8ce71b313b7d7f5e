//! Writing the final result to the console or a file

use std::io::{self, Write};
use std::path::Path;

/// Width of the rule printed around console output
const RULE_WIDTH: usize = 80;

/// Where the result went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Console,
    File(String),
    /// File write failed; result was printed instead
    ConsoleFallback,
}

/// Renders results to a console sink, or to a file with console fallback
pub struct OutputWriter<W: Write> {
    console: W,
}

impl OutputWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputWriter<W> {
    pub fn new(console: W) -> Self {
        Self { console }
    }

    /// Write `result` to `path` when given, otherwise to the console
    pub fn emit(&mut self, result: &str, path: Option<&Path>) -> io::Result<OutputTarget> {
        let Some(path) = path else {
            self.write_console(result)?;
            return Ok(OutputTarget::Console);
        };

        match std::fs::write(path, result) {
            Ok(()) => {
                writeln!(self.console, "Output written to {}", path.display())?;
                Ok(OutputTarget::File(path.display().to_string()))
            }
            Err(e) => {
                tracing::error!("Error writing to output file {}: {}", path.display(), e);
                self.write_console(result)?;
                Ok(OutputTarget::ConsoleFallback)
            }
        }
    }

    /// Print the result framed by horizontal rules
    pub fn write_console(&mut self, result: &str) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let rule = console::style(rule).dim();
        writeln!(self.console, "\n{}\n", rule)?;
        writeln!(self.console, "{}", result)?;
        writeln!(self.console, "\n{}", rule)?;
        self.console.flush()
    }

    pub fn into_inner(self) -> W {
        self.console
    }
}
