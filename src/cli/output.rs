//! Colored terminal output for release progress.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, Write};

/// Writes user-facing progress to stdout.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    color: bool,
}

impl OutputManager {
    /// Creates an output manager. `color` is usually whether stdout is a terminal.
    pub fn new(verbose: bool, quiet: bool, color: bool) -> Self {
        Self {
            verbose,
            quiet,
            color,
        }
    }

    fn choice(&self) -> ColorChoice {
        if self.color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }

    fn write_tagged(
        &self,
        mut stream: StandardStream,
        tag: &str,
        color: Color,
        message: &str,
    ) -> io::Result<()> {
        stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stream, "{}", tag)?;
        stream.reset()?;
        writeln!(stream, " {}", message)
    }

    /// Detail line, only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        let mut stream = StandardStream::stdout(self.choice());
        writeln!(stream, "   {}", message)
    }

    /// Step in progress.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_tagged(StandardStream::stdout(self.choice()), "→", Color::Cyan, message)
    }

    /// Completed step.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_tagged(StandardStream::stdout(self.choice()), "✓", Color::Green, message)
    }

    /// Stage header.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let mut stream = StandardStream::stdout(self.choice());
        stream.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(stream, "\n{}", title)?;
        stream.reset()
    }
}
