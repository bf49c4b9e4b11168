use crate::utils::IResult;

use std::fmt;
use std::io::prelude::*;

use termcolor::Color::{Cyan, Red, Yellow};
use termcolor::{self, Color, ColorSpec, StandardStream, WriteColor};


/// Whether messages should use color output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    /// Force color output
    Always,
    /// Force disable color output
    Never,
    /// Intelligently guess whether to use color output
    Auto,
}


/// The requested verbosity of output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Verbose,
    Normal,
    Quiet,
}


/// An abstraction around console output that remembers preferences for output
/// verbosity and color.
pub struct Shell {
    /// Wrapper around stdout/stderr. This helps with supporting sending
    /// output to a memory buffer which is useful for tests.
    output: ShellOut,
    /// How verbose messages should be.
    verbosity: Verbosity,
}


/// A `Write`able object, either with or without color support
enum ShellOut {
    /// A plain write object without color support
    Write(Box<dyn Write>),
    /// Color-enabled stderr, with information on whether color should be used
    Stream {
        stderr: StandardStream,
        color_choice: ColorChoice,
    },
}

impl Shell {
    /// Creates a new shell, defaulting to 'auto' color and normal verbosity.
    pub fn new() -> Shell {
        let auto_clr = ColorChoice::Auto;
        Shell {
            output: ShellOut::Stream {
                stderr: StandardStream::stderr(auto_clr.to_termcolor(atty::Stream::Stderr)),
                color_choice: auto_clr,
            },
            verbosity: Verbosity::Normal,
        }
    }

    /// Creates a shell from a plain writable object, with no color, and max verbosity.
    pub fn from_write<W: Write + 'static>(out: W) -> Shell {
        Shell {
            output: ShellOut::Write(Box::new(out)),
            verbosity: Verbosity::Verbose,
        }
    }

    /// Prints a red 'error' message.
    pub fn error<T: fmt::Display>(&mut self, message: T) -> IResult<()> {
        self.output.stderr_status("error", Red, &message)
    }

    /// Prints an amber 'warning' message.
    pub fn warn<T: fmt::Display>(&mut self, message: T) -> IResult<()> {
        self.stderr_status("warning", Yellow, &message)
    }

    /// Prints a cyan 'note' message.
    pub fn note<T: fmt::Display>(&mut self, message: T) -> IResult<()> {
        self.stderr_status("note", Cyan, &message)
    }

    /// Gets a reference to the underlying stderr writer.
    pub fn err(&mut self) -> &mut dyn Write {
        self.output.stderr()
    }

    /// Gets the verbosity of the shell.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Updates the verbosity of the shell.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Updates the color choice (always, never, or auto) from a string.
    pub fn set_color_choice(&mut self, color: Option<&str>) -> IResult<()> {
        if let ShellOut::Stream {
            ref mut stderr,
            ref mut color_choice,
        } = self.output
        {
            let cfg = match color {
                Some("always") => ColorChoice::Always,
                Some("never") => ColorChoice::Never,

                Some("auto") | None => ColorChoice::Auto,

                Some(arg) => anyhow::bail!(
                    "argument for --color must be auto, always, or \
                     never, but found `{}`",
                    arg
                ),
            };
            *color_choice = cfg;
            *stderr = StandardStream::stderr(cfg.to_termcolor(atty::Stream::Stderr));
        }
        Ok(())
    }

    /// Prints a message unless the shell is quiet. The status comes first and
    /// is bold plus the given color.
    fn stderr_status(
        &mut self,
        status: &str,
        color: Color,
        msg: &dyn fmt::Display,
    ) -> IResult<()> {
        match self.verbosity {
            Verbosity::Quiet => Ok(()),
            _ => self.output.stderr_status(status, color, msg),
        }
    }
}

impl ShellOut {
    /// Prints out a message with a status. The status comes first, and is bold plus the given color.
    fn stderr_status(&mut self, status: &str, color: Color, msg: &dyn fmt::Display) -> IResult<()> {
        match *self {
            ShellOut::Stream { ref mut stderr, .. } => {
                stderr.reset()?;
                stderr.set_color(ColorSpec::new().set_bold(true).set_fg(Some(color)))?;
                write!(stderr, "{}", status)?;
                stderr.set_color(ColorSpec::new().set_bold(true))?;
                write!(stderr, ":")?;
                stderr.reset()?;
                writeln!(stderr, " {}", msg)?;
            }
            ShellOut::Write(ref mut w) => {
                writeln!(w, "{}: {}", status, msg)?;
            }
        }

        Ok(())
    }

    /// Gets stderr as a `io::Write`.
    fn stderr(&mut self) -> &mut dyn Write {
        match *self {
            ShellOut::Stream { ref mut stderr, .. } => stderr,
            ShellOut::Write(ref mut w) => w,
        }
    }
}

impl ColorChoice {
    /// Converts our color choice to termcolor's version.
    fn to_termcolor(self, stream: atty::Stream) -> termcolor::ColorChoice {
        match self {
            ColorChoice::Always => termcolor::ColorChoice::Always,
            ColorChoice::Never => termcolor::ColorChoice::Never,
            ColorChoice::Auto => {
                if atty::is(stream) {
                    termcolor::ColorChoice::Auto
                } else {
                    termcolor::ColorChoice::Never
                }
            }
        }
    }
}

impl fmt::Debug for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.output {
            ShellOut::Write(_) => f
                .debug_struct("Shell")
                .field("verbosity", &self.verbosity)
                .finish(),
            ShellOut::Stream { color_choice, .. } => f
                .debug_struct("Shell")
                .field("verbosity", &self.verbosity)
                .field("color_choice", &color_choice)
                .finish(),
        }
    }
}
