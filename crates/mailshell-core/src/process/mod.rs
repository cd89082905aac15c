//! External process invocation.
//!
//! Three ways to run a tool:
//! - [`runner::run`]: await the whole process and get its output at once.
//!   Used for short queries.
//! - [`worker::start`]: run on its own task, streaming stdout lines and a
//!   final completion event through a channel. Used for anything slow.
//! - [`runner::launch`]: start it and never look back.

pub mod runner;
pub mod worker;

use std::fmt;

pub use runner::{launch, run};
pub use worker::{WorkerHandle, start};

/// A command line to run: program followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    argv: Vec<String>,
}

impl Invocation {
    /// Starts an invocation from a program (plus any leading arguments).
    pub fn new<I, S>(prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            argv: prefix.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    /// Appends several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    /// Full argument vector, program first.
    #[must_use]
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Splits into program and arguments.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyCommand`] if there is no program.
    pub fn split(&self) -> crate::Result<(&str, &[String])> {
        self.argv
            .split_first()
            .map(|(program, args)| (program.as_str(), args))
            .ok_or(crate::Error::EmptyCommand)
    }

    /// Builds a `tokio` command with stdin closed and stdout/stderr piped.
    pub(crate) fn command(&self) -> crate::Result<tokio::process::Command> {
        let (program, args) = self.split()?;
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());
        Ok(command)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.argv.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, "{arg:?}")?;
            } else {
                f.write_str(arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `-1` when the process was killed by a signal.
    pub exit_code: i32,
    /// Standard output text.
    pub stdout: String,
    /// Standard error text.
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Identifies one asynchronous invocation for event routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(pub u64);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An event delivered by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerEvent {
    /// Invocation that produced the event.
    pub id: CommandId,
    /// What happened.
    pub kind: WorkerEventKind,
}

/// Payload of a [`WorkerEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEventKind {
    /// One line of standard output, without its line terminator.
    Line(String),
    /// The process exited. Always the last event for an invocation.
    Finished {
        /// True iff the exit code was zero.
        success: bool,
        /// All stdout text as read, line terminators included.
        output: String,
        /// Standard error text.
        stderr: String,
    },
}

/// Decodes process output as UTF-8, falling back to lossy decoding.
pub(crate) fn decode(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}
