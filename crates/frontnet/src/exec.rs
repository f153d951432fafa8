//! External command execution.
//!
//! Every `tc`/`ip` call goes through [`run`], which spawns the process via an
//! [`Executor`], waits for it, and classifies the result. A command has
//! failed if and only if it wrote anything to stderr or could not be
//! started. The exit status is logged but never consulted for the verdict,
//! so warnings printed on stderr also count as failures.

use std::fmt;
use std::io;
use std::process::Command;

use crate::error::{Error, Result};

/// A single external command line: program plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Program to run.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, excluding the program.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a process that ran to completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Output of a command that printed nothing and exited 0.
    pub fn success() -> Self {
        Self {
            status: Some(0),
            ..Self::default()
        }
    }

    /// Output of a command that printed `stderr` and exited with `code`.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            status: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Check if the command reported an error.
    pub fn is_error(&self) -> bool {
        !self.stderr.is_empty()
    }
}

/// Spawns invocations and waits for them.
///
/// Implementations block until the process exits. The `Err` case is reserved
/// for processes that could not be started.
pub trait Executor {
    fn execute(&mut self, invocation: &Invocation) -> io::Result<CommandOutput>;
}

impl<E: Executor + ?Sized> Executor for &mut E {
    fn execute(&mut self, invocation: &Invocation) -> io::Result<CommandOutput> {
        (**self).execute(invocation)
    }
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&mut self, invocation: &Invocation) -> io::Result<CommandOutput> {
        let output = Command::new(invocation.program())
            .args(invocation.get_args())
            .output()?;

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Execute one invocation and classify the result.
pub fn run<E: Executor + ?Sized>(executor: &mut E, invocation: &Invocation) -> Result<CommandOutput> {
    tracing::debug!(command = %invocation, "executing");

    let output = executor
        .execute(invocation)
        .map_err(|source| Error::Launch {
            program: invocation.program().to_string(),
            source,
        })?;

    tracing::debug!(command = %invocation, status = ?output.status, "finished");

    if output.is_error() {
        return Err(Error::Command {
            command: invocation.to_string(),
            stderr: output.stderr.trim_end().to_string(),
        });
    }

    if output.status != Some(0) {
        tracing::warn!(
            command = %invocation,
            status = ?output.status,
            "command exited unsuccessfully without error output; treating as success"
        );
    }

    Ok(output)
}
