//! Test doubles for the executor and reporter.

use std::collections::VecDeque;
use std::io;

use crate::exec::{CommandOutput, Executor, Invocation};
use crate::output::Report;

/// Replays canned results in order and records every command line.
///
/// Once the script runs out, every further command succeeds silently.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    script: VecDeque<Result<CommandOutput, io::ErrorKind>>,
    pub calls: Vec<String>,
}

impl ScriptedExecutor {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Result<CommandOutput, io::ErrorKind>>,
    {
        Self {
            script: script.into_iter().collect(),
            calls: Vec::new(),
        }
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&mut self, invocation: &Invocation) -> io::Result<CommandOutput> {
        self.calls.push(invocation.to_string());
        match self.script.pop_front() {
            Some(Ok(output)) => Ok(output),
            Some(Err(kind)) => Err(io::Error::from(kind)),
            None => Ok(CommandOutput::success()),
        }
    }
}

/// Collects reported lines per stream.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl Report for RecordingReporter {
    fn success(&mut self, line: &str) {
        self.stdout.push(line.to_string());
    }

    fn failure(&mut self, line: &str) {
        self.stderr.push(line.to_string());
    }
}
