//! Error types for command execution and argument validation.

use std::io;

use crate::dispatch::Mode;
use crate::util::IfError;

/// Result type for external command invocations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by a single `tc`/`ip` invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command ran but wrote to its error stream.
    #[error("{command}: {stderr}")]
    Command {
        /// Rendered command line.
        command: String,
        /// Captured stderr text, trailing whitespace removed.
        stderr: String,
    },

    /// The command could not be started at all.
    #[error("failed to execute '{program}': {source}")]
    Launch {
        /// Program that was being spawned.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Check if the process never started (missing binary, permissions, ...).
    pub fn is_launch(&self) -> bool {
        matches!(self, Self::Launch { .. })
    }

    /// Get the captured error text if the command ran and reported an error.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Command { stderr, .. } => Some(stderr),
            Self::Launch { .. } => None,
        }
    }
}

/// Argument errors detected before any external command runs.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    /// Required mode-specific flags are absent or empty.
    #[error("{mode} mode requires {required} arguments (missing: {})", .missing.join(", "))]
    MissingArguments {
        mode: Mode,
        /// Human-readable list of everything the mode needs.
        required: &'static str,
        /// Flags that were not supplied.
        missing: Vec<&'static str>,
    },

    /// A flag value that does not parse as the expected type.
    #[error("invalid value '{value}' for {flag}: {reason}")]
    InvalidValue {
        flag: &'static str,
        value: String,
        reason: String,
    },

    /// An interface flag holds something that cannot be a Linux interface name.
    #[error("{flag}: {source}")]
    InvalidInterface {
        flag: &'static str,
        #[source]
        source: IfError,
    },
}

impl UsageError {
    /// Check if this error is about absent arguments rather than bad values.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::MissingArguments { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error() {
        let err = Error::Command {
            command: "tc qdisc add dev eth0 root tbf".into(),
            stderr: "Error: Exclusivity flag on, cannot modify.".into(),
        };
        assert!(!err.is_launch());
        assert_eq!(
            err.stderr(),
            Some("Error: Exclusivity flag on, cannot modify.")
        );
        assert_eq!(
            err.to_string(),
            "tc qdisc add dev eth0 root tbf: Error: Exclusivity flag on, cannot modify."
        );
    }

    #[test]
    fn test_launch_error() {
        let err = Error::Launch {
            program: "tc".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.is_launch());
        assert_eq!(err.stderr(), None);
        assert!(err.to_string().starts_with("failed to execute 'tc': "));
    }

    #[test]
    fn test_missing_arguments_message() {
        let err = UsageError::MissingArguments {
            mode: Mode::MptcpServer,
            required: "--subflow-ip and --subflow-iface",
            missing: vec!["--subflow-iface"],
        };
        assert!(err.is_missing());
        assert_eq!(
            err.to_string(),
            "mptcp-server mode requires --subflow-ip and --subflow-iface arguments (missing: --subflow-iface)"
        );
    }

    #[test]
    fn test_invalid_value_message() {
        let err = UsageError::InvalidValue {
            flag: "--bw1",
            value: "0".into(),
            reason: "number would be zero for non-zero type".into(),
        };
        assert!(!err.is_missing());
        assert_eq!(
            err.to_string(),
            "invalid value '0' for --bw1: number would be zero for non-zero type"
        );
    }

    #[test]
    fn test_invalid_interface_message() {
        let err = UsageError::InvalidInterface {
            flag: "--iface1",
            source: IfError::InvalidName("name contains whitespace".into()),
        };
        assert!(!err.is_missing());
        assert_eq!(
            err.to_string(),
            "--iface1: invalid interface name: name contains whitespace"
        );
    }
}
