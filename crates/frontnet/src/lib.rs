//! Bandwidth shaping and MPTCP initialization for Linux hosts.
//!
//! This crate drives the iproute2 tools as child processes to put a host into
//! one of three configurations:
//!
//! - `bandwidth` - shape two interfaces with a root `tbf` qdisc
//! - `mptcp-client` - raise the MPTCP subflow and ADD_ADDR limits
//! - `mptcp-server` - raise the subflow limit and announce a signal endpoint
//!
//! Arguments are validated up front into a [`ModeRequest`]; a [`Dispatcher`]
//! then runs every command of the mode, reporting each one and folding the
//! results into a [`ModeOutcome`].
//!
//! # Example
//!
//! ```no_run
//! use frontnet::{ConsoleReporter, Dispatcher, Mode, ModeArgs, ModeRequest, SystemExecutor};
//!
//! let args = ModeArgs {
//!     subflow_ip: Some("192.168.1.100".into()),
//!     subflow_iface: Some("eth0".into()),
//!     ..Default::default()
//! };
//! let request = ModeRequest::from_args(Mode::MptcpServer, args)?;
//!
//! let outcome = Dispatcher::new(SystemExecutor, ConsoleReporter).run(&request);
//! if !outcome.is_success() {
//!     std::process::exit(1);
//! }
//! # Ok::<(), frontnet::UsageError>(())
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod exec;
pub mod mptcp;
pub mod output;
pub mod tc;
pub mod util;

#[cfg(test)]
mod fixtures;

pub use config::Tools;
pub use dispatch::{Dispatcher, Mode, ModeArgs, ModeOutcome, ModeRequest};
pub use error::{Error, Result, UsageError};
pub use exec::{CommandOutput, Executor, Invocation, SystemExecutor};
pub use output::{ConsoleReporter, Report};
