//! Mode validation and command orchestration.
//!
//! A [`ModeRequest`] can only be built by validating [`ModeArgs`], so by the
//! time the [`Dispatcher`] sees one every required field is present and no
//! command has run yet. The dispatcher then runs every command of the mode
//! in order, never stopping at the first failure, and folds the results into
//! a [`ModeOutcome`].

use std::fmt;
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::config::Tools;
use crate::error::UsageError;
use crate::exec::{self, Executor, Invocation};
use crate::mptcp::{self, SubflowSpec};
use crate::output::Report;
use crate::tc::{self, Applied, InterfaceSpec};
use crate::util::validate_ifname;

/// Operating mode, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Shape two interfaces with tbf.
    Bandwidth,
    /// Raise MPTCP limits for a client.
    MptcpClient,
    /// Raise MPTCP limits and announce a signal endpoint.
    MptcpServer,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Bandwidth, Mode::MptcpClient, Mode::MptcpServer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bandwidth => "bandwidth",
            Self::MptcpClient => "mptcp-client",
            Self::MptcpServer => "mptcp-server",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw mode-specific arguments, as given on the command line.
///
/// Values stay unparsed until a mode asks for them, so flags the selected
/// mode does not use are never looked at.
#[derive(Debug, Clone, Default)]
pub struct ModeArgs {
    pub iface1: Option<String>,
    /// Rate in Mbit/s, must be a positive integer.
    pub bw1: Option<String>,
    pub iface2: Option<String>,
    pub bw2: Option<String>,
    /// IPv4 or IPv6 address.
    pub subflow_ip: Option<String>,
    pub subflow_iface: Option<String>,
}

/// A mode with all of its arguments validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeRequest {
    /// Interfaces in argument order.
    Bandwidth([InterfaceSpec; 2]),
    MptcpClient,
    MptcpServer(SubflowSpec),
}

const BANDWIDTH_REQUIRED: &str = "--iface1, --bw1, --iface2, and --bw2";
const SERVER_REQUIRED: &str = "--subflow-ip and --subflow-iface";

/// Record `flag` as missing when `value` is absent.
fn require<T>(value: Option<T>, flag: &'static str, missing: &mut Vec<&'static str>) -> Option<T> {
    if value.is_none() {
        missing.push(flag);
    }
    value
}

/// Like [`require`], but an empty string also counts as missing.
fn require_str(
    value: Option<String>,
    flag: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    require(value.filter(|s| !s.is_empty()), flag, missing)
}

fn parsed<T>(value: String, flag: &'static str) -> Result<T, UsageError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value.parse().map_err(|e: T::Err| UsageError::InvalidValue {
        flag,
        reason: e.to_string(),
        value,
    })
}

fn checked_ifname(name: String, flag: &'static str) -> Result<String, UsageError> {
    validate_ifname(&name).map_err(|source| UsageError::InvalidInterface { flag, source })?;
    Ok(name)
}

impl ModeRequest {
    /// Validate the arguments for `mode`.
    ///
    /// Fields that `mode` does not use are ignored.
    pub fn from_args(mode: Mode, args: ModeArgs) -> Result<Self, UsageError> {
        let mut missing = Vec::new();

        match mode {
            Mode::Bandwidth => {
                let iface1 = require_str(args.iface1, "--iface1", &mut missing);
                let bw1 = require_str(args.bw1, "--bw1", &mut missing);
                let iface2 = require_str(args.iface2, "--iface2", &mut missing);
                let bw2 = require_str(args.bw2, "--bw2", &mut missing);

                let (Some(iface1), Some(bw1), Some(iface2), Some(bw2)) = (iface1, bw1, iface2, bw2)
                else {
                    return Err(UsageError::MissingArguments {
                        mode,
                        required: BANDWIDTH_REQUIRED,
                        missing,
                    });
                };

                let bw1: NonZeroU32 = parsed(bw1, "--bw1")?;
                let bw2: NonZeroU32 = parsed(bw2, "--bw2")?;

                Ok(Self::Bandwidth([
                    InterfaceSpec::new(checked_ifname(iface1, "--iface1")?, bw1),
                    InterfaceSpec::new(checked_ifname(iface2, "--iface2")?, bw2),
                ]))
            }
            Mode::MptcpClient => Ok(Self::MptcpClient),
            Mode::MptcpServer => {
                let ip = require_str(args.subflow_ip, "--subflow-ip", &mut missing);
                let iface = require_str(args.subflow_iface, "--subflow-iface", &mut missing);

                let (Some(ip), Some(iface)) = (ip, iface) else {
                    return Err(UsageError::MissingArguments {
                        mode,
                        required: SERVER_REQUIRED,
                        missing,
                    });
                };

                let ip: IpAddr = parsed(ip, "--subflow-ip")?;

                Ok(Self::MptcpServer(SubflowSpec::new(
                    ip,
                    checked_ifname(iface, "--subflow-iface")?,
                )))
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Bandwidth(_) => Mode::Bandwidth,
            Self::MptcpClient => Mode::MptcpClient,
            Self::MptcpServer(_) => Mode::MptcpServer,
        }
    }
}

/// Aggregate result of one mode.
///
/// In bandwidth mode each interface counts once, whether it took one or
/// two `tc` calls. In MPTCP modes each command counts once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeOutcome {
    pub mode: Mode,
    pub attempted: usize,
    pub failed: usize,
}

impl ModeOutcome {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            attempted: 0,
            failed: 0,
        }
    }

    fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if !ok {
            self.failed += 1;
        }
    }

    /// True iff nothing failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Runs the commands of a validated mode and reports each result.
pub struct Dispatcher<E, R> {
    executor: E,
    reporter: R,
    tools: Tools,
}

impl<E: Executor, R: Report> Dispatcher<E, R> {
    /// Create a dispatcher using the default `tc` and `ip` executables.
    pub fn new(executor: E, reporter: R) -> Self {
        Self {
            executor,
            reporter,
            tools: Tools::default(),
        }
    }

    /// Use different executables.
    pub fn tools(mut self, tools: Tools) -> Self {
        self.tools = tools;
        self
    }

    /// Run every command for `request`.
    pub fn run(&mut self, request: &ModeRequest) -> ModeOutcome {
        let outcome = match request {
            ModeRequest::Bandwidth(ifaces) => self.run_bandwidth(ifaces),
            ModeRequest::MptcpClient => {
                self.reporter.notice("Configuring MPTCP client mode...");
                let invocations = mptcp::client_invocations(&self.tools.ip);
                self.run_all(Mode::MptcpClient, &invocations)
            }
            ModeRequest::MptcpServer(subflow) => {
                self.reporter.notice("Configuring MPTCP server mode...");
                let invocations = mptcp::server_invocations(&self.tools.ip, subflow);
                self.run_all(Mode::MptcpServer, &invocations)
            }
        };

        tracing::info!(
            mode = %outcome.mode,
            attempted = outcome.attempted,
            failed = outcome.failed,
            "mode finished"
        );
        outcome
    }

    fn run_bandwidth(&mut self, ifaces: &[InterfaceSpec]) -> ModeOutcome {
        let mut outcome = ModeOutcome::new(Mode::Bandwidth);

        for iface in ifaces {
            let ok = match tc::configure_interface(&mut self.executor, &self.tools.tc, iface) {
                Ok(Applied::Changed) => {
                    self.reporter
                        .success(&format!("Successfully modified bandwidth for {}", iface.name));
                    true
                }
                Ok(Applied::Added) => {
                    self.reporter.success(&format!(
                        "Successfully added bandwidth limit for {}",
                        iface.name
                    ));
                    true
                }
                Err(e) if e.is_launch() => {
                    self.reporter.failure(&format!(
                        "Error executing command for {}: {}",
                        iface.name, e
                    ));
                    false
                }
                Err(e) => {
                    self.reporter.failure(&format!(
                        "Error configuring {}: {}",
                        iface.name,
                        e.stderr().unwrap_or_default()
                    ));
                    false
                }
            };
            outcome.record(ok);
        }

        outcome
    }

    fn run_all(&mut self, mode: Mode, invocations: &[Invocation]) -> ModeOutcome {
        let mut outcome = ModeOutcome::new(mode);

        for inv in invocations {
            let ok = match exec::run(&mut self.executor, inv) {
                Ok(_) => {
                    self.reporter
                        .success(&format!("Successfully executed: {}", inv));
                    true
                }
                Err(e) if e.is_launch() => {
                    self.reporter.failure(&format!("Command failed {}: {}", inv, e));
                    false
                }
                Err(e) => {
                    self.reporter.failure(&format!(
                        "Error executing {}: {}",
                        inv,
                        e.stderr().unwrap_or_default()
                    ));
                    false
                }
            };
            outcome.record(ok);
        }

        outcome
    }
}
