//! front-net-ctrl - MPTCP initialization and interface bandwidth control.
//!
//! Thin wrapper over `frontnet`: parse and validate arguments, run the chosen
//! mode, exit 0 on success, 1 if any command failed and 2 on usage errors.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use frontnet::config::{DEFAULT_IP, DEFAULT_TC};
use frontnet::{ConsoleReporter, Dispatcher, Mode, ModeArgs, ModeRequest, SystemExecutor, Tools};

const AFTER_HELP: &str = "\
Mode-specific parameters:
  bandwidth:     Requires --iface1, --bw1, --iface2, --bw2
  mptcp-client:  No additional parameters required
  mptcp-server:  Requires --subflow-ip, --subflow-iface

Examples:
  front-net-ctrl -m bandwidth --iface1 eth0 --bw1 100 --iface2 eth1 --bw2 50
  front-net-ctrl -m mptcp-client
  front-net-ctrl -m mptcp-server --subflow-ip 192.168.1.100 --subflow-iface eth0";

#[derive(Parser)]
#[command(name = "front-net-ctrl", version)]
#[command(about = "Network control tool for MPTCP and interface bandwidth")]
#[command(long_about = "\
Network control tool for MPTCP and interface bandwidth.

Initializes MPTCP on Linux hosts and limits network interface bandwidth.
Supports MPTCP client/server configuration for one extra subflow (e.g.
terrestrial + satellite) and bandwidth management using traffic control (tc).")]
#[command(after_help = AFTER_HELP)]
struct Cli {
    /// Operation mode.
    #[arg(short = 'm', long, value_enum)]
    mode: ModeArg,

    /// First network interface.
    #[arg(long, help_heading = "Bandwidth mode parameters")]
    iface1: Option<String>,

    /// Bandwidth for the first interface in Mbit/s.
    #[arg(long, value_name = "MBIT", help_heading = "Bandwidth mode parameters")]
    bw1: Option<String>,

    /// Second network interface.
    #[arg(long, help_heading = "Bandwidth mode parameters")]
    iface2: Option<String>,

    /// Bandwidth for the second interface in Mbit/s.
    #[arg(long, value_name = "MBIT", help_heading = "Bandwidth mode parameters")]
    bw2: Option<String>,

    /// Subflow IP address to announce.
    #[arg(long, value_name = "IP", help_heading = "MPTCP server mode parameters")]
    subflow_ip: Option<String>,

    /// Subflow interface.
    #[arg(long, value_name = "IFACE", help_heading = "MPTCP server mode parameters")]
    subflow_iface: Option<String>,

    /// Traffic control executable.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_TC)]
    tc_bin: String,

    /// iproute2 `ip` executable.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_IP)]
    ip_bin: String,

    /// Enable debug logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Limit bandwidth on two interfaces.
    Bandwidth,
    /// Configure MPTCP limits for a client.
    MptcpClient,
    /// Configure MPTCP limits and a signal endpoint for a server.
    MptcpServer,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Bandwidth => Mode::Bandwidth,
            ModeArg::MptcpClient => Mode::MptcpClient,
            ModeArg::MptcpServer => Mode::MptcpServer,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let args = ModeArgs {
        iface1: cli.iface1,
        bw1: cli.bw1,
        iface2: cli.iface2,
        bw2: cli.bw2,
        subflow_ip: cli.subflow_ip,
        subflow_iface: cli.subflow_iface,
    };

    let request = match ModeRequest::from_args(cli.mode.into(), args) {
        Ok(request) => request,
        Err(e) => {
            let kind = if e.is_missing() {
                ErrorKind::MissingRequiredArgument
            } else {
                ErrorKind::ValueValidation
            };
            Cli::command().error(kind, e).exit()
        }
    };

    let tools = Tools::default().tc(cli.tc_bin).ip(cli.ip_bin);
    let outcome = Dispatcher::new(SystemExecutor, ConsoleReporter)
        .tools(tools)
        .run(&request);

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
