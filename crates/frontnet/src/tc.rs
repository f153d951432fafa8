//! Token bucket filter shaping through `tc qdisc`.
//!
//! A root `tbf` qdisc may already be installed from an earlier run, so each
//! interface is first updated with `qdisc change` and only on failure created
//! with `qdisc add`. This avoids probing the current qdisc state.
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroU32;
//! use frontnet::tc::{QdiscOp, TbfConfig, qdisc_invocation};
//!
//! let config = TbfConfig::new(NonZeroU32::new(100).unwrap());
//! let inv = qdisc_invocation("tc", QdiscOp::Change, "eth0", &config);
//! assert_eq!(
//!     inv.to_string(),
//!     "tc qdisc change dev eth0 root tbf rate 100mbit burst 256mbit latency 600ms"
//! );
//! ```

use std::num::NonZeroU32;

use crate::error::Result;
use crate::exec::{self, Executor, Invocation};

/// Burst size applied to every shaped interface, in megabits.
pub const BURST_MBIT: u32 = 256;

/// Latency bound applied to every shaped interface, in milliseconds.
pub const LATENCY_MS: u32 = 600;

/// An interface and the rate it should be shaped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSpec {
    /// Interface name.
    pub name: String,
    /// Rate in megabits per second.
    pub rate_mbit: NonZeroU32,
}

impl InterfaceSpec {
    pub fn new(name: impl Into<String>, rate_mbit: NonZeroU32) -> Self {
        Self {
            name: name.into(),
            rate_mbit,
        }
    }

    /// The tbf parameters for this interface.
    pub fn tbf(&self) -> TbfConfig {
        TbfConfig::new(self.rate_mbit)
    }
}

/// Token Bucket Filter (tbf) qdisc parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TbfConfig {
    /// Rate in megabits per second.
    pub rate_mbit: NonZeroU32,
    /// Burst size in megabits.
    pub burst_mbit: u32,
    /// Maximum queueing latency in milliseconds.
    pub latency_ms: u32,
}

impl TbfConfig {
    /// Create a root tbf configuration with the fixed burst and latency.
    pub fn new(rate_mbit: NonZeroU32) -> Self {
        Self {
            rate_mbit,
            burst_mbit: BURST_MBIT,
            latency_ms: LATENCY_MS,
        }
    }

    pub fn kind(&self) -> &'static str {
        "tbf"
    }

    /// Render `root tbf rate .. burst .. latency ..` as `tc` arguments.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "root".to_string(),
            self.kind().to_string(),
            "rate".to_string(),
            format!("{}mbit", self.rate_mbit),
            "burst".to_string(),
            format!("{}mbit", self.burst_mbit),
            "latency".to_string(),
            format!("{}ms", self.latency_ms),
        ]
    }
}

/// `tc qdisc` verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QdiscOp {
    /// Modify the existing qdisc in place.
    Change,
    /// Create a new qdisc.
    Add,
}

impl QdiscOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Add => "add",
        }
    }
}

/// Build `tc qdisc <op> dev <dev> <tbf args>`.
pub fn qdisc_invocation(tc: &str, op: QdiscOp, dev: &str, config: &TbfConfig) -> Invocation {
    Invocation::new(tc)
        .args(["qdisc", op.as_str(), "dev", dev])
        .args(config.to_args())
}

/// How the shaping ended up being applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// An existing qdisc was modified.
    Changed,
    /// A new qdisc was created after `change` failed.
    Added,
}

/// Shape one interface, falling back from `change` to `add`.
///
/// A failed `change` (error output or spawn failure) is never reported on its
/// own; only the `add` result is returned as an error.
pub fn configure_interface<E: Executor + ?Sized>(
    executor: &mut E,
    tc: &str,
    iface: &InterfaceSpec,
) -> Result<Applied> {
    let config = iface.tbf();

    let change = qdisc_invocation(tc, QdiscOp::Change, &iface.name, &config);
    match exec::run(executor, &change) {
        Ok(_) => return Ok(Applied::Changed),
        Err(e) => {
            tracing::debug!(dev = %iface.name, error = %e, "qdisc change failed, trying add");
        }
    }

    let add = qdisc_invocation(tc, QdiscOp::Add, &iface.name, &config);
    exec::run(executor, &add).map(|_| Applied::Added)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::exec::CommandOutput;
    use crate::fixtures::ScriptedExecutor;

    fn mbit(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_tbf_args() {
        let config = TbfConfig::new(mbit(50));
        assert_eq!(config.kind(), "tbf");
        assert_eq!(
            config.to_args(),
            [
                "root", "tbf", "rate", "50mbit", "burst", "256mbit", "latency", "600ms"
            ]
        );
    }

    #[test]
    fn test_qdisc_add_invocation() {
        let inv = qdisc_invocation("tc", QdiscOp::Add, "eth1", &TbfConfig::new(mbit(50)));
        assert_eq!(
            inv.to_string(),
            "tc qdisc add dev eth1 root tbf rate 50mbit burst 256mbit latency 600ms"
        );
    }

    #[test]
    fn test_change_succeeds() {
        let mut exec = ScriptedExecutor::new([Ok(CommandOutput::success())]);
        let iface = InterfaceSpec::new("eth0", mbit(100));

        let applied = configure_interface(&mut exec, "tc", &iface).unwrap();
        assert_eq!(applied, Applied::Changed);
        assert_eq!(
            exec.calls,
            ["tc qdisc change dev eth0 root tbf rate 100mbit burst 256mbit latency 600ms"]
        );
    }

    #[test]
    fn test_change_fails_add_succeeds() {
        let mut exec = ScriptedExecutor::new([
            Ok(CommandOutput::failure(2, "Error: Qdisc not found.\n")),
            Ok(CommandOutput::success()),
        ]);
        let iface = InterfaceSpec::new("eth0", mbit(100));

        let applied = configure_interface(&mut exec, "tc", &iface).unwrap();
        assert_eq!(applied, Applied::Added);
        assert_eq!(
            exec.calls,
            [
                "tc qdisc change dev eth0 root tbf rate 100mbit burst 256mbit latency 600ms",
                "tc qdisc add dev eth0 root tbf rate 100mbit burst 256mbit latency 600ms",
            ]
        );
    }

    #[test]
    fn test_change_launch_failure_falls_back() {
        let mut exec = ScriptedExecutor::new([
            Err(io::ErrorKind::PermissionDenied),
            Ok(CommandOutput::success()),
        ]);
        let iface = InterfaceSpec::new("eth0", mbit(10));

        assert_eq!(
            configure_interface(&mut exec, "tc", &iface).unwrap(),
            Applied::Added
        );
        assert_eq!(exec.calls.len(), 2);
    }

    #[test]
    fn test_both_fail() {
        let mut exec = ScriptedExecutor::new([
            Ok(CommandOutput::failure(2, "Error: Qdisc not found.\n")),
            Ok(CommandOutput::failure(1, "Cannot find device \"eth9\"\n")),
        ]);
        let iface = InterfaceSpec::new("eth9", mbit(10));

        let err = configure_interface(&mut exec, "tc", &iface).unwrap_err();
        assert_eq!(err.stderr(), Some("Cannot find device \"eth9\""));
        assert_eq!(exec.calls.len(), 2);
    }

    #[test]
    fn test_add_launch_failure_is_terminal() {
        let mut exec = ScriptedExecutor::new([
            Err(io::ErrorKind::NotFound),
            Err(io::ErrorKind::NotFound),
        ]);
        let iface = InterfaceSpec::new("eth0", mbit(10));

        let err = configure_interface(&mut exec, "tc", &iface).unwrap_err();
        assert!(err.is_launch());
        assert_eq!(exec.calls.len(), 2);
    }
}
