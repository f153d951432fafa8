//! Which external tools get invoked.

/// Default traffic-control executable, resolved through `PATH`.
pub const DEFAULT_TC: &str = "tc";

/// Default iproute2 executable, resolved through `PATH`.
pub const DEFAULT_IP: &str = "ip";

/// Executables used to build invocations.
///
/// # Example
///
/// ```
/// use frontnet::Tools;
///
/// let tools = Tools::default().tc("/usr/sbin/tc");
/// assert_eq!(tools.tc, "/usr/sbin/tc");
/// assert_eq!(tools.ip, "ip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    /// Program run for `qdisc` commands.
    pub tc: String,
    /// Program run for `mptcp` commands.
    pub ip: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            tc: DEFAULT_TC.to_string(),
            ip: DEFAULT_IP.to_string(),
        }
    }
}

impl Tools {
    /// Set the `tc` executable.
    pub fn tc(mut self, program: impl Into<String>) -> Self {
        self.tc = program.into();
        self
    }

    /// Set the `ip` executable.
    pub fn ip(mut self, program: impl Into<String>) -> Self {
        self.ip = program.into();
        self
    }
}
