//! MPTCP path-manager setup through `ip mptcp`.
//!
//! Clients raise the subflow and ADD_ADDR limits so the peer's announced
//! address can be used. Servers raise the subflow limit and announce one
//! extra address as a signal endpoint.

use std::net::IpAddr;

use crate::exec::Invocation;

/// Subflow limit applied in both client and server modes.
pub const MAX_SUBFLOWS: u32 = 2;

/// ADD_ADDR limit applied in client mode.
pub const MAX_ADD_ADDR_ACCEPTED: u32 = 2;

/// MPTCP limits configuration.
///
/// Each limit that is set becomes its own `ip mptcp limits set` command so
/// that one rejected limit does not prevent the other from being applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MptcpLimits {
    /// Maximum subflows per connection.
    pub subflows: Option<u32>,
    /// Maximum additional addresses to accept from peers.
    pub add_addr_accepted: Option<u32>,
}

impl MptcpLimits {
    /// Create a new limits builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum subflows per connection.
    pub fn subflows(mut self, max: u32) -> Self {
        self.subflows = Some(max);
        self
    }

    /// Set maximum additional addresses to accept from peers.
    pub fn add_addr_accepted(mut self, max: u32) -> Self {
        self.add_addr_accepted = Some(max);
        self
    }

    /// One `ip mptcp limits set` command per configured limit, subflows first.
    pub fn invocations(&self, ip: &str) -> Vec<Invocation> {
        let limits = [
            ("subflow", self.subflows),
            ("add_addr_accepted", self.add_addr_accepted),
        ];

        limits
            .into_iter()
            .filter_map(|(name, value)| {
                value.map(|v| {
                    Invocation::new(ip)
                        .args(["mptcp", "limits", "set", name])
                        .arg(v.to_string())
                })
            })
            .collect()
    }
}

/// Address and device announced by a server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubflowSpec {
    pub address: IpAddr,
    /// Device the endpoint is bound to.
    pub dev: String,
}

impl SubflowSpec {
    pub fn new(address: IpAddr, dev: impl Into<String>) -> Self {
        Self {
            address,
            dev: dev.into(),
        }
    }
}

/// Builder for an `ip mptcp endpoint add` command.
#[derive(Debug, Clone)]
pub struct MptcpEndpointBuilder {
    address: IpAddr,
    dev: Option<String>,
    signal: bool,
}

impl MptcpEndpointBuilder {
    /// Create a new endpoint builder with the given address.
    ///
    /// # Example
    ///
    /// ```
    /// use frontnet::mptcp::MptcpEndpointBuilder;
    /// use std::net::Ipv4Addr;
    ///
    /// let inv = MptcpEndpointBuilder::new(Ipv4Addr::new(192, 168, 1, 100).into())
    ///     .dev("eth0")
    ///     .signal()
    ///     .invocation("ip");
    /// assert_eq!(inv.to_string(), "ip mptcp endpoint add 192.168.1.100 dev eth0 signal");
    /// ```
    pub fn new(address: IpAddr) -> Self {
        Self {
            address,
            dev: None,
            signal: false,
        }
    }

    /// Bind the endpoint to a device.
    pub fn dev(mut self, dev: impl Into<String>) -> Self {
        self.dev = Some(dev.into());
        self
    }

    /// Set the signal flag (announce to peers).
    pub fn signal(mut self) -> Self {
        self.signal = true;
        self
    }

    pub fn invocation(&self, ip: &str) -> Invocation {
        let mut inv = Invocation::new(ip)
            .args(["mptcp", "endpoint", "add"])
            .arg(self.address.to_string());

        if let Some(dev) = &self.dev {
            inv = inv.arg("dev").arg(dev.as_str());
        }
        if self.signal {
            inv = inv.arg("signal");
        }
        inv
    }
}

/// Commands run in client mode, in order.
pub fn client_invocations(ip: &str) -> Vec<Invocation> {
    MptcpLimits::new()
        .subflows(MAX_SUBFLOWS)
        .add_addr_accepted(MAX_ADD_ADDR_ACCEPTED)
        .invocations(ip)
}

/// Commands run in server mode, in order.
pub fn server_invocations(ip: &str, subflow: &SubflowSpec) -> Vec<Invocation> {
    let mut invocations = MptcpLimits::new().subflows(MAX_SUBFLOWS).invocations(ip);
    invocations.push(
        MptcpEndpointBuilder::new(subflow.address)
            .dev(subflow.dev.as_str())
            .signal()
            .invocation(ip),
    );
    invocations
}
