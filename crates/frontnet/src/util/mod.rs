//! Shared utilities for frontnet.

pub mod ifname;

pub use ifname::{IfError, validate as validate_ifname};
