//! Network infrastructure: LAN discovery of TVs.
//!
//! There is no mDNS or SSDP here.  Discovery is brute force: guess the local
//! /24 from which well-known router address answers, then ask every host in
//! it for a brand-specific HTTP endpoint.  See [`prober`].

pub mod prober;

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use prober::NetworkProber;

/// The first three octets of a /24 network, written `192.168.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subnet24([u8; 3]);

impl Subnet24 {
    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self([a, b, c])
    }

    /// The /24 containing `ip`.
    pub fn of(ip: Ipv4Addr) -> Self {
        let [a, b, c, _] = ip.octets();
        Self([a, b, c])
    }

    /// Address of `host` inside this subnet.
    pub fn host(self, host: u8) -> Ipv4Addr {
        let [a, b, c] = self.0;
        Ipv4Addr::new(a, b, c, host)
    }
}

impl fmt::Display for Subnet24 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}.{b}.{c}")
    }
}

/// Returned for text that is not three dot-separated octets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid /24 prefix {0:?}; expected three octets like 192.168.1")]
pub struct ParseSubnetError(String);

impl FromStr for Subnet24 {
    type Err = ParseSubnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSubnetError(s.to_string());
        let mut octets = [0u8; 3];
        let mut parts = s.trim().split('.');
        for slot in &mut octets {
            *slot = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        }
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self(octets))
    }
}

impl TryFrom<String> for Subnet24 {
    type Error = ParseSubnetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Subnet24> for String {
    fn from(value: Subnet24) -> Self {
        value.to_string()
    }
}
