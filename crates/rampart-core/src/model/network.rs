// ── Network domain types ──

use std::net::IpAddr;

use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use serde::{Deserialize, Serialize};

use super::policy::Protocol;

// ── Interfaces ──────────────────────────────────────────────────────

/// A physical or virtual network interface the appliance manages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Zone this interface belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4: Vec<Ipv4Network>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6: Vec<Ipv6Network>,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub dhcp: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
}

impl Interface {
    /// Whether any of this interface's subnets contains `ip`.
    pub fn contains(&self, ip: IpAddr) -> bool {
        match ip {
            IpAddr::V4(v4) => self.ipv4.iter().any(|net| net.contains(v4)),
            IpAddr::V6(v6) => self.ipv6.iter().any(|net| net.contains(v6)),
        }
    }
}

// ── Routes ──────────────────────────────────────────────────────────

/// Static route entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Destination network; absent means the default route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<IpNetwork>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<IpAddr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<u32>,
}

// ── NAT ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NatType {
    Masquerade,
    Snat,
    Dnat,
}

/// Address translation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub nat_type: NatType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<u16>,
}

// ── IP sets ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IpSetType {
    #[default]
    Ipv4Addr,
    Ipv6Addr,
    InetService,
}

/// Named address collection rules can reference instead of literals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpSet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub set_type: IpSetType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<String>,
}

// ── Interface protections ───────────────────────────────────────────

/// Per-interface hardening toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct InterfaceProtection {
    pub name: String,
    pub interface: String,
    #[serde(default = "crate::model::default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub anti_spoofing: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub bogon_filtering: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub private_filtering: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub invalid_packets: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub syn_flood_protection: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syn_flood_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub syn_flood_burst: Option<u32>,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub icmp_rate_limit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icmp_burst: Option<u32>,
}
