//! Configuration data model.
//!
//! Serde representations of the declarative appliance state: zones,
//! policies and their rules, interfaces, NAT, routes, IP sets and
//! interface protections. Serialization omits unset fields so the
//! canonical JSON stays stable under round-trips.

pub mod config;
pub mod network;
pub mod policy;
pub mod zone;

// ── Re-exports ──────────────────────────────────────────────────────

pub use config::{Config, SCHEMA_VERSION};
pub use network::{Interface, InterfaceProtection, IpSet, IpSetType, NatRule, NatType, Route};
pub use policy::{
    ConnState, Day, Policy, PolicyAction, PolicyRule, Protocol, RateLimit, RatePeriod, RuleAction,
    RuleOrigin, TcpFlag,
};
pub use zone::{
    FIREWALL_ZONE, Zone, ZoneManagement, ZoneMatch, ZoneServicePort, ZoneServices,
    is_firewall_zone,
};

// ── Serde helpers ───────────────────────────────────────────────────

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn default_true() -> bool {
    true
}
