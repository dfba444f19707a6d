// ── Zone domain types ──

use serde::{Deserialize, Serialize};

use super::policy::Protocol;

/// Pseudo-zone naming the appliance itself as a traffic endpoint.
pub const FIREWALL_ZONE: &str = "firewall";

/// Whether `name` refers to the appliance-itself pseudo-zone.
pub fn is_firewall_zone(name: &str) -> bool {
    name.eq_ignore_ascii_case(FIREWALL_ZONE) || name.eq_ignore_ascii_case("self")
}

// ── Zones ───────────────────────────────────────────────────────────

/// A named trust segment that traffic is classified into.
///
/// Membership comes either from the shorthand `interface`/`src`/`dst`/
/// `vlan` fields or from an explicit `matches` list. Use
/// [`Zone::effective_matches`] to read them uniformly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // Shorthand match criteria
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
    /// Explicit match criteria; when present these take precedence and
    /// unset fields fall back to the shorthand above.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<ZoneMatch>,

    // Behavior
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<super::policy::PolicyAction>,
    /// Marks the untrusted side (WAN). Influences zone detection for
    /// public addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<ZoneServices>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management: Option<ZoneManagement>,

    // Addressing
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6: Vec<String>,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub dhcp: bool,
}

impl Zone {
    /// Resolved match criteria: the explicit list with unset fields
    /// inherited from the shorthand, or the shorthand as a singleton,
    /// or nothing when the zone declares no criteria at all.
    pub fn effective_matches(&self) -> Vec<ZoneMatch> {
        if !self.matches.is_empty() {
            return self
                .matches
                .iter()
                .map(|m| ZoneMatch {
                    interface: m.interface.clone().or_else(|| self.interface.clone()),
                    src: m.src.clone().or_else(|| self.src.clone()),
                    dst: m.dst.clone().or_else(|| self.dst.clone()),
                    vlan: m.vlan.or(self.vlan),
                })
                .collect();
        }
        if self.interface.is_some()
            || self.src.is_some()
            || self.dst.is_some()
            || self.vlan.is_some()
        {
            return vec![ZoneMatch {
                interface: self.interface.clone(),
                src: self.src.clone(),
                dst: self.dst.clone(),
                vlan: self.vlan,
            }];
        }
        Vec::new()
    }

    pub fn is_external(&self) -> bool {
        self.external.unwrap_or(false)
    }
}

/// One membership criterion; all set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMatch {
    /// Interface name; a trailing `+` or `*` matches a name prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

// ── Zone services ───────────────────────────────────────────────────

/// Network services the appliance offers to hosts inside a zone. Each
/// enabled flag synthesizes an inbound accept rule toward the firewall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ZoneServices {
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub dhcp: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub dns: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub ntp: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub captive_portal: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_ports: Vec<ZoneServicePort>,
}

/// Operator-defined service opening beyond the builtin flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneServicePort {
    pub name: String,
    pub protocol: Protocol,
    pub port: u16,
    /// Upper bound of an inclusive port range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_port: Option<u16>,
}

/// Management-plane access granted to hosts inside a zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ZoneManagement {
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub web: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub ssh: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub api: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub icmp: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub snmp: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub syslog: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_promotes_to_singleton_match() {
        let zone = Zone {
            name: "lan".into(),
            interface: Some("eth1".into()),
            vlan: Some(10),
            ..Zone::default()
        };
        let matches = zone.effective_matches();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].interface.as_deref(), Some("eth1"));
        assert_eq!(matches[0].vlan, Some(10));
    }

    #[test]
    fn explicit_matches_inherit_shorthand_per_field() {
        let zone = Zone {
            name: "lan".into(),
            interface: Some("eth1".into()),
            src: Some("192.168.1.0/24".into()),
            matches: vec![
                ZoneMatch {
                    interface: Some("eth2".into()),
                    ..ZoneMatch::default()
                },
                ZoneMatch {
                    vlan: Some(20),
                    ..ZoneMatch::default()
                },
            ],
            ..Zone::default()
        };
        let matches = zone.effective_matches();
        assert_eq!(matches.len(), 2);
        // First keeps its own interface but inherits src.
        assert_eq!(matches[0].interface.as_deref(), Some("eth2"));
        assert_eq!(matches[0].src.as_deref(), Some("192.168.1.0/24"));
        // Second inherits the shorthand interface.
        assert_eq!(matches[1].interface.as_deref(), Some("eth1"));
        assert_eq!(matches[1].vlan, Some(20));
    }

    #[test]
    fn zone_without_criteria_has_no_matches() {
        let zone = Zone {
            name: "empty".into(),
            ..Zone::default()
        };
        assert!(zone.effective_matches().is_empty());
    }

    #[test]
    fn firewall_zone_aliases() {
        assert!(is_firewall_zone("firewall"));
        assert!(is_firewall_zone("Firewall"));
        assert!(is_firewall_zone("self"));
        assert!(!is_firewall_zone("lan"));
    }
}
