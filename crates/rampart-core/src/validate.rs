// ── Configuration validation ──

use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Config, NatType, Policy, Protocol, is_firewall_zone};
use crate::synthesis;

// ── Findings ────────────────────────────────────────────────────────

/// Severity of a single validation finding. Only `Error` findings block
/// a configuration from being staged or applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One validation finding tied to a configuration field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Full set of findings from one validation pass, warnings included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("configuration validation failed: {}", render(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn render(findings: &[ValidationError]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Whether any finding is severe enough to block the change.
    pub fn has_blocking(&self) -> bool {
        self.0.iter().any(|f| f.severity == Severity::Error)
    }

    /// Warnings pass through as `Ok`; error findings become `Err`.
    pub fn into_result(self) -> Result<Vec<ValidationError>, ValidationErrors> {
        if self.has_blocking() { Err(self) } else { Ok(self.0) }
    }

    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
        });
    }

    fn warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
        });
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Config {
    /// Validate the whole document and return every finding.
    ///
    /// Callers decide what to do with warnings; a document with only
    /// warnings is considered acceptable.
    pub fn validate(&self) -> ValidationErrors {
        let mut findings = ValidationErrors::default();
        validate_interfaces(self, &mut findings);
        validate_subnet_overlaps(self, &mut findings);
        validate_zones(self, &mut findings);
        validate_ipsets(self, &mut findings);
        validate_policies(self, &mut findings);
        validate_nat(self, &mut findings);
        validate_protections(self, &mut findings);
        findings
    }
}

// ── Interfaces ──────────────────────────────────────────────────────

fn validate_interfaces(config: &Config, findings: &mut ValidationErrors) {
    let mut seen = HashSet::new();
    for (i, iface) in config.interfaces.iter().enumerate() {
        let field = format!("interfaces[{i}]");
        if !seen.insert(iface.name.as_str()) {
            findings.error(
                format!("{field}.name"),
                format!("duplicate interface name: {}", iface.name),
            );
        }
        if !valid_interface_name(&iface.name) {
            findings.error(
                format!("{field}.name"),
                format!("invalid interface name: {}", iface.name),
            );
        }
        if iface.mtu.is_some_and(|mtu| !(576..=65535).contains(&mtu)) {
            findings.error(format!("{field}.mtu"), "MTU must be between 576 and 65535");
        }
        if let Some(zone) = iface.zone.as_deref() {
            if config.zone(zone).is_none() {
                findings.error(format!("{field}.zone"), format!("unknown zone: {zone}"));
            }
        }
    }
}

/// Interface names follow kernel conventions: alphabetic start, then
/// alphanumerics plus `.`, `_`, `-`, at most 15 bytes.
fn valid_interface_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && name.len() <= 15
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

fn validate_subnet_overlaps(config: &Config, findings: &mut ValidationErrors) {
    let nets: Vec<_> = config
        .interfaces
        .iter()
        .flat_map(|iface| iface.ipv4.iter().map(move |net| (iface.name.as_str(), *net)))
        .collect();
    for (a, (iface_a, net_a)) in nets.iter().enumerate() {
        for (iface_b, net_b) in nets.iter().skip(a + 1) {
            if !net_a.overlaps(*net_b) {
                continue;
            }
            if iface_a == iface_b {
                findings.error(
                    format!("interfaces.{iface_a}.ipv4"),
                    format!("duplicate or overlapping subnet {net_a} and {net_b}"),
                );
            } else {
                findings.warning(
                    "interfaces",
                    format!(
                        "overlapping subnets detected: {net_a} on {iface_a} and {net_b} on {iface_b}"
                    ),
                );
            }
        }
    }
}

// ── Zones ───────────────────────────────────────────────────────────

fn validate_zones(config: &Config, findings: &mut ValidationErrors) {
    let mut seen = HashSet::new();
    for (i, zone) in config.zones.iter().enumerate() {
        let field = format!("zones[{i}]");
        if !seen.insert(zone.name.as_str()) {
            findings.error(
                format!("{field}.name"),
                format!("duplicate zone name: {}", zone.name),
            );
        }
        if is_firewall_zone(&zone.name) {
            findings.error(
                format!("{field}.name"),
                format!("zone name {} is reserved", zone.name),
            );
        }

        validate_match_criteria(&field, zone.src.as_deref(), zone.dst.as_deref(), zone.vlan, findings);
        validate_interface_ref(config, &field, zone.interface.as_deref(), findings);
        for (j, m) in zone.matches.iter().enumerate() {
            let mf = format!("{field}.matches[{j}]");
            validate_match_criteria(&mf, m.src.as_deref(), m.dst.as_deref(), m.vlan, findings);
            validate_interface_ref(config, &mf, m.interface.as_deref(), findings);
        }

        for (j, net) in zone.ipv4.iter().enumerate() {
            if net.parse::<ipnetwork::Ipv4Network>().is_err() {
                findings.error(
                    format!("{field}.ipv4[{j}]"),
                    format!("invalid IPv4 network: {net}"),
                );
            }
        }
        for (j, net) in zone.ipv6.iter().enumerate() {
            if net.parse::<ipnetwork::Ipv6Network>().is_err() {
                findings.error(
                    format!("{field}.ipv6[{j}]"),
                    format!("invalid IPv6 network: {net}"),
                );
            }
        }

        if let Some(services) = &zone.services {
            for (j, port) in services.custom_ports.iter().enumerate() {
                let pf = format!("{field}.services.custom_ports[{j}]");
                if !matches!(port.protocol, Protocol::Tcp | Protocol::Udp) {
                    findings.error(
                        format!("{pf}.protocol"),
                        "custom service ports must be tcp or udp",
                    );
                }
                if port.port == 0 {
                    findings.error(format!("{pf}.port"), "port must be between 1 and 65535");
                }
                if port.end_port.is_some_and(|end| end < port.port) {
                    findings.error(format!("{pf}.end_port"), "end_port must not precede port");
                }
            }
        }
    }
}

fn validate_interface_ref(
    config: &Config,
    field: &str,
    interface: Option<&str>,
    findings: &mut ValidationErrors,
) {
    if let Some(iface) = interface {
        if !is_wildcard_interface(iface) && config.interface(iface).is_none() {
            findings.error(
                format!("{field}.interface"),
                format!("unknown interface: {iface}"),
            );
        }
    }
}

fn validate_match_criteria(
    field: &str,
    src: Option<&str>,
    dst: Option<&str>,
    vlan: Option<u16>,
    findings: &mut ValidationErrors,
) {
    if let Some(src) = src {
        if !valid_ip_or_cidr(src) {
            findings.error(format!("{field}.src"), format!("invalid IP or CIDR: {src}"));
        }
    }
    if let Some(dst) = dst {
        if !valid_ip_or_cidr(dst) {
            findings.error(format!("{field}.dst"), format!("invalid IP or CIDR: {dst}"));
        }
    }
    if vlan.is_some_and(|vlan| !(1..=4094).contains(&vlan)) {
        findings.error(format!("{field}.vlan"), "VLAN must be between 1 and 4094");
    }
}

// ── IP sets ─────────────────────────────────────────────────────────

fn validate_ipsets(config: &Config, findings: &mut ValidationErrors) {
    let mut seen = HashSet::new();
    for (i, set) in config.ipsets.iter().enumerate() {
        let field = format!("ipsets[{i}]");
        if !seen.insert(set.name.as_str()) {
            findings.error(
                format!("{field}.name"),
                format!("duplicate ipset name: {}", set.name),
            );
        }
        if !valid_ipset_name(&set.name) {
            findings.error(
                format!("{field}.name"),
                format!("invalid ipset name: {}", set.name),
            );
        }
        for (j, entry) in set.entries.iter().enumerate() {
            if !valid_ipset_entry(set.set_type, entry) {
                findings.error(
                    format!("{field}.entries[{j}]"),
                    format!("invalid entry for {:?} set: {entry}", set.set_type),
                );
            }
        }
    }
}

fn valid_ipset_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && name.len() <= 63
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
}

fn valid_ipset_entry(set_type: crate::model::IpSetType, entry: &str) -> bool {
    use crate::model::IpSetType;
    match set_type {
        IpSetType::Ipv4Addr => {
            entry.parse::<std::net::Ipv4Addr>().is_ok()
                || entry.parse::<ipnetwork::Ipv4Network>().is_ok()
        }
        IpSetType::Ipv6Addr => {
            entry.parse::<std::net::Ipv6Addr>().is_ok()
                || entry.parse::<ipnetwork::Ipv6Network>().is_ok()
        }
        IpSetType::InetService => match entry.split_once('-') {
            Some((lo, hi)) => valid_port(lo) && valid_port(hi),
            None => valid_port(entry),
        },
    }
}

fn valid_port(s: &str) -> bool {
    s.parse::<u16>().is_ok_and(|p| p >= 1)
}

// ── Policies ────────────────────────────────────────────────────────

fn validate_policies(config: &Config, findings: &mut ValidationErrors) {
    let mut pairs = HashSet::new();
    for (i, policy) in config.policies.iter().enumerate() {
        let field = format!("policies[{i}]");

        if !is_wildcard_zone(&policy.from) && config.zone(&policy.from).is_none() {
            findings.error(format!("{field}.from"), format!("unknown zone: {}", policy.from));
        }
        if !is_wildcard_zone(&policy.to)
            && !is_firewall_zone(&policy.to)
            && config.zone(&policy.to).is_none()
        {
            findings.error(format!("{field}.to"), format!("unknown zone: {}", policy.to));
        }

        if !pairs.insert((policy.from.clone(), policy.to.clone())) && policy.inherits.is_none() {
            findings.warning(
                field.clone(),
                format!("duplicate policy for {} -> {}", policy.from, policy.to),
            );
        }

        validate_inheritance(config, policy, &field, findings);

        if policy.origin.is_synthetic() {
            findings.error(
                format!("{field}.origin"),
                "synthesized policies cannot be persisted",
            );
        }

        for (j, rule) in policy.rules.iter().enumerate() {
            validate_rule(config, rule, &format!("{field}.rules[{j}]"), findings);
        }
    }
}

fn validate_inheritance(
    config: &Config,
    policy: &Policy,
    field: &str,
    findings: &mut ValidationErrors,
) {
    let Some(parent) = policy.inherits.as_deref() else {
        return;
    };
    if parent == policy.display_name() {
        findings.error(format!("{field}.inherits"), "policy cannot inherit from itself");
        return;
    }
    if config.policy_by_name(parent).is_none() {
        findings.error(
            format!("{field}.inherits"),
            format!("unknown parent policy: {parent}"),
        );
        return;
    }

    // Walk the parent chain looking for a loop back onto a visited name.
    let mut visited = HashSet::new();
    visited.insert(policy.display_name());
    let mut current = Some(parent.to_owned());
    while let Some(name) = current {
        if !visited.insert(name.clone()) {
            findings.error(
                format!("{field}.inherits"),
                format!("circular inheritance detected involving: {name}"),
            );
            return;
        }
        current = config
            .policy_by_name(&name)
            .and_then(|p| p.inherits.clone());
    }
}

#[allow(clippy::too_many_lines)]
fn validate_rule(
    config: &Config,
    rule: &crate::model::PolicyRule,
    field: &str,
    findings: &mut ValidationErrors,
) {
    if rule.origin.is_synthetic() {
        findings.error(format!("{field}.origin"), "synthesized rules cannot be persisted");
    }

    if rule.dest_port == Some(0) {
        findings.error(format!("{field}.dest_port"), "port must be between 1 and 65535");
    }
    if rule.src_port == Some(0) {
        findings.error(format!("{field}.src_port"), "port must be between 1 and 65535");
    }

    if let Some(ip) = rule.src_ip.as_deref() {
        if !valid_ip_or_cidr(ip) {
            findings.error(format!("{field}.src_ip"), format!("invalid IP or CIDR: {ip}"));
        }
    }
    if let Some(ip) = rule.dest_ip.as_deref() {
        if !valid_ip_or_cidr(ip) {
            findings.error(format!("{field}.dest_ip"), format!("invalid IP or CIDR: {ip}"));
        }
    }

    if let Some(set) = rule.src_ipset.as_deref() {
        if config.ipset(set).is_none() {
            findings.error(format!("{field}.src_ipset"), format!("unknown ipset: {set}"));
        }
    }
    if let Some(set) = rule.dest_ipset.as_deref() {
        if config.ipset(set).is_none() {
            findings.error(format!("{field}.dest_ipset"), format!("unknown ipset: {set}"));
        }
    }

    if let Some(zone) = rule.src_zone.as_deref() {
        if config.zone(zone).is_none() {
            findings.error(format!("{field}.src_zone"), format!("unknown zone: {zone}"));
        }
    }
    if let Some(zone) = rule.dest_zone.as_deref() {
        if !is_firewall_zone(zone) && config.zone(zone).is_none() {
            findings.error(format!("{field}.dest_zone"), format!("unknown zone: {zone}"));
        }
    }

    if let Some(service) = rule.service.as_deref() {
        if synthesis::service_ports(service).is_none() {
            findings.error(format!("{field}.service"), format!("unknown service: {service}"));
        }
    }

    match (rule.time_start.as_deref(), rule.time_end.as_deref()) {
        (Some(start), Some(end)) => {
            if !valid_time(start) {
                findings.error(format!("{field}.time_start"), format!("invalid time: {start}"));
            }
            if !valid_time(end) {
                findings.error(format!("{field}.time_end"), format!("invalid time: {end}"));
            }
        }
        (Some(_), None) | (None, Some(_)) => {
            findings.error(field.to_owned(), "time_start and time_end must be set together");
        }
        (None, None) => {}
    }

    if let Some(country) = rule.src_country.as_deref() {
        if !valid_country(country) {
            findings.error(
                format!("{field}.src_country"),
                format!("invalid country code: {country}"),
            );
        }
    }
    if let Some(country) = rule.dest_country.as_deref() {
        if !valid_country(country) {
            findings.error(
                format!("{field}.dest_country"),
                format!("invalid country code: {country}"),
            );
        }
    }

    if rule.limit.as_ref().is_some_and(|limit| limit.rate == 0) {
        findings.error(format!("{field}.limit.rate"), "rate must be at least 1");
    }
    if rule.conn_limit == Some(0) {
        findings.error(format!("{field}.conn_limit"), "conn_limit must be at least 1");
    }
}

// ── NAT ─────────────────────────────────────────────────────────────

fn validate_nat(config: &Config, findings: &mut ValidationErrors) {
    for (i, nat) in config.nat.iter().enumerate() {
        let field = format!("nat[{i}]");
        if matches!(nat.nat_type, NatType::Snat | NatType::Dnat)
            && nat.to_address.as_deref().is_none_or(str::is_empty)
        {
            findings.error(format!("{field}.to_address"), "snat and dnat require to_address");
        }
        if let Some(iface) = nat.interface.as_deref() {
            if !is_wildcard_interface(iface) && config.interface(iface).is_none() {
                findings.error(
                    format!("{field}.interface"),
                    format!("unknown interface: {iface}"),
                );
            }
        }
    }
}

// ── Protections ─────────────────────────────────────────────────────

fn validate_protections(config: &Config, findings: &mut ValidationErrors) {
    let mut seen = HashSet::new();
    for (i, prot) in config.protections.iter().enumerate() {
        let field = format!("protections[{i}]");
        if !seen.insert(prot.name.as_str()) {
            findings.error(
                format!("{field}.name"),
                format!("duplicate protection name: {}", prot.name),
            );
        }
        if config.interface(&prot.interface).is_none() {
            findings.error(
                format!("{field}.interface"),
                format!("unknown interface: {}", prot.interface),
            );
        }
    }
}

// ── Shared helpers ──────────────────────────────────────────────────

fn valid_ip_or_cidr(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok() || s.parse::<IpNetwork>().is_ok()
}

/// Zone references may use glob patterns that match several zones.
fn is_wildcard_zone(s: &str) -> bool {
    s.contains(['*', '?', '[', ']'])
}

/// Interface references ending in `+` or `*` are prefix matches.
fn is_wildcard_interface(s: &str) -> bool {
    s.ends_with('+') || s.ends_with('*')
}

/// `HH:MM`, both components two digits.
fn valid_time(s: &str) -> bool {
    let Some((h, m)) = s.split_once(':') else {
        return false;
    };
    if h.len() != 2 || m.len() != 2 {
        return false;
    }
    let (Ok(h), Ok(m)) = (h.parse::<u8>(), m.parse::<u8>()) else {
        return false;
    };
    h <= 23 && m <= 59
}

fn valid_country(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{
        Interface, IpSet, Policy, PolicyRule, RuleAction, RuleOrigin, Zone, ZoneServicePort,
        ZoneServices,
    };

    fn base_config() -> Config {
        serde_json::from_str(
            r#"{
                "interfaces": [
                    {"name": "eth0", "zone": "wan", "ipv4": ["203.0.113.2/30"]},
                    {"name": "eth1", "zone": "lan", "ipv4": ["192.168.1.1/24"]}
                ],
                "zones": [
                    {"name": "wan", "interface": "eth0", "external": true},
                    {"name": "lan", "interface": "eth1"}
                ],
                "policies": [
                    {"from": "lan", "to": "wan", "action": "accept"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn valid_config_has_no_findings() {
        let findings = base_config().validate();
        assert!(findings.is_empty(), "unexpected findings: {findings}");
    }

    #[test]
    fn vlan_out_of_range_is_blocking() {
        let mut config = base_config();
        config.zones[1].vlan = Some(4095);
        let findings = config.validate();
        assert!(findings.has_blocking());
        assert!(findings.iter().any(|f| f.field == "zones[1].vlan"));
    }

    #[test]
    fn policy_referencing_unknown_zone_is_blocking() {
        let mut config = base_config();
        config.policies.push(Policy {
            from: "guest".into(),
            to: "wan".into(),
            ..Policy::default()
        });
        assert!(config.validate().has_blocking());
    }

    #[test]
    fn wildcard_from_and_firewall_to_are_allowed() {
        let mut config = base_config();
        config.policies.push(Policy {
            from: "*".into(),
            to: "firewall".into(),
            ..Policy::default()
        });
        assert!(!config.validate().has_blocking());
    }

    #[test]
    fn inheritance_cycle_is_detected() {
        let mut config = base_config();
        config.policies = vec![
            Policy {
                name: Some("a".into()),
                from: "lan".into(),
                to: "wan".into(),
                inherits: Some("b".into()),
                ..Policy::default()
            },
            Policy {
                name: Some("b".into()),
                from: "wan".into(),
                to: "lan".into(),
                inherits: Some("a".into()),
                ..Policy::default()
            },
        ];
        let findings = config.validate();
        assert!(findings.has_blocking());
        assert!(
            findings
                .iter()
                .any(|f| f.message.contains("circular inheritance"))
        );
    }

    #[test]
    fn self_inheritance_is_blocking() {
        let mut config = base_config();
        config.policies[0].name = Some("loop".into());
        config.policies[0].inherits = Some("loop".into());
        assert!(config.validate().has_blocking());
    }

    #[test]
    fn duplicate_policy_pair_is_warning_only() {
        let mut config = base_config();
        config.policies.push(Policy {
            name: Some("second".into()),
            from: "lan".into(),
            to: "wan".into(),
            ..Policy::default()
        });
        let findings = config.validate();
        assert!(!findings.has_blocking());
        assert!(findings.iter().any(|f| f.severity == Severity::Warning));
    }

    #[test]
    fn synthetic_rule_in_persisted_config_is_blocking() {
        let mut config = base_config();
        config.policies[0].rules.push(PolicyRule {
            id: Some("implicit-svc-lan-dns".into()),
            origin: RuleOrigin::ImplicitZoneConfig,
            action: RuleAction::Accept,
            ..PolicyRule::default()
        });
        let findings = config.validate();
        assert!(findings.has_blocking());
        assert!(
            findings
                .iter()
                .any(|f| f.message.contains("cannot be persisted"))
        );
    }

    #[test]
    fn rule_with_zero_port_is_blocking() {
        let mut config = base_config();
        config.policies[0].rules.push(PolicyRule {
            action: RuleAction::Accept,
            dest_port: Some(0),
            ..PolicyRule::default()
        });
        assert!(config.validate().has_blocking());
    }

    #[test]
    fn rule_referencing_missing_ipset_is_blocking() {
        let mut config = base_config();
        config.policies[0].rules.push(PolicyRule {
            action: RuleAction::Drop,
            dest_ipset: Some("blocklist".into()),
            ..PolicyRule::default()
        });
        assert!(config.validate().has_blocking());

        config.ipsets.push(IpSet {
            name: "blocklist".into(),
            entries: vec!["198.51.100.0/24".into()],
            ..IpSet::default()
        });
        assert!(!config.validate().has_blocking());
    }

    #[test]
    fn unknown_service_is_blocking() {
        let mut config = base_config();
        config.policies[0].rules.push(PolicyRule {
            action: RuleAction::Accept,
            service: Some("gopher".into()),
            ..PolicyRule::default()
        });
        assert!(config.validate().has_blocking());
    }

    #[test]
    fn half_open_time_window_is_blocking() {
        let mut config = base_config();
        config.policies[0].rules.push(PolicyRule {
            action: RuleAction::Accept,
            time_start: Some("08:00".into()),
            ..PolicyRule::default()
        });
        let findings = config.validate();
        assert!(findings.has_blocking());
        assert!(findings.iter().any(|f| f.message.contains("set together")));
    }

    #[test]
    fn bad_time_format_is_blocking() {
        let mut config = base_config();
        config.policies[0].rules.push(PolicyRule {
            action: RuleAction::Accept,
            time_start: Some("8:00".into()),
            time_end: Some("25:00".into()),
            ..PolicyRule::default()
        });
        let findings = config.validate();
        assert_eq!(
            findings
                .iter()
                .filter(|f| f.severity == Severity::Error)
                .count(),
            2
        );
    }

    #[test]
    fn cross_interface_overlap_is_warning() {
        let mut config = base_config();
        config.interfaces.push(Interface {
            name: "eth2".into(),
            ipv4: vec!["192.168.1.0/25".parse().unwrap()],
            ..Interface::default()
        });
        let findings = config.validate();
        assert!(!findings.has_blocking());
        assert!(
            findings
                .iter()
                .any(|f| f.message.contains("overlapping subnets detected"))
        );
    }

    #[test]
    fn same_interface_overlap_is_blocking() {
        let mut config = base_config();
        config.interfaces[1]
            .ipv4
            .push("192.168.1.0/25".parse().unwrap());
        assert!(config.validate().has_blocking());
    }

    #[test]
    fn icmp_custom_service_port_is_blocking() {
        let mut config = base_config();
        config.zones[1].services = Some(ZoneServices {
            custom_ports: vec![ZoneServicePort {
                name: "probe".into(),
                protocol: Protocol::Icmp,
                port: 7,
                end_port: None,
            }],
            ..ZoneServices::default()
        });
        assert!(config.validate().has_blocking());
    }

    #[test]
    fn reserved_zone_name_is_blocking() {
        let mut config = base_config();
        config.zones.push(Zone {
            name: "firewall".into(),
            ..Zone::default()
        });
        assert!(config.validate().has_blocking());
    }

    #[test]
    fn time_helpers() {
        assert!(valid_time("08:30"));
        assert!(valid_time("23:59"));
        assert!(!valid_time("24:00"));
        assert!(!valid_time("8:30"));
        assert!(!valid_time("0830"));
        assert!(valid_country("US"));
        assert!(!valid_country("USA"));
    }
}
