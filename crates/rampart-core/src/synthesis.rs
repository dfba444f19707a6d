// ── Implicit rule synthesis ──
//
// Zones carry service and management flags; each enabled flag expands
// into an accept rule toward the firewall pseudo-zone. A standing
// egress rule per zone keeps the router's own traffic from being
// caught by policy gaps. Nothing here is ever persisted back into the
// operator's configuration.

use std::fmt;

use indexmap::IndexMap;

use crate::model::{
    Config, FIREWALL_ZONE, Policy, PolicyRule, Protocol, RuleAction, RuleOrigin, ZoneManagement,
    ZoneServices,
};

/// Pseudo-source zone naming the router's own egress traffic.
pub const ROUTER_ZONE: &str = "rampart";

// ── Service macro table ─────────────────────────────────────────────

/// Protocols and ports a named service macro expands to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePorts {
    pub tcp: bool,
    pub udp: bool,
    pub ports: &'static [u16],
}

impl ServicePorts {
    /// Whether a packet with this protocol and destination port falls
    /// inside the macro. A missing port constrains nothing.
    pub fn matches(self, protocol: Protocol, dest_port: Option<u16>) -> bool {
        let proto_ok = match protocol {
            Protocol::Tcp => self.tcp,
            Protocol::Udp => self.udp,
            Protocol::Any => true,
            Protocol::Icmp => false,
        };
        proto_ok && dest_port.is_none_or(|port| self.ports.contains(&port))
    }
}

/// Fixed table of service macros rules may reference by name.
pub fn service_ports(service: &str) -> Option<ServicePorts> {
    let entry = match service {
        "ssh" => ServicePorts { tcp: true, udp: false, ports: &[22] },
        "http" => ServicePorts { tcp: true, udp: false, ports: &[80] },
        "https" => ServicePorts { tcp: true, udp: false, ports: &[443] },
        "web" => ServicePorts { tcp: true, udp: false, ports: &[80, 443] },
        "dns" => ServicePorts { tcp: true, udp: true, ports: &[53] },
        "dhcp" => ServicePorts { tcp: false, udp: true, ports: &[67, 68] },
        "ntp" => ServicePorts { tcp: false, udp: true, ports: &[123] },
        "snmp" => ServicePorts { tcp: false, udp: true, ports: &[161, 162] },
        "syslog" => ServicePorts { tcp: false, udp: true, ports: &[514] },
        _ => return None,
    };
    Some(entry)
}

// ── Synthetic identities ────────────────────────────────────────────

/// Management-plane facility a zone can open toward the firewall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ManagementFacility {
    Ssh,
    Web,
    Api,
    Icmp,
    Snmp,
    Syslog,
}

impl ManagementFacility {
    const ALL: [Self; 6] = [
        Self::Ssh,
        Self::Web,
        Self::Api,
        Self::Icmp,
        Self::Snmp,
        Self::Syslog,
    ];

    fn enabled_in(self, mgmt: &ZoneManagement) -> bool {
        match self {
            Self::Ssh => mgmt.ssh,
            Self::Web => mgmt.web,
            Self::Api => mgmt.api,
            Self::Icmp => mgmt.icmp,
            Self::Snmp => mgmt.snmp,
            Self::Syslog => mgmt.syslog,
        }
    }

    fn rule_name(self) -> &'static str {
        match self {
            Self::Ssh => "Allow SSH",
            Self::Web => "Allow Web UI",
            Self::Api => "Allow API",
            Self::Icmp => "Allow Ping",
            Self::Snmp => "Allow SNMP",
            Self::Syslog => "Allow Syslog",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ssh => "SSH",
            Self::Web => "Web UI",
            Self::Api => "API",
            Self::Icmp => "ICMP Ping",
            Self::Snmp => "SNMP",
            Self::Syslog => "Syslog",
        }
    }

    /// Service macro the facility listens on. ICMP has no port and
    /// matches by protocol instead.
    fn service(self) -> Option<&'static str> {
        match self {
            Self::Ssh => Some("ssh"),
            Self::Web | Self::Api => Some("https"),
            Self::Snmp => Some("snmp"),
            Self::Syslog => Some("syslog"),
            Self::Icmp => None,
        }
    }
}

/// Builtin zone service flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ZoneService {
    Dhcp,
    Dns,
    Ntp,
    #[strum(to_string = "captive-portal")]
    CaptivePortal,
}

impl ZoneService {
    const ALL: [Self; 4] = [Self::Dhcp, Self::Dns, Self::Ntp, Self::CaptivePortal];

    fn enabled_in(self, services: &ZoneServices) -> bool {
        match self {
            Self::Dhcp => services.dhcp,
            Self::Dns => services.dns,
            Self::Ntp => services.ntp,
            Self::CaptivePortal => services.captive_portal,
        }
    }

    fn rule_name(self) -> &'static str {
        match self {
            Self::Dhcp => "Allow DHCP",
            Self::Dns => "Allow DNS",
            Self::Ntp => "Allow NTP",
            Self::CaptivePortal => "Allow Captive Portal",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Dhcp => "DHCP",
            Self::Dns => "DNS",
            Self::Ntp => "NTP",
            Self::CaptivePortal => "Captive Portal",
        }
    }

    fn service(self) -> &'static str {
        match self {
            Self::Dhcp => "dhcp",
            Self::Dns => "dns",
            Self::Ntp => "ntp",
            Self::CaptivePortal => "http",
        }
    }
}

/// Structured identity of a synthesized rule. Rendering lives in one
/// place so identifiers cannot drift apart or collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntheticRuleId {
    Management {
        facility: ManagementFacility,
        zone: String,
    },
    Service {
        zone: String,
        service: ZoneService,
    },
    CustomService {
        zone: String,
        name: String,
    },
    RouterOutput {
        zone: String,
    },
}

impl fmt::Display for SyntheticRuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Management { facility, zone } => {
                write!(f, "implicit-mgmt-{facility}-{zone}")
            }
            Self::Service { zone, service } => write!(f, "implicit-svc-{zone}-{service}"),
            Self::CustomService { zone, name } => {
                write!(f, "implicit-svc-{zone}-custom-{name}")
            }
            Self::RouterOutput { zone } => write!(f, "implicit-{ROUTER_ZONE}-{zone}"),
        }
    }
}

// ── Synthesis ───────────────────────────────────────────────────────

/// A synthesized rule and the virtual (from, to) pair it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticRule {
    pub from: String,
    pub to: String,
    pub rule: PolicyRule,
}

/// Derive every implicit rule the given configuration implies.
///
/// Read-only; the result is recomputed on demand and never stored.
pub fn synthesize_implicit_rules(config: &Config) -> Vec<SyntheticRule> {
    let mut rules = Vec::new();

    for zone in &config.zones {
        if let Some(mgmt) = &zone.management {
            for facility in ManagementFacility::ALL {
                if facility.enabled_in(mgmt) {
                    rules.push(management_rule(&zone.name, facility));
                }
            }
        }
        if let Some(services) = &zone.services {
            for service in ZoneService::ALL {
                if service.enabled_in(services) {
                    rules.push(service_rule(&zone.name, service));
                }
            }
            for port in &services.custom_ports {
                rules.push(custom_service_rule(&zone.name, port));
            }
        }
    }

    // Standing egress: the router itself may reach every zone.
    for zone in &config.zones {
        rules.push(router_output_rule(&zone.name));
    }

    rules
}

fn management_rule(zone: &str, facility: ManagementFacility) -> SyntheticRule {
    let id = SyntheticRuleId::Management {
        facility,
        zone: zone.to_owned(),
    };
    let mut rule = PolicyRule {
        id: Some(id.to_string()),
        name: Some(facility.rule_name().to_owned()),
        description: Some(format!("Zone {zone} management: {}", facility.label())),
        action: RuleAction::Accept,
        origin: RuleOrigin::ImplicitZoneConfig,
        ..PolicyRule::default()
    };
    match facility.service() {
        Some(service) => rule.service = Some(service.to_owned()),
        None => rule.protocol = Some(Protocol::Icmp),
    }
    SyntheticRule {
        from: zone.to_owned(),
        to: FIREWALL_ZONE.to_owned(),
        rule,
    }
}

fn service_rule(zone: &str, service: ZoneService) -> SyntheticRule {
    let id = SyntheticRuleId::Service {
        zone: zone.to_owned(),
        service,
    };
    SyntheticRule {
        from: zone.to_owned(),
        to: FIREWALL_ZONE.to_owned(),
        rule: PolicyRule {
            id: Some(id.to_string()),
            name: Some(service.rule_name().to_owned()),
            description: Some(format!("Zone {zone} services: {}", service.label())),
            action: RuleAction::Accept,
            service: Some(service.service().to_owned()),
            origin: RuleOrigin::ImplicitZoneConfig,
            ..PolicyRule::default()
        },
    }
}

fn custom_service_rule(zone: &str, port: &crate::model::ZoneServicePort) -> SyntheticRule {
    let id = SyntheticRuleId::CustomService {
        zone: zone.to_owned(),
        name: port.name.clone(),
    };
    SyntheticRule {
        from: zone.to_owned(),
        to: FIREWALL_ZONE.to_owned(),
        rule: PolicyRule {
            id: Some(id.to_string()),
            name: Some(format!("Allow {}", port.name)),
            description: Some(format!("Zone {zone} services: {}", port.name)),
            action: RuleAction::Accept,
            protocol: Some(port.protocol),
            dest_port: Some(port.port),
            origin: RuleOrigin::ImplicitZoneConfig,
            ..PolicyRule::default()
        },
    }
}

fn router_output_rule(zone: &str) -> SyntheticRule {
    let id = SyntheticRuleId::RouterOutput {
        zone: zone.to_owned(),
    };
    SyntheticRule {
        from: ROUTER_ZONE.to_owned(),
        to: zone.to_owned(),
        rule: PolicyRule {
            id: Some(id.to_string()),
            name: Some(format!("Allow Rampart Output to {zone}")),
            description: Some(format!("Automatically generated: Allow Rampart to access {zone}")),
            action: RuleAction::Accept,
            protocol: Some(Protocol::Any),
            origin: RuleOrigin::ImplicitRampartOutput,
            ..PolicyRule::default()
        },
    }
}

// ── Virtual policy projection ───────────────────────────────────────

/// Explicit policies with synthesized rules merged in, in evaluation
/// order. Synthetic rules land after operator rules when an explicit
/// policy already covers the pair; otherwise they form a new virtual
/// policy at the end of the list.
pub fn merged_policies(config: &Config) -> Vec<Policy> {
    let mut policies = config.policies.clone();
    let mut index: IndexMap<(String, String), usize> = policies
        .iter()
        .enumerate()
        .map(|(i, p)| ((p.from.clone(), p.to.clone()), i))
        .collect();

    for synthetic in synthesize_implicit_rules(config) {
        let key = (synthetic.from.clone(), synthetic.to.clone());
        if let Some(&i) = index.get(&key) {
            policies[i].rules.push(synthetic.rule);
        } else {
            index.insert(key, policies.len());
            policies.push(virtual_policy(synthetic));
        }
    }

    policies
}

fn virtual_policy(synthetic: SyntheticRule) -> Policy {
    let SyntheticRule { from, to, rule } = synthetic;
    if from == ROUTER_ZONE {
        Policy {
            from,
            to,
            description: Some("Automatically generated rampart egress".to_owned()),
            origin: RuleOrigin::ImplicitRampartOutput,
            rules: vec![rule],
            ..Policy::default()
        }
    } else {
        Policy {
            name: Some(format!("Zone {from} Services")),
            from,
            to,
            description: Some("Implicit rules derived from Zone settings".to_owned()),
            origin: RuleOrigin::ImplicitZoneConfig,
            rules: vec![rule],
            ..Policy::default()
        }
    }
}
