// ── Packet verdict simulation ──

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::model::{Config, PolicyAction, PolicyRule, Protocol, RuleAction};
use crate::resolver::resolve_zone;
use crate::synthesis::{merged_policies, service_ports};

/// Candidate packet description for simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PacketQuery {
    pub src_ip: IpAddr,
    pub dst_ip: IpAddr,
    pub protocol: Protocol,
    pub dest_port: Option<u16>,
    /// Overrides zone resolution when supplied.
    pub src_zone: Option<String>,
    pub dst_zone: Option<String>,
}

/// Outcome of walking the verdict pipeline for one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub action: RuleAction,
    /// Human-readable sentence describing the outcome.
    pub verdict: String,
    /// `<from>_to_<to>` of the deciding policy, empty when none matched.
    pub matched_policy: String,
    pub matched_rule: String,
    /// Index of the deciding rule within its policy, -1 for defaults.
    pub rule_index: i64,
    pub src_zone: String,
    pub dst_zone: String,
    /// Evaluation trace for debugging.
    pub rule_path: Vec<String>,
}

/// Simulate one packet against the configuration.
///
/// First-match-wins over the merged policy list (explicit policies
/// first, then virtual ones from implicit rules). Deterministic and
/// side-effect-free, safe against a shared snapshot.
pub fn evaluate(config: &Config, query: &PacketQuery) -> Verdict {
    let src_zone = query
        .src_zone
        .clone()
        .unwrap_or_else(|| resolve_zone(config, query.src_ip));
    let dst_zone = query
        .dst_zone
        .clone()
        .unwrap_or_else(|| resolve_zone(config, query.dst_ip));

    let policies = merged_policies(config);
    let Some(policy) = policies
        .iter()
        .find(|p| p.from == src_zone && p.to == dst_zone)
    else {
        // Default-deny at the policy level.
        return Verdict {
            action: RuleAction::Drop,
            verdict: "Packet would be DROPPED - no matching policy found".to_owned(),
            matched_policy: String::new(),
            matched_rule: "global implicit deny".to_owned(),
            rule_index: -1,
            src_zone,
            dst_zone,
            rule_path: vec!["global:implicit-deny".to_owned()],
        };
    };

    let matched_policy = format!("{}_to_{}", policy.from, policy.to);
    let mut rule_path = vec![format!("policy:{}->{}", policy.from, policy.to)];

    for (i, rule) in policy.rules.iter().enumerate() {
        if rule.disabled || !rule_matches(rule, query) {
            continue;
        }
        let identity = rule.identity(i);
        rule_path.push(format!("rule:{identity} (index {i})"));
        return Verdict {
            action: rule.action,
            verdict: format!(
                "Packet would be {}ED by rule '{identity}'",
                action_upper(rule.action)
            ),
            matched_policy,
            matched_rule: identity,
            rule_index: i64::try_from(i).unwrap_or(i64::MAX),
            src_zone,
            dst_zone,
            rule_path,
        };
    }

    let action = policy
        .action
        .map_or(RuleAction::Drop, PolicyAction::as_rule_action);
    rule_path.push(format!("default:{action}"));
    Verdict {
        action,
        verdict: format!("Packet would be {}ED by default policy", action_upper(action)),
        matched_policy,
        matched_rule: "default policy".to_owned(),
        rule_index: -1,
        src_zone,
        dst_zone,
        rule_path,
    }
}

/// Predicate subset the simulator evaluates: protocol, service macro,
/// exact destination port, literal source/destination IP. Rules written
/// with CIDR ranges or IPSet references under-match here; installed
/// enforcement expands those, the simulator does not.
fn rule_matches(rule: &PolicyRule, query: &PacketQuery) -> bool {
    if let Some(protocol) = rule.protocol {
        if !protocol.permits(query.protocol) {
            return false;
        }
    }
    if let Some(service) = rule.service.as_deref() {
        match service_ports(service) {
            Some(ports) if ports.matches(query.protocol, query.dest_port) => {}
            _ => return false,
        }
    }
    if let Some(port) = rule.dest_port {
        if query.dest_port != Some(port) {
            return false;
        }
    }
    if let Some(ip) = rule.src_ip.as_deref() {
        if ip != query.src_ip.to_string() {
            return false;
        }
    }
    if let Some(ip) = rule.dest_ip.as_deref() {
        if ip != query.dst_ip.to_string() {
            return false;
        }
    }
    true
}

fn action_upper(action: RuleAction) -> String {
    action.to_string().to_uppercase()
}
