// ── Policy domain types ──

use serde::{Deserialize, Serialize};

// ── Actions ─────────────────────────────────────────────────────────

/// Verdict a rule hands down when all of its predicates match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuleAction {
    Accept,
    #[default]
    Drop,
    Reject,
    Jump,
    Return,
    Log,
}

/// Fallback action a policy applies when none of its rules match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PolicyAction {
    Accept,
    Drop,
    Reject,
}

impl PolicyAction {
    pub fn as_rule_action(self) -> RuleAction {
        match self {
            Self::Accept => RuleAction::Accept,
            Self::Drop => RuleAction::Drop,
            Self::Reject => RuleAction::Reject,
        }
    }
}

/// Transport protocol predicate. `any` matches every protocol; the
/// legacy spelling `all` is accepted on input.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Protocol {
    Tcp,
    Udp,
    Icmp,
    #[serde(alias = "all")]
    #[strum(to_string = "any", serialize = "all")]
    Any,
}

impl Protocol {
    /// Whether a rule declaring `self` permits a packet of `packet` protocol.
    pub fn permits(self, packet: Protocol) -> bool {
        self == Protocol::Any || self == packet
    }
}

// ── Provenance ──────────────────────────────────────────────────────

/// Who authored a rule. Synthesized rules must never be hand-edited or
/// written back into the operator's persisted configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOrigin {
    /// Operator-authored. Serialized as the empty string.
    #[default]
    #[serde(rename = "")]
    Operator,
    /// Derived from a zone's services/management flags.
    #[serde(rename = "implicit_zone_config")]
    ImplicitZoneConfig,
    /// The standing "router may reach every zone" egress rule.
    #[serde(rename = "implicit_rampart_output")]
    ImplicitRampartOutput,
}

impl RuleOrigin {
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Operator)
    }

    pub fn is_synthetic(&self) -> bool {
        !self.is_operator()
    }
}

// ── Typed match predicates ──────────────────────────────────────────

/// Connection tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnState {
    New,
    Established,
    Related,
    Invalid,
}

/// Day of week for time-window rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// TCP flag predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TcpFlag {
    Syn,
    Ack,
    Fin,
    Rst,
    Psh,
    Urg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatePeriod {
    Second,
    Minute,
    Hour,
}

/// Packet or connection rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub rate: u32,
    pub per: RatePeriod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst: Option<u32>,
}

// ── Rules ───────────────────────────────────────────────────────────

/// A single match-and-act entry inside a policy.
///
/// Every predicate is optional; a rule matches only when all of the
/// predicates it declares match. Evaluation order is the stored order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    // Identity and metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_tag: Option<String>,
    #[serde(default, skip_serializing_if = "RuleOrigin::is_operator")]
    pub origin: RuleOrigin,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub disabled: bool,

    // Verdict
    pub action: RuleAction,

    // Match predicates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    /// Named service macro (e.g. `dns`, `ssh`) standing in for a port set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ipset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_ipset: Option<String>,
    /// Override the policy's source zone for this rule only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conn_states: Vec<ConnState>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tcp_flags: Vec<TcpFlag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dest_country: Option<String>,
    /// Time window, `HH:MM` in the appliance's local time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<Day>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<RateLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conn_limit: Option<u32>,

    // Logging
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub log: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_prefix: Option<String>,

    // Ordering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Place this rule after the named rule on next renumbering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insert_after: Option<String>,
}

impl PolicyRule {
    /// Human-readable identity: ID, else name, else description, else
    /// a positional label.
    pub fn identity(&self, index: usize) -> String {
        non_empty(self.id.as_deref())
            .or_else(|| non_empty(self.name.as_deref()))
            .or_else(|| non_empty(self.description.as_deref()))
            .map_or_else(|| format!("Rule #{}", index + 1), str::to_owned)
    }

    /// Whether `ident` names this rule (matches ID or name).
    pub fn matches_identity(&self, ident: &str) -> bool {
        self.id.as_deref() == Some(ident) || self.name.as_deref() == Some(ident)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

// ── Policies ────────────────────────────────────────────────────────

/// Ordered rule set governing traffic for one (from, to) zone pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Default action when no rule matches. Absent means drop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<PolicyAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    /// Parent policy name this one inherits rules from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits: Option<String>,
    #[serde(default, skip_serializing_if = "RuleOrigin::is_operator")]
    pub origin: RuleOrigin,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub disabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<PolicyRule>,
}

impl Policy {
    /// The (from, to) lookup key the evaluator searches on.
    pub fn key(&self) -> (&str, &str) {
        (self.from.as_str(), self.to.as_str())
    }

    /// Policy name, defaulting to `<from>-to-<to>` when unset.
    pub fn display_name(&self) -> String {
        non_empty(self.name.as_deref())
            .map_or_else(|| format!("{}-to-{}", self.from, self.to), str::to_owned)
    }

    /// Whether `ident` names this policy.
    pub fn matches_identity(&self, ident: &str) -> bool {
        self.display_name() == ident
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rule_identity_fallback_chain() {
        let mut rule = PolicyRule {
            id: Some("r-1".into()),
            name: Some("Allow DNS".into()),
            description: Some("DNS from lan".into()),
            ..PolicyRule::default()
        };
        assert_eq!(rule.identity(0), "r-1");

        rule.id = None;
        assert_eq!(rule.identity(0), "Allow DNS");

        rule.name = Some(String::new());
        rule.description = None;
        assert_eq!(rule.identity(2), "Rule #3");
    }

    #[test]
    fn origin_serde_round_trip() {
        let rule = PolicyRule {
            action: RuleAction::Accept,
            ..PolicyRule::default()
        };
        let json = serde_json::to_string(&rule).unwrap();
        // Operator origin is omitted entirely.
        assert!(!json.contains("origin"));

        let synthetic: PolicyRule =
            serde_json::from_str(r#"{"action":"accept","origin":"implicit_zone_config"}"#).unwrap();
        assert_eq!(synthetic.origin, RuleOrigin::ImplicitZoneConfig);
        assert!(synthetic.origin.is_synthetic());
    }

    #[test]
    fn protocol_accepts_legacy_all() {
        let p: Protocol = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(p, Protocol::Any);
        assert_eq!("ALL".parse::<Protocol>().unwrap(), Protocol::Any);
        assert!(Protocol::Any.permits(Protocol::Udp));
        assert!(!Protocol::Tcp.permits(Protocol::Udp));
    }

    #[test]
    fn policy_display_name_default() {
        let policy = Policy {
            from: "lan".into(),
            to: "wan".into(),
            ..Policy::default()
        };
        assert_eq!(policy.display_name(), "lan-to-wan");
        assert!(policy.matches_identity("lan-to-wan"));
    }
}
