// ── Top-level configuration document ──

use serde::{Deserialize, Serialize};

use super::network::{Interface, InterfaceProtection, IpSet, NatRule, Route};
use super::policy::Policy;
use super::zone::Zone;

/// Schema version written by this build. Older documents deserialize
/// with their own version preserved.
pub const SCHEMA_VERSION: &str = "1.1";

/// The whole declarative state of the appliance.
///
/// `Clone` produces the deep copy that staging and validation work on;
/// the running and staged documents never share rule storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub ip_forwarding: bool,
    #[serde(default, skip_serializing_if = "crate::model::is_false")]
    pub mss_clamping: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub zones: Vec<Zone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub policies: Vec<Policy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nat: Vec<NatRule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipsets: Vec<IpSet>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protections: Vec<InterfaceProtection>,
}

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            ip_forwarding: false,
            mss_clamping: false,
            interfaces: Vec::new(),
            zones: Vec::new(),
            policies: Vec::new(),
            nat: Vec::new(),
            routes: Vec::new(),
            ipsets: Vec::new(),
            protections: Vec::new(),
        }
    }
}

impl Config {
    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn ipset(&self, name: &str) -> Option<&IpSet> {
        self.ipsets.iter().find(|s| s.name == name)
    }

    /// First policy covering the (from, to) zone pair.
    pub fn policy(&self, from: &str, to: &str) -> Option<&Policy> {
        self.policies
            .iter()
            .find(|p| p.from == from && p.to == to)
    }

    pub fn policy_by_name(&self, name: &str) -> Option<&Policy> {
        self.policies.iter().find(|p| p.matches_identity(name))
    }

    /// Fill in default policy names so every policy is addressable.
    pub fn normalize_policies(&mut self) {
        for policy in &mut self.policies {
            if policy.name.as_deref().is_none_or(str::is_empty) {
                policy.name = Some(format!("{}-to-{}", policy.from, policy.to));
            }
        }
    }
}
