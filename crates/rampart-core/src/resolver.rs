// ── Zone resolution ──

use std::net::IpAddr;

use crate::model::Config;

/// Zone name reported for private addresses no zone claims.
pub const UNKNOWN_ZONE: &str = "unknown";

/// Best-effort mapping from an IP address to the zone that claims it.
///
/// Walks each zone's effective matches, resolves the named interface
/// and checks subnet containment. Unclaimed private addresses resolve
/// to [`UNKNOWN_ZONE`]; unclaimed public addresses resolve to the
/// first zone whose name contains "wan", or the literal `wan`.
///
/// This is a debugging heuristic for the simulator. Enforcement
/// classifies traffic in the installed ruleset, not here.
pub fn resolve_zone(config: &Config, ip: IpAddr) -> String {
    for zone in &config.zones {
        for m in zone.effective_matches() {
            let Some(iface_name) = m.interface.as_deref() else {
                continue;
            };
            let Some(iface) = config.interface(iface_name) else {
                continue;
            };
            if iface.contains(ip) {
                return zone.name.clone();
            }
        }
    }

    if is_private(ip) {
        return UNKNOWN_ZONE.to_owned();
    }
    config
        .zones
        .iter()
        .find(|z| z.name.to_lowercase().contains("wan"))
        .map_or_else(|| "wan".to_owned(), |z| z.name.clone())
}

fn is_private(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback() || v4.is_link_local(),
        IpAddr::V6(v6) => v6.is_loopback() || v6.is_unique_local() || v6.is_unicast_link_local(),
    }
}
