// ── Structural configuration diffing ──

use similar::TextDiff;

use crate::model::Config;

/// Canonical serialization used for equality checks and diffing.
///
/// Field order is the declaration order of the model types and empty
/// collections are omitted, so two structurally equal configurations
/// always serialize to byte-identical documents.
pub fn canonical_json(config: &Config) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(config)
}

/// Structural equality: canonical serializations are byte-identical.
pub fn configs_equal(a: &Config, b: &Config) -> Result<bool, serde_json::Error> {
    Ok(canonical_json(a)? == canonical_json(b)?)
}

/// Unified diff of the running configuration against the staged one,
/// three lines of context. Returns `"No changes."` when the two are
/// structurally equal.
pub fn unified_diff(running: &Config, staged: &Config) -> Result<String, serde_json::Error> {
    let old = canonical_json(running)?;
    let new = canonical_json(staged)?;
    if old == new {
        return Ok("No changes.".to_owned());
    }
    Ok(TextDiff::from_lines(&old, &new)
        .unified_diff()
        .context_radius(3)
        .header("Running", "Staged")
        .to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Policy, PolicyAction};

    fn config_with_policy(action: PolicyAction) -> Config {
        let mut config = Config::default();
        config.policies.push(Policy {
            name: Some("lan-to-wan".into()),
            from: "lan".into(),
            to: "wan".into(),
            action: Some(action),
            ..Policy::default()
        });
        config
    }

    #[test]
    fn equal_configs_diff_to_no_changes() {
        let a = config_with_policy(PolicyAction::Accept);
        let b = config_with_policy(PolicyAction::Accept);
        assert!(configs_equal(&a, &b).unwrap());
        assert_eq!(unified_diff(&a, &b).unwrap(), "No changes.");
    }

    #[test]
    fn changed_field_shows_up_with_headers() {
        let running = config_with_policy(PolicyAction::Accept);
        let staged = config_with_policy(PolicyAction::Drop);
        let diff = unified_diff(&running, &staged).unwrap();
        assert!(diff.starts_with("--- Running\n+++ Staged\n"));
        assert!(diff.contains("-      \"action\": \"accept\""));
        assert!(diff.contains("+      \"action\": \"drop\""));
    }

    #[test]
    fn clone_round_trips_byte_identical() {
        let config = config_with_policy(PolicyAction::Reject);
        let copy = config.clone();
        assert_eq!(
            canonical_json(&config).unwrap(),
            canonical_json(&copy).unwrap()
        );
    }
}
