// ── Staged configuration store ──

use std::sync::{PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::debug;

use crate::error::Error;
use crate::model::Config;
use crate::validate::ValidationError;

/// Broadcast when the staged or running picture changes, so listeners
/// can recompute their pending-change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    StagedUpdated,
    StagedDiscarded,
    ConfigApplied,
    /// A failed safe-apply restored the pre-apply backup.
    RolledBack,
    BackupCreated,
}

/// The operator's in-progress configuration, held apart from whatever
/// the daemon is currently running.
///
/// All mutations go through [`update`](Self::update), which applies
/// the mutation to a clone and validates the clone before touching the
/// live document. Readers therefore never observe an invalid or
/// half-mutated configuration, and a failed update leaves the staged
/// document byte-identical to what it was.
pub struct StagedStore {
    staged: RwLock<Config>,
    events: broadcast::Sender<ChangeEvent>,
}

impl StagedStore {
    pub fn new(initial: Config) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            staged: RwLock::new(initial),
            events,
        }
    }

    /// Clone of the current staged document.
    pub fn snapshot(&self) -> Config {
        self.staged
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate-then-commit mutation of the staged document.
    ///
    /// `mutate` runs twice: once against a clone taken under the read
    /// lock, and, only if the mutated clone validates, once more
    /// against the live document under the write lock. The write lock
    /// is never held across validation. Returns the non-blocking
    /// findings so callers can surface them as warnings.
    pub fn update(&self, mutate: impl Fn(&mut Config)) -> Result<Vec<ValidationError>, Error> {
        let mut candidate = self.snapshot();
        mutate(&mut candidate);
        let warnings = candidate
            .validate()
            .into_result()
            .map_err(Error::Validation)?;

        {
            let mut staged = self.staged.write().unwrap_or_else(PoisonError::into_inner);
            mutate(&mut staged);
        }
        debug!("staged configuration updated");
        self.notify(ChangeEvent::StagedUpdated);
        Ok(warnings)
    }

    /// Replace the staged document wholesale, without validation or
    /// notification. Used when resynchronizing from the daemon.
    pub fn replace(&self, config: Config) {
        *self.staged.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    pub fn notify(&self, event: ChangeEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::diff::canonical_json;
    use crate::model::{Interface, Policy, Zone};

    fn seed_config() -> Config {
        let mut config = Config::default();
        config.interfaces.push(Interface {
            name: "eth0".into(),
            zone: Some("lan".into()),
            ..Interface::default()
        });
        config.zones.push(Zone {
            name: "lan".into(),
            interface: Some("eth0".into()),
            ..Zone::default()
        });
        config.zones.push(Zone {
            name: "wan".into(),
            ..Zone::default()
        });
        config
    }

    #[test]
    fn update_commits_and_notifies() {
        let store = StagedStore::new(seed_config());
        let mut events = store.subscribe();

        let warnings = store
            .update(|config| {
                config.policies.push(Policy {
                    from: "lan".into(),
                    to: "lan".into(),
                    ..Policy::default()
                });
            })
            .unwrap();

        assert!(warnings.is_empty());
        assert_eq!(store.snapshot().policies.len(), 1);
        assert_eq!(events.try_recv().unwrap(), ChangeEvent::StagedUpdated);
    }

    #[test]
    fn failed_update_leaves_staged_untouched() {
        let store = StagedStore::new(seed_config());
        let before = canonical_json(&store.snapshot()).unwrap();
        let mut events = store.subscribe();

        let err = store
            .update(|config| {
                // Zone reserved for the appliance itself.
                config.zones.push(Zone {
                    name: "firewall".into(),
                    ..Zone::default()
                });
            })
            .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        let after = canonical_json(&store.snapshot()).unwrap();
        assert_eq!(before, after);
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn warnings_do_not_block_the_update() {
        let store = StagedStore::new(seed_config());
        let warnings = store
            .update(|config| {
                config.policies.push(Policy {
                    from: "lan".into(),
                    to: "wan".into(),
                    ..Policy::default()
                });
                config.policies.push(Policy {
                    from: "lan".into(),
                    to: "wan".into(),
                    ..Policy::default()
                });
            })
            .unwrap();

        assert!(
            warnings
                .iter()
                .any(|w| w.message.contains("duplicate policy"))
        );
        assert_eq!(store.snapshot().policies.len(), 2);
    }

    #[test]
    fn replace_swaps_the_document_silently() {
        let store = StagedStore::new(seed_config());
        let mut events = store.subscribe();
        store.replace(Config::default());
        assert!(store.snapshot().interfaces.is_empty());
        assert!(events.try_recv().is_err());
    }
}
