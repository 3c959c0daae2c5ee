//! Shared configuration snapshot.
//!
//! Attempts call [`ConfigStore::snapshot`] once when they start and keep the
//! returned `Arc` until they finish, so a reload never changes the settings
//! of an attempt already in flight.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::SeedboxConfig;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    current: Arc<ArcSwap<SeedboxConfig>>,
}

impl ConfigStore {
    pub fn new(config: SeedboxConfig) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(config)),
        }
    }

    /// Current configuration.
    pub fn snapshot(&self) -> Arc<SeedboxConfig> {
        self.current.load_full()
    }

    /// Atomically replace the configuration seen by future attempts.
    pub fn replace(&self, config: SeedboxConfig) {
        tracing::info!(servers = config.servers.len(), "Configuration replaced");
        self.current.store(Arc::new(config));
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(SeedboxConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_survives_replace() {
        let store = ConfigStore::default();
        let before = store.snapshot();

        let mut updated = SeedboxConfig::default();
        updated.upload.timeout_secs = 99;
        store.replace(updated);

        assert_eq!(before.upload.timeout_secs, 15);
        assert_eq!(store.snapshot().upload.timeout_secs, 99);
    }

    #[test]
    fn test_clones_share_state() {
        let store = ConfigStore::default();
        let other = store.clone();

        let mut updated = SeedboxConfig::default();
        updated.upload.start_paused = true;
        other.replace(updated);

        assert!(store.snapshot().upload.start_paused);
    }
}
