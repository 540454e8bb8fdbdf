use tracing::warn;

use super::{KeyValueStore, SETTINGS_KEY};
use crate::error::StorageError;
use crate::settings::Settings;

/// Loads and saves [`Settings`] through the persistence port.
pub struct SettingsStore<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SettingsStore<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Read the persisted settings, merged onto the defaults.
    ///
    /// Never fails: a missing record, an unreadable store or a corrupt record
    /// all produce defaults (field by field where the record is partially
    /// usable).
    pub fn load(&self) -> Settings {
        match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => Settings::merge_json(&raw),
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!(error = %e, "settings unreadable, using defaults");
                Settings::default()
            }
        }
    }

    /// Persist the full settings object, replacing any prior record.
    ///
    /// # Errors
    /// Returns the storage error; the caller decides whether to surface it.
    pub fn save(&self, settings: &Settings) -> Result<(), StorageError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.store.set(SETTINGS_KEY, &json)
    }

    /// Drop the persisted record and return the defaults.
    pub fn reset_to_defaults(&self) -> Settings {
        if let Err(e) = self.store.remove(SETTINGS_KEY) {
            warn!(error = %e, "failed to clear persisted settings");
        }
        Settings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_record_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(SettingsStore::new(&store).load(), Settings::default());
    }

    #[test]
    fn malformed_record_loads_exact_defaults() {
        let store = MemoryStore::new();
        store.set(SETTINGS_KEY, "definitely not json").unwrap();
        assert_eq!(SettingsStore::new(&store).load(), Settings::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let settings = SettingsStore::new(&store);
        let custom = Settings {
            work_minutes: 45,
            auto_start_next: true,
            theme: "night".into(),
            work_title: Some("Writing".into()),
            ..Settings::default()
        };
        settings.save(&custom).unwrap();
        assert_eq!(settings.load(), custom);
    }

    #[test]
    fn reset_clears_record() {
        let store = MemoryStore::new();
        let settings = SettingsStore::new(&store);
        settings
            .save(&Settings {
                work_minutes: 10,
                ..Settings::default()
            })
            .unwrap();
        assert_eq!(settings.reset_to_defaults(), Settings::default());
        assert!(store.get(SETTINGS_KEY).unwrap().is_none());
    }
}
