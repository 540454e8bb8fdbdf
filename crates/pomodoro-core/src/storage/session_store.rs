use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::{KeyValueStore, SESSION_KEY};
use crate::timer::Mode;

/// Minimal timer state needed to resume after a restart.
///
/// Every field is optional on the way in: a record written by an older build,
/// or damaged on disk, restores whatever fields are still usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_seconds: Option<u64>,
    #[serde(
        default,
        alias = "completedSessions",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_work_sessions: Option<u32>,
}

impl SessionSnapshot {
    pub fn new(mode: Mode, remaining_seconds: u64, completed_work_sessions: u32) -> Self {
        Self {
            mode: Some(mode),
            remaining_seconds: Some(remaining_seconds),
            completed_work_sessions: Some(completed_work_sessions),
        }
    }

    /// Parse a persisted record field by field.
    ///
    /// Returns `None` when the input is not a JSON object. A remaining time of
    /// zero counts as absent (a finished countdown restarts fresh); a
    /// completed count of zero is a real value and is kept.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw) else {
            return None;
        };
        let mode = obj
            .get("mode")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Mode>().ok());
        let remaining_seconds = obj
            .get("remainingSeconds")
            .and_then(Value::as_u64)
            .filter(|s| *s > 0);
        let completed_work_sessions = obj
            .get("completedWorkSessions")
            .or_else(|| obj.get("completedSessions"))
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok());

        Some(Self {
            mode,
            remaining_seconds,
            completed_work_sessions,
        })
    }
}

/// Loads and saves the [`SessionSnapshot`]. Best effort in both directions.
pub struct SessionPersistence<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SessionPersistence<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Write the snapshot. Storage failures are logged, never returned.
    pub fn save(&self, snapshot: &SessionSnapshot) {
        let json = match serde_json::to_string(snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode session snapshot");
                return;
            }
        };
        match self.store.set(SESSION_KEY, &json) {
            Ok(()) => debug!(snapshot = %json, "session snapshot saved"),
            Err(e) => warn!(error = %e, "failed to save session snapshot"),
        }
    }

    /// Read the snapshot, or `None` when absent, unreadable or corrupt.
    pub fn load(&self) -> Option<SessionSnapshot> {
        match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => {
                let parsed = SessionSnapshot::parse_lenient(&raw);
                if parsed.is_none() {
                    warn!("ignoring corrupt session snapshot");
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "session snapshot unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = MemoryStore::new();
        let sessions = SessionPersistence::new(&store);
        let snap = SessionSnapshot::new(Mode::ShortBreak, 120, 3);
        sessions.save(&snap);
        assert_eq!(sessions.load(), Some(snap));
    }

    #[test]
    fn record_uses_wire_field_names() {
        let store = MemoryStore::new();
        SessionPersistence::new(&store).save(&SessionSnapshot::new(Mode::LongBreak, 900, 4));
        let raw: Value = serde_json::from_str(&store.get(SESSION_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(raw["mode"], "long");
        assert_eq!(raw["remainingSeconds"], 900);
        assert_eq!(raw["completedWorkSessions"], 4);
    }

    #[test]
    fn corrupt_record_is_absent() {
        let store = MemoryStore::new();
        store.set(SESSION_KEY, "}{").unwrap();
        assert!(SessionPersistence::new(&store).load().is_none());
    }

    #[test]
    fn partial_record_keeps_usable_fields() {
        let snap = SessionSnapshot::parse_lenient(
            r#"{"mode": "nap", "remainingSeconds": 0, "completedSessions": 0}"#,
        )
        .unwrap();
        assert_eq!(snap.mode, None);
        assert_eq!(snap.remaining_seconds, None);
        assert_eq!(snap.completed_work_sessions, Some(0));
    }

    #[test]
    fn broken_store_is_swallowed() {
        let sessions = SessionPersistence::new(&BrokenStore);
        sessions.save(&SessionSnapshot::new(Mode::Work, 10, 1));
        assert!(sessions.load().is_none());
    }
}
