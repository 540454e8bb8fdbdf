//! Integration tests for settings and session persistence over SQLite.

use pomodoro_core::storage::{SESSION_KEY, SETTINGS_KEY};
use pomodoro_core::{
    Database, Intent, KeyValueStore, Mode, NullSink, PomodoroApp, RecordingSink,
    SessionPersistence, SessionSnapshot, Settings, SettingsStore, TimerEngine,
};

#[test]
fn snapshot_round_trip_on_fresh_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodoro.db");

    {
        let db = Database::open_at(&path).unwrap();
        SessionPersistence::new(&db).save(&SessionSnapshot::new(Mode::ShortBreak, 120, 3));
    }

    let db = Database::open_at(&path).unwrap();
    let snap = SessionPersistence::new(&db).load();
    let engine = TimerEngine::restore(SettingsStore::new(&db).load(), snap.as_ref(), NullSink);
    assert_eq!(engine.mode(), Mode::ShortBreak);
    assert_eq!(engine.remaining_secs(), 120);
    assert_eq!(engine.completed_work_sessions(), 3);
    assert_eq!(engine.total_secs(), 5 * 60);
    assert!(!engine.is_running());
}

#[test]
fn legacy_snapshot_record_is_understood() {
    let db = Database::open_memory().unwrap();
    db.set(
        SESSION_KEY,
        r#"{"mode":"long","remainingSeconds":600,"completedSessions":8}"#,
    )
    .unwrap();
    let snap = SessionPersistence::new(&db).load().unwrap();
    assert_eq!(snap, SessionSnapshot::new(Mode::LongBreak, 600, 8));
}

#[test]
fn malformed_settings_load_exact_defaults() {
    let db = Database::open_memory().unwrap();
    db.set(SETTINGS_KEY, "work=25;short=5").unwrap();
    assert_eq!(SettingsStore::new(&db).load(), Settings::default());
}

#[test]
fn app_survives_restart_with_settings_and_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodoro.db");
    let quotes = pomodoro_core::quotes::builtin_quotes();

    {
        let db = Database::open_at(&path).unwrap();
        let mut app = PomodoroApp::open(db, RecordingSink::new(), quotes.clone());
        app.save_settings(Settings {
            work_minutes: 50,
            sessions_until_long_break: 2,
            ..Settings::default()
        })
        .unwrap();
        app.dispatch(Intent::Skip);
        app.dispatch(Intent::Skip);
        app.dispatch(Intent::Skip);
        assert_eq!(app.engine().mode(), Mode::LongBreak);
        assert_eq!(app.engine().sink().chimes, 3);
        app.shutdown();
    }

    let db = Database::open_at(&path).unwrap();
    let app = PomodoroApp::open(db, NullSink, quotes);
    assert_eq!(app.settings().work_minutes, 50);
    assert_eq!(app.engine().mode(), Mode::LongBreak);
    assert_eq!(app.engine().remaining_secs(), 15 * 60);
    assert_eq!(app.engine().completed_work_sessions(), 2);
    assert_eq!(app.deck().cursor(), 3);
}
