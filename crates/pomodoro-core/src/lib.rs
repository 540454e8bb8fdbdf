//! # Pomodoro Core Library
//!
//! This library provides the business logic for the Pomodoro timer. Every
//! operation is available from the standalone CLI; any other front end is a
//! thin presentation layer over the same core.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine over Work / Short Break /
//!   Long Break that requires the caller to invoke `tick()` once per second
//! - **Storage**: A key-value persistence port (SQLite or in-memory) holding
//!   settings, the session snapshot and the quote cursor, plus TOML-based host
//!   configuration
//! - **Quotes**: A rotating quote deck with an external source and a built-in
//!   fallback
//! - **Notifications**: A sink the engine calls at every completion
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`PomodoroApp`]: Host object wiring engine, store and quotes
//! - [`KeyValueStore`]: Persistence port
//! - [`AppConfig`]: Host configuration management

pub mod app;
pub mod error;
pub mod events;
pub mod notify;
pub mod quotes;
pub mod settings;
pub mod storage;
pub mod timer;

pub use app::{Intent, PomodoroApp};
pub use error::{ConfigError, CoreError, NotifyError, QuoteError, StorageError};
pub use events::Event;
pub use notify::{NotificationSink, NullSink, RecordingSink};
pub use quotes::{Quote, QuoteDeck, QuoteSource};
pub use settings::Settings;
pub use storage::{
    AppConfig, Database, KeyValueStore, MemoryStore, SessionPersistence, SessionSnapshot,
    SettingsStore,
};
pub use timer::{Mode, TimerEngine, TimerView};
