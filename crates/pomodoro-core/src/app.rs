//! Host-side wiring of the timer.
//!
//! `PomodoroApp` owns the persistence port, the engine and the quote deck.
//! The presentation layer talks to it through [`Intent`]s plus a few direct
//! calls (saving settings, the two tickers, shutdown) and re-renders from
//! [`PomodoroApp::view`] after every call.

use chrono::Utc;
use tracing::debug;

use crate::error::StorageError;
use crate::events::Event;
use crate::notify::NotificationSink;
use crate::quotes::{Quote, QuoteDeck};
use crate::settings::Settings;
use crate::storage::{KeyValueStore, SessionPersistence, SettingsStore};
use crate::timer::{Mode, TimerEngine, TimerView};

/// Closed set of user intents the presentation layer can forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    StartPause,
    Reset,
    Skip,
    ToggleSettings,
    CloseSettings,
}

pub struct PomodoroApp<S: KeyValueStore, N: NotificationSink> {
    store: S,
    engine: TimerEngine<N>,
    deck: QuoteDeck,
    settings_open: bool,
}

impl<S: KeyValueStore, N: NotificationSink> PomodoroApp<S, N> {
    /// Build the app from whatever the store holds: settings merged onto
    /// defaults, the session snapshot if usable, and the quote cursor.
    pub fn open(store: S, sink: N, quotes: Vec<Quote>) -> Self {
        let settings = SettingsStore::new(&store).load();
        let snapshot = SessionPersistence::new(&store).load();
        let engine = TimerEngine::restore(settings, snapshot.as_ref(), sink);
        let deck = QuoteDeck::restore(quotes, &store);
        Self {
            store,
            engine,
            deck,
            settings_open: false,
        }
    }

    pub fn engine(&self) -> &TimerEngine<N> {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        self.engine.settings()
    }

    pub fn view(&self) -> TimerView {
        self.engine.view()
    }

    pub fn quote(&self) -> &Quote {
        self.deck.current()
    }

    pub fn deck(&self) -> &QuoteDeck {
        &self.deck
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open
    }

    pub fn dispatch(&mut self, intent: Intent) -> Vec<Event> {
        debug!(?intent, "dispatch");
        let events = match intent {
            Intent::StartPause => self.engine.toggle().into_iter().collect(),
            Intent::Reset => self.engine.reset(),
            Intent::Skip => self.engine.skip(),
            Intent::ToggleSettings => {
                self.settings_open = !self.settings_open;
                vec![Event::SettingsPanel {
                    open: self.settings_open,
                    at: Utc::now(),
                }]
            }
            Intent::CloseSettings => {
                if !self.settings_open {
                    return Vec::new();
                }
                self.settings_open = false;
                vec![Event::SettingsPanel {
                    open: false,
                    at: Utc::now(),
                }]
            }
        };
        self.after_engine(events)
    }

    /// Countdown ticker callback.
    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.engine.tick();
        self.after_engine(events)
    }

    /// Quote-rotation ticker callback. Independent of the countdown.
    pub fn rotate_quote(&mut self) -> Event {
        self.deck.advance(&self.store);
        Event::QuoteAdvanced {
            index: self.deck.cursor(),
            at: Utc::now(),
        }
    }

    /// Persist and apply new settings, then close the settings panel.
    ///
    /// # Errors
    /// Returns the storage error if the record could not be written; the
    /// engine still runs with the new settings.
    pub fn save_settings(&mut self, settings: Settings) -> Result<Vec<Event>, StorageError> {
        let settings = settings.validated();
        let saved = SettingsStore::new(&self.store).save(&settings);
        let mut events = self.engine.apply_settings(settings);
        events.extend(self.dispatch(Intent::CloseSettings));
        saved?;
        events.push(Event::SettingsSaved { at: Utc::now() });
        Ok(events)
    }

    /// Clear persisted settings, apply the defaults and return to a fresh
    /// Work session. The completed count is kept.
    pub fn reset_settings(&mut self) -> Vec<Event> {
        let defaults = SettingsStore::new(&self.store).reset_to_defaults();
        let mut events = self.engine.apply_settings(defaults);
        events.extend(self.engine.set_mode(Mode::Work));
        events
    }

    /// Persist the session snapshot. Best effort; call on shutdown.
    pub fn persist(&self) {
        SessionPersistence::new(&self.store).save(&self.engine.snapshot());
    }

    /// Consume the app, persisting the snapshot and handing back the store.
    pub fn shutdown(self) -> S {
        self.persist();
        self.store
    }

    fn after_engine(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        for event in &events {
            debug!(event = event.kind(), "engine event");
        }
        let transitions = events
            .iter()
            .filter(|e| matches!(e, Event::SessionCompleted { .. }))
            .count();
        for _ in 0..transitions {
            events.push(self.rotate_quote());
        }
        if transitions > 0 {
            // Completions are rare; keep the snapshot current in case the
            // process dies before shutdown.
            self.persist();
        }
        events
    }
}
