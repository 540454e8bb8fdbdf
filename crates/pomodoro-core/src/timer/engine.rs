//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use internal
//! threads - the host owns exactly one one-second interval and calls `tick()`
//! on it. Ticks on an idle engine are ignored, so `pause()` and every
//! transition cut the countdown off immediately.
//!
//! ## State Transitions
//!
//! ```text
//! Work --complete--> ShortBreak | LongBreak --complete--> Work
//! ```
//!
//! Leaving Work bumps the completed count; the next break is long when the
//! count is a multiple of `sessions_until_long_break`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(Settings::default(), NullSink);
//! engine.start();
//! // Once per second:
//! let events = engine.tick();
//! ```

use chrono::Utc;
use tracing::{debug, warn};

use super::mode::Mode;
use super::view::{active_theme, TimerView};
use crate::events::Event;
use crate::notify::{NotificationSink, NullSink};
use crate::settings::Settings;
use crate::storage::SessionSnapshot;

const NOTIFICATION_TITLE: &str = "Pomodoro";

/// Core timer engine.
pub struct TimerEngine<N: NotificationSink = NullSink> {
    settings: Settings,
    mode: Mode,
    running: bool,
    /// Length of the current session in seconds.
    total_secs: u64,
    remaining_secs: u64,
    completed_work_sessions: u32,
    sink: N,
}

impl<N: NotificationSink> TimerEngine<N> {
    /// Create an idle engine at the top of a Work session.
    pub fn new(settings: Settings, sink: N) -> Self {
        let settings = settings.validated();
        let total_secs = settings.seconds_for(Mode::Work);
        Self {
            settings,
            mode: Mode::Work,
            running: false,
            total_secs,
            remaining_secs: total_secs,
            completed_work_sessions: 0,
            sink,
        }
    }

    /// Create an idle engine resuming a persisted snapshot.
    ///
    /// Only fields present in the snapshot are applied. The session length
    /// always comes from `settings`, and a restored remaining time longer
    /// than that is cut down to it.
    pub fn restore(settings: Settings, snapshot: Option<&SessionSnapshot>, sink: N) -> Self {
        let mut engine = Self::new(settings, sink);
        let Some(snap) = snapshot else {
            return engine;
        };
        if let Some(mode) = snap.mode {
            engine.mode = mode;
            engine.total_secs = engine.settings.seconds_for(mode);
            engine.remaining_secs = engine.total_secs;
        }
        if let Some(remaining) = snap.remaining_seconds {
            engine.remaining_secs = remaining.min(engine.total_secs);
        }
        if let Some(count) = snap.completed_work_sessions {
            engine.completed_work_sessions = count;
        }
        debug!(
            mode = %engine.mode,
            remaining = engine.remaining_secs,
            completed = engine.completed_work_sessions,
            "restored session"
        );
        engine
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn completed_work_sessions(&self) -> u32 {
        self.completed_work_sessions
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    /// Theme the presentation layer should show right now.
    pub fn theme(&self) -> &str {
        active_theme(&self.settings, self.mode)
    }

    pub fn view(&self) -> TimerView {
        TimerView::derive(
            &self.settings,
            self.mode,
            self.running,
            self.total_secs,
            self.remaining_secs,
            self.completed_work_sessions,
        )
    }

    /// State to persist across restarts.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.mode, self.remaining_secs, self.completed_work_sessions)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start when idle, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Restart the current session from the top. Mode is unchanged.
    pub fn reset(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.pause().into_iter().collect();
        self.remaining_secs = self.total_secs;
        events.push(Event::TimerReset {
            mode: self.mode,
            total_secs: self.total_secs,
            at: Utc::now(),
        });
        events
    }

    /// End the current session now. Never auto-starts the next one.
    pub fn skip(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.pause().into_iter().collect();
        events.extend(self.complete_session(true));
        events
    }

    /// Advance a running countdown by one second.
    ///
    /// Reaching zero completes the session in the same call.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.running {
            return Vec::new();
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        let mut events = vec![Event::Tick {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }];
        if self.remaining_secs == 0 {
            self.running = false;
            events.extend(self.complete_session(false));
        }
        events
    }

    /// Finish the current session and enter the next mode.
    ///
    /// Fires the notification sink, applies the cadence rule and, only for a
    /// natural completion with auto-start enabled, starts the new session.
    pub fn complete_session(&mut self, skipped: bool) -> Vec<Event> {
        self.running = false;
        let from = self.mode;
        let theme_before = self.theme().to_string();

        self.notify_completion(from);

        let to = match from {
            Mode::Work => {
                self.completed_work_sessions = self.completed_work_sessions.saturating_add(1);
                let cadence = self.settings.sessions_until_long_break.max(1);
                if self.completed_work_sessions % cadence == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        };
        self.enter(to);
        debug!(
            from = %from,
            to = %to,
            skipped,
            completed = self.completed_work_sessions,
            "session completed"
        );

        let now = Utc::now();
        let mut events = vec![Event::SessionCompleted {
            from,
            to,
            skipped,
            completed_work_sessions: self.completed_work_sessions,
            at: now,
        }];
        if self.theme() != theme_before {
            events.push(Event::ThemeChanged {
                theme: self.theme().to_string(),
                at: now,
            });
        }
        if !skipped && self.settings.auto_start_next {
            events.extend(self.start());
        }
        events
    }

    /// Replace the settings.
    ///
    /// The current session length is recomputed. A running session keeps its
    /// remaining time unless the new length is shorter; an idle one restarts
    /// at the new length.
    pub fn apply_settings(&mut self, settings: Settings) -> Vec<Event> {
        let theme_before = self.theme().to_string();
        self.settings = settings.validated();
        self.total_secs = self.settings.seconds_for(self.mode);
        self.remaining_secs = if self.running {
            self.remaining_secs.min(self.total_secs)
        } else {
            self.total_secs
        };

        let now = Utc::now();
        let mut events = vec![Event::SettingsApplied {
            total_secs: self.total_secs,
            remaining_secs: self.remaining_secs,
            at: now,
        }];
        if self.theme() != theme_before {
            events.push(Event::ThemeChanged {
                theme: self.theme().to_string(),
                at: now,
            });
        }
        events
    }

    /// Jump to `mode` at its full length, paused. No completion is recorded.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Event> {
        let mut events: Vec<Event> = self.pause().into_iter().collect();
        let theme_before = self.theme().to_string();
        self.enter(mode);

        let now = Utc::now();
        events.push(Event::TimerReset {
            mode,
            total_secs: self.total_secs,
            at: now,
        });
        if self.theme() != theme_before {
            events.push(Event::ThemeChanged {
                theme: self.theme().to_string(),
                at: now,
            });
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter(&mut self, mode: Mode) {
        self.mode = mode;
        self.total_secs = self.settings.seconds_for(mode);
        self.remaining_secs = self.total_secs;
    }

    fn notify_completion(&mut self, from: Mode) {
        if let Err(e) = self.sink.chime() {
            warn!(error = %e, "completion chime failed");
        }
        let body = format!("Session complete: {}", from.as_str());
        if let Err(e) = self.sink.notify(NOTIFICATION_TITLE, &body) {
            warn!(error = %e, "completion notification failed");
        }
    }
}
