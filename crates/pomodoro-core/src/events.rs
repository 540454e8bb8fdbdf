use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Every state change in the system produces an Event.
/// The presentation layer re-renders on them; the app reacts to transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second elapsed on a running countdown.
    Tick {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A session ended (naturally or skipped) and the engine entered `to`.
    SessionCompleted {
        from: Mode,
        to: Mode,
        skipped: bool,
        completed_work_sessions: u32,
        at: DateTime<Utc>,
    },
    /// The active visual theme changed.
    ThemeChanged {
        theme: String,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        total_secs: u64,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Settings were persisted from the settings panel.
    SettingsSaved {
        at: DateTime<Utc>,
    },
    /// The settings panel opened or closed.
    SettingsPanel {
        open: bool,
        at: DateTime<Utc>,
    },
    QuoteAdvanced {
        index: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::Tick { .. } => "tick",
            Event::SessionCompleted { .. } => "session_completed",
            Event::ThemeChanged { .. } => "theme_changed",
            Event::SettingsApplied { .. } => "settings_applied",
            Event::SettingsSaved { .. } => "settings_saved",
            Event::SettingsPanel { .. } => "settings_panel",
            Event::QuoteAdvanced { .. } => "quote_advanced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let ev = Event::SessionCompleted {
            from: Mode::Work,
            to: Mode::LongBreak,
            skipped: false,
            completed_work_sessions: 4,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "SessionCompleted");
        assert_eq!(json["to"], "long");
        assert_eq!(ev.kind(), "session_completed");
    }
}
