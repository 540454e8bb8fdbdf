//! Pure derivations of what the presentation layer shows.
//!
//! Nothing here mutates or caches; callers recompute from engine state on
//! every tick or transition.

use serde::{Deserialize, Serialize};

use super::Mode;
use crate::settings::Settings;

/// Theme used for both break modes.
pub const BREAK_THEME: &str = "break";

/// Zero-padded `(minutes, seconds)` digits.
pub fn format_clock(remaining_secs: u64) -> (String, String) {
    (
        format!("{:02}", remaining_secs / 60),
        format!("{:02}", remaining_secs % 60),
    )
}

/// Elapsed fraction of the session in `[0, 1]`.
pub fn progress(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    (elapsed as f64 / total_secs as f64).clamp(0.0, 1.0)
}

/// One entry per session in the current cycle; `true` for completed ones.
pub fn session_dots(completed_work_sessions: u32, sessions_until_long_break: u32) -> Vec<bool> {
    let cadence = sessions_until_long_break.max(1);
    let done = completed_work_sessions % cadence;
    (0..cadence).map(|i| i < done).collect()
}

/// Theme for `mode`: the configured theme while working, [`BREAK_THEME`] on breaks.
pub fn active_theme(settings: &Settings, mode: Mode) -> &str {
    if mode.is_break() {
        BREAK_THEME
    } else {
        &settings.theme
    }
}

/// Window/tab title, e.g. `24:59 · Work`.
pub fn window_title(remaining_secs: u64, label: &str) -> String {
    let (m, s) = format_clock(remaining_secs);
    format!("{m}:{s} \u{b7} {label}")
}

/// Everything the presentation layer renders, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub mode: Mode,
    pub label: String,
    pub running: bool,
    pub minutes: String,
    pub seconds: String,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub progress: f64,
    pub completed_work_sessions: u32,
    pub dots: Vec<bool>,
    pub theme: String,
    pub title: String,
}

impl TimerView {
    pub fn derive(
        settings: &Settings,
        mode: Mode,
        running: bool,
        total_secs: u64,
        remaining_secs: u64,
        completed_work_sessions: u32,
    ) -> Self {
        let (minutes, seconds) = format_clock(remaining_secs);
        let label = settings.label_for(mode).to_string();
        Self {
            mode,
            title: window_title(remaining_secs, &label),
            label,
            running,
            minutes,
            seconds,
            remaining_secs,
            total_secs,
            progress: progress(total_secs, remaining_secs),
            completed_work_sessions,
            dots: session_dots(completed_work_sessions, settings.sessions_until_long_break),
            theme: active_theme(settings, mode).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(25 * 60), ("25".into(), "00".into()));
        assert_eq!(format_clock(61), ("01".into(), "01".into()));
        assert_eq!(format_clock(0), ("00".into(), "00".into()));
        assert_eq!(format_clock(125 * 60 + 9), ("125".into(), "09".into()));
    }

    #[test]
    fn progress_stays_in_unit_interval() {
        assert_eq!(progress(100, 100), 0.0);
        assert_eq!(progress(100, 25), 0.75);
        assert_eq!(progress(100, 0), 1.0);
        assert_eq!(progress(100, 500), 0.0);
        assert_eq!(progress(0, 0), 0.0);
    }

    #[test]
    fn dots_wrap_each_cycle() {
        assert_eq!(session_dots(0, 4), vec![false; 4]);
        assert_eq!(session_dots(2, 4), vec![true, true, false, false]);
        assert_eq!(session_dots(4, 4), vec![false; 4]);
        assert_eq!(session_dots(5, 4), vec![true, false, false, false]);
        assert_eq!(session_dots(3, 0), vec![false]);
    }

    #[test]
    fn breaks_use_break_theme() {
        let s = Settings {
            theme: "sunset".into(),
            ..Settings::default()
        };
        assert_eq!(active_theme(&s, Mode::Work), "sunset");
        assert_eq!(active_theme(&s, Mode::ShortBreak), BREAK_THEME);
        assert_eq!(active_theme(&s, Mode::LongBreak), BREAK_THEME);
    }

    #[test]
    fn view_derives_every_field() {
        let s = Settings::default();
        let v = TimerView::derive(&s, Mode::Work, true, 1500, 1499, 1);
        assert_eq!(v.label, "Work");
        assert_eq!(v.minutes, "24");
        assert_eq!(v.seconds, "59");
        assert_eq!(v.title, "24:59 \u{b7} Work");
        assert_eq!(v.dots, vec![true, false, false, false]);
        assert_eq!(v.theme, "morning");
        assert!(v.progress > 0.0 && v.progress < 0.01);
    }
}
