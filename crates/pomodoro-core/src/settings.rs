//! User-configurable timer settings.
//!
//! Settings are an immutable snapshot: saving replaces the whole value.
//! Anything read from storage goes through [`Settings::merge_json`], which
//! merges field by field onto the defaults, so a corrupt record can never
//! produce a zero duration or a zero cadence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timer::Mode;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_SESSIONS_UNTIL_LONG_BREAK: u32 = 4;
pub const DEFAULT_THEME: &str = "morning";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(alias = "work")]
    pub work_minutes: u32,
    #[serde(alias = "short")]
    pub short_break_minutes: u32,
    #[serde(alias = "long")]
    pub long_break_minutes: u32,
    #[serde(alias = "sessionsUntilLong")]
    pub sessions_until_long_break: u32,
    #[serde(alias = "autoStart")]
    pub auto_start_next: bool,
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_title: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            sessions_until_long_break: DEFAULT_SESSIONS_UNTIL_LONG_BREAK,
            auto_start_next: false,
            theme: DEFAULT_THEME.to_string(),
            work_title: None,
        }
    }
}

impl Settings {
    /// Clamp every field into its valid range.
    ///
    /// Durations and the cadence are raised to at least 1; a blank theme falls
    /// back to the default and a blank work title is dropped.
    pub fn validated(mut self) -> Self {
        self.work_minutes = self.work_minutes.max(1);
        self.short_break_minutes = self.short_break_minutes.max(1);
        self.long_break_minutes = self.long_break_minutes.max(1);
        self.sessions_until_long_break = self.sessions_until_long_break.max(1);
        if self.theme.trim().is_empty() {
            self.theme = DEFAULT_THEME.to_string();
        }
        self.work_title = self
            .work_title
            .take()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    pub fn minutes_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work_minutes,
            Mode::ShortBreak => self.short_break_minutes,
            Mode::LongBreak => self.long_break_minutes,
        }
    }

    /// Session length for `mode` in seconds.
    pub fn seconds_for(&self, mode: Mode) -> u64 {
        u64::from(self.minutes_for(mode).max(1)) * 60
    }

    /// Label shown for `mode`, honouring the work title override.
    pub fn label_for(&self, mode: Mode) -> &str {
        match (mode, self.work_title.as_deref()) {
            (Mode::Work, Some(title)) => title,
            _ => mode.label(),
        }
    }

    /// Merge a raw persisted record onto the defaults.
    ///
    /// Non-JSON input or a JSON value that is not an object yields exactly the
    /// defaults. Each field is taken from the record only when present and
    /// valid; both the camelCase names and the legacy short names are read.
    pub fn merge_json(raw: &str) -> Self {
        let defaults = Self::default();
        let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(raw) else {
            return defaults;
        };
        let field = |names: &[&str]| names.iter().find_map(|n| obj.get(*n));

        Self {
            work_minutes: field(&["workMinutes", "work"])
                .and_then(positive)
                .unwrap_or(defaults.work_minutes),
            short_break_minutes: field(&["shortBreakMinutes", "short"])
                .and_then(positive)
                .unwrap_or(defaults.short_break_minutes),
            long_break_minutes: field(&["longBreakMinutes", "long"])
                .and_then(positive)
                .unwrap_or(defaults.long_break_minutes),
            sessions_until_long_break: field(&["sessionsUntilLongBreak", "sessionsUntilLong"])
                .and_then(positive)
                .unwrap_or(defaults.sessions_until_long_break),
            auto_start_next: field(&["autoStartNext", "autoStart"])
                .and_then(Value::as_bool)
                .unwrap_or(defaults.auto_start_next),
            theme: field(&["theme"])
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
                .unwrap_or(defaults.theme),
            work_title: field(&["workTitle"])
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Update one field from its textual form, as typed on the command line.
    ///
    /// Accepts the camelCase record names. The result is validated.
    pub fn with_field(&self, key: &str, value: &str) -> Result<Self, String> {
        let mut next = self.clone();
        let parse_u32 = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("cannot parse '{v}' as a whole number"))
        };
        match key {
            "workMinutes" => next.work_minutes = parse_u32(value)?,
            "shortBreakMinutes" => next.short_break_minutes = parse_u32(value)?,
            "longBreakMinutes" => next.long_break_minutes = parse_u32(value)?,
            "sessionsUntilLongBreak" => next.sessions_until_long_break = parse_u32(value)?,
            "autoStartNext" => {
                next.auto_start_next = value
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| format!("cannot parse '{value}' as true/false"))?
            }
            "theme" => next.theme = value.to_string(),
            "workTitle" => next.work_title = Some(value.to_string()),
            other => return Err(format!("unknown settings key: {other}")),
        }
        Ok(next.validated())
    }
}

/// A positive integer, from a JSON number or a numeric string.
fn positive(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_u64()?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(n).ok().filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let s = Settings::default();
        assert_eq!(s.work_minutes, 25);
        assert_eq!(s.short_break_minutes, 5);
        assert_eq!(s.long_break_minutes, 15);
        assert_eq!(s.sessions_until_long_break, 4);
        assert!(!s.auto_start_next);
        assert_eq!(s.theme, "morning");
        assert_eq!(s.work_title, None);
    }

    #[test]
    fn non_json_merges_to_defaults() {
        assert_eq!(Settings::merge_json("{not json"), Settings::default());
        assert_eq!(Settings::merge_json("[1,2,3]"), Settings::default());
        assert_eq!(Settings::merge_json("null"), Settings::default());
    }

    #[test]
    fn merge_keeps_valid_fields_and_defaults_the_rest() {
        let s = Settings::merge_json(
            r#"{"workMinutes": 50, "shortBreakMinutes": 0, "longBreakMinutes": "20",
                "sessionsUntilLongBreak": -3, "autoStartNext": "yes", "theme": "night"}"#,
        );
        assert_eq!(s.work_minutes, 50);
        assert_eq!(s.short_break_minutes, 5);
        assert_eq!(s.long_break_minutes, 20);
        assert_eq!(s.sessions_until_long_break, 4);
        assert!(!s.auto_start_next);
        assert_eq!(s.theme, "night");
    }

    #[test]
    fn merge_reads_legacy_names() {
        let s = Settings::merge_json(
            r#"{"work": 30, "short": 3, "long": 10, "sessionsUntilLong": 2, "autoStart": true, "theme": "forest"}"#,
        );
        assert_eq!(s.work_minutes, 30);
        assert_eq!(s.short_break_minutes, 3);
        assert_eq!(s.long_break_minutes, 10);
        assert_eq!(s.sessions_until_long_break, 2);
        assert!(s.auto_start_next);
        assert_eq!(s.theme, "forest");
    }

    #[test]
    fn validated_clamps_zeroes() {
        let s = Settings {
            work_minutes: 0,
            short_break_minutes: 0,
            long_break_minutes: 0,
            sessions_until_long_break: 0,
            theme: "  ".into(),
            work_title: Some("   ".into()),
            ..Settings::default()
        }
        .validated();
        assert_eq!(s.work_minutes, 1);
        assert_eq!(s.short_break_minutes, 1);
        assert_eq!(s.long_break_minutes, 1);
        assert_eq!(s.sessions_until_long_break, 1);
        assert_eq!(s.theme, DEFAULT_THEME);
        assert_eq!(s.work_title, None);
    }

    #[test]
    fn label_uses_work_title_only_for_work() {
        let s = Settings {
            work_title: Some("Deep Focus".into()),
            ..Settings::default()
        };
        assert_eq!(s.label_for(Mode::Work), "Deep Focus");
        assert_eq!(s.label_for(Mode::ShortBreak), "Short Break");
    }

    #[test]
    fn with_field_parses_and_validates() {
        let s = Settings::default();
        assert_eq!(s.with_field("workMinutes", "40").unwrap().work_minutes, 40);
        assert_eq!(
            s.with_field("sessionsUntilLongBreak", "0")
                .unwrap()
                .sessions_until_long_break,
            1
        );
        assert!(s.with_field("autoStartNext", "true").unwrap().auto_start_next);
        assert!(s.with_field("workMinutes", "abc").is_err());
        assert!(s.with_field("volume", "3").is_err());
    }

    #[test]
    fn serialized_record_uses_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["workMinutes"], 25);
        assert_eq!(json["sessionsUntilLongBreak"], 4);
        assert!(json.get("workTitle").is_none());
    }
}
