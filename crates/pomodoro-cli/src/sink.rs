//! Terminal/desktop notification sink.

use std::io::Write;

use notify_rust::Notification;
use pomodoro_core::storage::NotificationsConfig;
use pomodoro_core::{NotificationSink, NotifyError};

/// Rings the terminal bell and raises a desktop notification.
pub struct TerminalSink {
    desktop: bool,
    sound: bool,
}

impl TerminalSink {
    pub fn new(config: &NotificationsConfig) -> Self {
        Self {
            desktop: config.enabled,
            sound: config.sound,
        }
    }
}

impl NotificationSink for TerminalSink {
    fn chime(&mut self) -> Result<(), NotifyError> {
        if !self.sound {
            return Ok(());
        }
        let mut out = std::io::stderr();
        out.write_all(b"\x07")
            .and_then(|_| out.flush())
            .map_err(|e| NotifyError::Unavailable(e.to_string()))
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        if !self.desktop {
            return Ok(());
        }
        Notification::new()
            .summary(title)
            .body(body)
            .appname("pomodoro")
            .icon("alarm-clock")
            .show()
            .map(|_| ())
            .map_err(|e| NotifyError::Unavailable(e.to_string()))
    }
}
