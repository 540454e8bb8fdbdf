use clap::Subcommand;
use pomodoro_core::quotes::builtin_quotes;
use pomodoro_core::{NullSink, PomodoroApp};

use crate::common::open_store;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the effective settings as JSON
    Show,
    /// Set one field (e.g. "workMinutes 50", "autoStartNext true")
    Set {
        /// Field name, camelCase
        key: String,
        /// New value
        value: String,
    },
    /// Forget stored settings, use the defaults and restart at Work
    Reset,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_store()?;
    // Changing settings never completes a session, so nothing is notified.
    let mut app = PomodoroApp::open(db, NullSink, builtin_quotes());

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(app.settings())?);
            return Ok(());
        }
        SettingsAction::Set { key, value } => {
            let settings = app.settings().with_field(&key, &value)?;
            app.save_settings(settings)?;
            println!("ok");
        }
        SettingsAction::Reset => {
            app.reset_settings();
            println!("settings reset to defaults");
        }
    }

    app.shutdown();
    Ok(())
}
