use clap::Subcommand;
use pomodoro_core::{AppConfig, Intent, PomodoroApp};

use crate::common::{open_store, quotes};
use crate::sink::TerminalSink;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Print current timer state as JSON
    Status,
    /// Restart the current session at its full duration (paused)
    Reset,
    /// End the current session now and move to the next one
    Skip,
}

pub fn run(action: TimerAction, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_store()?;
    let sink = TerminalSink::new(&config.notifications);
    let mut app = PomodoroApp::open(db, sink, quotes(config));

    let intent = match action {
        // Read-only: the stored snapshot is left as it is.
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&app.view())?);
            return Ok(());
        }
        TimerAction::Reset => Intent::Reset,
        TimerAction::Skip => Intent::Skip,
    };

    let events = app.dispatch(intent);
    println!("{}", serde_json::to_string_pretty(&events)?);
    app.shutdown();
    Ok(())
}
