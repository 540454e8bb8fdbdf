//! Foreground timer.
//!
//! Two independent intervals drive the app: the one-second countdown and the
//! quote rotation. Stdin lines are mapped to intents.

use std::io::Write;
use std::time::Duration;

use clap::Args;
use pomodoro_core::quotes::load_quotes;
use pomodoro_core::{AppConfig, Event, Intent, PomodoroApp, QuoteSource, TimerView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::common::{open_store_or_memory, quote_line, status_line};
use crate::sink::TerminalSink;

#[derive(Args)]
pub struct RunArgs {
    /// Start the countdown immediately
    #[arg(long)]
    pub start: bool,
}

/// What a line typed on stdin asks for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Intent(Intent),
    Quit,
    Help,
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "p" | "space" => Command::Intent(Intent::StartPause),
        "r" => Command::Intent(Intent::Reset),
        "s" => Command::Intent(Intent::Skip),
        "o" => Command::Intent(Intent::ToggleSettings),
        "c" | "esc" => Command::Intent(Intent::CloseSettings),
        "q" | "quit" => Command::Quit,
        _ => Command::Help,
    }
}

const HELP: &str = "keys: <enter>/p start-pause, r reset, s skip, o settings, c close, q quit";

pub fn run(args: RunArgs, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(run_loop(args, config))
}

async fn run_loop(args: RunArgs, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let source = config
        .quotes
        .source
        .as_deref()
        .and_then(|raw| match QuoteSource::parse(raw) {
            Ok(source) => Some(source),
            Err(e) => {
                warn!(error = %e, "ignoring quote source");
                None
            }
        });
    let quotes = load_quotes(source.as_ref()).await;

    let store = open_store_or_memory();
    let sink = TerminalSink::new(&config.notifications);
    let mut app = PomodoroApp::open(store, sink, quotes);

    let mut countdown = interval(Duration::from_secs(1));
    countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rotation = interval(Duration::from_secs(config.quotes.rotate_secs.max(1)));
    rotation.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Both intervals fire immediately on the first poll.
    countdown.tick().await;
    rotation.tick().await;

    println!("{HELP}");
    println!("{}", quote_line(app.quote()));
    if args.start {
        app.dispatch(Intent::StartPause);
        countdown.reset();
    }
    redraw(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = countdown.tick() => {
                let events = app.tick();
                if !events.is_empty() {
                    report(&app, &events);
                }
            }
            _ = rotation.tick() => {
                app.rotate_quote();
                newline();
                println!("{}", quote_line(app.quote()));
                redraw(&app);
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match parse_command(&line) {
                        Command::Quit => break,
                        Command::Help => println!("{HELP}"),
                        Command::Intent(intent) => {
                            let was_running = app.engine().is_running();
                            let events = app.dispatch(intent);
                            if !was_running && app.engine().is_running() {
                                // A fresh start gets a full first second.
                                countdown.reset();
                            }
                            report(&app, &events);
                        }
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!(error = %e, "stdin closed");
                        stdin_open = false;
                    }
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    newline();
    app.shutdown();
    info!("session saved");
    Ok(())
}

fn report<S, N>(app: &PomodoroApp<S, N>, events: &[Event])
where
    S: pomodoro_core::KeyValueStore,
    N: pomodoro_core::NotificationSink,
{
    for event in events {
        match event {
            Event::SessionCompleted { from, to, .. } => {
                newline();
                println!("{} finished, next: {}", from.label(), to.label());
            }
            Event::ThemeChanged { theme, .. } => {
                newline();
                println!("theme: {theme}");
            }
            Event::QuoteAdvanced { .. } => {
                newline();
                println!("{}", quote_line(app.quote()));
            }
            Event::SettingsPanel { open: true, .. } => {
                newline();
                match serde_json::to_string_pretty(app.settings()) {
                    Ok(json) => println!("settings (edit with `pomodoro settings set`):\n{json}"),
                    Err(e) => warn!(error = %e, "cannot render settings"),
                }
            }
            Event::SettingsSaved { .. } => {
                newline();
                println!("Settings saved");
            }
            _ => {}
        }
    }
    redraw(app);
}

fn redraw<S, N>(app: &PomodoroApp<S, N>)
where
    S: pomodoro_core::KeyValueStore,
    N: pomodoro_core::NotificationSink,
{
    if let Err(e) = draw_status(&mut std::io::stdout(), &app.view()) {
        debug!(error = %e, "status redraw failed");
    }
}

/// Overwrite the current terminal line with the status line.
fn draw_status(out: &mut impl Write, view: &TimerView) -> std::io::Result<()> {
    write!(out, "\r\x1b[2K{}", status_line(view))?;
    out.flush()
}

fn newline() {
    println!();
}
