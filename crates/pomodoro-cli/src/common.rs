//! Shared helpers for CLI commands.

use pomodoro_core::error::Result;
use pomodoro_core::quotes::{builtin_quotes, load_quotes};
use pomodoro_core::{AppConfig, Database, KeyValueStore, MemoryStore, Quote, QuoteSource, TimerView};
use tracing::warn;

/// Open the on-disk store; one-shot commands fail if it is unavailable.
pub fn open_store() -> Result<Database> {
    Ok(Database::open()?)
}

/// Open the on-disk store, falling back to memory so the timer still runs.
pub fn open_store_or_memory() -> Box<dyn KeyValueStore> {
    match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            warn!(error = %e, "database unavailable, state will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

/// Quotes from the configured source, or the built-in set.
pub fn quotes(config: &AppConfig) -> Vec<Quote> {
    let Some(raw) = config.quotes.source.as_deref() else {
        return builtin_quotes();
    };
    let source = match QuoteSource::parse(raw) {
        Ok(source) => source,
        Err(e) => {
            warn!(error = %e, "ignoring quote source");
            return builtin_quotes();
        }
    };
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt.block_on(load_quotes(Some(&source))),
        Err(e) => {
            warn!(error = %e, "no runtime for quote fetch");
            builtin_quotes()
        }
    }
}

/// One status line: clock, label, progress bar and session dots.
pub fn status_line(view: &TimerView) -> String {
    const WIDTH: usize = 20;
    let filled = ((view.progress * WIDTH as f64).round() as usize).min(WIDTH);
    let bar: String = "#".repeat(filled) + &"-".repeat(WIDTH - filled);
    let dots: String = view
        .dots
        .iter()
        .map(|done| if *done { '\u{25cf}' } else { '\u{25cb}' })
        .collect();
    let state = if view.running { "running" } else { "paused" };
    format!("{}  [{bar}]  {dots}  ({state})", view.title)
}

pub fn quote_line(quote: &Quote) -> String {
    if quote.author.is_empty() {
        format!("\"{}\"", quote.text)
    } else {
        format!("\"{}\" - {}", quote.text, quote.author)
    }
}
