use clap::Subcommand;
use pomodoro_core::{AppConfig, QuoteDeck};

use crate::common::{open_store, quote_line, quotes};

#[derive(Subcommand)]
pub enum QuoteAction {
    /// Print the quote under the saved cursor
    Current,
    /// Advance the cursor and print the new quote
    Next,
}

pub fn run(action: QuoteAction, config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_store()?;
    let mut deck = QuoteDeck::restore(quotes(config), &db);

    let quote = match action {
        QuoteAction::Current => deck.current(),
        QuoteAction::Next => deck.advance(&db),
    };
    println!("{}", quote_line(quote));
    Ok(())
}
