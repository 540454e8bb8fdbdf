//! Rotating quote deck.
//!
//! Quotes are loaded once at startup from a JSON array of `{text, author}`
//! (a local file or an http(s) URL). If the source is unset, unreachable,
//! malformed or empty, the built-in set is used instead. The cursor is
//! persisted through the key-value port so rotation resumes after a restart.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::QuoteError;
use crate::storage::{KeyValueStore, QUOTE_INDEX_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    #[serde(default)]
    pub author: String,
}

impl Quote {
    pub fn new(text: &str, author: &str) -> Self {
        Self {
            text: text.to_string(),
            author: author.to_string(),
        }
    }
}

static EMPTY_QUOTE: Quote = Quote {
    text: String::new(),
    author: String::new(),
};

/// Quotes shipped with the binary.
pub fn builtin_quotes() -> Vec<Quote> {
    vec![
        Quote::new("You may delay, but time will not.", "Benjamin Franklin"),
        Quote::new(
            "The key is in not spending time, but in investing it.",
            "Stephen R. Covey",
        ),
        Quote::new(
            "Time is what we want most, but what we use worst.",
            "William Penn",
        ),
        Quote::new(
            "It's not knowing what to do, it's doing what you know.",
            "Tony Robbins",
        ),
        Quote::new("Lost time is never found again.", "Benjamin Franklin"),
        Quote::new(
            "Your future is created by what you do today, not tomorrow.",
            "Robert Kiyosaki",
        ),
        Quote::new("Don't count the days; make the days count.", "Muhammad Ali"),
        Quote::new(
            "Small daily improvements over time lead to stunning results.",
            "Robin Sharma",
        ),
    ]
}

/// Where the external quote list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteSource {
    Url(Url),
    File(PathBuf),
}

impl QuoteSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(raw: &str) -> Result<Self, QuoteError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(QuoteError::UnsupportedSource(raw.to_string()));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            let url =
                Url::parse(raw).map_err(|_| QuoteError::UnsupportedSource(raw.to_string()))?;
            return Ok(QuoteSource::Url(url));
        }
        if raw.contains("://") {
            return Err(QuoteError::UnsupportedSource(raw.to_string()));
        }
        Ok(QuoteSource::File(PathBuf::from(raw)))
    }
}

/// Fetch and parse the quote list. Entries with blank text are dropped.
pub async fn fetch_quotes(source: &QuoteSource) -> Result<Vec<Quote>, QuoteError> {
    let quotes: Vec<Quote> = match source {
        QuoteSource::Url(url) => {
            reqwest::get(url.clone())
                .await?
                .error_for_status()?
                .json()
                .await?
        }
        QuoteSource::File(path) => {
            let body = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| QuoteError::Read {
                    path: path.clone(),
                    source,
                })?;
            serde_json::from_str(&body)?
        }
    };
    Ok(quotes
        .into_iter()
        .filter(|q| !q.text.trim().is_empty())
        .collect())
}

/// Load quotes from `source`, falling back to [`builtin_quotes`].
pub async fn load_quotes(source: Option<&QuoteSource>) -> Vec<Quote> {
    let Some(source) = source else {
        return builtin_quotes();
    };
    match fetch_quotes(source).await {
        Ok(quotes) if !quotes.is_empty() => {
            debug!(count = quotes.len(), "loaded external quotes");
            quotes
        }
        Ok(_) => {
            warn!("quote source is empty, using built-in quotes");
            builtin_quotes()
        }
        Err(e) => {
            warn!(error = %e, "quote source failed, using built-in quotes");
            builtin_quotes()
        }
    }
}

/// Ordered quotes plus a cursor.
#[derive(Debug, Clone)]
pub struct QuoteDeck {
    quotes: Vec<Quote>,
    cursor: usize,
}

impl QuoteDeck {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self { quotes, cursor: 0 }
    }

    /// Build a deck positioned at the persisted cursor (wrapped to the deck).
    pub fn restore(quotes: Vec<Quote>, store: &dyn KeyValueStore) -> Self {
        let saved = match store.get(QUOTE_INDEX_KEY) {
            Ok(Some(raw)) => raw.trim().parse::<usize>().unwrap_or(0),
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "quote cursor unreadable");
                0
            }
        };
        let cursor = if quotes.is_empty() {
            0
        } else {
            saved % quotes.len()
        };
        Self { quotes, cursor }
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Quote under the cursor, or an empty placeholder for an empty deck.
    pub fn current(&self) -> &Quote {
        self.quotes.get(self.cursor).unwrap_or(&EMPTY_QUOTE)
    }

    /// Move to the next quote, wrapping, and persist the new cursor.
    pub fn advance(&mut self, store: &dyn KeyValueStore) -> &Quote {
        if !self.quotes.is_empty() {
            self.cursor = (self.cursor + 1) % self.quotes.len();
        }
        if let Err(e) = store.set(QUOTE_INDEX_KEY, &self.cursor.to_string()) {
            warn!(error = %e, "failed to persist quote cursor");
        }
        self.current()
    }
}
