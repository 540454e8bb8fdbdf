//! Integration tests for the external quote source.

use pomodoro_core::quotes::{builtin_quotes, fetch_quotes, load_quotes};
use pomodoro_core::{MemoryStore, Quote, QuoteDeck, QuoteSource};

#[tokio::test]
async fn fetches_quotes_over_http() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/quotes.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"[{"text": "Ship it.", "author": "Someone"},
                {"text": "   ", "author": "Blank"},
                {"text": "No author here."}]"#,
        )
        .create_async()
        .await;

    let source = QuoteSource::parse(&format!("{}/quotes.json", server.url())).unwrap();
    let quotes = fetch_quotes(&source).await.unwrap();
    mock.assert_async().await;

    assert_eq!(
        quotes,
        vec![
            Quote::new("Ship it.", "Someone"),
            Quote::new("No author here.", ""),
        ]
    );
}

#[tokio::test]
async fn http_error_falls_back_to_builtin() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/quotes.json")
        .with_status(503)
        .create_async()
        .await;

    let source = QuoteSource::parse(&format!("{}/quotes.json", server.url())).unwrap();
    assert!(fetch_quotes(&source).await.is_err());
    assert_eq!(load_quotes(Some(&source)).await, builtin_quotes());
}

#[tokio::test]
async fn malformed_or_empty_payload_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _bad = server
        .mock("GET", "/bad.json")
        .with_status(200)
        .with_body(r#"{"quotes": "nope"}"#)
        .create_async()
        .await;
    let _empty = server
        .mock("GET", "/empty.json")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    for path in ["/bad.json", "/empty.json"] {
        let source = QuoteSource::parse(&format!("{}{path}", server.url())).unwrap();
        assert_eq!(load_quotes(Some(&source)).await, builtin_quotes());
    }
}

#[tokio::test]
async fn loads_quotes_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotes.json");
    std::fs::write(
        &path,
        r#"[{"text": "a", "author": "x"}, {"text": "b", "author": "y"}, {"text": "c", "author": "z"}]"#,
    )
    .unwrap();

    let source = QuoteSource::parse(path.to_str().unwrap()).unwrap();
    let quotes = load_quotes(Some(&source)).await;
    assert_eq!(quotes.len(), 3);

    let store = MemoryStore::new();
    let mut deck = QuoteDeck::new(quotes);
    deck.advance(&store);
    deck.advance(&store);
    assert_eq!(deck.current().text, "c");
    deck.advance(&store);
    assert_eq!(deck.current().text, "a");
}
