//! Catalog fallback against a live (but useless) HTTP endpoint.

use std::time::{Duration, Instant};

use sketchline_words::{
    CatalogClient, WordCatalog, WordSource, WordSourceError, default_words, load_word_pool,
    load_word_pool_within,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves one canned HTTP response and returns the base URL.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let _ = stream.read(&mut buf).await;
        let response = format!(
            "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
    });
    format!("http://{addr}")
}

/// Accepts connections and never answers. Returns the base URL.
async fn serve_nothing() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            open.push(stream);
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_stalled_catalog_request_times_out() {
    let url = serve_nothing().await;
    let client = CatalogClient::new(url, "key").request_timeout(Duration::from_millis(200));

    let started = Instant::now();
    let result = client.fetch_words().await;
    assert!(matches!(result, Err(WordSourceError::Request(ref e)) if e.is_timeout()));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_stalled_catalog_falls_back_within_deadline() {
    let url = serve_nothing().await;
    let client = CatalogClient::new(url, "key").request_timeout(Duration::from_secs(60));

    let pool = tokio::time::timeout(
        Duration::from_secs(5),
        load_word_pool_within(&client, Duration::from_millis(200)),
    )
    .await
    .expect("word pool should not wait on a stalled catalog");
    assert_eq!(pool, default_words());
}

#[tokio::test]
async fn test_unreachable_catalog_falls_back() {
    let catalog = WordCatalog::Remote(CatalogClient::new("http://127.0.0.1:1", "key"));
    assert!(catalog.fetch_words().await.is_err());
    assert_eq!(load_word_pool(&catalog).await, default_words());
}

#[tokio::test]
async fn test_catalog_rows_become_pool() {
    let url = serve_once("HTTP/1.1 200 OK", r#"[{"word":"pizza"},{"word":"taco"}]"#).await;
    let client = CatalogClient::new(url, "key");
    let pool = load_word_pool(&client).await;
    assert_eq!(pool, vec!["pizza".to_string(), "taco".to_string()]);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let url = serve_once("HTTP/1.1 401 Unauthorized", r#"{"message":"bad key"}"#).await;
    let client = CatalogClient::new(url, "key");
    let result = client.fetch_words().await;
    assert!(matches!(result, Err(WordSourceError::Status(s)) if s.as_u16() == 401));
}

#[tokio::test]
async fn test_empty_catalog_falls_back() {
    let url = serve_once("HTTP/1.1 200 OK", "[]").await;
    let client = CatalogClient::new(url, "key");
    assert_eq!(load_word_pool(&client).await, default_words());
}
