use std::time::Duration;

use pks_engine::{FetchFailureKind, FetchSettings, PageSource, ReqwestPageFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetcher_returns_html_with_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestPageFetcher::new(FetchSettings::default()).expect("fetcher");
    let url = format!("{}/doc", server.uri());

    let output = fetcher.fetch_page(&url).await.expect("fetch ok");

    assert_eq!(output.metadata.original_url, url);
    assert_eq!(output.metadata.final_url, output.metadata.original_url);
    assert!(output
        .metadata
        .content_type
        .as_deref()
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(output.bytes, b"<html>ok</html>");
    assert_eq!(output.metadata.byte_len, output.bytes.len() as u64);
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestPageFetcher::new(FetchSettings::default()).expect("fetcher");
    let url = format!("{}/missing", server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();
    assert_eq!(err.kind, FetchFailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("slow"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestPageFetcher::new(settings).expect("fetcher");
    let url = format!("{}/slow", server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();
    assert_eq!(err.kind, FetchFailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html")
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestPageFetcher::new(settings).expect("fetcher");
    let url = format!("{}/large", server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FetchFailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_non_html_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"a\": 1}", "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestPageFetcher::new(FetchSettings::default()).expect("fetcher");
    let url = format!("{}/feed", server.uri());

    let err = fetcher.fetch_page(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FetchFailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_invalid_urls() {
    let fetcher = ReqwestPageFetcher::new(FetchSettings::default()).expect("fetcher");

    let err = fetcher.fetch_page("not a url").await.unwrap_err();
    assert_eq!(err.kind, FetchFailureKind::InvalidUrl);
}
