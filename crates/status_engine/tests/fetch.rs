use std::time::Duration;

use pretty_assertions::assert_eq;
use status_core::StatusEntry;
use status_engine::{FailureKind, FetchSettings, ReqwestStatusFetcher, StatusFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn fetcher_for(server: &MockServer, settings: FetchSettings) -> ReqwestStatusFetcher {
    let url = format!("{}/api/website-status", server.uri());
    ReqwestStatusFetcher::new(&url, settings).expect("valid endpoint")
}

#[tokio::test]
async fn fetcher_decodes_status_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/website-status"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"[{"id":"a1","name":"Site A","status":"completed","last_scraped":"2024-05-01T10:00:00","product_count":3},
                {"id":"b2","status":"scraping"}]"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default()).await;
    let entries = fetcher.fetch_statuses().await.expect("fetch ok");

    assert_eq!(
        entries,
        vec![
            StatusEntry {
                id: "a1".into(),
                status: "completed".into(),
                name: Some("Site A".into()),
                last_scraped: Some("2024-05-01T10:00:00".into()),
                product_count: Some(3),
            },
            StatusEntry::new("b2", "scraping"),
        ]
    );
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/website-status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default()).await;
    let err = fetcher.fetch_statuses().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn fetcher_fails_on_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/website-status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server, FetchSettings::default()).await;
    let err = fetcher.fetch_statuses().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/website-status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = fetcher_for(&server, settings).await;
    let err = fetcher.fetch_statuses().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/website-status"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"[{"id":"a","status":"x"}]"#))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = fetcher_for(&server, settings).await;
    let err = fetcher.fetch_statuses().await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::TooLarge { max_bytes: 10, .. }
    ));
}

#[test]
fn fetcher_rejects_invalid_endpoint() {
    let err = ReqwestStatusFetcher::new("not a url", FetchSettings::default()).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
