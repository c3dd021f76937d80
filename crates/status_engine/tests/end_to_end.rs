use std::sync::Arc;

use status_engine::{
    FetchSettings, InMemoryBadge, InMemoryDom, PollSettings, ReqwestStatusFetcher, StatusPoller,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page() -> Arc<InMemoryDom> {
    Arc::new(
        InMemoryDom::new()
            .with_container(".website-status-container")
            .with_badge(
                ".website-status-17",
                InMemoryBadge::new(&["badge", "bg-primary"], "Scraping"),
            ),
    )
}

#[tokio::test]
async fn poll_once_renders_endpoint_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/website-status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"[{"id": 17, "status": "failed"}]"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/api/website-status", server.uri());
    let fetcher = Arc::new(ReqwestStatusFetcher::new(&url, FetchSettings::default()).unwrap());
    let dom = page();
    let poller = StatusPoller::new(fetcher, dom.clone(), PollSettings::default());

    let view = poller.poll_once().await;

    assert_eq!(view.cycles_applied, 1);
    let badge = dom.badge(".website-status-17").unwrap();
    assert_eq!(badge.text, "Failed");
    assert!(badge.has_class("bg-danger"));
    assert!(!badge.has_class("bg-primary"));
}

#[tokio::test]
async fn server_error_leaves_badges_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/website-status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let url = format!("{}/api/website-status", server.uri());
    let fetcher = Arc::new(ReqwestStatusFetcher::new(&url, FetchSettings::default()).unwrap());
    let dom = page();
    let poller = StatusPoller::new(fetcher, dom.clone(), PollSettings::default());

    let view = poller.poll_once().await;

    assert_eq!(view.failures, 1);
    assert_eq!(view.cycles_applied, 0);
    assert_eq!(dom.badge(".website-status-17").unwrap().text, "Scraping");
}
