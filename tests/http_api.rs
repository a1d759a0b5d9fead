// End-to-end tests: a stub news site and the API both bound to loopback.

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use keyword_news::aggregator::{Aggregator, Dispatch};
use keyword_news::fetcher::HttpFetcher;
use keyword_news::models::{Article, Source};
use keyword_news::registry::SourceRegistry;
use keyword_news::server::{AppState, create_app};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn html(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], body)
}

async fn stub_site() -> String {
    serve(
        Router::new()
            .route("/amazon", get(|| async { html(r#"<a href="/x">Amazon Deal</a>"#) }))
            .route(
                "/markets",
                get(|| async {
                    html(r#"<nav><a href="/home">Home</a></nav>
                       <a href="/m1"> Amazon shares rally </a>
                       <a href="/m2">Amazon Web Services outage</a>"#)
                }),
            )
            .route("/none", get(|| async { html(r#"<a href="/y">Nothing relevant</a>"#) }))
            .route(
                "/plain",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "text/plain")],
                        r#"<a href="/p1">Amazon opens pharmacy</a>"#,
                    )
                }),
            )
            .route(
                "/broken",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
            )
            .route(
                "/feed",
                get(|| async {
                    (
                        [(header::CONTENT_TYPE, "application/json")],
                        r#"{"headline": "Amazon"}"#,
                    )
                }),
            ),
    )
    .await
}

async fn spawn_api(site: &str, dispatch: Dispatch) -> String {
    let registry = SourceRegistry::new(vec![
        Source::new("a", format!("{site}/amazon"), ""),
        Source::new("broken", format!("{site}/broken"), ""),
        Source::new("markets", format!("{site}/markets"), "https://markets.test"),
        Source::new("none", format!("{site}/none"), ""),
        Source::new("plain", format!("{site}/plain"), ""),
        Source::new("feed", format!("{site}/feed"), ""),
    ])
    .unwrap();
    let fetcher = HttpFetcher::with_options("keyword_news-test", Some(Duration::from_secs(5))).unwrap();
    let aggregator = Aggregator::new(Arc::new(registry), Arc::new(fetcher)).with_dispatch(dispatch);

    serve(create_app(AppState {
        aggregator: Arc::new(aggregator),
    }))
    .await
}

async fn get_json(url: &str) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = StatusCode::from_u16(response.status().as_u16()).unwrap();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_welcome() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Welcome to my Tech Company News API"));
}

#[tokio::test]
async fn test_news_by_source_match() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/news/a")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"title": "Amazon Deal", "url": "/x", "source": "a"}]));
}

#[tokio::test]
async fn test_news_by_source_without_match_is_empty_array() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/news/none")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_news_by_source_unknown_id() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/news/guardian")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Newspaper not found"}));
}

#[tokio::test]
async fn test_news_by_source_upstream_failure() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/news/broken")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch newspaper"}));
}

#[tokio::test]
async fn test_news_by_source_not_html() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/news/feed")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to parse HTML"}));
}

#[tokio::test]
async fn test_news_by_source_html_served_as_plain_text() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/news/plain")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"title": "Amazon opens pharmacy", "url": "/p1", "source": "plain"}])
    );
}

#[tokio::test]
async fn test_all_news_skips_failures_and_keeps_order() {
    let site = stub_site().await;
    let expected = vec![
        Article {
            title: "Amazon Deal".to_string(),
            url: "/x".to_string(),
            source: "a".to_string(),
        },
        Article {
            title: "Amazon shares rally".to_string(),
            url: "https://markets.test/m1".to_string(),
            source: "markets".to_string(),
        },
        Article {
            title: "Amazon Web Services outage".to_string(),
            url: "https://markets.test/m2".to_string(),
            source: "markets".to_string(),
        },
        Article {
            title: "Amazon opens pharmacy".to_string(),
            url: "/p1".to_string(),
            source: "plain".to_string(),
        },
    ];

    for dispatch in [Dispatch::Sequential, Dispatch::from_limit(3)] {
        let api = spawn_api(&site, dispatch).await;
        let response = reqwest::get(format!("{api}/news")).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let articles: Vec<Article> = response.json().await.unwrap();
        assert_eq!(articles, expected, "dispatch {dispatch}");
    }
}

#[tokio::test]
async fn test_sources_listing() {
    let site = stub_site().await;
    let api = spawn_api(&site, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/sources")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["a", "broken", "markets", "none", "plain", "feed"]);
    assert_eq!(body[2]["base_url"], json!("https://markets.test"));
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let api = spawn_api(&stub_site().await, Dispatch::Sequential).await;

    let (status, body) = get_json(&format!("{api}/headlines")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Not found"}));
}
