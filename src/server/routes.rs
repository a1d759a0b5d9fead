use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use super::AppState;
use super::middleware;
use crate::aggregator::ScrapeError;
use crate::models::{Article, Source};

pub const WELCOME_MESSAGE: &str = "Welcome to my Tech Company News API";

/// Register every route, the JSON 404 fallback and request logging.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/news", get(all_news))
        .route("/news/{id}", get(news_by_source))
        .route("/sources", get(list_sources))
        .fallback(not_found)
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::log_requests))
}

/// Error response for `/news/{id}`: 404 for unknown ids, 500 otherwise,
/// with a `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError(ScrapeError);

impl From<ScrapeError> for ApiError {
    fn from(e: ScrapeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ScrapeError::NotFound(_) => (StatusCode::NOT_FOUND, "Newspaper not found"),
            ScrapeError::Fetch(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch newspaper"),
            ScrapeError::Parse(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to parse HTML"),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// `GET /`
pub async fn welcome() -> Json<&'static str> {
    Json(WELCOME_MESSAGE)
}

/// `GET /news`: articles from every source. Always 200.
pub async fn all_news(State(state): State<AppState>) -> Json<Vec<Article>> {
    Json(state.aggregator.fetch_all().await)
}

/// `GET /news/{id}`: articles from one source.
pub async fn news_by_source(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Article>>, ApiError> {
    match state.aggregator.fetch_one(&id).await {
        Ok(articles) => Ok(Json(articles)),
        Err(e) => {
            match &e {
                ScrapeError::NotFound(_) => tracing::warn!(%id, "unknown newspaper"),
                _ => tracing::error!(%id, error = %e, "failed to scrape newspaper"),
            }
            Err(e.into())
        }
    }
}

/// `GET /sources`
pub async fn list_sources(State(state): State<AppState>) -> Json<Vec<Source>> {
    Json(state.aggregator.registry().list().to_vec())
}

async fn not_found(req: axum::extract::Request) -> impl IntoResponse {
    tracing::warn!("unhandled path: {}", req.uri());
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}
