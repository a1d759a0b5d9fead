//! HTTP surface of the service.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | [`routes::welcome`] |
//! | `GET /news` | [`routes::all_news`] |
//! | `GET /news/{id}` | [`routes::news_by_source`] |
//! | `GET /sources` | [`routes::list_sources`] |

pub mod middleware;
pub mod routes;

use axum::Router;
use std::sync::Arc;

use crate::aggregator::Aggregator;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

/// Build the full application router.
pub fn create_app(state: AppState) -> Router {
    routes::build_router(state)
}
