use std::sync::Arc;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::handlers;
use crate::i18n;
use crate::render::{HtmlResponse, RenderFault, RenderManager};
use crate::template::{LocalizedView, RenderError};

/// Shared state handed to every page handler.
#[derive(Clone)]
pub struct AppState {
    pub render: Arc<RenderManager>,
    pub home_view: Arc<LocalizedView>,
}

impl AppState {
    /// Parse the page templates owned by the handlers.
    pub fn new(render: RenderManager) -> Result<Self, RenderError> {
        let home_view = render.parse_localized_view("home.html")?;
        Ok(Self {
            render: Arc::new(render),
            home_view: Arc::new(home_view),
        })
    }

    /// Language for this request: `?lang=`, then `Accept-Language`, then the default.
    pub fn request_lang(&self, query: &LangQuery, headers: &HeaderMap) -> String {
        let accept = headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());

        i18n::negotiate(self.render.store(), query.lang.as_deref(), accept)
    }
}

/// Query parameters shared by every page.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home_get))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Turn the outcome of a render into the HTTP response.
///
/// A dev-mode escalation is re-raised as a panic in the request task; the
/// router's `CatchPanicLayer` answers that single request with a 500.
pub fn respond(result: Result<(), RenderFault>, html: HtmlResponse) -> Response {
    match result {
        Ok(()) => html.into_response(),
        Err(RenderFault::Render(e)) => {
            error!("Page rendering failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
        Err(RenderFault::DevEscalation(e)) => panic!("{:?}", e),
    }
}
