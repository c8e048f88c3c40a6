use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::Response;

use crate::render::{ErrorPageData, HtmlResponse, ResponseSink};
use crate::server::{respond, AppState, LangQuery};

/// Fallback for unknown routes: an expected error, so the status is set here.
pub async fn not_found(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let lang = state.request_lang(&query, &headers);

    let mut html = HtmlResponse::new();
    html.set_status(StatusCode::NOT_FOUND);

    let data = ErrorPageData::expected(state.render.localized_string(&lang, "pageNotFound"));
    let result = state.render.fail(&uri, &lang, data, &mut html);
    respond(result, html)
}
