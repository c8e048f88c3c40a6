use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use chrono::Utc;
use serde::Serialize;

use crate::render::{HtmlResponse, MasterPageData, RenderFault};
use crate::server::{respond, AppState, LangQuery};

#[derive(Debug, Serialize)]
struct HomePageData {
    time: String,
}

/// `GET /`
pub async fn home_get(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
    headers: HeaderMap,
) -> Response {
    let lang = state.request_lang(&query, &headers);
    let mut html = HtmlResponse::new();
    let result = render_home(&state, &lang, &mut html);
    respond(result, html)
}

fn render_home(state: &AppState, lang: &str, html: &mut HtmlResponse) -> Result<(), RenderFault> {
    let data = HomePageData {
        time: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    };
    let page_html = state.home_view.execute_to_string(lang, &data)?;

    let title = state.render.localized_page_title(lang, "home");
    state
        .render
        .complete(lang, MasterPageData::new(title, page_html), html)
}
