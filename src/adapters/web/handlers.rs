//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::domain::board::{load_board, load_tab};
use crate::domain::position::Position;

use super::templates::{BoardTemplate, TabPageTemplate, TabTemplate, TabView};
use super::{AppState, WebError, is_htmx_request};

pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Response, WebError> {
    let tabs: Vec<TabView> = load_board(&*state.tables, &state.rarity)
        .iter()
        .map(TabView::from_tab)
        .collect();
    let template = BoardTemplate {
        title: &state.title,
        tabs: &tabs,
    };
    Ok(Html(template.render()?).into_response())
}

pub async fn tab(
    State(state): State<Arc<AppState>>,
    Path(position): Path<String>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let position: Position = position.parse().map_err(WebError::not_found)?;
    let view = TabView::from_tab(&load_tab(&*state.tables, &state.rarity, position));

    let html = if is_htmx_request(&headers) {
        TabTemplate { tab: &view }.render()?
    } else {
        TabPageTemplate {
            title: &state.title,
            tab: &view,
        }
        .render()?
    };
    Ok(Html(html).into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
