//! Web server adapter.
//!
//! Serves the auction dashboard: one tab per position, each a sortable,
//! horizontally scrolling grid read fresh from the table store on every
//! request.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::ports::table_port::TablePort;

pub struct AppState {
    pub tables: Arc<dyn TablePort + Send + Sync>,
    pub rarity: String,
    pub title: String,
    pub static_dir: PathBuf,
}

pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/tab/{position}", get(handlers::tab))
        .nest_service("/static", assets)
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
