use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod history;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::dispatch_routes())
}
