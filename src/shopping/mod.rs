use crate::state::AppState;
use axum::Router;

pub mod aggregate;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
