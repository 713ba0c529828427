use crate::state::AppState;
use axum::Router;

mod dto;
pub(crate) mod extractors;
pub mod google;
pub mod handlers;
pub mod jwt;
pub mod repo;

pub use extractors::{AdminUser, AuthUser};

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
