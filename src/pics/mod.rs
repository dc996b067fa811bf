use axum::Router;

use crate::state::AppState;

pub mod handlers;
pub mod naming;

pub fn router() -> Router<AppState> {
    handlers::pic_routes()
}
