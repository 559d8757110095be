pub mod dto;
pub mod handlers;
mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use dto::DailyStats;

pub fn router() -> Router<AppState> {
    handlers::meal_routes()
}
