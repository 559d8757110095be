use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    usda::Ingredient,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

pub fn ingredient_routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients/search", get(search))
        .route("/ingredients/cache", delete(clear_cache))
        .route("/ingredients/:fdc_id", get(fetch))
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<SearchQuery>,
) -> AppResult<Json<Vec<Ingredient>>> {
    Ok(Json(state.usda.search(&state.ingredients, &q.query).await?))
}

#[instrument(skip(state))]
pub async fn fetch(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(fdc_id): Path<u64>,
) -> AppResult<Json<Ingredient>> {
    state
        .usda
        .fetch_by_id(&state.ingredients, fdc_id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("ingredient"))
}

/// Drops every cached ingredient so the next lookups go to FDC again.
#[instrument(skip(state))]
pub async fn clear_cache(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> StatusCode {
    let entries = state.ingredients.len();
    state.ingredients.clear();
    info!(%user_id, entries, "ingredient cache cleared");
    StatusCode::NO_CONTENT
}
