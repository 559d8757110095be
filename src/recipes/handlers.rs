use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{Recipe, RecipeRequest};
use super::services;
use crate::{auth::AuthUser, error::AppResult, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Recipe>>> {
    Ok(Json(services::list_recipes(state.store.as_ref(), user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<RecipeRequest>,
) -> AppResult<(StatusCode, Json<Recipe>)> {
    let recipe =
        services::create_recipe(state.store.as_ref(), user_id, body.name, body.ingredients).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    Ok(Json(services::get_recipe(state.store.as_ref(), user_id, &id).await?))
}

#[instrument(skip(state, body))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    Json(body): Json<RecipeRequest>,
) -> AppResult<Json<Recipe>> {
    let recipe =
        services::update_recipe(state.store.as_ref(), user_id, &id, body.name, body.ingredients)
            .await?;
    Ok(Json(recipe))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    services::delete_recipe(state.store.as_ref(), user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
