use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use super::dto::{DailyStats, DashboardSummary, DateQuery, LogMealRequest, MealLog};
use super::services;
use crate::{auth::AuthUser, dates::today_utc, error::AppResult, state::AppState};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(log_meal))
        .route("/meals/:id", delete(delete_meal))
        .route("/stats/daily", get(daily_stats))
        .route("/stats/weekly", get(weekly_stats))
        .route("/dashboard", get(dashboard))
}

#[instrument(skip(state, body))]
pub async fn log_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<LogMealRequest>,
) -> AppResult<(StatusCode, Json<MealLog>)> {
    let meal = services::log_meal(state.store.as_ref(), user_id, body, today_utc()).await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// GET /meals?date=YYYY-MM-DD, today when omitted
#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<Vec<MealLog>>> {
    let date = q.date.unwrap_or_else(today_utc);
    let stats = services::daily_stats(state.store.as_ref(), user_id, date).await?;
    Ok(Json(stats.meals))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    services::delete_meal(state.store.as_ref(), user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn daily_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<DailyStats>> {
    let date = q.date.unwrap_or_else(today_utc);
    Ok(Json(services::daily_stats(state.store.as_ref(), user_id, date).await?))
}

#[instrument(skip(state))]
pub async fn weekly_stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<Vec<DailyStats>>> {
    let date = q.date.unwrap_or_else(today_utc);
    Ok(Json(services::weekly_stats(state.store.as_ref(), user_id, date).await?))
}

#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<DashboardSummary>> {
    let date = q.date.unwrap_or_else(today_utc);
    Ok(Json(services::dashboard(state.store.as_ref(), user_id, date).await?))
}
