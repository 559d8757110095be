use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateProfileRequest, StreakReport, StreakRequest, UpdateProfileRequest, UserProfile};
use super::services;
use crate::{
    auth::{repo::User, AuthUser},
    dates::today_utc,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/profile",
            get(get_profile).post(create_profile).patch(update_profile),
        )
        .route("/profile/streak", post(evaluate_streak))
}

#[instrument(skip(state, body))]
pub async fn create_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<CreateProfileRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    let profile = services::create_profile(state.store.as_ref(), user_id, user.email, body).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(services::get_profile(state.store.as_ref(), user_id).await?))
}

#[instrument(skip(state, body))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(
        services::update_profile(state.store.as_ref(), user_id, body).await?,
    ))
}

/// The body is optional; without one today is evaluated.
#[instrument(skip(state, body))]
pub async fn evaluate_streak(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    body: Result<Json<StreakRequest>, JsonRejection>,
) -> AppResult<Json<StreakReport>> {
    let req = match body {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => StreakRequest::default(),
        Err(rejection) => return Err(AppError::validation(rejection.body_text())),
    };
    let today = today_utc();
    let date = req.date.unwrap_or(today);
    Ok(Json(
        services::evaluate_streak(state.store.as_ref(), user_id, date, today).await?,
    ))
}
