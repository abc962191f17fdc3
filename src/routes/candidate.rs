use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::profile_dto::{SaveProfilePayload, SignedCvUrl},
    error::Result,
    middleware::auth::{AuthUser, MaybeUser},
    utils::signing,
    AppState,
};

#[axum::debug_handler]
pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let view = state
        .profile_service
        .get_candidate(id, user.map(|u| u.id))
        .await?;
    Ok(Json(view))
}

/// Signed, short-lived download URL for the candidate's CV. The object
/// itself lives in the external store.
#[axum::debug_handler]
pub async fn get_cv_url(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let path = state
        .profile_service
        .cv_path(id, user.map(|u| u.id))
        .await?;
    let (url, expires_at) = signing::signed_cv_url(&path, Utc::now().timestamp());
    Ok(Json(SignedCvUrl { url, expires_at }))
}

#[axum::debug_handler]
pub async fn save_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<SaveProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let candidate_id = state.profile_service.save_profile(user.id, &payload).await?;
    Ok(Json(json!({ "ok": true, "candidate_id": candidate_id })))
}

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let view = state.profile_service.dashboard(user.id).await?;
    Ok(Json(view))
}
