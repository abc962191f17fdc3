use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;

use crate::{
    dto::engagement_dto::{
        FavoriteNoteDeletePayload, FavoriteNotePayload, FavoritePayload, FavoriteResponse,
        LikePayload, ViewPayload,
    },
    error::Result,
    middleware::auth::{AuthUser, MaybeUser},
    AppState,
};

/// Toggle semantics; anonymous callers get a no-op false rather than 401.
#[axum::debug_handler]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    Json(payload): Json<FavoritePayload>,
) -> Result<impl IntoResponse> {
    let Some(user) = user else {
        return Ok(Json(FavoriteResponse {
            is_favorited: false,
        }));
    };
    let is_favorited = state
        .engagement_service
        .toggle_favorite(payload.candidate_id, user.id)
        .await?;
    Ok(Json(FavoriteResponse { is_favorited }))
}

#[axum::debug_handler]
pub async fn like(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<LikePayload>,
) -> Result<impl IntoResponse> {
    state
        .engagement_service
        .like(payload.candidate_id, user.id)
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[axum::debug_handler]
pub async fn upsert_favorite_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<FavoriteNotePayload>,
) -> Result<impl IntoResponse> {
    state
        .engagement_service
        .upsert_note(
            payload.candidate_id,
            user.id,
            payload.note.as_deref().unwrap_or(""),
        )
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[axum::debug_handler]
pub async fn delete_favorite_note(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<FavoriteNoteDeletePayload>,
) -> Result<impl IntoResponse> {
    state
        .engagement_service
        .delete_note(payload.candidate_id, user.id)
        .await?;
    Ok(Json(json!({ "ok": true })))
}

/// View tracking never breaks the caller's flow: bad payloads and write
/// failures all end in a 200.
#[axum::debug_handler]
pub async fn record_view(
    State(state): State<AppState>,
    Extension(MaybeUser(user)): Extension<MaybeUser>,
    headers: HeaderMap,
    payload: Option<Json<ViewPayload>>,
) -> impl IntoResponse {
    let candidate_id = payload.and_then(|Json(p)| p.candidate_id);
    let Some(candidate_id) = candidate_id else {
        return Json(json!({ "ok": false }));
    };

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    state
        .engagement_service
        .record_view(
            candidate_id,
            user.map(|u| u.id),
            user_agent.as_deref(),
            ip.as_deref(),
        )
        .await;
    Json(json!({ "ok": true }))
}
