use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;

use crate::{
    dto::profile_dto::RecruiterProfilePayload,
    dto::stats_dto::{StatsQuery, StatsResponse, TimeseriesResponse},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/recruiter/stats",
    params(("days" = Option<String>, Query, description = "Window: 7 or 30 days")),
    responses((status = 200, description = "KPI rollup for the calling recruiter"))
)]
#[axum::debug_handler]
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse> {
    let served = state
        .stats_service
        .stats(user.id, query.window_days())
        .await?;
    Ok(Json(StatsResponse {
        note: served.note(),
        stats: served.value,
    }))
}

#[utoipa::path(
    get,
    path = "/api/recruiter/timeseries",
    params(("days" = Option<String>, Query, description = "Window: 7 or 30 days")),
    responses((status = 200, description = "Daily engagement series, zero-filled"))
)]
#[axum::debug_handler]
pub async fn timeseries(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse> {
    let served = state
        .stats_service
        .timeseries(user.id, query.window_days())
        .await?;
    Ok(Json(TimeseriesResponse {
        note: served.note(),
        items: served.value,
    }))
}

#[axum::debug_handler]
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let items = state.engagement_service.list_favorites(user.id).await?;
    Ok(Json(json!({ "items": items })))
}

#[axum::debug_handler]
pub async fn upsert_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<RecruiterProfilePayload>,
) -> Result<impl IntoResponse> {
    state
        .profile_service
        .upsert_recruiter(user.id, &payload.company, payload.role.as_deref())
        .await?;
    Ok(Json(json!({ "ok": true })))
}
