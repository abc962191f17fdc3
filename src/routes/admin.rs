use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::report_dto::{CreateReportPayload, ReportListQuery, UpdateReportStatusPayload},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/admin/report",
    responses(
        (status = 200, description = "Report filed"),
        (status = 429, description = "Candidate was reported within the last 10 minutes")
    )
)]
#[axum::debug_handler]
pub async fn create_report(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Json(payload): Json<CreateReportPayload>,
) -> Result<impl IntoResponse> {
    state
        .moderation_service
        .create_report(payload.candidate_id, payload.reason.as_deref())
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[utoipa::path(
    patch,
    path = "/api/admin/report/{id}",
    params(("id" = Uuid, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn update_report_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReportStatusPayload>,
) -> Result<impl IntoResponse> {
    state
        .moderation_service
        .update_status(user.id, id, payload.status.trim())
        .await?;
    Ok(Json(json!({ "ok": true })))
}

#[utoipa::path(
    get,
    path = "/api/admin/reports",
    params(("status" = Option<String>, Query, description = "pending | reviewed | resolved")),
    responses(
        (status = 200, description = "Newest-first report list, capped at 50"),
        (status = 403, description = "Caller is not an admin")
    )
)]
#[axum::debug_handler]
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ReportListQuery>,
) -> Result<impl IntoResponse> {
    let items = state
        .moderation_service
        .list_reports(user.id, query.status.as_deref().map(str::trim))
        .await?;
    Ok(Json(json!({ "items": items })))
}
