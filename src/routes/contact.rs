use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};

use crate::{
    dto::contact_dto::{
        ContactCancelPayload, ContactDecisionPayload, ContactResponse, CreateContactPayload,
    },
    error::{Error, Result},
    middleware::auth::AuthUser,
    AppState,
};

/// Contact endpoints keep the `{ok, request?, error?}` body the UI relies
/// on, while the HTTP status still reflects the error class.
fn contact_error(err: Error) -> (axum::http::StatusCode, Json<ContactResponse>) {
    let status = err.status();
    (status, Json(ContactResponse::err(err.to_string())))
}

#[utoipa::path(
    post,
    path = "/api/contact/request",
    responses(
        (status = 200, description = "Request created"),
        (status = 403, description = "Caller is not an eligible recruiter"),
        (status = 409, description = "A pending request already exists")
    )
)]
#[axum::debug_handler]
pub async fn create_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateContactPayload>,
) -> Result<impl IntoResponse> {
    let message = payload
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty());
    match state
        .contact_service
        .create_request(user.id, payload.candidate_id, message)
        .await
    {
        Ok(request) => Ok(Json(ContactResponse::ok(Some(request))).into_response()),
        Err(err) => Ok(contact_error(err).into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/api/contact/decision",
    responses(
        (status = 200, description = "Decision applied"),
        (status = 403, description = "Caller does not own the candidate"),
        (status = 409, description = "Request is no longer pending")
    )
)]
#[axum::debug_handler]
pub async fn decide(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ContactDecisionPayload>,
) -> Result<impl IntoResponse> {
    match state
        .contact_service
        .decide(user.id, payload.request_id, &payload.decision)
        .await
    {
        Ok(()) => Ok(Json(ContactResponse::ok(None)).into_response()),
        Err(err) => Ok(contact_error(err).into_response()),
    }
}

#[axum::debug_handler]
pub async fn cancel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ContactCancelPayload>,
) -> Result<impl IntoResponse> {
    match state.contact_service.cancel(user.id, payload.request_id).await {
        Ok(()) => Ok(Json(ContactResponse::ok(None)).into_response()),
        Err(err) => Ok(contact_error(err).into_response()),
    }
}

#[axum::debug_handler]
pub async fn list_received(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse> {
    let items = state.contact_service.list_received(user.id).await?;
    Ok(Json(serde_json::json!({ "items": items })))
}
