use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactPayload {
    pub candidate_id: Uuid,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDecisionPayload {
    pub request_id: Uuid,
    pub decision: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCancelPayload {
    pub request_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactRequestView {
    pub id: Uuid,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Envelope the UI relies on: it only inspects `ok` and renders `error`
/// verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct ContactResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<ContactRequestView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn ok(request: Option<ContactRequestView>) -> Self {
        Self {
            ok: true,
            request,
            error: None,
        }
    }

    pub fn err(message: String) -> Self {
        Self {
            ok: false,
            request: None,
            error: Some(message),
        }
    }
}
