use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a recruiter-to-candidate contact request.
/// `Pending` is the only non-terminal state: the candidate's owner moves it
/// to `Approved` or `Declined`, the requester may move it to `Canceled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Declined,
    Canceled,
}

impl RequestStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "declined" => Some(RequestStatus::Declined),
            "canceled" => Some(RequestStatus::Canceled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Declined => "declined",
            RequestStatus::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }

    /// Valid owner decisions. Cancellation goes through the requester path.
    pub fn parse_decision(value: &str) -> Option<Self> {
        match value {
            "approved" => Some(RequestStatus::Approved),
            "declined" => Some(RequestStatus::Declined),
            _ => None,
        }
    }
}

/// Row shape for the candidate-side inbox, joined with the requester's
/// recruiter profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReceivedRequest {
    pub id: Uuid,
    pub company: Option<String>,
    pub role: Option<String>,
    pub message: Option<String>,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_parse_excludes_non_decisions() {
        assert_eq!(
            RequestStatus::parse_decision("approved"),
            Some(RequestStatus::Approved)
        );
        assert_eq!(
            RequestStatus::parse_decision("declined"),
            Some(RequestStatus::Declined)
        );
        assert_eq!(RequestStatus::parse_decision("pending"), None);
        assert_eq!(RequestStatus::parse_decision("canceled"), None);
        assert_eq!(RequestStatus::parse_decision("APPROVED"), None);
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Declined.is_terminal());
        assert!(RequestStatus::Canceled.is_terminal());
    }
}
