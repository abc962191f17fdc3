use crate::dto::contact_dto::ContactRequestView;
use crate::error::{Error, Result};
use crate::middleware::authz;
use crate::models::contact_request::{ReceivedRequest, RequestStatus};
use sqlx::PgPool;
use uuid::Uuid;

/// Contact-request lifecycle. Creation is gated on the requester side,
/// decisions on the candidate-owner side; every gate is enforced here
/// regardless of what the UI disabled.
#[derive(Clone)]
pub struct ContactService {
    pool: PgPool,
}

impl ContactService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_request(
        &self,
        requester_id: Uuid,
        candidate_id: Uuid,
        message: Option<&str>,
    ) -> Result<ContactRequestView> {
        let recruiter = authz::recruiter_profile(&self.pool, requester_id)
            .await?
            .ok_or_else(|| Error::Forbidden("recruiter profile required".to_string()))?;
        if !recruiter.is_complete() {
            return Err(Error::Forbidden(
                "recruiter profile incomplete: company is missing".to_string(),
            ));
        }

        let owner = authz::candidate_owner(&self.pool, candidate_id).await?;
        if owner == requester_id {
            return Err(Error::Forbidden(
                "cannot request contact with your own profile".to_string(),
            ));
        }

        let pending: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM contact_requests
            WHERE candidate_id = $1 AND requester_id = $2 AND status = 'pending'
            LIMIT 1
            "#,
        )
        .bind(candidate_id)
        .bind(requester_id)
        .fetch_optional(&self.pool)
        .await?;
        if pending.is_some() {
            return Err(Error::Conflict(
                "a pending request already exists for this candidate".to_string(),
            ));
        }

        let view = sqlx::query_as::<_, (Uuid, String, chrono::DateTime<chrono::Utc>)>(
            r#"
            INSERT INTO contact_requests (candidate_id, requester_id, message, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id, status, created_at
            "#,
        )
        .bind(candidate_id)
        .bind(requester_id)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(ContactRequestView {
            id: view.0,
            status: view.1,
            created_at: Some(view.2),
        })
    }

    /// Owner decision on a pending request. The UPDATE re-checks the
    /// pending status so a concurrent double-decision loses cleanly.
    pub async fn decide(&self, caller_id: Uuid, request_id: Uuid, decision: &str) -> Result<()> {
        let target = RequestStatus::parse_decision(decision)
            .ok_or_else(|| Error::BadRequest("decision must be approved or declined".to_string()))?;

        let row: Option<(String, Uuid)> = sqlx::query_as(
            r#"
            SELECT cr.status, c.user_id
            FROM contact_requests cr
            JOIN candidates c ON c.id = cr.candidate_id
            WHERE cr.id = $1
            "#,
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;
        let (status, owner) =
            row.ok_or_else(|| Error::NotFound("contact request not found".to_string()))?;

        if owner != caller_id {
            return Err(Error::Forbidden(
                "only the candidate owner may decide this request".to_string(),
            ));
        }
        let current = RequestStatus::parse(&status)
            .ok_or_else(|| Error::Internal(format!("unknown request status: {}", status)))?;
        if current.is_terminal() {
            return Err(Error::Conflict("request is no longer pending".to_string()));
        }

        let updated = sqlx::query(
            r#"
            UPDATE contact_requests
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = 'pending'
            "#,
        )
        .bind(target.as_str())
        .bind(request_id)
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::Conflict("request is no longer pending".to_string()));
        }
        Ok(())
    }

    /// Requester-initiated cancel of an own pending request.
    pub async fn cancel(&self, requester_id: Uuid, request_id: Uuid) -> Result<()> {
        let row: Option<(String, Uuid)> = sqlx::query_as(
            "SELECT status, requester_id FROM contact_requests WHERE id = $1",
        )
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?;
        let (status, owner) =
            row.ok_or_else(|| Error::NotFound("contact request not found".to_string()))?;

        if owner != requester_id {
            return Err(Error::Forbidden(
                "only the requester may cancel this request".to_string(),
            ));
        }
        if RequestStatus::parse(&status) != Some(RequestStatus::Pending) {
            return Err(Error::Conflict("request is no longer pending".to_string()));
        }

        let updated = sqlx::query(
            r#"
            UPDATE contact_requests
            SET status = 'canceled', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(request_id)
        .execute(&self.pool)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(Error::Conflict("request is no longer pending".to_string()));
        }
        Ok(())
    }

    /// Requests received against the caller's candidate profile, newest
    /// first, with the requester's company and role attached.
    pub async fn list_received(&self, owner_id: Uuid) -> Result<Vec<ReceivedRequest>> {
        let rows = sqlx::query_as::<_, ReceivedRequest>(
            r#"
            SELECT cr.id, r.company, r.role, cr.message, cr.status, cr.created_at
            FROM contact_requests cr
            JOIN candidates c ON c.id = cr.candidate_id
            LEFT JOIN recruiters r ON r.user_id = cr.requester_id
            WHERE c.user_id = $1
            ORDER BY cr.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
