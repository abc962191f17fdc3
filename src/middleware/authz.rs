use crate::error::{Error, Result};
use crate::models::recruiter::Recruiter;
use sqlx::PgPool;
use uuid::Uuid;

/// Role and ownership checks against the store. The session token's role
/// claim is never trusted on its own; every privileged operation funnels
/// through one of these.

pub async fn ensure_admin(pool: &PgPool, user_id: Uuid) -> Result<()> {
    let row: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    match row {
        Some((role,)) if role == "admin" => Ok(()),
        _ => Err(Error::Forbidden("admin role required".to_string())),
    }
}

pub async fn recruiter_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Recruiter>> {
    let recruiter = sqlx::query_as::<_, Recruiter>(
        "SELECT user_id, company, role, created_at FROM recruiters WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(recruiter)
}

/// Owner of a candidate profile, or NotFound.
pub async fn candidate_owner(pool: &PgPool, candidate_id: Uuid) -> Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM candidates WHERE id = $1")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?;
    row.map(|(owner,)| owner)
        .ok_or_else(|| Error::NotFound("candidate not found".to_string()))
}
