use crate::error::{Error, Result};
use crate::middleware::authz;
use crate::models::report::{Report, ReportStatus};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Report intake and admin-only status transitions with best-effort audit
/// logging.
#[derive(Clone)]
pub struct ModerationService {
    pool: PgPool,
}

/// Window during which any further report against the same candidate is
/// rejected, regardless of who files it. Intentionally keyed on the
/// candidate alone; see DESIGN.md before changing this.
const REPORT_WINDOW_MINUTES: i64 = 10;

impl ModerationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_report(&self, candidate_id: Uuid, reason: Option<&str>) -> Result<()> {
        let last: Option<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT created_at FROM reports WHERE candidate_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some((last_at,)) = last {
            if window_blocks(last_at, Utc::now()) {
                return Err(Error::RateLimited(
                    "this candidate was reported recently".to_string(),
                ));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO reports (candidate_id, reason, status)
            VALUES ($1, $2, 'pending')
            "#,
        )
        .bind(candidate_id)
        .bind(reason.unwrap_or(""))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Any transition between the three statuses is allowed. The audit row
    /// is best-effort: a failed write is logged and swallowed so moderation
    /// itself never fails on observability.
    pub async fn update_status(
        &self,
        admin_id: Uuid,
        report_id: Uuid,
        status: &str,
    ) -> Result<()> {
        authz::ensure_admin(&self.pool, admin_id).await?;
        let status = ReportStatus::parse(status)
            .ok_or_else(|| Error::BadRequest("invalid report status".to_string()))?;

        // Self-join so the audit row captures the status this UPDATE
        // actually replaced, not one read in a separate query.
        let before: Option<(String,)> = sqlx::query_as(
            r#"
            UPDATE reports r
            SET status = $1
            FROM reports old
            WHERE r.id = $2 AND old.id = r.id
            RETURNING old.status
            "#,
        )
        .bind(status.as_str())
        .bind(report_id)
        .fetch_optional(&self.pool)
        .await?;
        let (old_status,) =
            before.ok_or_else(|| Error::NotFound("report not found".to_string()))?;

        let audit = sqlx::query(
            r#"
            INSERT INTO admin_events (type, report_id, admin_id, old_status, new_status)
            VALUES ('report_status_change', $1, $2, $3, $4)
            "#,
        )
        .bind(report_id)
        .bind(admin_id)
        .bind(&old_status)
        .bind(status.as_str())
        .execute(&self.pool)
        .await;
        if let Err(err) = audit {
            tracing::warn!(error = ?err, report_id = %report_id, "audit log write failed");
        }
        Ok(())
    }

    pub async fn list_reports(
        &self,
        admin_id: Uuid,
        status_filter: Option<&str>,
    ) -> Result<Vec<Report>> {
        authz::ensure_admin(&self.pool, admin_id).await?;
        // Out-of-enum filter values fall back to no filter.
        let filter = status_filter
            .and_then(ReportStatus::parse)
            .map(|s| s.as_str().to_string());

        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, candidate_id, reason, status, created_at
            FROM reports
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT 50
            "#,
        )
        .bind(filter)
        .fetch_all(&self.pool)
        .await?;
        Ok(reports)
    }
}

/// Whether a prior report at `last_report_at` still blocks a new one at
/// `now`. A report filed exactly at the window edge still blocks; one
/// second past it does not.
fn window_blocks(last_report_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_report_at <= Duration::minutes(REPORT_WINDOW_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_window_blocks_inside_ten_minutes() {
        let last = Utc::now();
        assert!(window_blocks(last, last + Duration::seconds(1)));
        assert!(window_blocks(last, last + Duration::minutes(9) + Duration::seconds(59)));
    }

    #[test]
    fn report_window_boundary_is_exclusive_past_ten_minutes() {
        let last = Utc::now();
        assert!(window_blocks(last, last + Duration::minutes(10)));
        assert!(!window_blocks(
            last,
            last + Duration::minutes(10) + Duration::seconds(1)
        ));
    }
}
