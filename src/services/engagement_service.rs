use crate::error::Result;
use crate::models::engagement::FavoriteItem;
use sqlx::PgPool;
use uuid::Uuid;

/// Likes, favorites, favorite notes and view tracking. All writes lean on
/// the store's conflict handling instead of application-level locking.
#[derive(Clone)]
pub struct EngagementService {
    pool: PgPool,
}

impl EngagementService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent toggle: delete when the relation exists, otherwise a
    /// conflict-ignoring insert so concurrent double-submission leaves at
    /// most one row. Returns the resulting favorited state.
    pub async fn toggle_favorite(&self, candidate_id: Uuid, user_id: Uuid) -> Result<bool> {
        let existing: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM favorites WHERE candidate_id = $1 AND user_id = $2 LIMIT 1",
        )
        .bind(candidate_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if existing.is_some() {
            sqlx::query("DELETE FROM favorites WHERE candidate_id = $1 AND user_id = $2")
                .bind(candidate_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO favorites (candidate_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (candidate_id, user_id) DO NOTHING
            "#,
        )
        .bind(candidate_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(true)
    }

    pub async fn like(&self, candidate_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO candidate_likes (candidate_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (candidate_id, user_id) DO NOTHING
            "#,
        )
        .bind(candidate_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn upsert_note(&self, candidate_id: Uuid, user_id: Uuid, note: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO favorite_notes (candidate_id, user_id, note, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (candidate_id, user_id)
            DO UPDATE SET note = EXCLUDED.note, updated_at = NOW()
            "#,
        )
        .bind(candidate_id)
        .bind(user_id)
        .bind(note)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn delete_note(&self, candidate_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM favorite_notes WHERE candidate_id = $1 AND user_id = $2")
            .bind(candidate_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Append-only view event. Observability write: failures are logged
    /// and swallowed, never surfaced to the viewer.
    pub async fn record_view(
        &self,
        candidate_id: Uuid,
        viewer_id: Option<Uuid>,
        user_agent: Option<&str>,
        ip: Option<&str>,
    ) {
        let result = sqlx::query(
            r#"
            INSERT INTO candidate_views (candidate_id, viewer_id, user_agent, ip)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(candidate_id)
        .bind(viewer_id)
        .bind(user_agent)
        .bind(ip)
        .execute(&self.pool)
        .await;
        if let Err(err) = result {
            tracing::warn!(error = ?err, "failed to record candidate view");
        }
    }

    /// The caller's favorites, newest first, with candidate summary and
    /// the caller's private note attached.
    pub async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteItem>> {
        let items = sqlx::query_as::<_, FavoriteItem>(
            r#"
            SELECT f.candidate_id, c.headline, c.location, c.skills, n.note, f.created_at
            FROM favorites f
            JOIN candidates c ON c.id = f.candidate_id
            LEFT JOIN favorite_notes n
              ON n.candidate_id = f.candidate_id AND n.user_id = f.user_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }
}
