use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Favorite list entry for the recruiter workspace: favorite joined with
/// the candidate summary and the recruiter's private note.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FavoriteItem {
    pub candidate_id: Uuid,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
