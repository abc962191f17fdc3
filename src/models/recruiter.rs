use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recruiter {
    pub user_id: Uuid,
    pub company: String,
    pub role: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Recruiter {
    /// Recruiter actions (contact requests, dashboard) stay locked until
    /// the company field is filled in. Derived, not stored.
    pub fn is_complete(&self) -> bool {
        !self.company.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_requires_non_blank_company() {
        let mut r = Recruiter {
            user_id: Uuid::new_v4(),
            company: "Acme".into(),
            role: None,
            created_at: None,
        };
        assert!(r.is_complete());
        r.company = "   ".into();
        assert!(!r.is_complete());
    }
}
