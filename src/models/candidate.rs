use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Candidate-controlled exposure tier. `Private` profiles are visible
/// only to their owning user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Anonymized,
    Private,
}

impl Visibility {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "public" => Some(Visibility::Public),
            "anonymized" => Some(Visibility::Anonymized),
            "private" => Some(Visibility::Private),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Anonymized => "anonymized",
            Visibility::Private => "private",
        }
    }

    /// Whether a profile with this visibility may be shown to `viewer`.
    pub fn visible_to(&self, owner_id: Uuid, viewer: Option<Uuid>) -> bool {
        match self {
            Visibility::Public | Visibility::Anonymized => true,
            Visibility::Private => viewer == Some(owner_id),
        }
    }
}

/// CEFR language proficiency tier, A1 (lowest) to C2 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Case-insensitive parse; anything outside the six levels is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "A1" => Some(CefrLevel::A1),
            "A2" => Some(CefrLevel::A2),
            "B1" => Some(CefrLevel::B1),
            "B2" => Some(CefrLevel::B2),
            "C1" => Some(CefrLevel::C1),
            "C2" => Some(CefrLevel::C2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub skills: Vec<String>,
    pub visibility: String,
    pub cv_path: Option<String>,
    pub seniority_years: Option<i32>,
    pub remote_ok: bool,
    pub relocation_ok: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Experience {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub title: String,
    pub company: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Study {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub school: String,
    pub degree: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LanguageSkill {
    pub candidate_id: Uuid,
    pub code: String,
    pub level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cefr_parse_normalizes_case() {
        assert_eq!(CefrLevel::parse("b2"), Some(CefrLevel::B2));
        assert_eq!(CefrLevel::parse(" C1 "), Some(CefrLevel::C1));
        assert_eq!(CefrLevel::parse("D1"), None);
        assert_eq!(CefrLevel::parse(""), None);
    }

    #[test]
    fn cefr_levels_are_ordered() {
        assert!(CefrLevel::A1 < CefrLevel::C2);
        assert!(CefrLevel::B2 > CefrLevel::B1);
    }

    #[test]
    fn private_profiles_only_visible_to_owner() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        assert!(Visibility::Private.visible_to(owner, Some(owner)));
        assert!(!Visibility::Private.visible_to(owner, Some(stranger)));
        assert!(!Visibility::Private.visible_to(owner, None));
        assert!(Visibility::Anonymized.visible_to(owner, None));
        assert!(Visibility::Public.visible_to(owner, None));
    }
}
