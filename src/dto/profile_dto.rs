use crate::models::candidate::{Experience, LanguageSkill, Study};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceInput {
    pub title: String,
    pub company: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyInput {
    pub school: String,
    pub degree: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInput {
    pub code: String,
    pub level: String,
}

/// Full profile save. Child collections follow replace-all semantics:
/// the stored experiences, studies and languages are swapped wholesale
/// for what this payload carries.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SaveProfilePayload {
    #[validate(length(min = 1, message = "headline is required"))]
    pub headline: String,
    pub location: Option<String>,
    pub about: Option<String>,
    /// Comma separated, as typed in the form.
    pub skills: Option<String>,
    pub visibility: Option<String>,
    pub cv_path: Option<String>,
    #[serde(default)]
    pub remote_ok: bool,
    #[serde(default)]
    pub relocation_ok: bool,
    #[serde(default)]
    pub experiences: Vec<ExperienceInput>,
    #[serde(default)]
    pub studies: Vec<StudyInput>,
    #[serde(default)]
    pub languages: Vec<LanguageInput>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecruiterProfilePayload {
    pub company: String,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub id: Uuid,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub about: Option<String>,
    pub skills: Vec<String>,
    pub visibility: String,
    pub seniority_years: Option<i32>,
    pub remote_ok: bool,
    pub relocation_ok: bool,
    pub has_cv: bool,
    pub likes_count: i64,
    pub liked_by_me: bool,
    pub experiences: Vec<Experience>,
    pub studies: Vec<Study>,
    pub languages: Vec<LanguageSkill>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub candidate_id: Uuid,
    pub headline: Option<String>,
    pub likes_count: i64,
    pub views_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignedCvUrl {
    pub url: String,
    pub expires_at: i64,
}
