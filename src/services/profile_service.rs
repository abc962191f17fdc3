use crate::dto::profile_dto::{
    CandidateView, DashboardView, ExperienceInput, SaveProfilePayload,
};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CefrLevel, Experience, LanguageSkill, Study, Visibility};
use chrono::{Local, NaiveDate};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Candidate profile persistence. Saves follow replace-all semantics for
/// the child collections and run inside one transaction so a crash cannot
/// leave a partially replaced profile.
#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn save_profile(&self, user_id: Uuid, payload: &SaveProfilePayload) -> Result<Uuid> {
        let visibility = match payload.visibility.as_deref() {
            None => Visibility::Public,
            Some(raw) => Visibility::parse(raw)
                .ok_or_else(|| Error::BadRequest(format!("invalid visibility: {}", raw)))?,
        };
        let skills: Vec<String> = payload
            .skills
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let seniority = seniority_years(&payload.experiences, Local::now().date_naive());

        let mut tx = self.pool.begin().await?;

        let (candidate_id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO candidates
                (user_id, headline, location, about, skills, visibility, cv_path,
                 seniority_years, remote_ok, relocation_ok, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                headline = EXCLUDED.headline,
                location = EXCLUDED.location,
                about = EXCLUDED.about,
                skills = EXCLUDED.skills,
                visibility = EXCLUDED.visibility,
                cv_path = COALESCE(EXCLUDED.cv_path, candidates.cv_path),
                seniority_years = EXCLUDED.seniority_years,
                remote_ok = EXCLUDED.remote_ok,
                relocation_ok = EXCLUDED.relocation_ok,
                updated_at = NOW()
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(payload.headline.trim())
        .bind(payload.location.as_deref().map(str::trim))
        .bind(payload.about.as_deref().map(str::trim))
        .bind(&skills)
        .bind(visibility.as_str())
        .bind(&payload.cv_path)
        .bind(seniority)
        .bind(payload.remote_ok)
        .bind(payload.relocation_ok)
        .fetch_one(&mut *tx)
        .await?;

        self.replace_children(&mut tx, candidate_id, payload).await?;
        tx.commit().await?;
        Ok(candidate_id)
    }

    async fn replace_children(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        candidate_id: Uuid,
        payload: &SaveProfilePayload,
    ) -> Result<()> {
        sqlx::query("DELETE FROM candidate_experiences WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut **tx)
            .await?;
        for exp in &payload.experiences {
            sqlx::query(
                r#"
                INSERT INTO candidate_experiences
                    (candidate_id, title, company, start_date, end_date, skills)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(candidate_id)
            .bind(&exp.title)
            .bind(&exp.company)
            .bind(exp.start)
            .bind(exp.end)
            .bind(&exp.skills)
            .execute(&mut **tx)
            .await?;
        }

        sqlx::query("DELETE FROM candidate_studies WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut **tx)
            .await?;
        for study in &payload.studies {
            sqlx::query(
                r#"
                INSERT INTO candidate_studies (candidate_id, school, degree, start_date, end_date)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(candidate_id)
            .bind(&study.school)
            .bind(&study.degree)
            .bind(study.start)
            .bind(study.end)
            .execute(&mut **tx)
            .await?;
        }

        sqlx::query("DELETE FROM candidate_languages WHERE candidate_id = $1")
            .bind(candidate_id)
            .execute(&mut **tx)
            .await?;
        for lang in &payload.languages {
            // Invalid CEFR levels are dropped rather than rejected.
            let Some(level) = CefrLevel::parse(&lang.level) else {
                continue;
            };
            let code = lang.code.trim().to_lowercase();
            if code.is_empty() {
                continue;
            }
            sqlx::query(
                r#"
                INSERT INTO candidate_languages (candidate_id, code, level)
                VALUES ($1, $2, $3)
                ON CONFLICT (candidate_id, code) DO UPDATE SET level = EXCLUDED.level
                "#,
            )
            .bind(candidate_id)
            .bind(code)
            .bind(level.as_str())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Public profile view. Private profiles surface as NotFound to anyone
    /// but their owner.
    pub async fn get_candidate(
        &self,
        candidate_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<CandidateView> {
        let candidate = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT id, user_id, headline, location, about, skills, visibility,
                   cv_path, seniority_years, remote_ok, relocation_ok,
                   created_at, updated_at
            FROM candidates WHERE id = $1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("candidate not found".to_string()))?;

        let visibility = Visibility::parse(&candidate.visibility).ok_or_else(|| {
            Error::Internal(format!("unknown visibility: {}", candidate.visibility))
        })?;
        if !visibility.visible_to(candidate.user_id, viewer) {
            return Err(Error::NotFound("candidate not found".to_string()));
        }

        let experiences = sqlx::query_as::<_, Experience>(
            r#"
            SELECT id, candidate_id, title, company, start_date, end_date, skills
            FROM candidate_experiences WHERE candidate_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(candidate.id)
        .fetch_all(&self.pool)
        .await?;
        let studies = sqlx::query_as::<_, Study>(
            r#"
            SELECT id, candidate_id, school, degree, start_date, end_date
            FROM candidate_studies WHERE candidate_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(candidate.id)
        .fetch_all(&self.pool)
        .await?;
        let languages = sqlx::query_as::<_, LanguageSkill>(
            "SELECT candidate_id, code, level FROM candidate_languages WHERE candidate_id = $1",
        )
        .bind(candidate.id)
        .fetch_all(&self.pool)
        .await?;

        let (likes_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM candidate_likes WHERE candidate_id = $1")
                .bind(candidate.id)
                .fetch_one(&self.pool)
                .await?;
        let liked_by_me = match viewer {
            None => false,
            Some(user_id) => {
                let liked: Option<(Uuid,)> = sqlx::query_as(
                    "SELECT id FROM candidate_likes WHERE candidate_id = $1 AND user_id = $2 LIMIT 1",
                )
                .bind(candidate.id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
                liked.is_some()
            }
        };

        Ok(CandidateView {
            id: candidate.id,
            headline: candidate.headline,
            location: candidate.location,
            about: candidate.about,
            skills: candidate.skills,
            visibility: candidate.visibility,
            seniority_years: candidate.seniority_years,
            remote_ok: candidate.remote_ok,
            relocation_ok: candidate.relocation_ok,
            has_cv: candidate.cv_path.is_some(),
            likes_count,
            liked_by_me,
            experiences,
            studies,
            languages,
        })
    }

    /// CV storage key for signing, gated by the same visibility rule as
    /// the profile itself.
    pub async fn cv_path(&self, candidate_id: Uuid, viewer: Option<Uuid>) -> Result<String> {
        let row: Option<(Uuid, String, Option<String>)> = sqlx::query_as(
            "SELECT user_id, visibility, cv_path FROM candidates WHERE id = $1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        let (owner_id, visibility_raw, cv_path) =
            row.ok_or_else(|| Error::NotFound("candidate not found".to_string()))?;
        let visibility = Visibility::parse(&visibility_raw)
            .ok_or_else(|| Error::Internal(format!("unknown visibility: {}", visibility_raw)))?;
        if !visibility.visible_to(owner_id, viewer) {
            return Err(Error::NotFound("candidate not found".to_string()));
        }
        cv_path.ok_or_else(|| Error::NotFound("no CV on file".to_string()))
    }

    pub async fn dashboard(&self, user_id: Uuid) -> Result<DashboardView> {
        let row: Option<(Uuid, Option<String>)> =
            sqlx::query_as("SELECT id, headline FROM candidates WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        let (candidate_id, headline) =
            row.ok_or_else(|| Error::NotFound("no candidate profile".to_string()))?;

        let (likes_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM candidate_likes WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?;
        let (views_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM candidate_views WHERE candidate_id = $1")
                .bind(candidate_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(DashboardView {
            candidate_id,
            headline,
            likes_count,
            views_count,
        })
    }

    pub async fn upsert_recruiter(
        &self,
        user_id: Uuid,
        company: &str,
        role: Option<&str>,
    ) -> Result<()> {
        let company = company.trim();
        if company.is_empty() {
            return Err(Error::BadRequest("company is required".to_string()));
        }
        sqlx::query(
            r#"
            INSERT INTO recruiters (user_id, company, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET company = EXCLUDED.company, role = EXCLUDED.role
            "#,
        )
        .bind(user_id)
        .bind(company)
        .bind(role.map(str::trim))
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// Derived seniority: total days covered by the experience entries
/// (open-ended ones run to today), expressed in whole years. None when
/// there is nothing to derive from.
fn seniority_years(experiences: &[ExperienceInput], today: NaiveDate) -> Option<i32> {
    if experiences.is_empty() {
        return None;
    }
    let total_days: i64 = experiences
        .iter()
        .map(|e| {
            let end = e.end.unwrap_or(today);
            (end - e.start).num_days().max(0)
        })
        .sum();
    Some((total_days as f64 / 365.25).floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(start: (i32, u32, u32), end: Option<(i32, u32, u32)>) -> ExperienceInput {
        ExperienceInput {
            title: "dev".into(),
            company: "acme".into(),
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end: end.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            skills: vec![],
        }
    }

    #[test]
    fn seniority_sums_experience_spans() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let years = seniority_years(
            &[
                exp((2018, 1, 1), Some((2021, 1, 1))),
                exp((2022, 1, 1), Some((2024, 1, 1))),
            ],
            today,
        );
        assert_eq!(years, Some(4)); // 3y + 2y, floored at 4 (leap-adjusted)
    }

    #[test]
    fn open_ended_experience_runs_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let years = seniority_years(&[exp((2020, 1, 1), None)], today);
        assert_eq!(years, Some(6));
    }

    #[test]
    fn no_experiences_means_no_derived_seniority() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(seniority_years(&[], today), None);
    }

    #[test]
    fn inverted_dates_do_not_go_negative() {
        // End-before-start is advisory-only at the edge; the derivation
        // just clamps the span to zero.
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let years = seniority_years(&[exp((2024, 1, 1), Some((2020, 1, 1)))], today);
        assert_eq!(years, Some(0));
    }
}
