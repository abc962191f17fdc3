use crate::dto::search_dto::{LanguageRef, SearchFilters, SearchItem, SortOrder};
use crate::error::Result;
use crate::services::fallback::{with_fallback, Served};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Candidate search with a delegated ranking procedure as the primary path
/// and a deterministic in-process heuristic as the fallback.
#[derive(Clone)]
pub struct SearchService {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct RankedRow {
    id: Uuid,
    headline: Option<String>,
    location: Option<String>,
    skills: Vec<String>,
    likes_count: i64,
    score: f64,
    seniority_years: Option<i32>,
    remote_ok: bool,
    relocation_ok: bool,
    languages: serde_json::Value,
}

#[derive(Debug, Clone, FromRow)]
struct EligibleRow {
    id: Uuid,
    headline: Option<String>,
    location: Option<String>,
    about: Option<String>,
    skills: Vec<String>,
    seniority_years: Option<i32>,
    remote_ok: bool,
    relocation_ok: bool,
}

/// The fallback never returns more than this many candidates; the primary
/// procedure controls its own cap.
const FALLBACK_LIMIT: i64 = 50;
const LANGUAGE_FETCH_CAP: i64 = 2000;

impl SearchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<Served<Vec<SearchItem>>> {
        with_fallback(
            "search_candidates",
            self.ranked_search(filters),
            self.fallback_search(filters),
        )
        .await
    }

    /// Primary path: the ranking procedure applies every filter and owns
    /// ordering and score.
    async fn ranked_search(&self, filters: &SearchFilters) -> Result<Vec<SearchItem>> {
        let sort = match filters.sort {
            SortOrder::Likes => "likes",
            SortOrder::Recent => "recent",
            SortOrder::Relevance => "relevance",
        };
        let rows = sqlx::query_as::<_, RankedRow>(
            r#"
            SELECT id, headline, location, skills, likes_count, score,
                   seniority_years, remote_ok, relocation_ok, languages
            FROM search_candidates($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&filters.q)
        .bind(&filters.skills)
        .bind(&filters.location)
        .bind(sort)
        .bind(filters.min_years)
        .bind(&filters.language_code)
        .bind(filters.language_min_level.map(|l| l.as_str()))
        .bind(filters.remote_ok)
        .bind(filters.relocation_ok)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let languages = parse_languages(&row.languages);
                SearchItem {
                    id: row.id,
                    headline: row.headline,
                    location: row.location,
                    skills: row.skills,
                    likes_count: row.likes_count,
                    score: row.score,
                    seniority_years: row.seniority_years,
                    remote_ok: row.remote_ok,
                    relocation_ok: row.relocation_ok,
                    languages,
                }
            })
            .collect())
    }

    /// Fallback path. Applies only the text, skill and location filters;
    /// min_years, language and remote/relocation filters are silently
    /// ignored here. Only the ranking procedure applies the full set.
    async fn fallback_search(&self, filters: &SearchFilters) -> Result<Vec<SearchItem>> {
        let candidates = sqlx::query_as::<_, EligibleRow>(
            r#"
            SELECT id, headline, location, about, skills,
                   seniority_years, remote_ok, relocation_ok
            FROM candidates
            WHERE visibility IN ('public', 'anonymized')
              AND ($1::text IS NULL OR headline ILIKE '%' || $1 || '%' OR about ILIKE '%' || $1 || '%')
              AND (cardinality($2::text[]) = 0 OR skills && $2)
              AND ($3::text IS NULL OR location ILIKE '%' || $3 || '%')
            LIMIT $4
            "#,
        )
        .bind(&filters.q)
        .bind(&filters.skills)
        .bind(&filters.location)
        .bind(FALLBACK_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        // One count per candidate; a known latency cost, bounded by the
        // fallback limit.
        let mut items = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let (likes,): (i64,) =
                sqlx::query_as("SELECT COUNT(*) FROM candidate_likes WHERE candidate_id = $1")
                    .bind(candidate.id)
                    .fetch_one(&self.pool)
                    .await?;
            let score = heuristic_score(
                filters.q.as_deref(),
                &filters.skills,
                filters.location.as_deref(),
                candidate,
                likes,
            );
            items.push(SearchItem {
                id: candidate.id,
                headline: candidate.headline.clone(),
                location: candidate.location.clone(),
                skills: candidate.skills.clone(),
                likes_count: likes,
                score,
                seniority_years: candidate.seniority_years,
                remote_ok: candidate.remote_ok,
                relocation_ok: candidate.relocation_ok,
                languages: Vec::new(),
            });
        }

        self.attach_languages(&mut items).await?;
        sort_items(&mut items, filters.sort);
        Ok(items)
    }

    async fn attach_languages(&self, items: &mut [SearchItem]) -> Result<()> {
        let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        if ids.is_empty() {
            return Ok(());
        }
        let rows: Vec<(Uuid, String, String)> = sqlx::query_as(
            r#"
            SELECT candidate_id, code, level FROM candidate_languages
            WHERE candidate_id = ANY($1)
            LIMIT $2
            "#,
        )
        .bind(&ids)
        .bind(LANGUAGE_FETCH_CAP)
        .fetch_all(&self.pool)
        .await?;

        for (candidate_id, code, level) in rows {
            if let Some(item) = items.iter_mut().find(|i| i.id == candidate_id) {
                item.languages.push(LanguageRef {
                    code,
                    level: level.to_uppercase(),
                });
            }
        }
        Ok(())
    }
}

fn parse_languages(value: &serde_json::Value) -> Vec<LanguageRef> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|l| {
                    Some(LanguageRef {
                        code: l.get("code")?.as_str()?.to_string(),
                        level: l.get("level")?.as_str()?.to_uppercase(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Heuristic relevance score for the fallback path:
/// headline hit 1.0, about hit 0.6, skill overlap up to 0.8 (0.2 each),
/// location hit 0.2, likes up to 2.0 (0.05 each), plus 0.1 per non-empty
/// profile field.
fn heuristic_score(
    q: Option<&str>,
    wanted_skills: &[String],
    location: Option<&str>,
    candidate: &EligibleRow,
    likes: i64,
) -> f64 {
    let mut score = 0.0;

    if let Some(q) = q {
        let needle = q.to_lowercase();
        let headline = candidate.headline.as_deref().unwrap_or("").to_lowercase();
        let about = candidate.about.as_deref().unwrap_or("").to_lowercase();
        if headline.contains(&needle) {
            score += 1.0;
        }
        if about.contains(&needle) {
            score += 0.6;
        }
    }

    if !wanted_skills.is_empty() && !candidate.skills.is_empty() {
        let matched = candidate
            .skills
            .iter()
            .filter(|s| wanted_skills.contains(s))
            .count();
        score += f64::min(0.8, matched as f64 * 0.2);
    }

    if let Some(location_filter) = location {
        let loc = candidate.location.as_deref().unwrap_or("").to_lowercase();
        if loc.contains(&location_filter.to_lowercase()) {
            score += 0.2;
        }
    }

    score += f64::min(2.0, likes as f64 * 0.05);

    let completeness = candidate.headline.as_deref().map_or(0, |h| i32::from(!h.is_empty()))
        + candidate.location.as_deref().map_or(0, |l| i32::from(!l.is_empty()))
        + i32::from(!candidate.skills.is_empty())
        + candidate.about.as_deref().map_or(0, |a| i32::from(!a.is_empty()));
    score += completeness as f64 * 0.1;

    score
}

fn sort_items(items: &mut [SearchItem], sort: SortOrder) {
    match sort {
        SortOrder::Likes => items.sort_by(|a, b| b.likes_count.cmp(&a.likes_count)),
        // The fallback has no recency data; leave the fetched order.
        SortOrder::Recent => {}
        SortOrder::Relevance => items.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(
        headline: &str,
        about: &str,
        location: &str,
        skills: &[&str],
    ) -> EligibleRow {
        EligibleRow {
            id: Uuid::new_v4(),
            headline: (!headline.is_empty()).then(|| headline.to_string()),
            location: (!location.is_empty()).then(|| location.to_string()),
            about: (!about.is_empty()).then(|| about.to_string()),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            seniority_years: None,
            remote_ok: false,
            relocation_ok: false,
        }
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn skill_overlap_is_monotonic_and_capped() {
        let wanted = skills(&["a", "b", "c", "d", "e"]);
        let mut previous = -1.0;
        for n in 0..=5 {
            let have: Vec<&str> = ["a", "b", "c", "d", "e"][..n].to_vec();
            let c = candidate("", "", "", &have);
            let s = heuristic_score(None, &wanted, None, &c, 0);
            assert!(s >= previous, "score decreased at overlap {}", n);
            previous = s;
        }
        // Four and five matches both hit the 0.8 cap.
        let c4 = candidate("", "", "", &["a", "b", "c", "d"]);
        let c5 = candidate("", "", "", &["a", "b", "c", "d", "e"]);
        let s4 = heuristic_score(None, &wanted, None, &c4, 0);
        let s5 = heuristic_score(None, &wanted, None, &c5, 0);
        assert!((s4 - s5).abs() < 1e-9);
        // 0.8 overlap + 0.1 skills-non-empty completeness.
        assert!((s4 - 0.9).abs() < 1e-9);
    }

    #[test]
    fn headline_match_outranks_skill_only_match() {
        // Worked example: A (headline "React", skills overlap, 10 likes)
        // must rank above B (no text match, same skill overlap, 0 likes).
        let a = candidate("Senior React developer", "", "", &["ts", "go"]);
        let b = candidate("Backend", "", "", &["ts"]);
        let wanted = skills(&["ts"]);
        let score_a = heuristic_score(Some("react"), &wanted, None, &a, 10);
        let score_b = heuristic_score(Some("react"), &wanted, None, &b, 0);
        assert!(score_a > score_b);
        // A: 1.0 headline + 0.2 skills + 0.5 likes + 0.2 completeness
        assert!((score_a - 1.9).abs() < 1e-9);
        // B: 0.2 skills + 0.2 completeness
        assert!((score_b - 0.4).abs() < 1e-9);
    }

    #[test]
    fn query_match_is_case_insensitive() {
        let c = candidate("React Engineer", "I write TypeScript", "Paris", &[]);
        let s = heuristic_score(Some("REACT"), &[], None, &c, 0);
        // 1.0 headline + completeness (headline, location, about)
        assert!((s - 1.3).abs() < 1e-9);
    }

    #[test]
    fn likes_contribution_caps_at_two() {
        let c = candidate("", "", "", &[]);
        let s_many = heuristic_score(None, &[], None, &c, 1000);
        let s_forty = heuristic_score(None, &[], None, &c, 40);
        assert!((s_many - s_forty).abs() < 1e-9);
        assert!((s_many - 2.0).abs() < 1e-9);
    }

    #[test]
    fn location_match_adds_fixed_bonus() {
        let c = candidate("", "", "Lyon, France", &[]);
        let with = heuristic_score(None, &[], Some("lyon"), &c, 0);
        let without = heuristic_score(None, &[], Some("berlin"), &c, 0);
        assert!((with - without - 0.2).abs() < 1e-9);
    }

    #[test]
    fn sort_by_likes_descending() {
        let mut items: Vec<SearchItem> = [3i64, 10, 1]
            .iter()
            .map(|likes| SearchItem {
                id: Uuid::new_v4(),
                headline: None,
                location: None,
                skills: vec![],
                likes_count: *likes,
                score: 0.0,
                seniority_years: None,
                remote_ok: false,
                relocation_ok: false,
                languages: vec![],
            })
            .collect();
        sort_items(&mut items, SortOrder::Likes);
        let likes: Vec<i64> = items.iter().map(|i| i.likes_count).collect();
        assert_eq!(likes, vec![10, 3, 1]);
    }

    #[test]
    fn recent_sort_keeps_fetch_order() {
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let mut items: Vec<SearchItem> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| SearchItem {
                id: *id,
                headline: None,
                location: None,
                skills: vec![],
                likes_count: 0,
                score: i as f64,
                seniority_years: None,
                remote_ok: false,
                relocation_ok: false,
                languages: vec![],
            })
            .collect();
        sort_items(&mut items, SortOrder::Recent);
        let order: Vec<Uuid> = items.iter().map(|i| i.id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn rpc_language_payload_is_normalized() {
        let value = serde_json::json!([
            {"code": "fr", "level": "c1"},
            {"code": "en", "level": "B2"},
            {"bad": true}
        ]);
        let langs = parse_languages(&value);
        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].level, "C1");
        assert_eq!(langs[1].code, "en");
        assert!(parse_languages(&serde_json::Value::Null).is_empty());
    }
}
