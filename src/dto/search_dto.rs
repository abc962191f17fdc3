use crate::models::candidate::CefrLevel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw query string as received on `GET /api/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub sort: Option<String>,
    pub min_years: Option<String>,
    pub language_code: Option<String>,
    pub language_min_level: Option<String>,
    pub remote_ok: Option<String>,
    pub relocation_ok: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Relevance,
    Likes,
    Recent,
}

impl SortOrder {
    fn parse(value: &str) -> Self {
        match value {
            "likes" => SortOrder::Likes,
            "recent" => SortOrder::Recent,
            _ => SortOrder::Relevance,
        }
    }
}

/// Normalized filter set handed to the search engine. Out-of-range and
/// out-of-enum inputs are clamped or dropped here, at the boundary.
#[derive(Debug, Clone)]
pub struct SearchFilters {
    pub q: Option<String>,
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub sort: SortOrder,
    pub min_years: i32,
    pub language_code: Option<String>,
    pub language_min_level: Option<CefrLevel>,
    pub remote_ok: Option<bool>,
    pub relocation_ok: Option<bool>,
}

fn parse_csv(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn flag_true(value: Option<&String>) -> Option<bool> {
    match value.map(|v| v.trim().to_lowercase()) {
        Some(ref v) if v == "true" => Some(true),
        _ => None,
    }
}

impl SearchFilters {
    pub fn from_params(params: &SearchParams) -> Self {
        // Numeric parse is float-tolerant: "3.5" means 3, not unparsable.
        let min_years = params
            .min_years
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 50.0) as i32)
            .unwrap_or(0);

        Self {
            q: non_empty(params.q.as_ref()),
            skills: parse_csv(params.skills.as_deref()),
            location: non_empty(params.location.as_ref()),
            sort: SortOrder::parse(params.sort.as_deref().unwrap_or("relevance").trim()),
            min_years,
            language_code: non_empty(params.language_code.as_ref()),
            language_min_level: params
                .language_min_level
                .as_deref()
                .and_then(CefrLevel::parse),
            remote_ok: flag_true(params.remote_ok.as_ref()),
            relocation_ok: flag_true(params.relocation_ok.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRef {
    pub code: String,
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: Uuid,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub skills: Vec<String>,
    pub likes_count: i64,
    pub score: f64,
    pub seniority_years: Option<i32>,
    pub remote_ok: bool,
    pub relocation_ok: bool,
    pub languages: Vec<LanguageRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let mut p = SearchParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "q" => p.q = v,
                "skills" => p.skills = v,
                "location" => p.location = v,
                "sort" => p.sort = v,
                "min_years" => p.min_years = v,
                "language_code" => p.language_code = v,
                "language_min_level" => p.language_min_level = v,
                "remote_ok" => p.remote_ok = v,
                "relocation_ok" => p.relocation_ok = v,
                _ => unreachable!(),
            }
        }
        p
    }

    #[test]
    fn unknown_sort_defaults_to_relevance() {
        let f = SearchFilters::from_params(&params(&[("sort", "newest")]));
        assert_eq!(f.sort, SortOrder::Relevance);
        let f = SearchFilters::from_params(&params(&[("sort", "likes")]));
        assert_eq!(f.sort, SortOrder::Likes);
    }

    #[test]
    fn min_years_is_clamped_and_tolerant() {
        assert_eq!(
            SearchFilters::from_params(&params(&[("min_years", "120")])).min_years,
            50
        );
        assert_eq!(
            SearchFilters::from_params(&params(&[("min_years", "-3")])).min_years,
            0
        );
        assert_eq!(
            SearchFilters::from_params(&params(&[("min_years", "abc")])).min_years,
            0
        );
        assert_eq!(
            SearchFilters::from_params(&params(&[("min_years", "7")])).min_years,
            7
        );
        assert_eq!(
            SearchFilters::from_params(&params(&[("min_years", "3.5")])).min_years,
            3
        );
        assert_eq!(
            SearchFilters::from_params(&params(&[("min_years", "NaN")])).min_years,
            0
        );
    }

    #[test]
    fn invalid_language_level_drops_the_filter() {
        let f = SearchFilters::from_params(&params(&[("language_min_level", "b2")]));
        assert_eq!(f.language_min_level, Some(CefrLevel::B2));
        let f = SearchFilters::from_params(&params(&[("language_min_level", "Z9")]));
        assert_eq!(f.language_min_level, None);
    }

    #[test]
    fn skills_csv_trims_and_skips_blanks() {
        let f = SearchFilters::from_params(&params(&[("skills", " react, ts,,go ")]));
        assert_eq!(f.skills, vec!["react", "ts", "go"]);
        let f = SearchFilters::from_params(&params(&[]));
        assert!(f.skills.is_empty());
    }

    #[test]
    fn remote_flag_only_set_when_literally_true() {
        assert_eq!(
            SearchFilters::from_params(&params(&[("remote_ok", "TRUE")])).remote_ok,
            Some(true)
        );
        assert_eq!(
            SearchFilters::from_params(&params(&[("remote_ok", "1")])).remote_ok,
            None
        );
        assert_eq!(
            SearchFilters::from_params(&params(&[("remote_ok", "false")])).remote_ok,
            None
        );
    }
}
