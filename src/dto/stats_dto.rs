use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatsQuery {
    pub days: Option<String>,
}

impl StatsQuery {
    /// Window is 7 or 30 days; anything else collapses to 7.
    pub fn window_days(&self) -> i64 {
        match self
            .days
            .as_deref()
            .map(str::trim)
            .and_then(|v| v.parse::<i64>().ok())
        {
            Some(30) => 30,
            _ => 7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RecruiterStats {
    pub favorites_added: i64,
    pub profiles_viewed: i64,
    pub contact_requests_sent: i64,
    pub contact_requests_approved: i64,
    pub acceptance_rate: i64,
    pub avg_time_to_decision: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TimeseriesPoint {
    pub date: String,
    pub favorites_added: i64,
    pub profiles_viewed: i64,
    pub contact_requests_sent: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub stats: RecruiterStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeseriesResponse {
    pub items: Vec<TimeseriesPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_days_only_accepts_7_or_30() {
        let q = |v: &str| StatsQuery {
            days: Some(v.to_string()),
        };
        assert_eq!(q("30").window_days(), 30);
        assert_eq!(q("7").window_days(), 7);
        assert_eq!(q("14").window_days(), 7);
        assert_eq!(q("abc").window_days(), 7);
        assert_eq!(StatsQuery::default().window_days(), 7);
    }
}
