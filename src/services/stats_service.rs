use crate::dto::stats_dto::{RecruiterStats, TimeseriesPoint};
use crate::error::Result;
use crate::services::fallback::{with_fallback, Served};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Recruiter-facing KPI and time-series rollups. Primary path delegates to
/// aggregation procedures; the fallback recomputes from the raw event
/// tables for the calling recruiter only.
#[derive(Clone)]
pub struct StatsService {
    pool: PgPool,
}

#[derive(Debug, Clone, FromRow)]
struct SentRequestRow {
    status: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl StatsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn stats(&self, user_id: Uuid, days: i64) -> Result<Served<RecruiterStats>> {
        with_fallback(
            "get_recruiter_stats",
            self.rpc_stats(user_id, days),
            self.fallback_stats(user_id, days),
        )
        .await
    }

    pub async fn timeseries(
        &self,
        user_id: Uuid,
        days: i64,
    ) -> Result<Served<Vec<TimeseriesPoint>>> {
        with_fallback(
            "get_recruiter_timeseries",
            self.rpc_timeseries(user_id, days),
            self.fallback_timeseries(user_id, days),
        )
        .await
    }

    async fn rpc_stats(&self, user_id: Uuid, days: i64) -> Result<RecruiterStats> {
        let stats = sqlx::query_as::<_, RecruiterStats>(
            r#"
            SELECT favorites_added, profiles_viewed, contact_requests_sent,
                   contact_requests_approved, acceptance_rate, avg_time_to_decision
            FROM get_recruiter_stats($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(days)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    async fn rpc_timeseries(&self, user_id: Uuid, days: i64) -> Result<Vec<TimeseriesPoint>> {
        let items = sqlx::query_as::<_, TimeseriesPoint>(
            r#"
            SELECT date, favorites_added, profiles_viewed, contact_requests_sent
            FROM get_recruiter_timeseries($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn fallback_stats(&self, user_id: Uuid, days: i64) -> Result<RecruiterStats> {
        let since = Utc::now() - Duration::days(days);

        let (favorites_added,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM favorites WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let (profiles_viewed,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM candidate_views WHERE viewer_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        let sent = sqlx::query_as::<_, SentRequestRow>(
            r#"
            SELECT status, created_at, updated_at FROM contact_requests
            WHERE requester_id = $1 AND created_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(compute_kpis(favorites_added, profiles_viewed, &sent))
    }

    async fn fallback_timeseries(&self, user_id: Uuid, days: i64) -> Result<Vec<TimeseriesPoint>> {
        let since = Utc::now() - Duration::days(days);

        let favorites: Vec<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT created_at FROM favorites WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        let views: Vec<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT created_at FROM candidate_views WHERE viewer_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        let sent: Vec<(DateTime<Utc>,)> = sqlx::query_as(
            "SELECT created_at FROM contact_requests WHERE requester_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        let today = Local::now().date_naive();
        Ok(bucket_daily(
            days,
            today,
            &local_dates(&favorites),
            &local_dates(&views),
            &local_dates(&sent),
        ))
    }
}

fn local_dates(rows: &[(DateTime<Utc>,)]) -> Vec<NaiveDate> {
    rows.iter()
        .map(|(ts,)| ts.with_timezone(&Local).date_naive())
        .collect()
}

fn compute_kpis(favorites_added: i64, profiles_viewed: i64, sent: &[SentRequestRow]) -> RecruiterStats {
    let contact_requests_sent = sent.len() as i64;
    let contact_requests_approved = sent.iter().filter(|r| r.status == "approved").count() as i64;
    let acceptance_rate = if contact_requests_sent > 0 {
        ((contact_requests_approved as f64 / contact_requests_sent as f64) * 100.0).round() as i64
    } else {
        0
    };

    let decided: Vec<f64> = sent
        .iter()
        .filter_map(|r| r.updated_at.map(|u| (u - r.created_at).num_seconds()))
        .map(|secs| f64::max(0.0, secs as f64 / 3600.0))
        .collect();
    let avg_time_to_decision = if decided.is_empty() {
        0.0
    } else {
        let mean = decided.iter().sum::<f64>() / decided.len() as f64;
        (mean * 10.0).round() / 10.0
    };

    RecruiterStats {
        favorites_added,
        profiles_viewed,
        contact_requests_sent,
        contact_requests_approved,
        acceptance_rate,
        avg_time_to_decision,
    }
}

/// Daily buckets over the trailing window: exactly `days` entries, one per
/// calendar date ending today, zero-filled where nothing happened. Events
/// outside the window are dropped.
fn bucket_daily(
    days: i64,
    today: NaiveDate,
    favorites: &[NaiveDate],
    views: &[NaiveDate],
    sent: &[NaiveDate],
) -> Vec<TimeseriesPoint> {
    let mut points: Vec<TimeseriesPoint> = (0..days)
        .map(|i| {
            let date = today - Duration::days(days - 1 - i);
            TimeseriesPoint {
                date: date.format("%Y-%m-%d").to_string(),
                favorites_added: 0,
                profiles_viewed: 0,
                contact_requests_sent: 0,
            }
        })
        .collect();

    let index_of = |date: &NaiveDate| -> Option<usize> {
        let offset = (*date - (today - Duration::days(days - 1))).num_days();
        (0..days).contains(&offset).then_some(offset as usize)
    };

    for date in favorites {
        if let Some(i) = index_of(date) {
            points[i].favorites_added += 1;
        }
    }
    for date in views {
        if let Some(i) = index_of(date) {
            points[i].profiles_viewed += 1;
        }
    }
    for date in sent {
        if let Some(i) = index_of(date) {
            points[i].contact_requests_sent += 1;
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent(status: &str, hours_to_decide: Option<i64>) -> SentRequestRow {
        let created = Utc::now() - Duration::days(1);
        SentRequestRow {
            status: status.to_string(),
            created_at: created,
            updated_at: hours_to_decide.map(|h| created + Duration::hours(h)),
        }
    }

    #[test]
    fn acceptance_rate_rounds_from_sent_and_approved() {
        // 4 sent, 2 approved -> 50
        let rows = vec![
            sent("approved", Some(2)),
            sent("approved", Some(4)),
            sent("declined", Some(1)),
            sent("pending", None),
        ];
        let stats = compute_kpis(5, 10, &rows);
        assert_eq!(stats.favorites_added, 5);
        assert_eq!(stats.profiles_viewed, 10);
        assert_eq!(stats.contact_requests_sent, 4);
        assert_eq!(stats.contact_requests_approved, 2);
        assert_eq!(stats.acceptance_rate, 50);
    }

    #[test]
    fn acceptance_rate_is_zero_without_sent_requests() {
        let stats = compute_kpis(0, 0, &[]);
        assert_eq!(stats.acceptance_rate, 0);
        assert_eq!(stats.avg_time_to_decision, 0.0);
    }

    #[test]
    fn avg_decision_time_uses_decided_rows_only() {
        let rows = vec![
            sent("approved", Some(2)),
            sent("declined", Some(3)),
            sent("pending", None),
        ];
        let stats = compute_kpis(0, 0, &rows);
        assert_eq!(stats.avg_time_to_decision, 2.5);
    }

    #[test]
    fn avg_decision_time_rounds_to_one_decimal() {
        let rows = vec![
            sent("approved", Some(1)),
            sent("approved", Some(2)),
            sent("approved", Some(2)),
        ];
        // mean = 1.666.. -> 1.7
        let stats = compute_kpis(0, 0, &rows);
        assert_eq!(stats.avg_time_to_decision, 1.7);
    }

    #[test]
    fn buckets_cover_exactly_the_window_zero_filled() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let points = bucket_daily(7, today, &[], &[], &[]);
        assert_eq!(points.len(), 7);
        assert_eq!(points.first().unwrap().date, "2026-08-18");
        assert_eq!(points.last().unwrap().date, "2026-08-24");
        let mut dates: Vec<&str> = points.iter().map(|p| p.date.as_str()).collect();
        dates.dedup();
        assert_eq!(dates.len(), 7);
        assert!(points.iter().all(|p| p.favorites_added == 0
            && p.profiles_viewed == 0
            && p.contact_requests_sent == 0));
    }

    #[test]
    fn events_land_in_their_day_and_stale_ones_drop() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let yesterday = today - Duration::days(1);
        let ancient = today - Duration::days(40);
        let points = bucket_daily(
            7,
            today,
            &[yesterday, yesterday, ancient],
            &[today],
            &[yesterday],
        );
        assert_eq!(points.len(), 7);
        let by_date = |d: NaiveDate| {
            points
                .iter()
                .find(|p| p.date == d.format("%Y-%m-%d").to_string())
                .unwrap()
                .clone()
        };
        assert_eq!(by_date(yesterday).favorites_added, 2);
        assert_eq!(by_date(yesterday).contact_requests_sent, 1);
        assert_eq!(by_date(today).profiles_viewed, 1);
        let total_favs: i64 = points.iter().map(|p| p.favorites_added).sum();
        assert_eq!(total_favs, 2);
    }

    #[test]
    fn thirty_day_window_has_thirty_entries() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        let points = bucket_daily(30, today, &[], &[], &[]);
        assert_eq!(points.len(), 30);
        assert_eq!(points.first().unwrap().date, "2026-02-04");
    }
}
