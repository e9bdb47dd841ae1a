//! Usage aggregation for the dashboard charts.
//!
//! Each aggregate is a single pass over the loaded rows, grouping by a key
//! and summing `duration_minutes`. Rows without a duration (open intervals)
//! are skipped, so in-progress sessions never skew totals or averages.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::timestamp::DisplayZone;
use crate::types::Timestamp;

/// One usage-log row as seen by the aggregators.
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub content_name: String,
    pub device_id: Option<String>,
    pub username: Option<String>,
    pub start_time: Timestamp,
    pub duration_minutes: Option<i64>,
}

/// One login-session row as seen by the aggregators.
#[derive(Debug, Clone, Copy)]
pub struct SessionRecord {
    pub login_time: Timestamp,
    pub logout_time: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentUsageStats {
    pub content_name: String,
    pub total_usage_minutes: i64,
    pub usage_count: i64,
    pub avg_usage_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceUsageStats {
    pub device_id: String,
    pub total_usage_minutes: i64,
    pub session_count: i64,
    pub last_used: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserUsageStats {
    pub username: String,
    pub total_usage_minutes: i64,
    pub session_count: i64,
    pub last_used: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLoginCount {
    pub date: NaiveDate,
    /// `M/D` label for chart axes.
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginSessionStats {
    pub total_sessions: i64,
    pub active_sessions: i64,
    pub completed_sessions: i64,
    pub avg_session_minutes: f64,
    pub monthly_logins: i64,
    pub daily_average_logins: i64,
    /// Monday through Sunday of the current week.
    pub weekly_logins: Vec<DailyLoginCount>,
}

/// Running totals for one group key.
struct Bucket {
    total: i64,
    count: i64,
    last_used: Timestamp,
}

/// Group rows with a duration by `key`, then sort by total minutes
/// descending (ties broken by key ascending).
fn aggregate<F>(rows: &[UsageRecord], key: F) -> Vec<(String, Bucket)>
where
    F: Fn(&UsageRecord) -> Option<&str>,
{
    let mut buckets: HashMap<String, Bucket> = HashMap::new();
    for row in rows {
        let (Some(minutes), Some(k)) = (row.duration_minutes, key(row)) else {
            continue;
        };
        buckets
            .entry(k.to_string())
            .and_modify(|b| {
                b.total += minutes;
                b.count += 1;
                if row.start_time > b.last_used {
                    b.last_used = row.start_time;
                }
            })
            .or_insert(Bucket {
                total: minutes,
                count: 1,
                last_used: row.start_time,
            });
    }

    let mut grouped: Vec<_> = buckets.into_iter().collect();
    grouped.sort_by(|(ka, a), (kb, b)| b.total.cmp(&a.total).then_with(|| ka.cmp(kb)));
    grouped
}

/// Per-content totals, usage counts, and averages.
pub fn content_usage_stats(rows: &[UsageRecord]) -> Vec<ContentUsageStats> {
    aggregate(rows, |r| Some(r.content_name.as_str()))
        .into_iter()
        .map(|(content_name, b)| ContentUsageStats {
            content_name,
            total_usage_minutes: b.total,
            usage_count: b.count,
            avg_usage_minutes: b.total as f64 / b.count as f64,
        })
        .collect()
}

/// Per-device totals and most recent use.
pub fn device_usage_stats(rows: &[UsageRecord]) -> Vec<DeviceUsageStats> {
    aggregate(rows, |r| r.device_id.as_deref())
        .into_iter()
        .map(|(device_id, b)| DeviceUsageStats {
            device_id,
            total_usage_minutes: b.total,
            session_count: b.count,
            last_used: b.last_used,
        })
        .collect()
}

/// Per-user totals and most recent use. Rows without a username are skipped.
pub fn user_usage_stats(rows: &[UsageRecord]) -> Vec<UserUsageStats> {
    aggregate(rows, |r| r.username.as_deref())
        .into_iter()
        .map(|(username, b)| UserUsageStats {
            username,
            total_usage_minutes: b.total,
            session_count: b.count,
            last_used: b.last_used,
        })
        .collect()
}

/// Login statistics relative to `now`, bucketed in `zone`.
pub fn login_session_stats(
    sessions: &[SessionRecord],
    now: Timestamp,
    zone: DisplayZone,
) -> LoginSessionStats {
    let today = zone.date_of(now);
    let days_in_month = days_in_month(today);
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

    let mut active = 0i64;
    let mut completed_minutes = 0.0f64;
    let mut completed = 0i64;
    let mut monthly = 0i64;
    let mut weekly = [0i64; 7];

    for s in sessions {
        match s.logout_time {
            Some(out) => {
                completed += 1;
                completed_minutes += (out - s.login_time).num_seconds().max(0) as f64 / 60.0;
            }
            None => active += 1,
        }

        let day = zone.date_of(s.login_time);
        if day.year() == today.year() && day.month() == today.month() {
            monthly += 1;
        }
        let offset = (day - week_start).num_days();
        if (0..7).contains(&offset) {
            weekly[offset as usize] += 1;
        }
    }

    let weekly_logins = (0..7)
        .map(|i| {
            let date = week_start + Duration::days(i);
            DailyLoginCount {
                date,
                label: format!("{}/{}", date.month(), date.day()),
                count: weekly[i as usize],
            }
        })
        .collect();

    LoginSessionStats {
        total_sessions: sessions.len() as i64,
        active_sessions: active,
        completed_sessions: completed,
        avg_session_minutes: if completed > 0 {
            completed_minutes / completed as f64
        } else {
            0.0
        },
        monthly_logins: monthly,
        daily_average_logins: (monthly as f64 / f64::from(days_in_month)).round() as i64,
        weekly_logins,
    }
}

fn days_in_month(date: NaiveDate) -> u32 {
    let (y, m) = (date.year(), date.month());
    let next = if m == 12 {
        NaiveDate::from_ymd_opt(y + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(y, m + 1, 1)
    };
    next.and_then(|n| n.pred_opt())
        .map(|last| last.day())
        .unwrap_or(30)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap()
    }

    fn row(content: &str, device: &str, user: Option<&str>, start: Timestamp, mins: Option<i64>) -> UsageRecord {
        UsageRecord {
            content_name: content.into(),
            device_id: Some(device.into()),
            username: user.map(Into::into),
            start_time: start,
            duration_minutes: mins,
        }
    }

    #[test]
    fn content_stats_sum_and_average() {
        let rows = vec![
            row("Ocean", "A", None, at(1, 1), Some(10)),
            row("Ocean", "B", None, at(1, 2), Some(20)),
            row("Space", "A", None, at(1, 3), Some(25)),
            row("Space", "A", None, at(1, 4), None),
        ];
        let stats = content_usage_stats(&rows);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].content_name, "Ocean");
        assert_eq!(stats[0].total_usage_minutes, 30);
        assert_eq!(stats[0].usage_count, 2);
        assert!((stats[0].avg_usage_minutes - 15.0).abs() < f64::EPSILON);
        assert_eq!(stats[1].usage_count, 1, "open interval must be skipped");
    }

    #[test]
    fn device_stats_track_latest_use() {
        let rows = vec![
            row("Ocean", "A", None, at(3, 1), Some(5)),
            row("Ocean", "A", None, at(1, 1), Some(5)),
        ];
        let stats = device_usage_stats(&rows);
        assert_eq!(stats[0].device_id, "A");
        assert_eq!(stats[0].session_count, 2);
        assert_eq!(stats[0].last_used, at(3, 1));
    }

    #[test]
    fn user_stats_skip_anonymous_rows_and_break_ties_by_name() {
        let rows = vec![
            row("Ocean", "A", Some("zoe"), at(1, 1), Some(10)),
            row("Ocean", "A", Some("amy"), at(1, 1), Some(10)),
            row("Ocean", "A", None, at(1, 1), Some(99)),
        ];
        let stats = user_usage_stats(&rows);
        let names: Vec<_> = stats.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, ["amy", "zoe"]);
    }

    #[test]
    fn login_stats_bucket_by_display_zone() {
        let zone = DisplayZone::from_hours(9);
        // Wednesday 2024-05-15 12:00 in UTC+9.
        let now = Utc.with_ymd_and_hms(2024, 5, 15, 3, 0, 0).unwrap();
        let sessions = vec![
            // Monday 2024-05-13 in zone, 30 minute session.
            SessionRecord {
                login_time: Utc.with_ymd_and_hms(2024, 5, 13, 1, 0, 0).unwrap(),
                logout_time: Some(Utc.with_ymd_and_hms(2024, 5, 13, 1, 30, 0).unwrap()),
            },
            // 2024-04-30 23:00 UTC is 2024-05-01 08:00 in zone: counts for May.
            SessionRecord {
                login_time: Utc.with_ymd_and_hms(2024, 4, 30, 23, 0, 0).unwrap(),
                logout_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            },
            // Still open, today.
            SessionRecord {
                login_time: now,
                logout_time: None,
            },
        ];

        let stats = login_session_stats(&sessions, now, zone);
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.active_sessions, 1);
        assert_eq!(stats.completed_sessions, 2);
        assert!((stats.avg_session_minutes - 45.0).abs() < 1e-9);
        assert_eq!(stats.monthly_logins, 3);
        assert_eq!(stats.daily_average_logins, 0);
        assert_eq!(stats.weekly_logins.len(), 7);
        assert_eq!(stats.weekly_logins[0].label, "5/13");
        assert_eq!(stats.weekly_logins[0].count, 1);
        assert_eq!(stats.weekly_logins[2].count, 1);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap()), 29);
        assert_eq!(days_in_month(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()), 31);
    }
}
