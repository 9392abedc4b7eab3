//! Usage report assembly.

use std::time::Instant;

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use packrat_core::{
    defaults, AnalyticsRepository, DailyCount, NoteKind, Result, RetentionStats, TagCount,
    UserNoteCount,
};

/// One content type's slice of the note corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindShare {
    pub kind: NoteKind,
    pub count: i64,
    /// Percentage of all notes; 0.0 when the store is empty.
    pub share: f64,
}

/// One language's slice of the user base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub language: String,
    pub count: i64,
    /// Percentage of all users; 0.0 when there are none.
    pub share: f64,
}

/// Point-in-time snapshot of service usage.
///
/// Everything a reporting surface needs to render the admin overview:
/// totals, activity windows, distributions with precomputed shares,
/// retention, and the leaderboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub generated_at: NaiveDateTime,
    pub total_users: i64,
    pub active_users_7d: i64,
    pub active_users_30d: i64,
    /// Seven-day active users as a percentage of all users.
    pub activity_rate: f64,
    pub total_notes: i64,
    pub avg_notes_per_user: f64,
    pub new_users_today: i64,
    pub notes_created_today: i64,
    pub notes_by_kind: Vec<KindShare>,
    pub languages: Vec<LanguageShare>,
    pub retention: RetentionStats,
    pub top_users: Vec<UserNoteCount>,
    pub top_tags: Vec<TagCount>,
}

/// Daily series for the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub window_days: i64,
    /// New users per calendar day, ascending. Days without signups are
    /// absent, not zero.
    pub user_growth: Vec<DailyCount>,
    /// Notes created per calendar day, ascending.
    pub daily_notes: Vec<DailyCount>,
}

/// Assembles [`UsageReport`] and [`TimeSeries`] from the analytics queries.
pub struct ReportBuilder<'a> {
    analytics: &'a dyn AnalyticsRepository,
    top_users_limit: i64,
    top_tags_limit: i64,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder with the default leaderboard sizes.
    pub fn new(analytics: &'a dyn AnalyticsRepository) -> Self {
        Self {
            analytics,
            top_users_limit: defaults::TOP_USERS_LIMIT,
            top_tags_limit: defaults::GLOBAL_TAGS_LIMIT,
        }
    }

    /// Set how many users the leaderboard carries.
    pub fn top_users_limit(mut self, limit: i64) -> Self {
        self.top_users_limit = limit;
        self
    }

    /// Set how many global tags the report carries.
    pub fn top_tags_limit(mut self, limit: i64) -> Self {
        self.top_tags_limit = limit;
        self
    }

    /// Build the full usage snapshot.
    pub async fn build(&self) -> Result<UsageReport> {
        let start = Instant::now();

        let total_users = self.analytics.total_users().await?;
        let total_notes = self.analytics.total_notes().await?;
        let active_users_7d = self
            .analytics
            .active_users(defaults::ACTIVE_WINDOW_SHORT_DAYS)
            .await?;
        let active_users_30d = self
            .analytics
            .active_users(defaults::ACTIVE_WINDOW_LONG_DAYS)
            .await?;

        let notes_by_kind = self
            .analytics
            .notes_by_kind()
            .await?
            .into_iter()
            .map(|k| KindShare {
                kind: k.kind,
                count: k.count,
                share: percentage(k.count, total_notes),
            })
            .collect();

        let languages = self
            .analytics
            .language_distribution()
            .await?
            .into_iter()
            .map(|l| LanguageShare {
                share: percentage(l.count, total_users),
                language: l.language,
                count: l.count,
            })
            .collect();

        let retention = self.analytics.retention().await?;
        let top_users = self.analytics.top_users(Some(self.top_users_limit)).await?;
        let top_tags = self
            .analytics
            .popular_tags_global(self.top_tags_limit)
            .await?;
        let new_users_today = self.analytics.new_users_today().await?;
        let notes_created_today = self.analytics.notes_created_today().await?;

        let report = UsageReport {
            generated_at: Utc::now().naive_utc(),
            total_users,
            active_users_7d,
            active_users_30d,
            activity_rate: percentage(active_users_7d, total_users),
            total_notes,
            avg_notes_per_user: if total_users > 0 {
                total_notes as f64 / total_users as f64
            } else {
                0.0
            },
            new_users_today,
            notes_created_today,
            notes_by_kind,
            languages,
            retention,
            top_users,
            top_tags,
        };

        info!(
            subsystem = "analytics",
            component = "report",
            op = "build",
            total_users = report.total_users,
            total_notes = report.total_notes,
            duration_ms = start.elapsed().as_millis() as u64,
            "Assembled usage report"
        );
        Ok(report)
    }

    /// Build the daily series over a trailing window.
    pub async fn time_series(&self, days: i64) -> Result<TimeSeries> {
        Ok(TimeSeries {
            window_days: days,
            user_growth: self.analytics.user_growth(days).await?,
            daily_notes: self.analytics.daily_notes(days).await?,
        })
    }
}

fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}
