//! Activity log appends, active-user windows, and retention.

use chrono::{Duration, NaiveDate, Utc};
use packrat_core::{ActivityKind, ActivityRepository, AnalyticsRepository};
use packrat_db::test_fixtures::{seed_activity_at, seed_user_at, TestDatabase};

#[tokio::test]
async fn test_record_appends_raw_action_strings() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    db.activity
        .record(1, ActivityKind::BotStarted, None)
        .await
        .unwrap();
    db.activity
        .record(1, ActivityKind::NoteCreated, Some("note_id:7"))
        .await
        .unwrap();

    let actions: Vec<String> =
        sqlx::query_scalar("SELECT action FROM activity_log WHERE user_id = 1 ORDER BY log_id")
            .fetch_all(&db.pool)
            .await
            .unwrap();
    assert_eq!(
        actions,
        vec!["bot_started".to_string(), "note_created".to_string()]
    );

    let details: Option<String> = sqlx::query_scalar(
        "SELECT details FROM activity_log WHERE user_id = 1 ORDER BY log_id DESC LIMIT 1",
    )
    .fetch_one(&db.pool)
    .await
    .unwrap();
    assert_eq!(details.as_deref(), Some("note_id:7"));
}

#[tokio::test]
async fn test_active_users_respects_window() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let now = Utc::now().naive_utc();
    seed_activity_at(db, 1, "view_notes", now - Duration::days(3)).await;
    seed_activity_at(db, 2, "view_notes", now - Duration::days(20)).await;
    seed_activity_at(db, 3, "view_notes", now - Duration::days(40)).await;

    // Several entries from one user still count once.
    seed_activity_at(db, 1, "note_created", now - Duration::days(2)).await;

    assert_eq!(db.analytics.active_users(7).await.unwrap(), 1);
    assert_eq!(db.analytics.active_users(30).await.unwrap(), 2);
}

#[tokio::test]
async fn test_active_users_counts_retired_actions() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    // An entry written by an older vocabulary version still marks the
    // user active; the window query never parses the action.
    let now = Utc::now().naive_utc();
    seed_activity_at(db, 9, "old_feature_used", now - Duration::days(1)).await;

    assert_eq!(db.analytics.active_users(7).await.unwrap(), 1);
}

#[tokio::test]
async fn test_retention_requires_two_distinct_days() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let registered = NaiveDate::from_ymd_opt(2023, 12, 20)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    seed_user_at(db, 1, registered).await;
    seed_user_at(db, 2, registered).await;

    // User 1 came back two days later: returning.
    let day_one = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let day_three = NaiveDate::from_ymd_opt(2024, 1, 3)
        .unwrap()
        .and_hms_opt(21, 30, 0)
        .unwrap();
    seed_activity_at(db, 1, "bot_started", day_one).await;
    seed_activity_at(db, 1, "view_notes", day_three).await;

    // User 2 was busy, but only on one calendar day: not returning.
    seed_activity_at(db, 2, "bot_started", day_one).await;
    seed_activity_at(db, 2, "note_created", day_one + Duration::hours(5)).await;

    let retention = db.analytics.retention().await.unwrap();
    assert_eq!(retention.total_users, 2);
    assert_eq!(retention.returning_users, 1);
    assert!((retention.retention_rate - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_retention_on_empty_store() {
    let test_db = TestDatabase::new().await;

    let retention = test_db.db.analytics.retention().await.unwrap();
    assert_eq!(retention.total_users, 0);
    assert_eq!(retention.returning_users, 0);
    assert_eq!(retention.retention_rate, 0.0);
}
