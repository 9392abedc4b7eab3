//! Tag attachment semantics: normalization, idempotence, missing-note
//! tolerance, popularity ranking.

use packrat_core::{Error, TagRepository};
use packrat_db::test_fixtures::{TestDataBuilder, TestDatabase};

#[tokio::test]
async fn test_add_is_idempotent_across_case_variants() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let data = TestDataBuilder::new(db, 1)
        .with_user("tagger", "Tagger")
        .await
        .with_note("plain note")
        .await
        .build()
        .await;
    let note_id = data.notes[0];

    db.tags.add(note_id, "work").await.unwrap();
    db.tags.add(note_id, "work").await.unwrap();
    db.tags.add(note_id, "Work").await.unwrap();
    db.tags.add(note_id, "WORK").await.unwrap();
    db.tags.add(note_id, "  work  ").await.unwrap();

    let tags = db.tags.for_note(note_id).await.unwrap();
    assert_eq!(tags, vec!["work".to_string()], "one row per (note, tag)");
}

#[tokio::test]
async fn test_add_rejects_empty_after_normalization() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let data = TestDataBuilder::new(db, 1)
        .with_user("tagger", "Tagger")
        .await
        .with_note("plain note")
        .await
        .build()
        .await;

    let err = db.tags.add(data.notes[0], "   ").await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_add_to_vanished_note_is_logged_noop() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db, 1)
        .with_user("tagger", "Tagger")
        .await
        .build()
        .await;

    // The note never existed; the tag is silently dropped.
    db.tags
        .add(424242, "ghost")
        .await
        .expect("Tagging a vanished note must not propagate");

    assert!(db.tags.for_note(424242).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_many_batches_and_normalizes() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    let data = TestDataBuilder::new(db, 1)
        .with_user("tagger", "Tagger")
        .await
        .with_note("batch target")
        .await
        .build()
        .await;
    let note_id = data.notes[0];

    let batch = vec![
        "Work".to_string(),
        "work".to_string(),
        " urgent ".to_string(),
        "".to_string(),
    ];
    db.tags.add_many(note_id, &batch).await.unwrap();

    let tags = db.tags.for_note(note_id).await.unwrap();
    assert_eq!(tags, vec!["urgent".to_string(), "work".to_string()]);

    // Whole batch against a vanished note is a no-op, same as single add.
    db.tags
        .add_many(424242, &batch)
        .await
        .expect("Batch against a vanished note must not propagate");
}

#[tokio::test]
async fn test_popular_orders_by_count_then_tag() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db, 1)
        .with_user("tagger", "Tagger")
        .await
        .with_tagged_note("n1", &["work", "home"])
        .await
        .with_tagged_note("n2", &["work", "errands"])
        .await
        .with_tagged_note("n3", &["work", "errands", "home"])
        .await
        .build()
        .await;

    let popular = db.tags.popular(1, 10).await.unwrap();
    let ranked: Vec<(&str, i64)> = popular
        .iter()
        .map(|t| (t.tag.as_str(), t.count))
        .collect();

    assert_eq!(
        ranked,
        vec![("work", 3), ("errands", 2), ("home", 2)],
        "count descending, ties break by tag ascending"
    );

    // The limit clips the tail.
    let top_one = db.tags.popular(1, 1).await.unwrap();
    assert_eq!(top_one.len(), 1);
    assert_eq!(top_one[0].tag, "work");
}

#[tokio::test]
async fn test_popular_is_per_owner() {
    let test_db = TestDatabase::new().await;
    let db = &test_db.db;

    TestDataBuilder::new(db, 1)
        .with_user("one", "One")
        .await
        .with_tagged_note("n", &["alpha"])
        .await
        .build()
        .await;
    TestDataBuilder::new(db, 2)
        .with_user("two", "Two")
        .await
        .with_tagged_note("n", &["beta"])
        .await
        .build()
        .await;

    let popular = db.tags.popular(1, 10).await.unwrap();
    assert_eq!(popular.len(), 1);
    assert_eq!(popular[0].tag, "alpha");
}
