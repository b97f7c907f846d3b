//! Integration tests for the watch log repositories.
//!
//! Exercises the full persistence path against a real database:
//! - Append-only segment and seek storage in insertion order
//! - Write-once reached checkpoints
//! - Tracker flushes through `PgProgressSink`
//! - Validation over reloaded rows
//! - Completion upserts

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use lms_core::types::{DbId, Timestamp};
use lms_core::watch::records::{CheckpointRecord, ProgressLog, SeekEvent, WatchSegment};
use lms_core::watch::tracker::ProgressTracker;
use lms_core::watch::validator::validate_progress;
use lms_db::models::session::CreateSession;
use lms_db::repositories::{
    CompletionRepo, ProgressLogRepo, SeekEventRepo, SessionRepo, WatchCheckpointRepo,
    WatchSegmentRepo,
};
use lms_db::sink::PgProgressSink;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const USER: DbId = 42;

fn at(secs: i64) -> Timestamp {
    Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
}

async fn new_session(pool: &PgPool, duration: Option<f64>) -> DbId {
    SessionRepo::create(
        pool,
        &CreateSession {
            title: "Ownership and borrowing".to_string(),
            video_duration_secs: duration,
        },
    )
    .await
    .unwrap()
    .id
}

fn checkpoint(time: f64, is_natural: bool) -> CheckpointRecord {
    CheckpointRecord {
        checkpoint_time: time,
        is_natural,
        reached_at: at(time as i64),
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_lookup(pool: PgPool) {
    let id = new_session(&pool, None).await;

    let session = SessionRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(session.title, "Ownership and borrowing");
    assert_eq!(session.video_duration_secs, None);

    assert!(SessionRepo::find_by_id(&pool, id + 1000).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn flushes_append_in_order(pool: PgPool) {
    let session_id = new_session(&pool, Some(600.0)).await;

    let first = ProgressLog {
        segments: vec![WatchSegment::new(0.0, 30.0, 1.0)],
        checkpoints: vec![],
        seeks: vec![SeekEvent::new(30.0, 100.0, at(30))],
    };
    let second = ProgressLog {
        segments: vec![
            WatchSegment::new(100.0, 101.0, 1.0),
            WatchSegment::new(0.0, 30.0, 0.3),
        ],
        checkpoints: vec![],
        seeks: vec![SeekEvent::new(101.0, 0.0, at(32))],
    };

    let summary = ProgressLogRepo::save(&pool, session_id, USER, &first).await.unwrap();
    assert_eq!(summary.segments_written, 1);
    assert_eq!(summary.seeks_written, 1);
    ProgressLogRepo::save(&pool, session_id, USER, &second).await.unwrap();

    let log = ProgressLogRepo::load(&pool, session_id, USER).await.unwrap();
    assert_eq!(
        log.segments,
        vec![
            WatchSegment::new(0.0, 30.0, 1.0),
            WatchSegment::new(100.0, 101.0, 1.0),
            WatchSegment::new(0.0, 30.0, 0.3),
        ]
    );
    let jumps: Vec<f64> = log.seeks.iter().map(|s| s.jump_amount).collect();
    assert_eq!(jumps, vec![70.0, -101.0]);
    assert_eq!(log.seeks[0].timestamp, at(30));

    // Another user's log is separate.
    let other = ProgressLogRepo::load(&pool, session_id, USER + 1).await.unwrap();
    assert!(other.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reached_checkpoints_are_write_once(pool: PgPool) {
    let session_id = new_session(&pool, Some(180.0)).await;

    let unnatural = ProgressLog {
        checkpoints: vec![checkpoint(60.0, false)],
        ..Default::default()
    };
    let natural = ProgressLog {
        checkpoints: vec![checkpoint(60.0, true), checkpoint(120.0, true)],
        ..Default::default()
    };

    let first = ProgressLogRepo::save(&pool, session_id, USER, &unnatural).await.unwrap();
    let second = ProgressLogRepo::save(&pool, session_id, USER, &natural).await.unwrap();

    assert_eq!(first.checkpoints_written, 1);
    assert_eq!(second.checkpoints_written, 1);

    let mut conn = pool.acquire().await.unwrap();
    let rows = WatchCheckpointRepo::list_for_user(&mut conn, session_id, USER)
        .await
        .unwrap();
    let stored: Vec<(f64, bool)> = rows.iter().map(|r| (r.checkpoint_time, r.is_natural)).collect();
    assert_eq!(stored, vec![(60.0, false), (120.0, true)]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_flush_writes_nothing(pool: PgPool) {
    let missing_session = 9_999;
    let log = ProgressLog {
        segments: vec![WatchSegment::new(0.0, 10.0, 1.0)],
        ..Default::default()
    };

    let result = ProgressLogRepo::save(&pool, missing_session, USER, &log).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM watch_segments")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn load_sees_only_committed_flushes(pool: PgPool) {
    let session_id = new_session(&pool, Some(600.0)).await;

    let mut tx = pool.begin().await.unwrap();
    WatchSegmentRepo::insert_many(
        &mut tx,
        session_id,
        USER,
        &[WatchSegment::new(0.0, 30.0, 1.0)],
    )
    .await
    .unwrap();
    SeekEventRepo::insert_many(&mut tx, session_id, USER, &[SeekEvent::new(30.0, 100.0, at(30))])
        .await
        .unwrap();

    let during = ProgressLogRepo::load(&pool, session_id, USER).await.unwrap();
    assert!(during.is_empty());

    tx.commit().await.unwrap();

    let after = ProgressLogRepo::load(&pool, session_id, USER).await.unwrap();
    assert_eq!(after.segments.len(), 1);
    assert_eq!(after.seeks.len(), 1);
}

// ---------------------------------------------------------------------------
// Tracker -> storage -> validator
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn tracker_flushes_validate_server_side(pool: PgPool) {
    let session_id = new_session(&pool, Some(180.0)).await;
    let sink = PgProgressSink::new(pool.clone());
    let mut tracker = ProgressTracker::new(session_id, USER, 180.0);

    tracker.on_play(0.0);
    for second in 1..=180_i32 {
        tracker.on_time_update(f64::from(second));
        if second % 60 == 0 {
            assert!(tracker.save_progress(&sink).await);
        }
    }
    tracker.on_pause(180.0);
    assert!(tracker.save_progress(&sink).await);
    assert!(tracker.is_valid_for_completion());

    let log = ProgressLogRepo::load(&pool, session_id, USER).await.unwrap();
    // Timestamps lose sub-microsecond precision in storage; compare the rest.
    let local = tracker.progress_data();
    assert_eq!(log.segments, local.segments);
    assert_eq!(log.checkpoints.len(), local.checkpoints.len());
    assert!(log.seeks.is_empty());

    let verdict = validate_progress(180.0, &log).unwrap();
    assert!(verdict.is_valid);
    assert_eq!(verdict.watched_percentage, 100);
    assert_eq!(verdict.details.segment_count, 180);

    let reloaded = ProgressLogRepo::load(&pool, session_id, USER).await.unwrap();
    assert_eq!(validate_progress(180.0, &reloaded).unwrap(), verdict);
}

// ---------------------------------------------------------------------------
// Completions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn completion_upsert_keeps_one_row(pool: PgPool) {
    let session_id = new_session(&pool, Some(600.0)).await;
    let log = ProgressLog {
        segments: vec![WatchSegment::new(0.0, 600.0, 1.0)],
        checkpoints: [180.0, 360.0, 540.0, 570.0]
            .into_iter()
            .map(|t| checkpoint(t, true))
            .collect(),
        seeks: vec![],
    };
    let verdict = validate_progress(600.0, &log).unwrap();
    assert!(verdict.is_valid);

    let first = CompletionRepo::record(&pool, session_id, USER, &verdict).await.unwrap();
    let second = CompletionRepo::record(&pool, session_id, USER, &verdict).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.completed_at, second.completed_at);
    assert_eq!(second.watched_percentage, 100);
    assert_eq!(second.checkpoint_score, 100);
    assert_eq!(second.verdict["isValid"], true);

    let found = CompletionRepo::find(&pool, session_id, USER).await.unwrap();
    assert_eq!(found.map(|c| c.id), Some(first.id));
    assert!(CompletionRepo::find(&pool, session_id, USER + 1).await.unwrap().is_none());
}
