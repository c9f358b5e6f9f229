//! Database layer: migrations, queries, moderation updates and seeding.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::errors::{ApiError, Result};
use crate::models::{
    Event, NewEvent, NewPrayerRequest, PrayerRequest, ReadingPlan, RequestStatus,
    DEFAULT_LOCATION,
};

const PRAYER_COLUMNS: &str =
    "id, name, message, is_public, is_approved, is_answered, is_rejected, testimony, created_at";
const EVENT_COLUMNS: &str = "id, title, description, date, time, location, event_type";
const EVENT_LIST_LIMIT: i64 = 100;
/// How long a writer waits for another connection's write lock.
const BUSY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Establish a SQLite connection pool and run pending migrations.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool> {
    connect(database_url, 5).await
}

/// Open a pool with an explicit connection cap. In-memory databases need a
/// single connection, since every connection gets its own database.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{database_url}")
    };

    // Make sure the file is created if it doesn't exist yet.
    let options = SqliteConnectOptions::from_str(&url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    info!("Database migrations applied successfully");
    Ok(pool)
}

// ─────────────────────────────────────────────────────────
// Prayer requests
// ─────────────────────────────────────────────────────────

/// Persist a new (already validated) prayer request in the `Pending` state.
pub async fn insert_prayer_request(
    pool: &SqlitePool,
    request: &NewPrayerRequest,
) -> Result<PrayerRequest> {
    let record = PrayerRequest {
        id: Uuid::new_v4().to_string(),
        name: request.name.clone(),
        message: request.message.clone(),
        is_public: request.is_public,
        is_approved: false,
        is_answered: false,
        is_rejected: false,
        testimony: None,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO prayer_requests
            (id, name, message, is_public, is_approved, is_answered, is_rejected, testimony, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&record.id)
    .bind(&record.name)
    .bind(&record.message)
    .bind(record.is_public)
    .bind(record.is_approved)
    .bind(record.is_answered)
    .bind(record.is_rejected)
    .bind(&record.testimony)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(record)
}

pub async fn get_prayer_request(pool: &SqlitePool, id: &str) -> Result<Option<PrayerRequest>> {
    let row = sqlx::query_as::<_, PrayerRequest>(&format!(
        "SELECT {PRAYER_COLUMNS} FROM prayer_requests WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// The public feed: approved, public, not rejected, newest first.
pub async fn list_public_prayer_requests(
    pool: &SqlitePool,
    limit: u32,
) -> Result<Vec<PrayerRequest>> {
    let rows = sqlx::query_as::<_, PrayerRequest>(&format!(
        r#"
        SELECT {PRAYER_COLUMNS}
        FROM   prayer_requests
        WHERE  is_public = 1 AND is_approved = 1 AND is_rejected = 0
        ORDER  BY created_at DESC
        LIMIT  ?1
        "#
    ))
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Apply a moderator decision.
///
/// The update only matches while the row still carries the flags that were
/// read, so of two moderators racing on the same request exactly one wins and
/// the other gets [`ApiError::InvalidTransition`].
pub async fn transition_prayer_request(
    pool: &SqlitePool,
    id: &str,
    next: RequestStatus,
    testimony: Option<&str>,
) -> Result<PrayerRequest> {
    let current = get_prayer_request(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Prayer request {id}")))?;

    let from = current.status();
    if !from.can_transition_to(next) {
        return Err(ApiError::InvalidTransition { from, to: next });
    }

    let testimony = match next {
        RequestStatus::Answered => testimony
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from),
        _ => current.testimony.clone(),
    };

    let updated = sqlx::query_as::<_, PrayerRequest>(&format!(
        r#"
        UPDATE prayer_requests
        SET    is_approved = ?2, is_answered = ?3, is_rejected = ?4, testimony = ?5
        WHERE  id = ?1 AND is_approved = ?6 AND is_answered = ?7 AND is_rejected = ?8
        RETURNING {PRAYER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(matches!(next, RequestStatus::Approved | RequestStatus::Answered))
    .bind(next == RequestStatus::Answered)
    .bind(next == RequestStatus::Rejected)
    .bind(&testimony)
    .bind(current.is_approved)
    .bind(current.is_answered)
    .bind(current.is_rejected)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(updated) => {
            info!("Prayer request {id} moved from {from} to {next}");
            Ok(updated)
        }
        // Another moderator got there first.
        None => match get_prayer_request(pool, id).await? {
            Some(latest) => Err(ApiError::InvalidTransition {
                from: latest.status(),
                to: next,
            }),
            None => Err(ApiError::NotFound(format!("Prayer request {id}"))),
        },
    }
}

// ─────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────

pub async fn insert_event(pool: &SqlitePool, event: &NewEvent) -> Result<Event> {
    let record = Event {
        id: Uuid::new_v4().to_string(),
        title: event.title.clone(),
        description: event.description.clone(),
        date: event.date,
        time: event.time.clone(),
        location: event.location.clone(),
        event_type: event.event_type.clone(),
    };

    sqlx::query(
        r#"
        INSERT INTO events (id, title, description, date, time, location, event_type)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(record.date)
    .bind(&record.time)
    .bind(&record.location)
    .bind(&record.event_type)
    .execute(pool)
    .await?;

    Ok(record)
}

/// Fetch events ordered by date ascending.
pub async fn list_events(pool: &SqlitePool) -> Result<Vec<Event>> {
    let rows = sqlx::query_as::<_, Event>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC LIMIT ?1"
    ))
    .bind(EVENT_LIST_LIMIT)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// The earliest event happening at or after `now`.
pub async fn next_event(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Option<Event>> {
    let row = sqlx::query_as::<_, Event>(&format!(
        "SELECT {EVENT_COLUMNS} FROM events WHERE date >= ?1 ORDER BY date ASC LIMIT 1"
    ))
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn event_exists(pool: &SqlitePool, title: &str) -> Result<bool> {
    let row: Option<(String,)> = sqlx::query_as("SELECT id FROM events WHERE title = ?1 LIMIT 1")
        .bind(title)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

// ─────────────────────────────────────────────────────────
// Reading plan
// ─────────────────────────────────────────────────────────

pub async fn list_reading_plan(pool: &SqlitePool) -> Result<Vec<ReadingPlan>> {
    let rows = sqlx::query_as::<_, ReadingPlan>(
        "SELECT id, day, book, chapters, date FROM reading_plan ORDER BY day ASC LIMIT 365",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Entry for a given day of the year (1-based).
pub async fn reading_for_day(pool: &SqlitePool, day: u32) -> Result<Option<ReadingPlan>> {
    let row = sqlx::query_as::<_, ReadingPlan>(
        "SELECT id, day, book, chapters, date FROM reading_plan WHERE day = ?1 LIMIT 1",
    )
    .bind(i64::from(day))
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

// ─────────────────────────────────────────────────────────
// Seeding
// ─────────────────────────────────────────────────────────

/// Insert the Sunday services and a starter reading plan when missing.
pub async fn seed_sample_data(pool: &SqlitePool, now: DateTime<Utc>) -> Result<()> {
    let days_to_sunday = 6 - i64::from(now.weekday().num_days_from_monday());
    let sunday = now.date_naive() + Duration::days(days_to_sunday);

    let samples = [
        ("Culto de Domingo", "Culto de adoração e palavra", "19:30", "culto"),
        (
            "EBD - Escola Bíblica Dominical",
            "Estudo bíblico para toda família",
            "09:00",
            "estudo",
        ),
    ];

    for (title, description, time, event_type) in samples {
        if event_exists(pool, title).await? {
            continue;
        }
        let starts = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|e| ApiError::Validation(format!("bad sample time {time}: {e}")))?;
        insert_event(
            pool,
            &NewEvent {
                title: title.to_string(),
                description: description.to_string(),
                date: sunday.and_time(starts).and_utc(),
                time: time.to_string(),
                location: DEFAULT_LOCATION.to_string(),
                event_type: event_type.to_string(),
            },
        )
        .await?;
        info!("Seeded event {title:?}");
    }

    let (plan_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reading_plan")
        .fetch_one(pool)
        .await?;
    if plan_rows == 0 {
        let readings = [(1, "Gênesis", "1-3"), (2, "Gênesis", "4-6"), (3, "Gênesis", "7-9")];
        for (day, book, chapters) in readings {
            sqlx::query(
                "INSERT INTO reading_plan (id, day, book, chapters, date) VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(day)
            .bind(book)
            .bind(chapters)
            .bind(now + Duration::days(day - 1))
            .execute(pool)
            .await?;
        }
        info!("Seeded reading plan with {} entries", readings.len());
    }

    Ok(())
}
