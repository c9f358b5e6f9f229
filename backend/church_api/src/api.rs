//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

use crate::catalog::{ChurchInfo, MediaLinks, Ministry, CHURCH_INFO, MEDIA_LINKS, MINISTRIES};
use crate::db;
use crate::errors::Result;
use crate::models::{
    AnswerParams, Event, NewEvent, NewPrayerRequest, PrayerRequest, ReadingPlan, RequestStatus,
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub feed_limit: u32,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /api/`
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "PIB do Cordeiro API",
    })
}

/// `GET /api/events`
pub async fn get_events(State(state): State<Arc<ApiState>>) -> Result<Json<Vec<Event>>> {
    Ok(Json(db::list_events(&state.pool).await?))
}

/// `POST /api/events`
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<NewEvent>,
) -> Result<Json<Event>> {
    let event = db::insert_event(&state.pool, &body).await?;
    info!("Created event {} ({})", event.id, event.title);
    Ok(Json(event))
}

/// `GET /api/events/next`
///
/// Responds with JSON `null` when nothing is scheduled.
pub async fn get_next_event(State(state): State<Arc<ApiState>>) -> Result<Json<Option<Event>>> {
    Ok(Json(db::next_event(&state.pool, Utc::now()).await?))
}

/// `GET /api/prayer-requests`
///
/// The public feed only: approved and public requests, newest first.
pub async fn get_prayer_requests(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<PrayerRequest>>> {
    Ok(Json(
        db::list_public_prayer_requests(&state.pool, state.feed_limit).await?,
    ))
}

/// `POST /api/prayer-requests`
pub async fn create_prayer_request(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<NewPrayerRequest>,
) -> Result<Json<PrayerRequest>> {
    let request = body.validated()?;
    let created = db::insert_prayer_request(&state.pool, &request).await?;
    info!(
        "Received prayer request {} (public={})",
        created.id, created.is_public
    );
    Ok(Json(created))
}

/// `PATCH /api/prayer-requests/:id/approve`
pub async fn approve_prayer_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<PrayerRequest>> {
    let updated =
        db::transition_prayer_request(&state.pool, &id, RequestStatus::Approved, None).await?;
    Ok(Json(updated))
}

/// `PATCH /api/prayer-requests/:id/reject`
pub async fn reject_prayer_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<PrayerRequest>> {
    let updated =
        db::transition_prayer_request(&state.pool, &id, RequestStatus::Rejected, None).await?;
    Ok(Json(updated))
}

/// `PATCH /api/prayer-requests/:id/answer?testimony=...`
pub async fn answer_prayer_request(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Query(params): Query<AnswerParams>,
) -> Result<Json<PrayerRequest>> {
    let updated = db::transition_prayer_request(
        &state.pool,
        &id,
        RequestStatus::Answered,
        params.testimony.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

/// `GET /api/reading-plan`
pub async fn get_reading_plan(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<ReadingPlan>>> {
    Ok(Json(db::list_reading_plan(&state.pool).await?))
}

/// `GET /api/reading-plan/today`
pub async fn get_today_reading(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Option<ReadingPlan>>> {
    let day = Utc::now().ordinal();
    Ok(Json(db::reading_for_day(&state.pool, day).await?))
}

/// `GET /api/ministries`
pub async fn get_ministries() -> Json<&'static [Ministry]> {
    Json(&MINISTRIES[..])
}

/// `GET /api/media-links`
pub async fn get_media_links() -> Json<&'static MediaLinks> {
    Json(&MEDIA_LINKS)
}

/// `GET /api/church-info`
pub async fn get_church_info() -> Json<&'static ChurchInfo> {
    Json(&CHURCH_INFO)
}

/// Fallback for unknown routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::memory_pool;
    use crate::errors::ApiError;

    async fn state() -> Arc<ApiState> {
        Arc::new(ApiState {
            pool: memory_pool().await,
            feed_limit: 100,
        })
    }

    fn body(name: &str, message: &str, is_public: bool) -> Json<NewPrayerRequest> {
        Json(NewPrayerRequest {
            name: name.to_string(),
            message: message.to_string(),
            is_public,
        })
    }

    #[tokio::test]
    async fn submitted_request_reaches_feed_after_approval() {
        let state = state().await;

        let Json(created) =
            create_prayer_request(State(state.clone()), body(" Maria ", "Pray for health", true))
                .await
                .unwrap();
        assert_eq!(created.name, "Maria");
        assert!(!created.is_approved);

        let Json(feed) = get_prayer_requests(State(state.clone())).await.unwrap();
        assert!(feed.is_empty());

        let Json(approved) = approve_prayer_request(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(approved.status(), RequestStatus::Approved);

        let Json(feed) = get_prayer_requests(State(state)).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].name, "Maria");
        assert_eq!(feed[0].message, "Pray for health");
    }

    #[tokio::test]
    async fn private_request_never_reaches_feed() {
        let state = state().await;
        let Json(created) = create_prayer_request(State(state.clone()), body("Ana", "m", false))
            .await
            .unwrap();
        let Json(approved) = approve_prayer_request(State(state.clone()), Path(created.id))
            .await
            .unwrap();
        assert!(approved.is_approved && !approved.is_public);

        let Json(feed) = get_prayer_requests(State(state)).await.unwrap();
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn blank_submission_is_unprocessable() {
        let state = state().await;
        let err = create_prayer_request(State(state), body("  ", "m", true))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn answer_carries_testimony() {
        let state = state().await;
        let Json(created) = create_prayer_request(State(state.clone()), body("Ana", "m", true))
            .await
            .unwrap();
        let Json(approved) = approve_prayer_request(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert!(approved.testimony.is_none());
        let Json(answered) = answer_prayer_request(
            State(state.clone()),
            Path(created.id),
            Query(AnswerParams {
                testimony: Some("Recebeu alta".to_string()),
            }),
        )
        .await
        .unwrap();
        assert!(answered.is_answered);
        assert_eq!(answered.testimony.as_deref(), Some("Recebeu alta"));
    }

    #[tokio::test]
    async fn moderation_errors_map_to_http_statuses() {
        let state = state().await;
        let err = approve_prayer_request(State(state.clone()), Path("nope".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let Json(created) = create_prayer_request(State(state.clone()), body("Ana", "m", true))
            .await
            .unwrap();
        let Json(rejected) = reject_prayer_request(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(rejected.status(), RequestStatus::Rejected);
        let err = answer_prayer_request(
            State(state),
            Path(created.id),
            Query(AnswerParams::default()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition { .. }));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn next_event_is_null_when_nothing_is_scheduled() {
        let state = state().await;
        let Json(next) = get_next_event(State(state)).await.unwrap();
        assert!(next.is_none());
        assert_eq!(serde_json::to_string(&next).unwrap(), "null");
    }

    #[tokio::test]
    async fn static_catalog_endpoints() {
        let Json(ministries) = get_ministries().await;
        assert_eq!(ministries.len(), 4);
        assert!(ministries.iter().all(|m| m.whatsapp_link.starts_with("https://wa.me/")));

        let Json(info) = get_church_info().await;
        assert_eq!(info.instagram, "@pibdocordeiro");

        let Json(root) = root().await;
        assert_eq!(root.message, "PIB do Cordeiro API");
    }
}
