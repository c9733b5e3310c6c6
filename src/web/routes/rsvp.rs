use axum::body::Bytes;
use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::models::{timestamp_id, Rsvp};
use crate::security::{client_ip, detect_spam};
use crate::services::rsvp_service::{self, RsvpSummary};
use crate::state::AppState;
use crate::storage::rsvp_repo;
use crate::web::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub attending: bool,
    #[serde(default = "default_guest_count")]
    pub guest_count: i64,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_guest_count() -> i64 {
    1
}

pub async fn submit_rsvp_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let ip = client_ip(&headers);
    if !state.limits.rsvp.check(&ip).await {
        return Err(ApiError::RateLimited("Too many requests"));
    }

    // Manual decode so a garbled body, a missing name or a non-boolean
    // attending flag all read as invalid data, not as a framework rejection.
    let submission: RsvpSubmission =
        serde_json::from_slice(&body).map_err(|_| ApiError::BadRequest("Invalid data"))?;
    if submission.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Invalid data"));
    }
    if submission.name.chars().count() > 100
        || submission
            .message
            .as_deref()
            .is_some_and(|m| m.chars().count() > 500)
    {
        return Err(ApiError::BadRequest("Content too long"));
    }
    if detect_spam(&submission.name)
        || submission.message.as_deref().is_some_and(detect_spam)
    {
        return Err(ApiError::BadRequest("Content not allowed"));
    }

    let rsvp = Rsvp {
        id: timestamp_id(),
        name: submission.name,
        email: submission.email.filter(|e| !e.trim().is_empty()),
        attending: submission.attending,
        guest_count: submission.guest_count,
        message: submission.message.filter(|m| !m.trim().is_empty()),
        created_at: Utc::now(),
    };
    rsvp_repo::append_rsvp(&state.store, &rsvp).await?;

    info!("📝 RSVP received (attending: {})", rsvp.attending);
    Ok(Json(json!({ "success": true, "id": rsvp.id })))
}

pub async fn rsvp_summary_handler(
    State(state): State<AppState>,
) -> Result<Json<RsvpSummary>, ApiError> {
    let summary = rsvp_service::load_rsvp_summary(&state.store).await?;
    Ok(Json(summary))
}
