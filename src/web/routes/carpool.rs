use axum::body::Bytes;
use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::models::{timestamp_id, CarpoolDriver, CarpoolPassenger};
use crate::security::{client_ip, detect_spam};
use crate::services::carpool_service::{self, CarpoolOverview};
use crate::services::matcher_service;
use crate::state::AppState;
use crate::storage::carpool_repo;
use crate::web::error::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverSubmission {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub departure_location: String,
    pub departure_time: String,
    #[serde(default)]
    pub available_seats: i64,
    #[serde(default)]
    pub route: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerSubmission {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub pickup_location: String,
    #[serde(default)]
    pub driver_id: Option<String>,
}

pub async fn carpool_overview_handler(
    State(state): State<AppState>,
) -> Result<Json<CarpoolOverview>, ApiError> {
    let overview = carpool_service::load_carpool_overview(&state.store).await?;
    Ok(Json(overview))
}

pub async fn register_driver_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let ip = client_ip(&headers);
    if !state.limits.carpool.check(&ip).await {
        return Err(ApiError::RateLimited("Too many requests"));
    }

    let submission: DriverSubmission = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Missing required fields"))?;
    if submission.name.trim().is_empty()
        || submission.departure_location.trim().is_empty()
        || submission.departure_time.trim().is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields"));
    }
    if submission.name.chars().count() > 100
        || submission.departure_location.chars().count() > 200
    {
        return Err(ApiError::BadRequest("Content too long"));
    }
    if detect_spam(&submission.name)
        || detect_spam(&submission.departure_location)
        || submission.route.as_deref().is_some_and(detect_spam)
    {
        return Err(ApiError::BadRequest("Content not allowed"));
    }

    let driver = CarpoolDriver {
        id: timestamp_id(),
        name: submission.name,
        email: submission.email.filter(|e| !e.trim().is_empty()),
        phone: submission.phone.filter(|p| !p.trim().is_empty()),
        departure_location: submission.departure_location,
        departure_time: submission.departure_time,
        available_seats: submission.available_seats,
        route: submission.route.filter(|r| !r.trim().is_empty()),
        created_at: Utc::now(),
    };
    carpool_repo::append_driver(&state.store, &driver).await?;

    info!("🚗 Driver registered with {} seats", driver.available_seats);
    Ok(Json(json!({ "success": true, "id": driver.id })))
}

pub async fn register_passenger_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let ip = client_ip(&headers);
    if !state.limits.carpool.check(&ip).await {
        return Err(ApiError::RateLimited("Too many requests"));
    }

    let submission: PassengerSubmission = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Missing required fields"))?;
    if submission.name.trim().is_empty() || submission.pickup_location.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing required fields"));
    }
    if submission.name.chars().count() > 100
        || submission.pickup_location.chars().count() > 200
    {
        return Err(ApiError::BadRequest("Content too long"));
    }
    if detect_spam(&submission.name) || detect_spam(&submission.pickup_location) {
        return Err(ApiError::BadRequest("Content not allowed"));
    }

    let passenger = CarpoolPassenger {
        id: timestamp_id(),
        name: submission.name,
        email: submission.email.filter(|e| !e.trim().is_empty()),
        phone: submission.phone.filter(|p| !p.trim().is_empty()),
        pickup_location: submission.pickup_location,
        driver_id: submission.driver_id.filter(|d| !d.trim().is_empty()),
        created_at: Utc::now(),
    };
    carpool_repo::append_passenger(&state.store, &passenger).await?;

    info!("🧍 Passenger looking for a ride registered");
    Ok(Json(json!({ "success": true, "id": passenger.id })))
}

/// Closest drivers per passenger. Answers an empty list when no distance
/// lookup is configured, so the frontend can hide the whole section.
pub async fn carpool_matches_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let matches =
        matcher_service::load_carpool_matches(&state.store, state.distance.as_deref()).await?;
    Ok(Json(json!({ "matches": matches })))
}
