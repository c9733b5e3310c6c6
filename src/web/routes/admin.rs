use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::models::{CarpoolDriver, CarpoolPassenger, Photo, Rsvp};
use crate::services::photo_service;
use crate::services::rsvp_service::{self, RsvpSummary};
use crate::state::AppState;
use crate::storage::{carpool_repo, photo_repo, rsvp_repo};
use crate::web::error::ApiError;

// --- JSON API used by the admin dashboard ---

pub async fn admin_rsvps_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let rsvps = rsvp_repo::list_rsvps(&state.store).await?;
    Ok(Json(json!({ "rsvps": rsvps })))
}

pub async fn delete_rsvp_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !rsvp_repo::delete_rsvp(&state.store, &id).await? {
        return Err(ApiError::NotFound("RSVP not found"));
    }
    info!("🗑️ Deleted RSVP {}", id);
    Ok(Json(json!({ "success": true })))
}

pub async fn admin_carpool_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let drivers = carpool_repo::list_drivers(&state.store).await?;
    let passengers = carpool_repo::list_passengers(&state.store).await?;
    Ok(Json(json!({ "drivers": drivers, "passengers": passengers })))
}

#[derive(Debug, Deserialize)]
pub struct CarpoolDeleteParams {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn delete_carpool_handler(
    State(state): State<AppState>,
    Query(params): Query<CarpoolDeleteParams>,
) -> Result<Json<Value>, ApiError> {
    let (Some(id), Some(kind)) = (params.id.as_deref(), params.kind.as_deref()) else {
        return Err(ApiError::BadRequest("Missing id or type parameter"));
    };

    let removed = match kind {
        "driver" => carpool_repo::delete_driver(&state.store, id).await?,
        "passenger" => carpool_repo::delete_passenger(&state.store, id).await?,
        _ => return Err(ApiError::BadRequest("Invalid type parameter")),
    };
    if !removed {
        return Err(ApiError::NotFound("Item not found"));
    }
    info!("🗑️ Deleted {} {}", kind, id);
    Ok(Json(json!({ "success": true })))
}

/// Delete by id alone, for clients that do not know which list the entry is
/// in. Drivers are checked first, then passengers.
pub async fn delete_carpool_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if carpool_repo::delete_driver(&state.store, &id).await? {
        info!("🗑️ Deleted driver {}", id);
        return Ok(Json(json!({ "success": true, "type": "driver" })));
    }
    if carpool_repo::delete_passenger(&state.store, &id).await? {
        info!("🗑️ Deleted passenger {}", id);
        return Ok(Json(json!({ "success": true, "type": "passenger" })));
    }
    Err(ApiError::NotFound("Item not found"))
}

pub async fn admin_photos_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let photos = photo_repo::list_photos(&state.store).await?;
    Ok(Json(json!({ "photos": photos })))
}

pub async fn delete_photo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !photo_service::remove_photo(&state.store, &state.config.uploads_dir, &id).await? {
        return Err(ApiError::NotFound("Photo not found"));
    }
    info!("🗑️ Deleted photo {}", id);
    Ok(Json(json!({ "success": true })))
}

// --- Server-rendered admin page ---

pub struct AdminRsvpRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub attending_label: String,
    pub guest_count: i64,
    pub message: String,
    pub created_label: String,
}

pub struct AdminDriverRow {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub departure_location: String,
    pub departure_time: String,
    pub available_seats: i64,
    pub route: String,
    pub created_label: String,
}

pub struct AdminPassengerRow {
    pub id: String,
    pub name: String,
    pub contact: String,
    pub pickup_location: String,
    pub driver_id: String,
    pub created_label: String,
}

pub struct AdminPhotoRow {
    pub id: String,
    pub filename: String,
    pub original_name: String,
    pub uploaded_by: String,
    pub caption: String,
    pub created_label: String,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub summary: RsvpSummary,
    pub rsvps: Vec<AdminRsvpRow>,
    pub drivers: Vec<AdminDriverRow>,
    pub passengers: Vec<AdminPassengerRow>,
    pub photos: Vec<AdminPhotoRow>,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AdminPageQuery {
    pub notice: Option<String>,
}

pub async fn admin_page_handler(
    State(state): State<AppState>,
    Query(query): Query<AdminPageQuery>,
) -> impl IntoResponse {
    let loaded = async {
        let summary = rsvp_service::load_rsvp_summary(&state.store).await?;
        let rsvps = rsvp_repo::list_rsvps(&state.store).await?;
        let drivers = carpool_repo::list_drivers(&state.store).await?;
        let passengers = carpool_repo::list_passengers(&state.store).await?;
        let photos = photo_repo::list_photos(&state.store).await?;
        Ok::<_, crate::storage::StoreError>((summary, rsvps, drivers, passengers, photos))
    }
    .await;

    let (summary, rsvps, drivers, passengers, photos) = match loaded {
        Ok(data) => data,
        Err(e) => {
            warn!("Admin page load failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let template = AdminTemplate {
        summary,
        rsvps: rsvps.iter().map(rsvp_row).collect(),
        drivers: drivers.iter().map(driver_row).collect(),
        passengers: passengers.iter().map(passenger_row).collect(),
        photos: photos.iter().map(photo_row).collect(),
        notice: query.notice.as_deref().and_then(notice_message),
    };
    Html(template.render().unwrap()).into_response()
}

fn notice_message(code: &str) -> Option<String> {
    let message = match code {
        "deleted" => "Færslu eytt.",
        "not_found" => "Færslan fannst ekki.",
        "error" => "Ekki tókst að eyða færslunni.",
        _ => return None,
    };
    Some(message.to_string())
}

#[derive(Debug, Deserialize)]
pub struct AdminDeleteForm {
    pub kind: String, // rsvp|driver|passenger|photo
    pub id: String,
}

pub async fn admin_page_delete_handler(
    State(state): State<AppState>,
    Form(form): Form<AdminDeleteForm>,
) -> impl IntoResponse {
    let removed = match form.kind.as_str() {
        "rsvp" => rsvp_repo::delete_rsvp(&state.store, &form.id).await,
        "driver" => carpool_repo::delete_driver(&state.store, &form.id).await,
        "passenger" => carpool_repo::delete_passenger(&state.store, &form.id).await,
        "photo" => {
            photo_service::remove_photo(&state.store, &state.config.uploads_dir, &form.id).await
        }
        _ => return StatusCode::BAD_REQUEST.into_response(),
    };

    let notice = match removed {
        Ok(true) => "deleted",
        Ok(false) => "not_found",
        Err(e) => {
            warn!("Admin delete of {} {} failed: {}", form.kind, form.id, e);
            "error"
        }
    };
    Redirect::to(&format!("/admin?notice={}", notice)).into_response()
}

fn rsvp_row(rsvp: &Rsvp) -> AdminRsvpRow {
    AdminRsvpRow {
        id: rsvp.id.clone(),
        name: rsvp.name.clone(),
        email: rsvp.email.clone().unwrap_or_default(),
        attending_label: if rsvp.attending { "Já" } else { "Nei" }.to_string(),
        guest_count: rsvp.guest_count,
        message: rsvp.message.clone().unwrap_or_default(),
        created_label: format_created(rsvp.created_at),
    }
}

fn driver_row(driver: &CarpoolDriver) -> AdminDriverRow {
    AdminDriverRow {
        id: driver.id.clone(),
        name: driver.name.clone(),
        contact: format_contact(driver.email.as_deref(), driver.phone.as_deref()),
        departure_location: driver.departure_location.clone(),
        departure_time: driver.departure_time.clone(),
        available_seats: driver.available_seats,
        route: driver.route.clone().unwrap_or_default(),
        created_label: format_created(driver.created_at),
    }
}

fn passenger_row(passenger: &CarpoolPassenger) -> AdminPassengerRow {
    AdminPassengerRow {
        id: passenger.id.clone(),
        name: passenger.name.clone(),
        contact: format_contact(passenger.email.as_deref(), passenger.phone.as_deref()),
        pickup_location: passenger.pickup_location.clone(),
        driver_id: passenger.driver_id.clone().unwrap_or_default(),
        created_label: format_created(passenger.created_at),
    }
}

fn photo_row(photo: &Photo) -> AdminPhotoRow {
    AdminPhotoRow {
        id: photo.id.clone(),
        filename: photo.filename.clone(),
        original_name: photo.original_name.clone(),
        uploaded_by: photo.uploaded_by.clone(),
        caption: photo.caption.clone().unwrap_or_default(),
        created_label: format_created(photo.created_at),
    }
}

fn format_created(created_at: chrono::DateTime<chrono::Utc>) -> String {
    created_at.format("%Y-%m-%d %H:%M").to_string()
}

fn format_contact(email: Option<&str>, phone: Option<&str>) -> String {
    match (email, phone) {
        (Some(email), Some(phone)) => format!("{} / {}", email, phone),
        (Some(email), None) => email.to_string(),
        (None, Some(phone)) => phone.to_string(),
        (None, None) => String::new(),
    }
}
