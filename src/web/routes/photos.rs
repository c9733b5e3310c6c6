use std::io::ErrorKind;

use axum::{
    body::{Body, Bytes},
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use crate::security::{client_ip, detect_spam, is_local_ip};
use crate::services::photo_service::{self, PHOTO_MAX_BYTES};
use crate::state::AppState;
use crate::storage::photo_repo;
use crate::web::error::ApiError;

pub async fn list_photos_handler(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let photos = photo_repo::list_photos(&state.store).await?;
    Ok(Json(json!({ "photos": photos })))
}

pub async fn upload_photo_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let ip = client_ip(&headers);
    if !state.limits.photo.check(&ip).await {
        return Err(ApiError::RateLimited("Too many uploads"));
    }
    if !is_local_ip(&ip) && !state.limits.geographic.check(&ip).await {
        return Err(ApiError::RateLimited("Rate limit exceeded"));
    }

    let mut photo_bytes: Option<Bytes> = None;
    let mut original_name = String::new();
    let mut file_content_type = String::new();
    let mut uploaded_by: Option<String> = None;
    let mut caption: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Missing required fields"))?
    {
        match field.name().unwrap_or_default() {
            "photo" => {
                original_name = field.file_name().unwrap_or_default().to_string();
                file_content_type = field.content_type().unwrap_or_default().to_string();
                photo_bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|_| ApiError::BadRequest("Missing required fields"))?,
                );
            }
            "uploadedBy" => {
                uploaded_by = field.text().await.ok();
            }
            "caption" => {
                caption = field.text().await.ok();
            }
            _ => {}
        }
    }

    let uploaded_by = uploaded_by.map(|u| u.trim().to_string()).unwrap_or_default();
    let caption = caption.filter(|c| !c.trim().is_empty());
    let Some(photo_bytes) = photo_bytes else {
        return Err(ApiError::BadRequest("Missing required fields"));
    };
    if uploaded_by.is_empty() {
        return Err(ApiError::BadRequest("Missing required fields"));
    }
    if detect_spam(&uploaded_by) || caption.as_deref().is_some_and(detect_spam) {
        return Err(ApiError::BadRequest("Content not allowed"));
    }
    if uploaded_by.chars().count() > 100
        || caption.as_deref().is_some_and(|c| c.chars().count() > 200)
    {
        return Err(ApiError::BadRequest("Content too long"));
    }
    if !file_content_type.starts_with("image/") {
        return Err(ApiError::BadRequest("Only image files are allowed"));
    }
    if photo_bytes.len() > PHOTO_MAX_BYTES {
        return Err(ApiError::BadRequest("File size too large (max 5MB)"));
    }

    let photo = photo_service::store_photo(
        &state.store,
        &state.config.uploads_dir,
        &original_name,
        &uploaded_by,
        caption,
        &photo_bytes,
    )
    .await?;

    info!("📷 Photo stored as {}", photo.filename);
    Ok(Json(json!({ "success": true, "id": photo.id })))
}

pub async fn serve_photo_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    // Filenames are generated server side; anything path-shaped is bogus.
    if !photo_service::is_safe_filename(&filename) {
        return Err(ApiError::NotFound("File not found"));
    }

    let path = state.config.uploads_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ApiError::NotFound("File not found"));
        }
        Err(err) => return Err(ApiError::Internal(err.into())),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", photo_service::content_type_for(&filename))
        .header("Cache-Control", "public, max-age=31536000")
        .body(Body::from(bytes))
        .unwrap())
}
