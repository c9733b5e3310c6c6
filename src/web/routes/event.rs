use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use chrono::SecondsFormat;
use serde_json::{json, Value};

use crate::services::calendar_service;
use crate::state::AppState;

/// Event details plus add-to-calendar links, everything the frontend needs
/// to render the header section.
pub async fn event_details_handler(State(state): State<AppState>) -> Json<Value> {
    let event = &state.config.event;
    Json(json!({
        "title": event.title,
        "description": event.description,
        "location": event.location,
        "startDate": event.start.to_rfc3339_opts(SecondsFormat::Millis, true),
        "endDate": event.end.to_rfc3339_opts(SecondsFormat::Millis, true),
        "links": {
            "google": calendar_service::google_calendar_link(event),
            "outlook": calendar_service::outlook_calendar_link(event),
        },
    }))
}

pub async fn calendar_ics_handler(State(state): State<AppState>) -> Response {
    let ics = calendar_service::ics_content(&state.config.event);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/calendar;charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"memorial-service.ics\"",
        )
        .body(Body::from(ics))
        .unwrap()
}
