pub mod error;
pub mod middleware;
pub mod routes;

use axum::extract::DefaultBodyLimit;
use axum::response::Redirect;
use axum::routing::{delete, get, get_service, post};
use axum::{middleware as axum_middleware, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;
use middleware::{admin as admin_middleware, rate_limit as rate_limit_middleware};
use routes::{admin, carpool, event, health, photos, rsvp};

/// Multipart overhead on top of the 5MB photo cap.
const MAX_UPLOAD_BODY_BYTES: usize = 8 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Admin surface behind its own gate
    let admin_routes = Router::new()
        .route("/admin", get(admin::admin_page_handler))
        .route("/admin/delete", post(admin::admin_page_delete_handler))
        .route("/api/admin/rsvps", get(admin::admin_rsvps_handler))
        .route("/api/admin/rsvps/:id", delete(admin::delete_rsvp_handler))
        .route(
            "/api/admin/carpool",
            get(admin::admin_carpool_handler).delete(admin::delete_carpool_handler),
        )
        .route(
            "/api/admin/carpool/:id",
            delete(admin::delete_carpool_item_handler),
        )
        .route("/api/admin/photos", get(admin::admin_photos_handler))
        .route("/api/admin/photos/:id", delete(admin::delete_photo_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            admin_middleware::require_admin,
        ));

    let static_dir = state.config.static_dir.clone();

    Router::new()
        // Public API
        .route(
            "/api/rsvp",
            get(rsvp::rsvp_summary_handler).post(rsvp::submit_rsvp_handler),
        )
        .route("/api/carpool", get(carpool::carpool_overview_handler))
        .route("/api/carpool/driver", post(carpool::register_driver_handler))
        .route(
            "/api/carpool/passenger",
            post(carpool::register_passenger_handler),
        )
        .route("/api/carpool/matches", get(carpool::carpool_matches_handler))
        .route(
            "/api/photos",
            get(photos::list_photos_handler).post(photos::upload_photo_handler),
        )
        .route("/api/photos/:filename", get(photos::serve_photo_handler))
        .route("/api/event", get(event::event_details_handler))
        .route("/api/event/calendar.ics", get(event::calendar_ics_handler))
        .route("/api/health", get(health::health_handler))
        .merge(admin_routes)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware::general_rate_limit,
        ))
        // Static frontend files
        .route("/", get(|| async { Redirect::to("/assets/") }))
        .nest_service(
            "/assets",
            get_service(ServeDir::new(static_dir)).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        // Layers
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
