use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;
use crate::web::error::ApiError;

/// Gate for the admin surface. Deployments put nginx basic auth in front of
/// these routes, so with no ADMIN_TOKEN configured the gate stays open; set
/// the token when the server is exposed directly.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return next.run(request).await;
    };

    if provided_token(&request).as_deref() == Some(expected) {
        return next.run(request).await;
    }
    ApiError::AccessDenied.into_response()
}

/// Token from the `x-admin-token` header, falling back to the `admin_token`
/// cookie so the admin page works in a plain browser.
fn provided_token(request: &Request) -> Option<String> {
    if let Some(value) = request
        .headers()
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
    {
        return Some(value.trim().to_string());
    }

    request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split("; ")
                .find_map(|c| c.strip_prefix("admin_token="))
        })
        .map(|token| token.to_string())
}
