use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::security::client_ip;
use crate::state::AppState;
use crate::web::error::ApiError;

/// Coarse per-IP budget across the whole API, under the tighter per-endpoint
/// budgets the submission handlers apply themselves.
pub async fn general_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(request.headers());
    if !state.limits.general.check(&ip).await {
        return ApiError::RateLimited("Rate limit exceeded").into_response();
    }
    next.run(request).await
}
