use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorError,
    GovernorLayer,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::errors::{AppError, MSG_INTERNAL};
use crate::handlers::{self, AppState};
use crate::models::SendResponse;

/// Largest accepted contact form body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Seconds until one rate limit slot is replenished.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 2;
pub const RATE_LIMIT_BURST: u32 = 5;

/// Lead intake routes. The server adds rate limiting on top of these.
///
/// Oversized bodies surface as a JSON rejection in the handler, so they get
/// the same `{message}` answer as any other unreadable body.
pub fn lead_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/send", post(handlers::send_lead))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Wraps `routes` in a per-IP rate limit: a burst of `burst` requests, then
/// one more every `period_secs` seconds. Rejections answer with JSON.
pub fn rate_limited(
    routes: Router<Arc<AppState>>,
    period_secs: u64,
    burst: u32,
) -> anyhow::Result<Router<Arc<AppState>>> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(period_secs)
            .burst_size(burst)
            .key_extractor(SmartIpKeyExtractor)
            .error_handler(rate_limit_error)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    Ok(routes.layer(GovernorLayer {
        config: governor_conf,
    }))
}

/// Maps limiter failures onto the `{message, debug?}` body used everywhere else.
pub fn rate_limit_error(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { wait_time, headers } => {
            let mut response = AppError::RateLimited(wait_time).into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
        GovernorError::UnableToExtractKey => {
            AppError::InternalError("Unable to extract client IP for rate limiting".to_string())
                .into_response()
        }
        GovernorError::Other { code, msg, headers } => {
            tracing::error!("Rate limiter error {}: {:?}", code, msg);
            let body = SendResponse {
                debug: msg,
                ..SendResponse::message(MSG_INTERNAL)
            };
            let mut response = (code, Json(body)).into_response();
            if let Some(headers) = headers {
                response.headers_mut().extend(headers);
            }
            response
        }
    }
}

/// Assembles the application: health check (never rate limited), the given
/// lead routes, request tracing and CORS.
pub fn router(state: Arc<AppState>, lead_routes: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(lead_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
