use std::any::Any;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use http::{Method, header};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{error::AppError, handlers, state::AppState};

fn lookup_routes() -> Router<AppState> {
    Router::new().route("/get_phone_number", post(handlers::lookup::get_phone_number))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(state.config.cors_allowed_origins.clone())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(86400))
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Builds the application router.
///
/// The lookup endpoint is mounted both at the root and under `/api`.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state);
    let static_dir = state.config.static_dir.clone();
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .route("/", get(handlers::index::index))
        .merge(lookup_routes())
        .nest("/api", lookup_routes())
        .with_state(state)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default())
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .fallback_service(ServeDir::new(static_dir))
}
