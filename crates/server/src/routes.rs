pub mod messages;

use axum::{http::StatusCode, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::ServerState;

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Build the application router. `/messages` answers GET and POST; every
/// other path or method is a 404.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    Router::new()
        .route(
            "/messages",
            get(messages::list_messages)
                .post(messages::create_message)
                .fallback(not_found),
        )
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
