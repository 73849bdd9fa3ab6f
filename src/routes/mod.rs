use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub mod games;
pub mod health;
pub mod stream;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Game management
        .route("/api/games", post(games::create_game))
        .route(
            "/api/games/:game_id",
            get(games::get_game).delete(games::remove_game),
        )
        .route("/api/games/:game_id/start", post(games::start_game))
        .route("/api/games/:game_id/shots", post(games::record_shot))
        // Live score streams
        .route("/ws/games/:game_id/score", get(stream::websocket_handler))
        .route(
            "/api/games/:game_id/score/events",
            get(stream::sse_handler),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
