use crate::room::RoomManager;
use crate::signaling::{get_room, get_signals, health_check, join_room, leave_room, post_signal};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// HTTP surface of the coordinator.
pub fn router(rooms: RoomManager) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/rooms/{room_id}", get(get_room))
        .route("/api/rooms/{room_id}/join", post(join_room))
        .route("/api/rooms/{room_id}/leave", post(leave_room))
        .route(
            "/api/rooms/{room_id}/signal",
            post(post_signal).get(get_signals),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(rooms)
}
