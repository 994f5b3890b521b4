use crate::room::RoomManager;
use crate::signaling::ApiError;
use axum::Json;
use axum::extract::{Path, Query, State};
use huddle_core::{ApiResponse, Negotiation, Participant, RoomId, SessionId, SignalMessage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const DEFAULT_NAME: &str = "Guest";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[serde(default)]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinResponse {
    pub participants: Vec<Participant>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoomView {
    pub id: RoomId,
    pub participants: Vec<Participant>,
}

fn require_session(session_id: Option<String>) -> Result<SessionId, ApiError> {
    match session_id {
        Some(id) if !id.is_empty() => Ok(SessionId(id)),
        _ => {
            warn!("Rejecting request without session id");
            Err(ApiError::BadRequest("Session ID is required".to_owned()))
        }
    }
}

pub async fn join_room(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<String>,
    Json(req): Json<JoinRequest>,
) -> Result<Json<ApiResponse<JoinResponse>>, ApiError> {
    let room_id = RoomId::from(room_id);
    let session_id = require_session(Some(req.session_id))?;
    let name = req
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_owned());

    let participants = rooms
        .join(&room_id, Participant::new(session_id, name))
        .await?;

    Ok(Json(ApiResponse::ok(JoinResponse { participants })))
}

pub async fn leave_room(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<String>,
    Json(req): Json<LeaveRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let session_id = require_session(Some(req.session_id))?;
    rooms.leave(&RoomId::from(room_id), &session_id).await?;
    Ok(Json(ApiResponse::empty()))
}

pub async fn post_signal(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<String>,
    Json(message): Json<Negotiation>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    debug!(
        room = %room_id,
        from = %message.sender(),
        to = %message.recipient(),
        "Relaying {}",
        message.kind()
    );
    rooms.send(&RoomId::from(room_id), message).await?;
    Ok(Json(ApiResponse::empty()))
}

pub async fn get_signals(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<String>,
    Query(query): Query<SignalQuery>,
) -> Result<Json<Vec<SignalMessage>>, ApiError> {
    let session_id = require_session(query.session_id)?;
    let messages = rooms.drain(&RoomId::from(room_id), &session_id).await?;
    Ok(Json(messages))
}

pub async fn get_room(
    State(rooms): State<RoomManager>,
    Path(room_id): Path<String>,
) -> Result<Json<ApiResponse<RoomView>>, ApiError> {
    let room_id = RoomId::from(room_id);
    match rooms.participants(&room_id).await? {
        Some(participants) => Ok(Json(ApiResponse::ok(RoomView {
            id: room_id,
            participants,
        }))),
        None => Err(ApiError::NotFound(format!("Room {} not found", room_id))),
    }
}

pub async fn health_check() -> &'static str {
    "OK"
}
