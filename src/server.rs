//! REST API over the match rooms.
//!
//! | Method | Path | Effect |
//! |---|---|---|
//! | `POST` | `/api/sessions` | open a room |
//! | `GET` | `/api/sessions` | list room ids |
//! | `GET` | `/api/sessions/{id}` | current view |
//! | `POST` | `/api/sessions/{id}/move` | player move; the computer replies in the background |
//! | `POST` | `/api/sessions/{id}/reset` | fresh match, scoreboard kept |

use crate::session::{RoomView, SessionError, SessionId, SessionManager};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use whisker_tictactoe::MoveError;

/// Body of a move request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Board index (0-8).
    pub position: usize,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub error: String,
}

/// Maps request and room errors onto HTTP status codes.
#[derive(Debug)]
pub enum ApiError {
    /// The request body was not a valid move.
    BadRequest(String),
    /// A room operation failed.
    Session(SessionError),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Session(err) => {
                let status = match &err {
                    SessionError::NotFound(_) => StatusCode::NOT_FOUND,
                    SessionError::IllegalMove(MoveError::OutOfRange(_)) => StatusCode::BAD_REQUEST,
                    SessionError::IllegalMove(_) => StatusCode::CONFLICT,
                    SessionError::NoLegalMove(_) => {
                        error!(error = %err, "Engine contract violated");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, err.to_string())
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Builds the router.
#[instrument(skip(manager))]
pub fn router(manager: SessionManager) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session).get(list_sessions))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/move", post(make_move))
        .route("/api/sessions/{id}/reset", post(reset_session))
        .with_state(manager)
}

/// Binds and serves until the process is stopped.
#[instrument(skip(manager))]
pub async fn serve(host: &str, port: u16, manager: SessionManager) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Whisker Games server listening");
    axum::serve(listener, router(manager)).await?;
    Ok(())
}

async fn create_session(State(manager): State<SessionManager>) -> (StatusCode, Json<RoomView>) {
    (StatusCode::CREATED, Json(manager.create().await))
}

async fn list_sessions(State(manager): State<SessionManager>) -> Json<Vec<SessionId>> {
    Json(manager.list().await)
}

async fn get_session(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<Json<RoomView>, ApiError> {
    Ok(Json(manager.view(&id).await?))
}

#[instrument(skip(manager, request))]
async fn make_move(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
    request: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<RoomView>, ApiError> {
    let Json(request) =
        request.inspect_err(|e| warn!(session_id = %id, error = %e, "Malformed move body"))?;
    let (view, computer_next) = manager
        .player_move(&id, request.position)
        .await
        .inspect_err(|e| warn!(session_id = %id, error = %e, "Move rejected"))?;

    if computer_next {
        tokio::spawn(async move {
            match manager.computer_turn(&id).await {
                Ok(Some(placement)) => {
                    debug!(session_id = %id, index = placement.index, "Computer moved")
                }
                Ok(None) => debug!(session_id = %id, "Computer move discarded"),
                Err(e) => warn!(session_id = %id, error = %e, "Computer turn failed"),
            }
        });
    }

    Ok(Json(view))
}

async fn reset_session(
    State(manager): State<SessionManager>,
    Path(id): Path<SessionId>,
) -> Result<Json<RoomView>, ApiError> {
    Ok(Json(manager.reset(&id).await?))
}
