//! REST endpoints for the session intents.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use super::controller::SessionController;
use super::ws::ws_handler;
use crate::error::Error;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SessionController>,
}

/// Build the Axum router with the session REST and WebSocket routes.
pub fn session_routes(controller: Arc<SessionController>) -> Router {
    let state = AppState { controller };

    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .route("/api/session", get(get_session))
        .route("/api/log", get(get_log))
        .route("/api/dossier", post(submit_dossier))
        .route("/api/quiz/answer", post(answer_question))
        .route("/api/roadmap", post(chart_roadmap))
        .route("/api/roadmap/advance", post(advance_roadmap))
        .route("/api/roadmap/retreat", post(retreat_roadmap))
        .route("/api/reset", post(reset))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::State(_) => StatusCode::CONFLICT,
            Self::Generation(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn body(&self) -> serde_json::Value {
        json!({
            "error": self.kind(),
            "message": self.to_string(),
        })
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %self, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "astrograph"
    }))
}

// ── Queries ─────────────────────────────────────────────────────────────

async fn get_session(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.snapshot().await)
}

#[derive(Deserialize)]
struct LogQuery {
    #[serde(default)]
    since: usize,
}

async fn get_log(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> impl IntoResponse {
    Json(state.controller.log_since(query.since).await)
}

// ── Intents ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct DossierRequest {
    #[serde(default)]
    text: String,
    /// Data URL or bare base64.
    #[serde(default)]
    image: Option<String>,
}

async fn submit_dossier(
    State(state): State<AppState>,
    Json(body): Json<DossierRequest>,
) -> Result<Response, Error> {
    info!(
        text_len = body.text.len(),
        has_image = body.image.is_some(),
        "Dossier submitted"
    );
    let snapshot = state
        .controller
        .submit_dossier(body.text, body.image.as_deref())
        .await?;
    Ok(Json(snapshot).into_response())
}

#[derive(Deserialize)]
struct AnswerRequest {
    index: usize,
}

async fn answer_question(
    State(state): State<AppState>,
    Json(body): Json<AnswerRequest>,
) -> Result<Response, Error> {
    let report = state.controller.answer_question(body.index).await?;
    Ok(Json(json!({
        "outcome": report.outcome,
        "snapshot": report.snapshot,
        "roadmap_error": report.roadmap_error.as_ref().map(Error::body),
    }))
    .into_response())
}

async fn chart_roadmap(State(state): State<AppState>) -> Result<Response, Error> {
    Ok(Json(state.controller.chart_roadmap().await?).into_response())
}

async fn advance_roadmap(State(state): State<AppState>) -> Result<Response, Error> {
    Ok(Json(state.controller.advance_roadmap().await?).into_response())
}

async fn retreat_roadmap(State(state): State<AppState>) -> Result<Response, Error> {
    Ok(Json(state.controller.retreat_roadmap().await?).into_response())
}

async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.controller.reset().await)
}
