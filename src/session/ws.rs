//! WebSocket observer feed. Clients get a full sync on connect, then every
//! session event; they may also send intents as JSON actions.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::controller::SessionController;
use super::model::{SessionAction, SessionEvent};
use super::routes::AppState;
use crate::error::Result;

pub(crate) async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    info!("WebSocket client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state.controller))
}

async fn send_event(socket: &mut WebSocket, event: &SessionEvent) -> bool {
    match serde_json::to_string(event) {
        Ok(json) => socket.send(Message::Text(json.into())).await.is_ok(),
        Err(e) => {
            warn!(error = %e, "Failed to serialize session event");
            true
        }
    }
}

async fn handle_socket(mut socket: WebSocket, controller: Arc<SessionController>) {
    info!("WebSocket client connected");

    // Subscribe before the sync so nothing between the two is lost.
    let mut rx = controller.subscribe();
    // Rejections from this client's own intents, which run off the loop.
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<SessionEvent>();

    if !send_event(&mut socket, &controller.sync_event().await).await {
        warn!("Failed to send initial sync, client disconnected");
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(event) => {
                        if !send_event(&mut socket, &event).await {
                            debug!("Client disconnected during send");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(missed = n, "WS client lagged behind broadcast");
                        if !send_event(&mut socket, &controller.sync_event().await).await {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }

            Some(rejection) = reply_rx.recv() => {
                if !send_event(&mut socket, &rejection).await {
                    break;
                }
            }

            result = socket.recv() => {
                match result {
                    Some(Ok(Message::Text(text))) => {
                        let raw = text.as_str().to_owned();
                        let controller = controller.clone();
                        let replies = reply_tx.clone();
                        tokio::spawn(async move {
                            if let Some(rejection) = handle_client_message(&raw, &controller).await {
                                let _ = replies.send(rejection);
                            }
                        });
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("WebSocket connection closed");
}

/// Run one client intent. Results reach every client through the
/// broadcast; only a rejection is returned for this client.
///
/// Called on a spawned task so a pending backend call never stalls the
/// socket loop.
async fn handle_client_message(raw: &str, controller: &SessionController) -> Option<SessionEvent> {
    let action = match serde_json::from_str::<SessionAction>(raw) {
        Ok(action) => action,
        Err(e) => {
            debug!(error = %e, text = raw, "Unrecognized WS message from client");
            return None;
        }
    };

    let result: Result<()> = match action {
        SessionAction::SubmitDossier { text, image } => controller
            .submit_dossier(text, image.as_deref())
            .await
            .map(drop),
        SessionAction::AnswerQuestion { index } => {
            controller.answer_question(index).await.and_then(|report| {
                report.roadmap_error.map_or(Ok(()), Err)
            })
        }
        SessionAction::ChartRoadmap => controller.chart_roadmap().await.map(drop),
        SessionAction::AdvanceRoadmap => controller.advance_roadmap().await.map(drop),
        SessionAction::RetreatRoadmap => controller.retreat_roadmap().await.map(drop),
        SessionAction::Reset => {
            controller.reset().await;
            Ok(())
        }
    };

    result.err().map(|e| {
        warn!(error = %e, "WS intent rejected");
        SessionEvent::Error {
            error: e.kind().to_string(),
            message: e.to_string(),
        }
    })
}
