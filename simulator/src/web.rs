use crate::state::AppState;
use axum::{
    Json, Router,
    extract::State,
    extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};
use futures::{SinkExt, StreamExt};
use rangestation_shared::{STREAM_PATH, SensorMessage};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/data", get(get_data))
        .route(STREAM_PATH, get(ws_handler))
        .with_state(state)
}

/// Current history as plain JSON, for anyone poking at the sensor over HTTP.
async fn get_data(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.history_snapshot())
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    // Subscribe and copy the history under one lock: a reading published in
    // between would otherwise show up in the snapshot and again as an update.
    let (mut readings_rx, history) = state.subscribe_with_snapshot();
    let (mut sender, mut receiver) = socket.split();

    // New client: send the whole history up front so it never has to ask for
    // backlog, then forward live readings as they arrive.
    let snapshot = SensorMessage::Snapshot(history);
    let text = serde_json::to_string(&snapshot).unwrap_or_default();
    if sender.send(Message::Text(Utf8Bytes::from(text))).await.is_err() {
        return;
    }

    let send_task = async move {
        loop {
            match readings_rx.recv().await {
                Ok(reading) => {
                    let msg = SensorMessage::Reading(reading);
                    let text = serde_json::to_string(&msg).unwrap_or_default();
                    if sender.send(Message::Text(Utf8Bytes::from(text))).await.is_err() {
                        break;
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    // Slow client; skip what it missed and keep streaming.
                    log::warn!("websocket client lagged by {n} readings");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    };

    // The dashboard never sends anything meaningful; drain until it goes away.
    let recv_task = async move { while let Some(Ok(_)) = receiver.next().await {} };

    tokio::join!(send_task, recv_task);
}
