//! Websocket chat: session lifecycle and socket plumbing
//!
//! Connection flow: authenticate the handshake token, join the user's group,
//! then handle inbound frames sequentially until the client goes away. The
//! per-message behavior lives in [`session::ChatSession`].

pub mod groups;
pub mod session;

pub use groups::{ChatGroups, GroupEvent};
pub use session::{ChatSession, QueryJournal, CHAT_SYSTEM_PROMPT};

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, info};
use warp::ws::{Message, WebSocket};

use crate::models::ChatFrame;
use crate::state::AppState;

const OUTBOUND_BUFFER: usize = 16;

/// Drive one websocket connection to completion
pub async fn run(websocket: WebSocket, state: AppState, token: Option<String>) {
    // Unauthenticated handshakes are closed immediately, no frames sent
    let user = match token {
        Some(token) => state.store.find_user_by_token(&token).await.ok().flatten(),
        None => None,
    };
    let Some(user) = user else {
        debug!("rejecting unauthenticated chat connection");
        let (mut tx, _) = websocket.split();
        let _ = tx.send(Message::close()).await;
        return;
    };

    info!(user = %user.username, "chat session connected");
    let user_id = user.id;

    let model_service = match state.model_service().await {
        Ok(client) => Arc::new(client),
        Err(e) => {
            debug!(error = %e, "failed to build model client, closing session");
            let (mut tx, _) = websocket.split();
            let _ = tx.send(Message::close()).await;
            return;
        }
    };

    let session = ChatSession::new(
        user,
        Arc::new(state.store.clone()),
        model_service,
        state.settings.clone(),
        state.groups.clone(),
    );
    let session_id = session.id();

    let mut group_rx = state.groups.join(user_id).await;
    let (out_tx, mut out_rx) = mpsc::channel::<ChatFrame>(OUTBOUND_BUFFER);

    let (mut socket_tx, mut socket_rx) = websocket.split();

    // Writer half: session frames plus group events from sibling sessions
    let writer = tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                maybe = out_rx.recv() => match maybe {
                    Some(frame) => frame,
                    None => break,
                },
                event = group_rx.recv() => match event {
                    Ok(event) if event.origin != session_id => event.frame,
                    Ok(_) => continue,
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
            };
            match serde_json::to_string(&frame) {
                Ok(text) => {
                    if socket_tx.send(Message::text(text)).await.is_err() {
                        break;
                    }
                }
                Err(e) => debug!(error = %e, "failed to serialize outbound frame"),
            }
        }
        let _ = socket_tx.send(Message::close()).await;
    });

    // Inbound frames are handled one at a time; an in-flight generation is
    // not cancelled if the client disconnects mid-call
    while let Some(Ok(message)) = socket_rx.next().await {
        if message.is_close() {
            break;
        }
        if let Ok(text) = message.to_str() {
            session.handle_text(text, &out_tx).await;
        }
    }

    drop(out_tx);
    let _ = writer.await;
    state.groups.leave(user_id).await;
    info!(user_id, "chat session disconnected");
}
