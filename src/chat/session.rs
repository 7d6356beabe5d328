//! Chat session message handling
//!
//! One `ChatSession` exists per accepted websocket connection. The socket
//! plumbing lives in [`crate::chat::run`]; everything here works against
//! traits so the receive cycle can be exercised without a socket, a database,
//! or a model runtime.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::chat::groups::{ChatGroups, GroupEvent};
use crate::models::{ChatFrame, ChatRequest, Query, QueryStatus, User};
use crate::ollama::{normalize_model_name, ModelService};
use crate::settings::Settings;
use crate::store::error::Result as StoreResult;
use crate::store::Store;

/// System prompt applied to every chat generation
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful biomedical research assistant. \
     Maintain context from the conversation history when answering.";

/// Persistence seam for query lifecycle records
#[async_trait]
pub trait QueryJournal: Send + Sync {
    /// Insert a query row with status `processing`
    async fn open(&self, user_id: i64, query_text: &str) -> StoreResult<Query>;

    /// Move the row to its terminal status
    async fn close(
        &self,
        query_id: i64,
        status: QueryStatus,
        execution_time: f64,
    ) -> StoreResult<()>;
}

#[async_trait]
impl QueryJournal for Store {
    async fn open(&self, user_id: i64, query_text: &str) -> StoreResult<Query> {
        self.create_query(user_id, query_text, "natural_language").await
    }

    async fn close(
        &self,
        query_id: i64,
        status: QueryStatus,
        execution_time: f64,
    ) -> StoreResult<()> {
        self.finish_query(query_id, status, execution_time).await
    }
}

/// State for one authenticated chat connection
pub struct ChatSession {
    id: Uuid,
    user: User,
    journal: Arc<dyn QueryJournal>,
    model_service: Arc<dyn ModelService>,
    settings: Settings,
    groups: Arc<ChatGroups>,
}

impl ChatSession {
    pub fn new(
        user: User,
        journal: Arc<dyn QueryJournal>,
        model_service: Arc<dyn ModelService>,
        settings: Settings,
        groups: Arc<ChatGroups>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            journal,
            model_service,
            settings,
            groups,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Handle one inbound text frame
    ///
    /// A valid message produces exactly two frames on `out`: the receipt
    /// acknowledgment (sent before generation starts) and the result frame.
    /// A frame without a `message` field produces nothing. Any failure in the
    /// cycle is converted to a single `error` frame; the session stays open.
    pub async fn handle_text(&self, text: &str, out: &mpsc::Sender<ChatFrame>) {
        if let Err(message) = self.receive_cycle(text, out).await {
            let _ = out.send(ChatFrame::Error { message }).await;
        }
    }

    async fn receive_cycle(
        &self,
        text: &str,
        out: &mpsc::Sender<ChatFrame>,
    ) -> Result<(), String> {
        let request: ChatRequest = serde_json::from_str(text).map_err(|e| e.to_string())?;

        // Missing message field: silently ignored, nothing persisted
        let Some(message) = request.message.filter(|m| !m.is_empty()) else {
            return Ok(());
        };

        let model = match request.model {
            Some(model) => model,
            None => {
                let ollama = self.settings.ollama().await;
                normalize_model_name(&ollama.biomedical_model)
            }
        };

        let query = self
            .journal
            .open(self.user.id, &message)
            .await
            .map_err(|e| e.to_string())?;

        let _ = out
            .send(ChatFrame::QueryReceived {
                query_id: query.id,
                message: message.clone(),
            })
            .await;

        // The only suspension point of the cycle outside the database
        let started = Instant::now();
        let outcome = self
            .model_service
            .generate(&message, &model, Some(CHAT_SYSTEM_PROMPT))
            .await;
        let execution_time = started.elapsed().as_secs_f64();

        let (reply, success, status) = match outcome {
            Ok(response) => (response, true, QueryStatus::Completed),
            Err(e) => (e.to_string(), false, QueryStatus::Error),
        };

        if let Err(e) = self.journal.close(query.id, status, execution_time).await {
            warn!(query_id = query.id, error = %e, "failed to finalize query row");
        }

        self.groups
            .publish(
                self.user.id,
                GroupEvent {
                    origin: self.id,
                    frame: ChatFrame::QueryUpdate {
                        query_id: query.id,
                        status,
                    },
                },
            )
            .await;

        let _ = out
            .send(ChatFrame::ProcessingUpdate {
                message: reply,
                model_used: model,
                success,
            })
            .await;

        Ok(())
    }
}
