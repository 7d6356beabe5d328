//! Shared application state handed to every route

use std::sync::Arc;

use crate::chat::ChatGroups;
use crate::ollama::{OllamaClient, OllamaError};
use crate::settings::Settings;
use crate::store::settings_rows::PgSettingsBackend;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub settings: Settings,
    pub groups: Arc<ChatGroups>,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        let settings = Settings::new(Arc::new(PgSettingsBackend::new(store.pool().clone())));
        Self {
            store,
            settings,
            groups: Arc::new(ChatGroups::new()),
        }
    }

    /// Build a model client from the current configuration values
    ///
    /// Constructed per use so host/timeout changes made through the admin API
    /// apply to new requests and new chat connections without a restart; a
    /// chat session keeps the client it was built with until it reconnects.
    pub async fn model_service(&self) -> Result<OllamaClient, OllamaError> {
        let ollama = self.settings.ollama().await;
        OllamaClient::new(ollama.host, ollama.timeout_secs)
    }
}
