// GET /api/ollama-models handler

use std::convert::Infallible;

use tracing::warn;
use warp::http::StatusCode;

use crate::models::{ModelInfo, ModelListError, ModelListResponse};
use crate::ollama::{ModelService, OllamaError};
use crate::state::AppState;

/// List the models installed in the runtime
///
/// Mirrors the runtime's inventory as
/// `{"models": [{"name","size","modified"}...], "success": true}`; any
/// failure produces a 500 with an empty list and the error string.
pub async fn list_models_handler(state: AppState) -> Result<impl warp::Reply, Infallible> {
    match fetch_models(&state).await {
        Ok(models) => Ok(warp::reply::with_status(
            warp::reply::json(&ModelListResponse {
                models,
                success: true,
            }),
            StatusCode::OK,
        )),
        Err(e) => {
            warn!(error = %e, "model listing failed");
            Ok(warp::reply::with_status(
                warp::reply::json(&ModelListError {
                    error: e.to_string(),
                    models: Vec::new(),
                    success: false,
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn fetch_models(state: &AppState) -> Result<Vec<ModelInfo>, OllamaError> {
    let client = state.model_service().await?;
    client.list_models().await
}
