// Agent listing / detail / status handlers

use std::convert::Infallible;

use serde_json::json;
use warp::http::StatusCode;

use crate::auth;
use crate::handlers::detail_reply;
use crate::models::AgentStatusResponse;
use crate::state::AppState;
use crate::store::Error;

/// GET /api/agents/status — every agent with its active tools
pub async fn agent_status_handler(
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(
            StatusCode::UNAUTHORIZED,
            "authentication required",
        ));
    }

    match state.store.agent_status_snapshot().await {
        Ok(agents) => Ok(warp::reply::with_status(
            warp::reply::json(&AgentStatusResponse { agents }),
            StatusCode::OK,
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}

/// GET /api/agents — all registered agents
pub async fn list_agents_handler(
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(
            StatusCode::UNAUTHORIZED,
            "authentication required",
        ));
    }

    match state.store.list_agents().await {
        Ok(agents) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "agents": agents })),
            StatusCode::OK,
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}

/// GET /api/agents/{id} — one agent with all its tools
pub async fn agent_detail_handler(
    agent_id: i64,
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(
            StatusCode::UNAUTHORIZED,
            "authentication required",
        ));
    }

    let agent = match state.store.get_agent(agent_id).await {
        Ok(agent) => agent,
        Err(Error::NotFound(_)) => {
            return Ok(detail_reply(StatusCode::NOT_FOUND, "agent not found"))
        }
        Err(e) => {
            return Ok(detail_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
            ))
        }
    };

    match state.store.tools_for_agent(agent_id).await {
        Ok(tools) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "agent": agent, "tools": tools })),
            StatusCode::OK,
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}
