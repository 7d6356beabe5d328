// Handlers module

pub mod admin;
pub mod agents;
pub mod models;

pub use admin::{
    create_config_handler, delete_config_handler, list_config_handler, list_queries_handler,
    list_results_handler, list_tools_handler, update_config_handler,
};
pub use agents::{agent_detail_handler, agent_status_handler, list_agents_handler};
pub use models::list_models_handler;

use serde_json::json;
use warp::http::StatusCode;

/// JSON error body in the `{"detail": ...}` shape
pub(crate) fn detail_reply(
    status: StatusCode,
    detail: &str,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(&json!({ "detail": detail })), status)
}
