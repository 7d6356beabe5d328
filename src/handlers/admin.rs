//! Administrative JSON API over configuration and the other tables
//!
//! Staff-only. Configuration rows get full CRUD with two administrative
//! behaviors preserved: the NCBI API key is masked in listings, and deletion
//! is always rejected. The remaining entities are read-only listings.

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use warp::http::StatusCode;

use crate::auth;
use crate::handlers::detail_reply;
use crate::settings::Parameter;
use crate::state::AppState;

const ADMIN_LIST_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct ConfigUpdateRequest {
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigCreateRequest {
    pub parameter_name: String,
    pub parameter_value: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
struct ConfigEntry {
    parameter_name: String,
    label: &'static str,
    value: String,
    description: String,
    last_modified: DateTime<Utc>,
}

/// Mask secret parameter values for display: all but the last four characters
pub fn masked_value(name: &str, value: &str) -> String {
    if name == Parameter::NcbiApiKey.as_str() && !value.is_empty() {
        let chars: Vec<char> = value.chars().collect();
        let visible_from = chars.len().saturating_sub(4);
        let suffix: String = chars[visible_from..].iter().collect();
        format!("********{}", suffix)
    } else {
        value.to_string()
    }
}

/// GET /api/admin/config
pub async fn list_config_handler(
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::staff_from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(StatusCode::FORBIDDEN, "staff access required"));
    }

    match state.store.list_parameters().await {
        Ok(rows) => {
            let parameters: Vec<ConfigEntry> = rows
                .into_iter()
                .map(|row| ConfigEntry {
                    label: Parameter::parse(&row.parameter_name)
                        .map(|p| p.label())
                        .unwrap_or(""),
                    value: masked_value(&row.parameter_name, &row.parameter_value),
                    parameter_name: row.parameter_name,
                    description: row.description,
                    last_modified: row.last_modified,
                })
                .collect();
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({ "parameters": parameters })),
                StatusCode::OK,
            ))
        }
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}

/// PUT /api/admin/config/{name}
///
/// Writes go through the settings service so the cache stays in step with
/// the table (write-through).
pub async fn update_config_handler(
    name: String,
    request: ConfigUpdateRequest,
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::staff_from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(StatusCode::FORBIDDEN, "staff access required"));
    }

    let Some(param) = Parameter::parse(&name) else {
        return Ok(detail_reply(
            StatusCode::BAD_REQUEST,
            "unknown configuration parameter",
        ));
    };

    match state.settings.set(param, &request.value).await {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "parameter_name": param.as_str(),
                "value": masked_value(param.as_str(), &request.value),
            })),
            StatusCode::OK,
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}

/// POST /api/admin/config — create a row only for a not-yet-set parameter
pub async fn create_config_handler(
    request: ConfigCreateRequest,
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::staff_from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(StatusCode::FORBIDDEN, "staff access required"));
    }

    let Some(param) = Parameter::parse(&request.parameter_name) else {
        return Ok(detail_reply(
            StatusCode::BAD_REQUEST,
            "unknown configuration parameter",
        ));
    };

    match state
        .store
        .create_parameter(param.as_str(), &request.parameter_value, &request.description)
        .await
    {
        Ok(true) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "parameter_name": param.as_str() })),
            StatusCode::CREATED,
        )),
        Ok(false) => Ok(detail_reply(
            StatusCode::CONFLICT,
            "parameter is already configured",
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}

/// DELETE /api/admin/config/{name} — configuration rows are never deleted
pub async fn delete_config_handler(
    _name: String,
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::staff_from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(StatusCode::FORBIDDEN, "staff access required"));
    }

    Ok(detail_reply(
        StatusCode::FORBIDDEN,
        "configuration parameters cannot be deleted",
    ))
}

/// GET /api/admin/queries
pub async fn list_queries_handler(
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::staff_from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(StatusCode::FORBIDDEN, "staff access required"));
    }

    match state.store.list_queries(ADMIN_LIST_LIMIT).await {
        Ok(queries) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "queries": queries })),
            StatusCode::OK,
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}

/// GET /api/admin/results
pub async fn list_results_handler(
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::staff_from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(StatusCode::FORBIDDEN, "staff access required"));
    }

    match state.store.list_results(ADMIN_LIST_LIMIT).await {
        Ok(results) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "results": results })),
            StatusCode::OK,
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}

/// GET /api/admin/tools
pub async fn list_tools_handler(
    auth_header: Option<String>,
    state: AppState,
) -> Result<impl warp::Reply, Infallible> {
    if auth::staff_from_bearer(&state.store, auth_header.as_deref()).await.is_none() {
        return Ok(detail_reply(StatusCode::FORBIDDEN, "staff access required"));
    }

    match state.store.list_tools(ADMIN_LIST_LIMIT).await {
        Ok(tools) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "tools": tools })),
            StatusCode::OK,
        )),
        Err(e) => Ok(detail_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            &e.to_string(),
        )),
    }
}
