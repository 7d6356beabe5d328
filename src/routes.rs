// Route definitions

use std::collections::HashMap;
use std::convert::Infallible;

use warp::Filter;

use crate::chat;
use crate::handlers;
use crate::state::AppState;

fn with_state(
    state: AppState,
) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

fn auth_header() -> impl Filter<Extract = (Option<String>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization")
}

pub fn configure_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // GET /api/ollama-models
    let ollama_models = warp::path!("api" / "ollama-models")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::list_models_handler);

    // GET /api/agents/status
    let agent_status = warp::path!("api" / "agents" / "status")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::agent_status_handler);

    // GET /api/agents
    let agent_list = warp::path!("api" / "agents")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::list_agents_handler);

    // GET /api/agents/{id}
    let agent_detail = warp::path!("api" / "agents" / i64)
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::agent_detail_handler);

    // GET /api/admin/config
    let admin_config_list = warp::path!("api" / "admin" / "config")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::list_config_handler);

    // POST /api/admin/config
    let admin_config_create = warp::path!("api" / "admin" / "config")
        .and(warp::post())
        .and(warp::body::json())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::create_config_handler);

    // PUT /api/admin/config/{name}
    let admin_config_update = warp::path!("api" / "admin" / "config" / String)
        .and(warp::put())
        .and(warp::body::json())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::update_config_handler);

    // DELETE /api/admin/config/{name} — always rejected
    let admin_config_delete = warp::path!("api" / "admin" / "config" / String)
        .and(warp::delete())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::delete_config_handler);

    // GET /api/admin/{queries,results,tools}
    let admin_queries = warp::path!("api" / "admin" / "queries")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::list_queries_handler);

    let admin_results = warp::path!("api" / "admin" / "results")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::list_results_handler);

    let admin_tools = warp::path!("api" / "admin" / "tools")
        .and(warp::get())
        .and(auth_header())
        .and(with_state(state.clone()))
        .and_then(handlers::list_tools_handler);

    // GET /ws/chat?token=... — websocket chat, one session per connection
    let chat_ws = warp::path!("ws" / "chat")
        .and(warp::ws())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_state(state))
        .map(
            |ws: warp::ws::Ws, query: HashMap<String, String>, state: AppState| {
                let token = query.get("token").cloned();
                ws.on_upgrade(move |socket| chat::run(socket, state, token))
            },
        );

    ollama_models
        .or(agent_status)
        .or(agent_list)
        .or(agent_detail)
        .or(admin_config_list)
        .or(admin_config_create)
        .or(admin_config_update)
        .or(admin_config_delete)
        .or(admin_queries)
        .or(admin_results)
        .or(admin_tools)
        .or(chat_ws)
}
