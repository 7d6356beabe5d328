//! Agent and tool rows
//!
//! Agents are created and updated by external workers; the web layer only
//! reads them for display, so this module is mostly listings plus the insert
//! those workers use to register.

use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::models::{
    Agent, AgentStatus, AgentStatusEntry, McpTool, ToolStatus, ToolSummary,
};
use crate::store::error::{Error, Result};

pub(crate) fn parse_agent_row(row: &Row) -> Result<Agent> {
    let status: String = row.get("status");
    Ok(Agent {
        id: row.get("id"),
        name: row.get("name"),
        agent_type: row.get("agent_type"),
        status: AgentStatus::parse(&status)?,
        last_heartbeat: row.get("last_heartbeat"),
        capabilities: row.get("capabilities"),
        performance_metrics: row.get("performance_metrics"),
    })
}

pub(crate) fn parse_tool_row(row: &Row) -> Result<McpTool> {
    let status: String = row.get("status");
    Ok(McpTool {
        id: row.get("id"),
        agent_id: row.get("agent_id"),
        name: row.get("name"),
        status: ToolStatus::parse(&status)?,
        last_execution: row.get("last_execution"),
        execution_count: row.get("execution_count"),
        average_execution_time: row.get("average_execution_time"),
        description: row.get("description"),
    })
}

/// List all registered agents
pub async fn list_agents(pool: &Pool) -> Result<Vec<Agent>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, name, agent_type, status, last_heartbeat, capabilities, performance_metrics
             FROM agents ORDER BY name",
            &[],
        )
        .await?;
    rows.iter().map(parse_agent_row).collect()
}

/// Fetch a single agent by id
pub async fn get_agent(pool: &Pool, agent_id: i64) -> Result<Agent> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, name, agent_type, status, last_heartbeat, capabilities, performance_metrics
             FROM agents WHERE id = $1",
            &[&agent_id],
        )
        .await?;
    match rows.first() {
        Some(row) => parse_agent_row(row),
        None => Err(Error::NotFound(format!("agent {}", agent_id))),
    }
}

/// Register an agent (used by external workers and tests)
pub async fn create_agent(
    pool: &Pool,
    name: &str,
    agent_type: &str,
    status: AgentStatus,
) -> Result<Agent> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO agents (name, agent_type, status)
             VALUES ($1, $2, $3)
             RETURNING id, name, agent_type, status, last_heartbeat, capabilities, performance_metrics",
            &[&name, &agent_type, &status.as_str()],
        )
        .await?;
    parse_agent_row(&row)
}

/// All tools belonging to an agent
pub async fn tools_for_agent(pool: &Pool, agent_id: i64) -> Result<Vec<McpTool>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, agent_id, name, status, last_execution, execution_count,
                    average_execution_time, description
             FROM mcp_tools WHERE agent_id = $1 ORDER BY name",
            &[&agent_id],
        )
        .await?;
    rows.iter().map(parse_tool_row).collect()
}

/// All tools across agents, for the admin listing
pub async fn list_tools(pool: &Pool, limit: i64) -> Result<Vec<McpTool>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, agent_id, name, status, last_execution, execution_count,
                    average_execution_time, description
             FROM mcp_tools ORDER BY id LIMIT $1",
            &[&limit],
        )
        .await?;
    rows.iter().map(parse_tool_row).collect()
}

/// Snapshot of every agent with its active tools, for `/api/agents/status`
pub async fn status_snapshot(pool: &Pool) -> Result<Vec<AgentStatusEntry>> {
    let agents = list_agents(pool).await?;
    let mut entries = Vec::with_capacity(agents.len());
    for agent in agents {
        let active_tools = tools_for_agent(pool, agent.id)
            .await?
            .into_iter()
            .filter(|tool| tool.status == ToolStatus::Active)
            .map(|tool| ToolSummary {
                name: tool.name,
                status: tool.status,
            })
            .collect();
        entries.push(AgentStatusEntry {
            id: agent.id,
            name: agent.name,
            agent_type: agent.agent_type,
            status: agent.status,
            last_heartbeat: Some(agent.last_heartbeat),
            active_tools,
        });
    }
    Ok(entries)
}
