// Domain entities and wire types (agents, queries, chat frames, etc.)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::error::{Error, Result};

// Agent status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Online,
    Busy,
    Error,
    Offline,
}

impl AgentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Online => "online",
            AgentStatus::Busy => "busy",
            AgentStatus::Error => "error",
            AgentStatus::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "online" => Ok(AgentStatus::Online),
            "busy" => Ok(AgentStatus::Busy),
            "error" => Ok(AgentStatus::Error),
            "offline" => Ok(AgentStatus::Offline),
            other => Err(Error::Validation(format!("Unknown agent status: {}", other))),
        }
    }
}

/// A named worker descriptor, updated externally via heartbeats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    pub name: String,
    pub agent_type: String,
    pub status: AgentStatus,
    pub last_heartbeat: DateTime<Utc>,
    pub capabilities: serde_json::Value,
    pub performance_metrics: serde_json::Value,
}

// Query lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Processing,
    Completed,
    Error,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Processing => "processing",
            QueryStatus::Completed => "completed",
            QueryStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "processing" => Ok(QueryStatus::Processing),
            "completed" => Ok(QueryStatus::Completed),
            "error" => Ok(QueryStatus::Error),
            other => Err(Error::Validation(format!("Unknown query status: {}", other))),
        }
    }
}

/// One user-submitted natural-language request and its lifecycle state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub id: i64,
    pub user_id: i64,
    pub query_text: String,
    pub query_type: String,
    pub status: QueryStatus,
    pub timestamp: DateTime<Utc>,
    pub execution_time: Option<f64>,
    pub result_count: Option<i32>,
}

/// A scored result attached to a query and the agent that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub id: i64,
    pub query_id: i64,
    pub agent_id: i64,
    pub source_database: String,
    pub result_data: serde_json::Value,
    pub relevance_score: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Active,
    Inactive,
    Error,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Active => "active",
            ToolStatus::Inactive => "inactive",
            ToolStatus::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(ToolStatus::Active),
            "inactive" => Ok(ToolStatus::Inactive),
            "error" => Ok(ToolStatus::Error),
            other => Err(Error::Validation(format!("Unknown tool status: {}", other))),
        }
    }
}

/// A named tool belonging to an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpTool {
    pub id: i64,
    pub agent_id: i64,
    pub name: String,
    pub status: ToolStatus,
    pub last_execution: Option<DateTime<Utc>>,
    pub execution_count: i32,
    pub average_execution_time: f64,
    pub description: Option<String>,
}

/// An authenticated account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
}

// ---------------------------------------------------------------------------
// Websocket wire types
// ---------------------------------------------------------------------------

/// Inbound chat frame: `{"message": str, "model": str?}`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub model: Option<String>,
}

/// Outbound chat frames, tagged by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatFrame {
    /// Receipt acknowledgment sent before generation starts
    QueryReceived { query_id: i64, message: String },
    /// Final result frame: generated text on success, error string otherwise
    ProcessingUpdate {
        message: String,
        model_used: String,
        success: bool,
    },
    /// Status change broadcast to all sockets of the same user
    QueryUpdate { query_id: i64, status: QueryStatus },
    /// Generic per-message failure; the session stays open
    Error { message: String },
}

// ---------------------------------------------------------------------------
// HTTP response types
// ---------------------------------------------------------------------------

/// One installed model as reported by the runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub size: i64,
    pub modified: String,
}

/// `GET /api/ollama-models` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListResponse {
    pub models: Vec<ModelInfo>,
    pub success: bool,
}

/// `GET /api/ollama-models` failure body (paired with a 500 status)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelListError {
    pub error: String,
    pub models: Vec<ModelInfo>,
    pub success: bool,
}

/// One entry of the agent status snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatusEntry {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    pub status: AgentStatus,
    pub last_heartbeat: Option<DateTime<Utc>>,
    pub active_tools: Vec<ToolSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub status: ToolStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatusResponse {
    pub agents: Vec<AgentStatusEntry>,
}
