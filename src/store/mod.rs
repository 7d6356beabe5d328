//! PostgreSQL persistence layer
//!
//! A pooled client over plain SQL, organized the same way on every table:
//! a row parser plus a handful of free functions, re-exported through the
//! [`Store`] facade that the handlers and the chat session hold.

pub mod agents;
pub mod connection;
pub mod error;
pub mod queries;
pub mod schema;
pub mod settings_rows;
pub mod users;

pub use connection::StoreConfig;
pub use error::{Error, Result};
pub use settings_rows::ParameterRow;

use deadpool_postgres::Pool;

use crate::models::{
    Agent, AgentStatus, AgentStatusEntry, McpTool, Query, QueryResult, QueryStatus, User,
};

/// Pooled database client
#[derive(Clone)]
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Build the pool and verify one connection can be checked out
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let pool = config.build_pool()?;
        let _conn = pool.get().await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by tests)
    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Create all tables if they don't exist yet
    pub async fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.pool).await
    }

    // Users

    pub async fn create_user(
        &self,
        username: &str,
        auth_token: &str,
        is_staff: bool,
    ) -> Result<User> {
        users::create_user(&self.pool, username, auth_token, is_staff).await
    }

    pub async fn find_user_by_token(&self, auth_token: &str) -> Result<Option<User>> {
        users::find_by_token(&self.pool, auth_token).await
    }

    // Agents and tools

    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        agents::list_agents(&self.pool).await
    }

    pub async fn get_agent(&self, agent_id: i64) -> Result<Agent> {
        agents::get_agent(&self.pool, agent_id).await
    }

    pub async fn create_agent(
        &self,
        name: &str,
        agent_type: &str,
        status: AgentStatus,
    ) -> Result<Agent> {
        agents::create_agent(&self.pool, name, agent_type, status).await
    }

    pub async fn tools_for_agent(&self, agent_id: i64) -> Result<Vec<McpTool>> {
        agents::tools_for_agent(&self.pool, agent_id).await
    }

    pub async fn list_tools(&self, limit: i64) -> Result<Vec<McpTool>> {
        agents::list_tools(&self.pool, limit).await
    }

    pub async fn agent_status_snapshot(&self) -> Result<Vec<AgentStatusEntry>> {
        agents::status_snapshot(&self.pool).await
    }

    // Queries and results

    pub async fn create_query(
        &self,
        user_id: i64,
        query_text: &str,
        query_type: &str,
    ) -> Result<Query> {
        queries::create_query(&self.pool, user_id, query_text, query_type).await
    }

    pub async fn finish_query(
        &self,
        query_id: i64,
        status: QueryStatus,
        execution_time: f64,
    ) -> Result<()> {
        queries::finish_query(&self.pool, query_id, status, execution_time).await
    }

    pub async fn assign_agent(&self, query_id: i64, agent_id: i64) -> Result<()> {
        queries::assign_agent(&self.pool, query_id, agent_id).await
    }

    pub async fn list_queries(&self, limit: i64) -> Result<Vec<Query>> {
        queries::list_queries(&self.pool, limit).await
    }

    pub async fn add_result(
        &self,
        query_id: i64,
        agent_id: i64,
        source_database: &str,
        result_data: &serde_json::Value,
        relevance_score: f64,
    ) -> Result<QueryResult> {
        queries::add_result(
            &self.pool,
            query_id,
            agent_id,
            source_database,
            result_data,
            relevance_score,
        )
        .await
    }

    pub async fn results_for_query(&self, query_id: i64) -> Result<Vec<QueryResult>> {
        queries::results_for_query(&self.pool, query_id).await
    }

    pub async fn list_results(&self, limit: i64) -> Result<Vec<QueryResult>> {
        queries::list_results(&self.pool, limit).await
    }

    // Configuration rows

    pub async fn get_parameter(&self, name: &str) -> Result<Option<String>> {
        settings_rows::get_parameter(&self.pool, name).await
    }

    pub async fn set_parameter(&self, name: &str, value: &str) -> Result<()> {
        settings_rows::set_parameter(&self.pool, name, value).await
    }

    pub async fn create_parameter(
        &self,
        name: &str,
        value: &str,
        description: &str,
    ) -> Result<bool> {
        settings_rows::create_parameter(&self.pool, name, value, description).await
    }

    pub async fn list_parameters(&self) -> Result<Vec<ParameterRow>> {
        settings_rows::list_parameters(&self.pool).await
    }
}
