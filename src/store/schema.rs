//! Idempotent schema creation
//!
//! Executed at server startup and by `init-config`. Plain DDL, no migration
//! framework: every statement is `IF NOT EXISTS` so re-running is safe.

use deadpool_postgres::Pool;

use crate::store::error::Result;

const CREATE_TABLES_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    auth_token TEXT NOT NULL UNIQUE,
    is_staff BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS system_configuration (
    id BIGSERIAL PRIMARY KEY,
    parameter_name TEXT NOT NULL UNIQUE,
    parameter_value TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    last_modified TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS agents (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    agent_type TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'offline',
    last_heartbeat TIMESTAMPTZ NOT NULL DEFAULT now(),
    capabilities JSONB NOT NULL DEFAULT '{}',
    performance_metrics JSONB NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS queries (
    id BIGSERIAL PRIMARY KEY,
    user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    query_text TEXT NOT NULL,
    query_type TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'processing',
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now(),
    execution_time DOUBLE PRECISION,
    result_count INTEGER
);
CREATE INDEX IF NOT EXISTS idx_queries_user ON queries(user_id);
CREATE INDEX IF NOT EXISTS idx_queries_status ON queries(status);

CREATE TABLE IF NOT EXISTS query_agents (
    query_id BIGINT NOT NULL REFERENCES queries(id) ON DELETE CASCADE,
    agent_id BIGINT NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
    PRIMARY KEY (query_id, agent_id)
);

CREATE TABLE IF NOT EXISTS query_results (
    id BIGSERIAL PRIMARY KEY,
    query_id BIGINT NOT NULL REFERENCES queries(id) ON DELETE CASCADE,
    agent_id BIGINT NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
    source_database TEXT NOT NULL,
    result_data JSONB NOT NULL,
    relevance_score DOUBLE PRECISION NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS idx_query_results_query ON query_results(query_id);

CREATE TABLE IF NOT EXISTS mcp_tools (
    id BIGSERIAL PRIMARY KEY,
    agent_id BIGINT NOT NULL REFERENCES agents(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'inactive',
    last_execution TIMESTAMPTZ,
    execution_count INTEGER NOT NULL DEFAULT 0,
    average_execution_time DOUBLE PRECISION NOT NULL DEFAULT 0.0,
    description TEXT
);
CREATE INDEX IF NOT EXISTS idx_mcp_tools_agent ON mcp_tools(agent_id);
"#;

/// Create all tables and indexes if they don't exist yet
pub async fn ensure_schema(pool: &Pool) -> Result<()> {
    let conn = pool.get().await?;
    conn.batch_execute(CREATE_TABLES_SQL).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_statement_is_idempotent() {
        for statement in CREATE_TABLES_SQL
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "statement is not idempotent: {}",
                statement
            );
        }
    }
}
