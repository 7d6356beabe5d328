//! Query and result rows
//!
//! A query row is inserted the moment a chat message arrives (status
//! `processing`) and finished when generation returns. Results are scored
//! rows attached to a query and the agent that produced them, always listed
//! in descending relevance order.

use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::models::{Query, QueryResult, QueryStatus};
use crate::store::error::{Error, Result};

pub(crate) fn parse_query_row(row: &Row) -> Result<Query> {
    let status: String = row.get("status");
    Ok(Query {
        id: row.get("id"),
        user_id: row.get("user_id"),
        query_text: row.get("query_text"),
        query_type: row.get("query_type"),
        status: QueryStatus::parse(&status)?,
        timestamp: row.get("timestamp"),
        execution_time: row.get("execution_time"),
        result_count: row.get("result_count"),
    })
}

fn parse_result_row(row: &Row) -> QueryResult {
    QueryResult {
        id: row.get("id"),
        query_id: row.get("query_id"),
        agent_id: row.get("agent_id"),
        source_database: row.get("source_database"),
        result_data: row.get("result_data"),
        relevance_score: row.get("relevance_score"),
        timestamp: row.get("timestamp"),
    }
}

/// Persist a new query with status `processing`
pub async fn create_query(
    pool: &Pool,
    user_id: i64,
    query_text: &str,
    query_type: &str,
) -> Result<Query> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO queries (user_id, query_text, query_type, status)
             VALUES ($1, $2, $3, 'processing')
             RETURNING id, user_id, query_text, query_type, status, timestamp,
                       execution_time, result_count",
            &[&user_id, &query_text, &query_type],
        )
        .await?;
    parse_query_row(&row)
}

/// Move a query to its terminal status, recording how long it took
pub async fn finish_query(
    pool: &Pool,
    query_id: i64,
    status: QueryStatus,
    execution_time: f64,
) -> Result<()> {
    let conn = pool.get().await?;
    let updated = conn
        .execute(
            "UPDATE queries SET status = $2, execution_time = $3 WHERE id = $1",
            &[&query_id, &status.as_str(), &execution_time],
        )
        .await?;
    if updated == 0 {
        return Err(Error::NotFound(format!("query {}", query_id)));
    }
    Ok(())
}

/// Associate an agent with a query (many-to-many)
pub async fn assign_agent(pool: &Pool, query_id: i64, agent_id: i64) -> Result<()> {
    let conn = pool.get().await?;
    conn.execute(
        "INSERT INTO query_agents (query_id, agent_id) VALUES ($1, $2)
         ON CONFLICT DO NOTHING",
        &[&query_id, &agent_id],
    )
    .await?;
    Ok(())
}

/// Most recent queries first, for the admin listing
pub async fn list_queries(pool: &Pool, limit: i64) -> Result<Vec<Query>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, user_id, query_text, query_type, status, timestamp,
                    execution_time, result_count
             FROM queries ORDER BY timestamp DESC LIMIT $1",
            &[&limit],
        )
        .await?;
    rows.iter().map(parse_query_row).collect()
}

/// Attach a scored result to a query
pub async fn add_result(
    pool: &Pool,
    query_id: i64,
    agent_id: i64,
    source_database: &str,
    result_data: &serde_json::Value,
    relevance_score: f64,
) -> Result<QueryResult> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO query_results (query_id, agent_id, source_database, result_data, relevance_score)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, query_id, agent_id, source_database, result_data, relevance_score, timestamp",
            &[&query_id, &agent_id, &source_database, result_data, &relevance_score],
        )
        .await?;
    Ok(parse_result_row(&row))
}

/// Results for one query, best match first
pub async fn results_for_query(pool: &Pool, query_id: i64) -> Result<Vec<QueryResult>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, query_id, agent_id, source_database, result_data, relevance_score, timestamp
             FROM query_results WHERE query_id = $1 ORDER BY relevance_score DESC",
            &[&query_id],
        )
        .await?;
    Ok(rows.iter().map(parse_result_row).collect())
}

/// All results across queries, for the admin listing
pub async fn list_results(pool: &Pool, limit: i64) -> Result<Vec<QueryResult>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, query_id, agent_id, source_database, result_data, relevance_score, timestamp
             FROM query_results ORDER BY id DESC LIMIT $1",
            &[&limit],
        )
        .await?;
    Ok(rows.iter().map(parse_result_row).collect())
}
