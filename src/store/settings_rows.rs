//! `system_configuration` rows and the persistent side of the settings service
//!
//! One row per parameter name; rows are updated in place and never deleted
//! (the admin layer rejects deletion outright).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use serde::Serialize;
use tokio_postgres::Row;

use crate::settings::SettingsBackend;
use crate::store::error::Result;

/// A configuration row as stored
#[derive(Debug, Clone, Serialize)]
pub struct ParameterRow {
    pub parameter_name: String,
    pub parameter_value: String,
    pub description: String,
    pub last_modified: DateTime<Utc>,
}

fn parse_parameter_row(row: &Row) -> ParameterRow {
    ParameterRow {
        parameter_name: row.get("parameter_name"),
        parameter_value: row.get("parameter_value"),
        description: row.get("description"),
        last_modified: row.get("last_modified"),
    }
}

/// Read one parameter value, `None` if unset
pub async fn get_parameter(pool: &Pool, name: &str) -> Result<Option<String>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT parameter_value FROM system_configuration WHERE parameter_name = $1",
            &[&name],
        )
        .await?;
    Ok(rows.first().map(|row| row.get("parameter_value")))
}

/// Upsert a parameter value, preserving any existing description
pub async fn set_parameter(pool: &Pool, name: &str, value: &str) -> Result<()> {
    let conn = pool.get().await?;
    conn.execute(
        "INSERT INTO system_configuration (parameter_name, parameter_value)
         VALUES ($1, $2)
         ON CONFLICT (parameter_name)
         DO UPDATE SET parameter_value = EXCLUDED.parameter_value, last_modified = now()",
        &[&name, &value],
    )
    .await?;
    Ok(())
}

/// Insert a parameter row only if that name isn't set yet
///
/// Returns whether a row was created, so `init-config` can report
/// created-vs-existing per parameter.
pub async fn create_parameter(
    pool: &Pool,
    name: &str,
    value: &str,
    description: &str,
) -> Result<bool> {
    let conn = pool.get().await?;
    let inserted = conn
        .execute(
            "INSERT INTO system_configuration (parameter_name, parameter_value, description)
             VALUES ($1, $2, $3)
             ON CONFLICT (parameter_name) DO NOTHING",
            &[&name, &value, &description],
        )
        .await?;
    Ok(inserted == 1)
}

/// All configuration rows, in parameter-name order
pub async fn list_parameters(pool: &Pool) -> Result<Vec<ParameterRow>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT parameter_name, parameter_value, description, last_modified
             FROM system_configuration ORDER BY parameter_name",
            &[],
        )
        .await?;
    Ok(rows.iter().map(parse_parameter_row).collect())
}

/// Settings backend reading and writing `system_configuration`
pub struct PgSettingsBackend {
    pool: Pool,
}

impl PgSettingsBackend {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsBackend for PgSettingsBackend {
    async fn read(&self, name: &str) -> Result<Option<String>> {
        get_parameter(&self.pool, name).await
    }

    async fn write(&self, name: &str, value: &str) -> Result<()> {
        set_parameter(&self.pool, name, value).await
    }
}
