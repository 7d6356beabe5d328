//! User rows: creation and token lookup
//!
//! Tokens are opaque strings handed to operators out of band; the websocket
//! handshake and the admin API authenticate by matching `users.auth_token`.

use deadpool_postgres::Pool;
use tokio_postgres::Row;

use crate::models::User;
use crate::store::error::Result;

pub(crate) fn parse_user_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        is_staff: row.get("is_staff"),
    }
}

/// Create a user account with the given authentication token
pub async fn create_user(
    pool: &Pool,
    username: &str,
    auth_token: &str,
    is_staff: bool,
) -> Result<User> {
    let conn = pool.get().await?;
    let row = conn
        .query_one(
            "INSERT INTO users (username, auth_token, is_staff)
             VALUES ($1, $2, $3)
             RETURNING id, username, is_staff",
            &[&username, &auth_token, &is_staff],
        )
        .await?;
    Ok(parse_user_row(&row))
}

/// Look up the user owning an authentication token
///
/// Returns `None` for unknown tokens; this is the "anonymous" case that makes
/// the chat handshake close the socket.
pub async fn find_by_token(pool: &Pool, auth_token: &str) -> Result<Option<User>> {
    let conn = pool.get().await?;
    let rows = conn
        .query(
            "SELECT id, username, is_staff FROM users WHERE auth_token = $1",
            &[&auth_token],
        )
        .await?;
    Ok(rows.first().map(parse_user_row))
}
