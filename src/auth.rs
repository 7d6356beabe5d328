//! Token authentication
//!
//! Accounts carry an opaque token handed out by `create-user`. The websocket
//! handshake passes it as a `token` query parameter; HTTP endpoints use a
//! standard `Authorization: Bearer` header.

use crate::models::User;
use crate::store::Store;

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
}

/// Resolve a bearer header to a user, `None` for anonymous
pub async fn from_bearer(store: &Store, header: Option<&str>) -> Option<User> {
    let token = bearer_token(header?)?;
    store.find_user_by_token(token).await.ok().flatten()
}

/// Like [`from_bearer`] but additionally requires staff status
pub async fn staff_from_bearer(store: &Store, header: Option<&str>) -> Option<User> {
    from_bearer(store, header).await.filter(|user| user.is_staff)
}
