// src/models/user.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'users' table in the database.
/// Rows are created lazily on a user's first verified credential.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Stable subject identifier from the identity provider.
    pub provider_uid: String,

    /// Unique email. Also the lookup key for get-or-create resolution.
    pub email: String,

    pub display_name: String,

    /// Avatar URL supplied by the identity provider.
    pub picture: Option<String>,
}
