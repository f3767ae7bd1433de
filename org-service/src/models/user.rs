//! User model - company-scoped accounts.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::Role;

/// User entity. `company_id` is nullable only inside the organization
/// creation transaction, where the superadmin row is inserted before its
/// company exists.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role_code: String,
    pub company_id: Option<i64>,
    pub email_verified: bool,
    pub created_utc: DateTime<Utc>,
}

impl User {
    /// Parse the stored role code. Unknown codes fall back to the least
    /// privileged role.
    pub fn role(&self) -> Role {
        self.role_code.parse().unwrap_or(Role::User)
    }
}
