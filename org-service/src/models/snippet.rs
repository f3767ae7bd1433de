//! Snippet model with a polymorphic owner.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Markdown snippet attached to a company, group, or service. The owner is
/// recorded as a kind tag plus the owner's id; `company_id` is always the
/// resolved tenant regardless of owner kind.
#[derive(Debug, Clone, FromRow)]
pub struct Snippet {
    pub id: i64,
    pub company_id: i64,
    pub owner_kind_code: String,
    pub owner_id: i64,
    pub snippet_name: String,
    pub markdown: String,
    pub created_utc: DateTime<Utc>,
}
