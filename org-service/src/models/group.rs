use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Group entity, owned directly by a company.
#[derive(Debug, Clone, FromRow)]
pub struct Group {
    pub id: i64,
    pub company_id: i64,
    pub group_name: String,
    pub created_utc: DateTime<Utc>,
}
