use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Service entity. `company_id` is denormalized from the owning group so the
/// ownership check is a single lookup.
#[derive(Debug, Clone, FromRow)]
pub struct Service {
    pub id: i64,
    pub group_id: i64,
    pub company_id: i64,
    pub service_name: String,
    pub created_utc: DateTime<Utc>,
}
