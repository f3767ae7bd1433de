use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Prompt {
    pub id: i64,
    pub service_id: i64,
    pub company_id: i64,
    pub prompt_name: String,
    pub prompt_text: String,
    pub position: i32,
    pub created_utc: DateTime<Utc>,
}
