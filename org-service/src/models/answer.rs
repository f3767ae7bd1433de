use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Answer {
    pub id: i64,
    pub prompt_id: i64,
    pub company_id: i64,
    pub answer_text: String,
    pub color: String,
    pub created_utc: DateTime<Utc>,
}
