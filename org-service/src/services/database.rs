//! PostgreSQL data gateway.
//!
//! Every sqlx error is mapped into `AppError` at this boundary; callers
//! branch on typed results, never on raw driver errors. Lookups return
//! `Result<Option<T>, _>` so absence is never conflated with failure.

use chrono::Utc;
use service_core::error::AppError;
use sqlx::postgres::PgPool;

use crate::models::{Answer, Group, OwnerKind, Prompt, Role, Service, Snippet, User};
use crate::services::authz::ResourceKind;

/// Input for the transactional organization-creation protocol.
#[derive(Debug)]
pub struct NewOrganization {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
}

/// PostgreSQL database wrapper. The pool is shared, read-only process state;
/// each call checks out a connection for its own unit of work.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    // ==================== User Operations ====================

    /// Find user by email (case-insensitive).
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Find user by internal id.
    pub async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Replace a user's password hash. Callers must have verified the current
    /// password first; this method is the only writer of the hash column
    /// outside user creation.
    pub async fn update_user_password(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Delete a user by internal id.
    pub async fn delete_user(&self, user_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    /// Insert a member user into an existing company. Duplicate email is a
    /// conflict, not a database failure.
    pub async fn insert_member_user(
        &self,
        company_id: i64,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        role: Role,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role_code, company_id, email_verified, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, false, $7)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(role.as_str())
        .bind(company_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(unique_email_to_conflict)
    }

    // ==================== Organization Creation ====================

    /// Create an organization and its superadmin as one atomic unit:
    /// insert user, insert company owned by that user, bind the user to the
    /// company. The transaction holds one dedicated connection for its whole
    /// lifetime; dropping it on any error path rolls everything back and
    /// returns the connection to the pool.
    pub async fn create_organization(
        &self,
        org: &NewOrganization,
    ) -> Result<(i64, i64), AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role_code, company_id, email_verified, created_utc)
            VALUES ($1, $2, $3, $4, $5, NULL, false, $6)
            RETURNING id
            "#,
        )
        .bind(&org.email)
        .bind(&org.password_hash)
        .bind(&org.first_name)
        .bind(&org.last_name)
        .bind(Role::Superadmin.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(unique_email_to_conflict)?;

        let company_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO companies (company_name, owner_user_id, created_utc)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&org.company_name)
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        sqlx::query("UPDATE users SET company_id = $1 WHERE id = $2")
            .bind(company_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;

        Ok((user_id, company_id))
    }

    // ==================== Ownership Resolution ====================

    /// Resolve the company that owns a resource. Dispatch is on the closed
    /// kind enum; every resource row stores its company id, so resolution is
    /// one lookup. `None` means no such row.
    pub async fn resolve_company_id(
        &self,
        kind: ResourceKind,
        id: i64,
    ) -> Result<Option<i64>, AppError> {
        let query = match kind {
            ResourceKind::Company => "SELECT id FROM companies WHERE id = $1",
            ResourceKind::Group => "SELECT company_id FROM groups WHERE id = $1",
            ResourceKind::Service => "SELECT company_id FROM services WHERE id = $1",
            ResourceKind::Prompt => "SELECT company_id FROM prompts WHERE id = $1",
            ResourceKind::Answer => "SELECT company_id FROM answers WHERE id = $1",
            ResourceKind::Snippet => "SELECT company_id FROM snippets WHERE id = $1",
        };
        sqlx::query_scalar::<_, i64>(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Group Operations ====================

    pub async fn insert_group(&self, company_id: i64, group_name: &str) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO groups (company_id, group_name, created_utc) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(company_id)
        .bind(group_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_groups(&self, company_id: i64) -> Result<Vec<Group>, AppError> {
        sqlx::query_as::<_, Group>(
            "SELECT * FROM groups WHERE company_id = $1 ORDER BY group_name",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Rename a group, returning the updated row. `None` means the row was
    /// gone by the time the update ran.
    pub async fn update_group(
        &self,
        group_id: i64,
        group_name: &str,
    ) -> Result<Option<Group>, AppError> {
        sqlx::query_as::<_, Group>(
            "UPDATE groups SET group_name = $1 WHERE id = $2 RETURNING *",
        )
        .bind(group_name)
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn delete_group(&self, group_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Service Operations ====================

    pub async fn insert_service(
        &self,
        group_id: i64,
        company_id: i64,
        service_name: &str,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO services (group_id, company_id, service_name, created_utc)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(group_id)
        .bind(company_id)
        .bind(service_name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_services(&self, group_id: i64) -> Result<Vec<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE group_id = $1 ORDER BY service_name",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn update_service(
        &self,
        service_id: i64,
        service_name: &str,
    ) -> Result<Option<Service>, AppError> {
        sqlx::query_as::<_, Service>(
            "UPDATE services SET service_name = $1 WHERE id = $2 RETURNING *",
        )
        .bind(service_name)
        .bind(service_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn delete_service(&self, service_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(service_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Prompt Operations ====================

    pub async fn insert_prompt(
        &self,
        service_id: i64,
        company_id: i64,
        prompt_name: &str,
        prompt_text: &str,
        position: i32,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO prompts (service_id, company_id, prompt_name, prompt_text, position, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(service_id)
        .bind(company_id)
        .bind(prompt_name)
        .bind(prompt_text)
        .bind(position)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_prompts(&self, service_id: i64) -> Result<Vec<Prompt>, AppError> {
        sqlx::query_as::<_, Prompt>(
            "SELECT * FROM prompts WHERE service_id = $1 ORDER BY position, id",
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn update_prompt(
        &self,
        prompt_id: i64,
        prompt_name: &str,
        prompt_text: &str,
        position: i32,
    ) -> Result<Option<Prompt>, AppError> {
        sqlx::query_as::<_, Prompt>(
            r#"
            UPDATE prompts SET prompt_name = $1, prompt_text = $2, position = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(prompt_name)
        .bind(prompt_text)
        .bind(position)
        .bind(prompt_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn delete_prompt(&self, prompt_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM prompts WHERE id = $1")
            .bind(prompt_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Answer Operations ====================

    pub async fn insert_answer(
        &self,
        prompt_id: i64,
        company_id: i64,
        answer_text: &str,
        color: &str,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO answers (prompt_id, company_id, answer_text, color, created_utc)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(prompt_id)
        .bind(company_id)
        .bind(answer_text)
        .bind(color)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_answers(&self, prompt_id: i64) -> Result<Vec<Answer>, AppError> {
        sqlx::query_as::<_, Answer>("SELECT * FROM answers WHERE prompt_id = $1 ORDER BY id")
            .bind(prompt_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn update_answer(
        &self,
        answer_id: i64,
        answer_text: &str,
        color: &str,
    ) -> Result<Option<Answer>, AppError> {
        sqlx::query_as::<_, Answer>(
            "UPDATE answers SET answer_text = $1, color = $2 WHERE id = $3 RETURNING *",
        )
        .bind(answer_text)
        .bind(color)
        .bind(answer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn delete_answer(&self, answer_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM answers WHERE id = $1")
            .bind(answer_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Snippet Operations ====================

    pub async fn insert_snippet(
        &self,
        company_id: i64,
        owner_kind: OwnerKind,
        owner_id: i64,
        snippet_name: &str,
        markdown: &str,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO snippets (company_id, owner_kind_code, owner_id, snippet_name, markdown, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(company_id)
        .bind(owner_kind.as_str())
        .bind(owner_id)
        .bind(snippet_name)
        .bind(markdown)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn list_snippets(
        &self,
        owner_kind: OwnerKind,
        owner_id: i64,
    ) -> Result<Vec<Snippet>, AppError> {
        sqlx::query_as::<_, Snippet>(
            "SELECT * FROM snippets WHERE owner_kind_code = $1 AND owner_id = $2 ORDER BY id",
        )
        .bind(owner_kind.as_str())
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn update_snippet(
        &self,
        snippet_id: i64,
        snippet_name: &str,
        markdown: &str,
    ) -> Result<Option<Snippet>, AppError> {
        sqlx::query_as::<_, Snippet>(
            "UPDATE snippets SET snippet_name = $1, markdown = $2 WHERE id = $3 RETURNING *",
        )
        .bind(snippet_name)
        .bind(markdown)
        .bind(snippet_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    pub async fn delete_snippet(&self, snippet_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM snippets WHERE id = $1")
            .bind(snippet_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        Ok(())
    }

    // ==================== Action Operations ====================

    pub async fn insert_action(
        &self,
        company_id: i64,
        owner_kind: OwnerKind,
        owner_id: i64,
        action_kind: &str,
        snippet_id: i64,
        answer_id: Option<i64>,
    ) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO actions (company_id, owner_kind_code, owner_id, action_kind_code, snippet_id, answer_id, created_utc)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(company_id)
        .bind(owner_kind.as_str())
        .bind(owner_id)
        .bind(action_kind)
        .bind(snippet_id)
        .bind(answer_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }
}

/// Unique-violation on the email index is a caller-visible 409; everything
/// else stays an opaque persistence failure.
fn unique_email_to_conflict(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(anyhow::anyhow!("Email already registered"))
        }
        e => AppError::DatabaseError(anyhow::anyhow!(e)),
    }
}
