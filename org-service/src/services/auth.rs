//! Authentication and account lifecycle orchestration.

use service_core::error::AppError;

use crate::dtos::auth::{
    CreateUserRequest, LoginRequest, RegisterOrgRequest, RegisterOrgResponse, TokenResponse,
    UserCreatedResponse,
};
use crate::models::Role;
use crate::services::authz::AuthContext;
use crate::services::database::{Database, NewOrganization};
use crate::services::id_codec::IdCodec;
use crate::services::token::TokenService;
use crate::utils::{hash_password, verify_password, Password, PasswordHashString};

#[derive(Clone)]
pub struct AuthService {
    db: Database,
    tokens: TokenService,
    codec: IdCodec,
}

impl AuthService {
    pub fn new(db: Database, tokens: TokenService, codec: IdCodec) -> Self {
        Self { db, tokens, codec }
    }

    /// Register an organization with its superadmin. The whole unit is one
    /// transaction in the gateway; on failure nothing persists.
    pub async fn register_org(
        &self,
        req: RegisterOrgRequest,
    ) -> Result<RegisterOrgResponse, AppError> {
        let hash = hash_blocking(Password::new(req.password)).await?;
        let org = NewOrganization {
            email: req.email,
            password_hash: hash.into_string(),
            first_name: req.first_name,
            last_name: req.last_name,
            company_name: req.company_name,
        };
        let (user_id, company_id) = self.db.create_organization(&org).await?;

        tracing::info!(company_id, "Organization registered");
        Ok(RegisterOrgResponse {
            user_id: self.codec.encode(user_id),
            company_id: self.codec.encode(company_id),
        })
    }

    /// Login with email and password. Unknown email and wrong password are
    /// the same 401 so account existence never leaks.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = match self.db.find_user_by_email(&req.email).await? {
            Some(user) => user,
            None => {
                return Err(AppError::Unauthorized(anyhow::anyhow!(
                    "Invalid email or password"
                )))
            }
        };

        let matches = verify_blocking(
            Password::new(req.password),
            PasswordHashString::new(user.password_hash.clone()),
        )
        .await?;
        if !matches {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "Invalid email or password"
            )));
        }

        let company_id = user.company_id.ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "User {} has no company binding",
                user.id
            ))
        })?;

        let token = self.tokens.issue(
            &self.codec.encode(user.id),
            &self.codec.encode(company_id),
            user.role(),
            &user.email,
        )?;

        Ok(TokenResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.ttl_seconds(),
        })
    }

    /// Rotate the caller's password. Requires proof of the current password;
    /// there is no unauthenticated overwrite path.
    pub async fn change_password(
        &self,
        caller: &AuthContext,
        current_password: String,
        new_password: String,
    ) -> Result<(), AppError> {
        let user = self
            .db
            .find_user_by_id(caller.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Unknown user")))?;

        let matches = verify_blocking(
            Password::new(current_password),
            PasswordHashString::new(user.password_hash),
        )
        .await?;
        if !matches {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "Current password is incorrect"
            )));
        }

        let hash = hash_blocking(Password::new(new_password)).await?;
        self.db
            .update_user_password(caller.user_id, hash.as_str())
            .await
    }

    /// Delete the caller's own account, gated on the current password.
    pub async fn delete_account(
        &self,
        caller: &AuthContext,
        password: String,
    ) -> Result<(), AppError> {
        let user = self
            .db
            .find_user_by_id(caller.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Unknown user")))?;

        let matches = verify_blocking(
            Password::new(password),
            PasswordHashString::new(user.password_hash),
        )
        .await?;
        if !matches {
            return Err(AppError::Unauthorized(anyhow::anyhow!(
                "Password is incorrect"
            )));
        }

        self.db.delete_user(caller.user_id).await
    }

    /// Create a member user inside the caller's own company. The company
    /// binding comes from the caller's claims, never from the request body.
    /// Minting an admin requires a superadmin caller; superadmins are only
    /// ever created through organization registration.
    pub async fn create_member(
        &self,
        caller: &AuthContext,
        req: CreateUserRequest,
    ) -> Result<UserCreatedResponse, AppError> {
        if req.role == Role::Superadmin {
            return Err(AppError::Forbidden(anyhow::anyhow!("Access denied")));
        }
        if req.role == Role::Admin && caller.role < Role::Superadmin {
            return Err(AppError::Forbidden(anyhow::anyhow!("Access denied")));
        }

        let hash = hash_blocking(Password::new(req.password)).await?;
        let user_id = self
            .db
            .insert_member_user(
                caller.company_id,
                &req.email,
                hash.as_str(),
                &req.first_name,
                &req.last_name,
                req.role,
            )
            .await?;

        Ok(UserCreatedResponse {
            id: self.codec.encode(user_id),
            email: req.email,
            role: req.role,
        })
    }
}

/// Argon2 hashing is CPU-bound; run it off the async request path.
async fn hash_blocking(password: Password) -> Result<PasswordHashString, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Hashing task failed: {}", e)))?
}

async fn verify_blocking(
    password: Password,
    hash: PasswordHashString,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Verification task failed: {}", e)))?
}
