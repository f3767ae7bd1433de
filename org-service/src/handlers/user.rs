use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;

use crate::dtos::auth::{
    ChangePasswordRequest, CreateUserRequest, DeleteAccountRequest, UserCreatedResponse,
};
use crate::middleware::AuthUser;
use crate::models::Role;
use crate::services::authz::require_role;
use crate::utils::ValidatedJson;
use crate::AppState;

/// PUT /auth/password - rotate the caller's own password.
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    state
        .auth
        .change_password(&caller, req.current_password, req.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/me - delete the caller's own account.
pub async fn delete_me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(req): ValidatedJson<DeleteAccountRequest>,
) -> Result<StatusCode, AppError> {
    state.auth.delete_account(&caller, req.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /users - create a member user in the caller's company.
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), AppError> {
    require_role(&caller, Role::Admin)?;
    let response = state.auth.create_member(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
