use axum::{extract::State, http::StatusCode, Json};
use service_core::error::AppError;

use crate::dtos::auth::{LoginRequest, RegisterOrgRequest, RegisterOrgResponse, TokenResponse};
use crate::utils::ValidatedJson;
use crate::AppState;

/// POST /orgs/register - create a company and its superadmin atomically.
pub async fn register_org(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterOrgRequest>,
) -> Result<(StatusCode, Json<RegisterOrgResponse>), AppError> {
    let response = state.auth.register_org(req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /auth/login - exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let response = state.auth.login(req).await?;
    Ok(Json(response))
}
