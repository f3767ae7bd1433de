use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::resources::{GroupListResponse, GroupRequest, GroupResponse};
use crate::middleware::AuthUser;
use crate::models::Role;
use crate::services::authz::require_role;
use crate::services::ResourceKind;
use crate::utils::ValidatedJson;
use crate::AppState;

/// GET /groups - list the caller's company groups.
pub async fn list_groups(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<GroupListResponse>, AppError> {
    let groups = state.db.list_groups(caller.company_id).await?;
    let groups = groups
        .into_iter()
        .map(|g| GroupResponse {
            id: state.codec.encode(g.id),
            group_name: g.group_name,
        })
        .collect();
    Ok(Json(GroupListResponse { groups }))
}

/// POST /groups - create a group in the caller's company.
pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(req): ValidatedJson<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    require_role(&caller, Role::Admin)?;
    let id = state
        .db
        .insert_group(caller.company_id, &req.group_name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(GroupResponse {
            id: state.codec.encode(id),
            group_name: req.group_name,
        }),
    ))
}

/// PUT /groups/:group_id - rename a group and echo it back.
pub async fn update_group(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(group_id): Path<String>,
    ValidatedJson(req): ValidatedJson<GroupRequest>,
) -> Result<Json<GroupResponse>, AppError> {
    let group_id = state.codec.decode_request(&group_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Group, group_id)
        .await?;
    let group = state
        .db
        .update_group(group_id, &req.group_name)
        .await?
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("Access denied")))?;
    Ok(Json(GroupResponse {
        id: state.codec.encode(group.id),
        group_name: group.group_name,
    }))
}

/// DELETE /groups/:group_id - delete a group and everything under it.
pub async fn delete_group(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(group_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let group_id = state.codec.decode_request(&group_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Group, group_id)
        .await?;
    state.db.delete_group(group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
