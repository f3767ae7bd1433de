use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::resources::{ServiceListResponse, ServiceRequest, ServiceResponse};
use crate::middleware::AuthUser;
use crate::services::ResourceKind;
use crate::utils::ValidatedJson;
use crate::AppState;

/// GET /groups/:group_id/services - list services under a group.
pub async fn list_services(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(group_id): Path<String>,
) -> Result<Json<ServiceListResponse>, AppError> {
    let group_id = state.codec.decode_request(&group_id)?;
    state
        .authz
        .require_member(&caller, ResourceKind::Group, group_id)
        .await?;

    let services = state.db.list_services(group_id).await?;
    let services = services
        .into_iter()
        .map(|s| ServiceResponse {
            id: state.codec.encode(s.id),
            group_id: state.codec.encode(s.group_id),
            service_name: s.service_name,
        })
        .collect();
    Ok(Json(ServiceListResponse { services }))
}

/// POST /groups/:group_id/services - create a service under a group.
pub async fn create_service(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(group_id): Path<String>,
    ValidatedJson(req): ValidatedJson<ServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    let group_id = state.codec.decode_request(&group_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Group, group_id)
        .await?;

    let id = state
        .db
        .insert_service(group_id, caller.company_id, &req.service_name)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ServiceResponse {
            id: state.codec.encode(id),
            group_id: state.codec.encode(group_id),
            service_name: req.service_name,
        }),
    ))
}

/// PUT /services/:service_id - rename a service and echo it back.
pub async fn update_service(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(service_id): Path<String>,
    ValidatedJson(req): ValidatedJson<ServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    let service_id = state.codec.decode_request(&service_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Service, service_id)
        .await?;
    let service = state
        .db
        .update_service(service_id, &req.service_name)
        .await?
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("Access denied")))?;
    Ok(Json(ServiceResponse {
        id: state.codec.encode(service.id),
        group_id: state.codec.encode(service.group_id),
        service_name: service.service_name,
    }))
}

/// DELETE /services/:service_id - delete a service and everything under it.
pub async fn delete_service(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(service_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let service_id = state.codec.decode_request(&service_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Service, service_id)
        .await?;
    state.db.delete_service(service_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
