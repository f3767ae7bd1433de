use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::resources::{PromptListResponse, PromptRequest, PromptResponse};
use crate::middleware::AuthUser;
use crate::services::ResourceKind;
use crate::utils::ValidatedJson;
use crate::AppState;

/// GET /services/:service_id/prompts - list prompts in display order.
pub async fn list_prompts(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(service_id): Path<String>,
) -> Result<Json<PromptListResponse>, AppError> {
    let service_id = state.codec.decode_request(&service_id)?;
    state
        .authz
        .require_member(&caller, ResourceKind::Service, service_id)
        .await?;

    let prompts = state.db.list_prompts(service_id).await?;
    let prompts = prompts
        .into_iter()
        .map(|p| PromptResponse {
            id: state.codec.encode(p.id),
            service_id: state.codec.encode(p.service_id),
            prompt_name: p.prompt_name,
            prompt_text: p.prompt_text,
            position: p.position,
        })
        .collect();
    Ok(Json(PromptListResponse { prompts }))
}

/// POST /services/:service_id/prompts - create a prompt under a service.
pub async fn create_prompt(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(service_id): Path<String>,
    ValidatedJson(req): ValidatedJson<PromptRequest>,
) -> Result<(StatusCode, Json<PromptResponse>), AppError> {
    let service_id = state.codec.decode_request(&service_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Service, service_id)
        .await?;

    let id = state
        .db
        .insert_prompt(
            service_id,
            caller.company_id,
            &req.prompt_name,
            &req.prompt_text,
            req.position,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PromptResponse {
            id: state.codec.encode(id),
            service_id: state.codec.encode(service_id),
            prompt_name: req.prompt_name,
            prompt_text: req.prompt_text,
            position: req.position,
        }),
    ))
}

/// PUT /prompts/:prompt_id - update a prompt's text and position, echoing
/// the result.
pub async fn update_prompt(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(prompt_id): Path<String>,
    ValidatedJson(req): ValidatedJson<PromptRequest>,
) -> Result<Json<PromptResponse>, AppError> {
    let prompt_id = state.codec.decode_request(&prompt_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Prompt, prompt_id)
        .await?;
    let prompt = state
        .db
        .update_prompt(prompt_id, &req.prompt_name, &req.prompt_text, req.position)
        .await?
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("Access denied")))?;
    Ok(Json(PromptResponse {
        id: state.codec.encode(prompt.id),
        service_id: state.codec.encode(prompt.service_id),
        prompt_name: prompt.prompt_name,
        prompt_text: prompt.prompt_text,
        position: prompt.position,
    }))
}

/// DELETE /prompts/:prompt_id - delete a prompt and its answers.
pub async fn delete_prompt(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(prompt_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let prompt_id = state.codec.decode_request(&prompt_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Prompt, prompt_id)
        .await?;
    state.db.delete_prompt(prompt_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
