use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::resources::{AnswerListResponse, AnswerRequest, AnswerResponse};
use crate::middleware::AuthUser;
use crate::services::ResourceKind;
use crate::utils::ValidatedJson;
use crate::AppState;

/// GET /prompts/:prompt_id/answers - list answers for a prompt.
pub async fn list_answers(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(prompt_id): Path<String>,
) -> Result<Json<AnswerListResponse>, AppError> {
    let prompt_id = state.codec.decode_request(&prompt_id)?;
    state
        .authz
        .require_member(&caller, ResourceKind::Prompt, prompt_id)
        .await?;

    let answers = state.db.list_answers(prompt_id).await?;
    let answers = answers
        .into_iter()
        .map(|a| AnswerResponse {
            id: state.codec.encode(a.id),
            prompt_id: state.codec.encode(a.prompt_id),
            answer_text: a.answer_text,
            color: a.color,
        })
        .collect();
    Ok(Json(AnswerListResponse { answers }))
}

/// POST /prompts/:prompt_id/answers - create an answer under a prompt.
pub async fn create_answer(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(prompt_id): Path<String>,
    ValidatedJson(req): ValidatedJson<AnswerRequest>,
) -> Result<(StatusCode, Json<AnswerResponse>), AppError> {
    let prompt_id = state.codec.decode_request(&prompt_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Prompt, prompt_id)
        .await?;

    let id = state
        .db
        .insert_answer(prompt_id, caller.company_id, &req.answer_text, &req.color)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AnswerResponse {
            id: state.codec.encode(id),
            prompt_id: state.codec.encode(prompt_id),
            answer_text: req.answer_text,
            color: req.color,
        }),
    ))
}

/// PUT /answers/:answer_id - update an answer and echo it back.
pub async fn update_answer(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(answer_id): Path<String>,
    ValidatedJson(req): ValidatedJson<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let answer_id = state.codec.decode_request(&answer_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Answer, answer_id)
        .await?;
    let answer = state
        .db
        .update_answer(answer_id, &req.answer_text, &req.color)
        .await?
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("Access denied")))?;
    Ok(Json(AnswerResponse {
        id: state.codec.encode(answer.id),
        prompt_id: state.codec.encode(answer.prompt_id),
        answer_text: answer.answer_text,
        color: answer.color,
    }))
}

/// DELETE /answers/:answer_id - delete an answer.
pub async fn delete_answer(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(answer_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let answer_id = state.codec.decode_request(&answer_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Answer, answer_id)
        .await?;
    state.db.delete_answer(answer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
