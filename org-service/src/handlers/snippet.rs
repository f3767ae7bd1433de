use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;

use crate::dtos::resources::{
    ActionResponse, CreateActionRequest, CreateSnippetRequest, SnippetListParams,
    SnippetListResponse, SnippetResponse, UpdateSnippetRequest,
};
use crate::middleware::AuthUser;
use crate::models::{OwnerKind, Snippet};
use crate::services::ResourceKind;
use crate::utils::ValidatedJson;
use crate::AppState;

/// GET /snippets?owner_kind=..&owner_id=.. - list snippets for one owner.
pub async fn list_snippets(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Query(params): Query<SnippetListParams>,
) -> Result<Json<SnippetListResponse>, AppError> {
    let owner_id = state.codec.decode_request(&params.owner_id)?;
    state
        .authz
        .require_member(&caller, params.owner_kind.into(), owner_id)
        .await?;

    let snippets = state.db.list_snippets(params.owner_kind, owner_id).await?;
    let snippets = snippets
        .into_iter()
        .map(|s| snippet_response(&state, s))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(SnippetListResponse { snippets }))
}

/// POST /snippets - create a snippet under a company, group, or service.
pub async fn create_snippet(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<SnippetResponse>), AppError> {
    let owner_id = state.codec.decode_request(&req.owner_id)?;
    state
        .authz
        .require_admin(&caller, req.owner_kind.into(), owner_id)
        .await?;

    let id = state
        .db
        .insert_snippet(
            caller.company_id,
            req.owner_kind,
            owner_id,
            &req.snippet_name,
            &req.markdown,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SnippetResponse {
            id: state.codec.encode(id),
            owner_kind: req.owner_kind,
            owner_id: state.codec.encode(owner_id),
            snippet_name: req.snippet_name,
            markdown: req.markdown,
        }),
    ))
}

/// PUT /snippets/:snippet_id - update a snippet's name and body, echoing
/// the result.
pub async fn update_snippet(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(snippet_id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateSnippetRequest>,
) -> Result<Json<SnippetResponse>, AppError> {
    let snippet_id = state.codec.decode_request(&snippet_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Snippet, snippet_id)
        .await?;
    let snippet = state
        .db
        .update_snippet(snippet_id, &req.snippet_name, &req.markdown)
        .await?
        .ok_or_else(|| AppError::Forbidden(anyhow::anyhow!("Access denied")))?;
    Ok(Json(snippet_response(&state, snippet)?))
}

/// DELETE /snippets/:snippet_id - delete a snippet.
pub async fn delete_snippet(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(snippet_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let snippet_id = state.codec.decode_request(&snippet_id)?;
    state
        .authz
        .require_admin(&caller, ResourceKind::Snippet, snippet_id)
        .await?;
    state.db.delete_snippet(snippet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /actions - attach a snippet (and optionally an answer) to an owner.
/// The owner needs an admin check; the referenced snippet and answer only
/// need to live in the caller's company.
pub async fn create_action(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateActionRequest>,
) -> Result<(StatusCode, Json<ActionResponse>), AppError> {
    let owner_id = state.codec.decode_request(&req.owner_id)?;
    let snippet_id = state.codec.decode_request(&req.snippet_id)?;
    let answer_id = match &req.answer_id {
        Some(token) => Some(state.codec.decode_request(token)?),
        None => None,
    };

    state
        .authz
        .require_admin(&caller, req.owner_kind.into(), owner_id)
        .await?;
    state
        .authz
        .require_member(&caller, ResourceKind::Snippet, snippet_id)
        .await?;
    if let Some(answer_id) = answer_id {
        state
            .authz
            .require_member(&caller, ResourceKind::Answer, answer_id)
            .await?;
    }

    let id = state
        .db
        .insert_action(
            caller.company_id,
            req.owner_kind,
            owner_id,
            &req.action_kind,
            snippet_id,
            answer_id,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ActionResponse {
            id: state.codec.encode(id),
            action_kind: req.action_kind,
            owner_kind: req.owner_kind,
            owner_id: state.codec.encode(owner_id),
            snippet_id: state.codec.encode(snippet_id),
            answer_id: answer_id.map(|id| state.codec.encode(id)),
        }),
    ))
}

fn snippet_response(state: &AppState, snippet: Snippet) -> Result<SnippetResponse, AppError> {
    let owner_kind: OwnerKind = snippet.owner_kind_code.parse().map_err(|_| {
        AppError::InternalError(anyhow::anyhow!(
            "Invalid owner kind stored for snippet {}",
            snippet.id
        ))
    })?;
    Ok(SnippetResponse {
        id: state.codec.encode(snippet.id),
        owner_kind,
        owner_id: state.codec.encode(snippet.owner_id),
        snippet_name: snippet.snippet_name,
        markdown: snippet.markdown,
    })
}
