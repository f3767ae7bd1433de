//! Request/response shapes for the resource tree. All ids are opaque encoded
//! strings at this boundary.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::OwnerKind;

// ==================== Groups ====================

#[derive(Debug, Deserialize, Validate)]
pub struct GroupRequest {
    #[validate(length(min = 1, max = 45, message = "Group name must be 1-45 characters"))]
    pub group_name: String,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub id: String,
    pub group_name: String,
}

#[derive(Debug, Serialize)]
pub struct GroupListResponse {
    pub groups: Vec<GroupResponse>,
}

// ==================== Services ====================

#[derive(Debug, Deserialize, Validate)]
pub struct ServiceRequest {
    #[validate(length(min = 1, max = 45, message = "Service name must be 1-45 characters"))]
    pub service_name: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: String,
    pub group_id: String,
    pub service_name: String,
}

#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    pub services: Vec<ServiceResponse>,
}

// ==================== Prompts ====================

#[derive(Debug, Deserialize, Validate)]
pub struct PromptRequest {
    #[validate(length(min = 1, max = 45, message = "Prompt name must be 1-45 characters"))]
    pub prompt_name: String,

    #[validate(length(min = 1, max = 2000, message = "Prompt text must be 1-2000 characters"))]
    pub prompt_text: String,

    #[validate(range(min = 0, message = "Position must be non-negative"))]
    pub position: i32,
}

#[derive(Debug, Serialize)]
pub struct PromptResponse {
    pub id: String,
    pub service_id: String,
    pub prompt_name: String,
    pub prompt_text: String,
    pub position: i32,
}

#[derive(Debug, Serialize)]
pub struct PromptListResponse {
    pub prompts: Vec<PromptResponse>,
}

// ==================== Answers ====================

#[derive(Debug, Deserialize, Validate)]
pub struct AnswerRequest {
    #[validate(length(min = 1, max = 2000, message = "Answer text must be 1-2000 characters"))]
    pub answer_text: String,

    #[validate(length(min = 1, max = 45, message = "Color must be 1-45 characters"))]
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub id: String,
    pub prompt_id: String,
    pub answer_text: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerListResponse {
    pub answers: Vec<AnswerResponse>,
}

// ==================== Snippets ====================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSnippetRequest {
    #[validate(length(min = 1, max = 45, message = "Snippet name must be 1-45 characters"))]
    pub snippet_name: String,

    #[validate(length(min = 1, max = 10000, message = "Markdown must be 1-10000 characters"))]
    pub markdown: String,

    pub owner_kind: OwnerKind,

    pub owner_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSnippetRequest {
    #[validate(length(min = 1, max = 45, message = "Snippet name must be 1-45 characters"))]
    pub snippet_name: String,

    #[validate(length(min = 1, max = 10000, message = "Markdown must be 1-10000 characters"))]
    pub markdown: String,
}

#[derive(Debug, Deserialize)]
pub struct SnippetListParams {
    pub owner_kind: OwnerKind,
    pub owner_id: String,
}

#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub id: String,
    pub owner_kind: OwnerKind,
    pub owner_id: String,
    pub snippet_name: String,
    pub markdown: String,
}

#[derive(Debug, Serialize)]
pub struct SnippetListResponse {
    pub snippets: Vec<SnippetResponse>,
}

// ==================== Actions ====================

#[derive(Debug, Deserialize, Validate)]
pub struct CreateActionRequest {
    #[validate(length(min = 1, max = 45, message = "Action kind must be 1-45 characters"))]
    pub action_kind: String,

    pub owner_kind: OwnerKind,

    pub owner_id: String,

    pub snippet_id: String,

    pub answer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub id: String,
    pub action_kind: String,
    pub owner_kind: OwnerKind,
    pub owner_id: String,
    pub snippet_id: String,
    pub answer_id: Option<String>,
}
