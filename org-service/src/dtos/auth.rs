use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Role;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterOrgRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(min = 5, max = 100, message = "Email must be 5-100 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 100, message = "Password must be 8-100 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 45, message = "First name must be 1-45 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 45, message = "Last name must be 1-45 characters"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 45, message = "Company name must be 1-45 characters"))]
    pub company_name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterOrgResponse {
    pub user_id: String,
    pub company_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 100, message = "Password must be 8-100 characters"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        email(message = "Invalid email format"),
        length(min = 5, max = 100, message = "Email must be 5-100 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 100, message = "Password must be 8-100 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 45, message = "First name must be 1-45 characters"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 45, message = "Last name must be 1-45 characters"))]
    pub last_name: String,

    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
}
