use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::services::{AuthContext, TokenStatus};
use crate::AppState;

/// Authenticate the request from its bearer token and bind the decoded
/// caller identity into request extensions. Missing and expired tokens are
/// 401; a malformed or badly signed token is a 400.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let token = token.ok_or_else(|| {
        AppError::Unauthorized(anyhow::anyhow!("Missing or invalid Authorization header"))
    })?;

    let claims = match state.tokens.verify(token) {
        TokenStatus::Valid(claims) => claims,
        TokenStatus::Expired => {
            return Err(AppError::Unauthorized(anyhow::anyhow!("Token expired")));
        }
        TokenStatus::Invalid => {
            return Err(AppError::BadRequest(anyhow::anyhow!("Malformed token")));
        }
    };

    // Claims carry opaque ids; internal logic only sees decoded integers.
    let user_id = state.codec.decode_request(&claims.sub)?;
    let company_id = state.codec.decode_request(&claims.cid)?;

    req.extensions_mut().insert(AuthContext {
        user_id,
        company_id,
        role: claims.role,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

/// Extractor for the authenticated caller in handlers.
pub struct AuthUser(pub AuthContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!(
                    "Auth context missing from request extensions"
                ))
            })
    }
}
