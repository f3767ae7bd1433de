pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Json, Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::OrgConfig;
use crate::services::{AuthService, AuthzService, Database, IdCodec, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub config: OrgConfig,
    pub db: Database,
    pub codec: IdCodec,
    pub tokens: TokenService,
    pub auth: AuthService,
    pub authz: AuthzService,
}

impl AppState {
    pub fn new(config: OrgConfig, db: Database) -> Self {
        let codec = IdCodec::new(&config.codec.salt);
        let tokens = TokenService::new(&config.auth.secret, config.auth.token_ttl_seconds);
        let auth = AuthService::new(db.clone(), tokens.clone(), codec.clone());
        let authz = AuthzService::new(db.clone());
        Self {
            config,
            db,
            codec,
            tokens,
            auth,
            authz,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Everything below requires a valid session token.
    let protected = Router::new()
        .route("/auth/password", put(handlers::user::change_password))
        .route("/users/me", delete(handlers::user::delete_me))
        .route("/users", post(handlers::user::create_user))
        .route(
            "/groups",
            get(handlers::group::list_groups).post(handlers::group::create_group),
        )
        .route(
            "/groups/:group_id",
            put(handlers::group::update_group).delete(handlers::group::delete_group),
        )
        .route(
            "/groups/:group_id/services",
            get(handlers::service::list_services).post(handlers::service::create_service),
        )
        .route(
            "/services/:service_id",
            put(handlers::service::update_service).delete(handlers::service::delete_service),
        )
        .route(
            "/services/:service_id/prompts",
            get(handlers::prompt::list_prompts).post(handlers::prompt::create_prompt),
        )
        .route(
            "/prompts/:prompt_id",
            put(handlers::prompt::update_prompt).delete(handlers::prompt::delete_prompt),
        )
        .route(
            "/prompts/:prompt_id/answers",
            get(handlers::answer::list_answers).post(handlers::answer::create_answer),
        )
        .route(
            "/answers/:answer_id",
            put(handlers::answer::update_answer).delete(handlers::answer::delete_answer),
        )
        .route(
            "/snippets",
            get(handlers::snippet::list_snippets).post(handlers::snippet::create_snippet),
        )
        .route(
            "/snippets/:snippet_id",
            put(handlers::snippet::update_snippet).delete(handlers::snippet::delete_snippet),
        )
        .route("/actions", post(handlers::snippet::create_action))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let allowed_origins = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}. Skipping.", origin, e);
                None
            }
        })
        .collect::<Vec<HeaderValue>>();

    Router::new()
        .route("/health", get(health_check))
        .route("/orgs/register", post(handlers::auth::register_org))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        )
}

/// Service health check. Pings the database so a wedged pool surfaces as 500.
pub async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
    })))
}
