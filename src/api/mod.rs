//! API handlers for the equipment registry REST endpoints

pub mod equipment;
pub mod form;
pub mod health;
pub mod notify;
pub mod openapi;
pub mod session;

use axum::{
    async_trait,
    extract::{DefaultBodyLimit, FromRequestParts},
    http::request::Parts,
    routing::{get, post},
    RequestPartsExt, Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::convert::Infallible;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    config::StorageBackend,
    error::AppError,
    models::{SessionContext, UserClaims},
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Authentication("Missing or invalid authorization header".to_string()))?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Session of the caller; signed out when no valid token is presented
pub struct Session(pub SessionContext);

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = AuthenticatedUser::from_request_parts(parts, state)
            .await
            .ok()
            .map(|AuthenticatedUser(claims)| claims);
        Ok(Session(claims.into()))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Session
        .route("/session", get(session::get_session))
        // Equipment
        .route("/equipment", get(equipment::list_equipment))
        .route(
            "/equipment",
            post(equipment::register_equipment)
                .layer(DefaultBodyLimit::max(state.config.storage.max_upload_bytes)),
        )
        .route("/equipment/:id", get(equipment::get_equipment))
        // Notifications
        .route("/notify", post(notify::relay_notification))
        .with_state(state.clone());

    let openapi = openapi::create_openapi_router();

    let mut app = Router::new()
        .route("/", get(form::registration_form))
        .nest("/api/v1", api_v1)
        .merge(openapi);

    if state.config.storage.backend == StorageBackend::Local {
        app = app.nest_service("/photos", ServeDir::new(&state.config.storage.local_path));
    }

    app.layer(TraceLayer::new_for_http()).layer(cors)
}
