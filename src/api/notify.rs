//! Notification relay endpoint

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, ToSchema)]
pub struct NotifyRequest {
    pub message: String,
}

/// Relay a message to the configured chat webhook
#[utoipa::path(
    post,
    path = "/notify",
    tag = "notify",
    security(("bearer_auth" = [])),
    request_body = NotifyRequest,
    responses(
        (status = 202, description = "Message delivered to the webhook"),
        (status = 400, description = "Empty message"),
        (status = 502, description = "Webhook call failed")
    )
)]
pub async fn relay_notification(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<NotifyRequest>,
) -> AppResult<StatusCode> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Message cannot be empty".to_string()));
    }

    tracing::info!("Relaying notification from {}", claims.email);
    state.services.registration.relay(&request.message).await?;
    Ok(StatusCode::ACCEPTED)
}
