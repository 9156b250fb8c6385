//! Session endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{FormStatus, Submitter};

use super::Session;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub signed_in: bool,
    pub user: Option<Submitter>,
    pub form: FormStatus,
}

/// Current session and registration form state
#[utoipa::path(
    get,
    path = "/session",
    tag = "session",
    responses(
        (status = 200, description = "Session state", body = SessionResponse)
    )
)]
pub async fn get_session(
    State(state): State<crate::AppState>,
    Session(session): Session,
) -> Json<SessionResponse> {
    let form = state.services.registration.form_status(&session).await;
    let user = session.submitter().cloned();

    Json(SessionResponse {
        signed_in: user.is_some(),
        user,
        form,
    })
}
