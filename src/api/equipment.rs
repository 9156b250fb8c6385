//! Equipment API endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::Multipart;

use crate::{
    error::{AppError, AppResult},
    models::{EquipmentRecord, PhotoUpload, RegisterEquipment, RegistrationReceipt, SessionContext},
    services::registration::SUCCESS_MESSAGE,
};

use super::AuthenticatedUser;

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment list", body = Vec<EquipmentRecord>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<EquipmentRecord>>> {
    let records = state.services.registration.list().await?;
    Ok(Json(records))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentRecord),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<EquipmentRecord>> {
    let record = state.services.registration.get(id).await?;
    Ok(Json(record))
}

/// Register equipment
///
/// Allocates the next id, generates the lookup QR code, uploads the optional
/// photo and saves the record. A notification is posted in the background.
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body(content = crate::models::equipment::RegisterEquipmentForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Equipment registered", body = RegistrationReceipt),
        (status = 400, description = "Missing name or details"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "A registration is already in progress"),
        (status = 502, description = "Photo upload failed"),
        (status = 503, description = "Registry unavailable")
    )
)]
pub async fn register_equipment(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<RegistrationReceipt>)> {
    let (form, photo) = read_registration_form(multipart).await?;
    let session = SessionContext::SignedIn(claims.into());

    let registration = &state.services.registration;
    let outcome = registration.register(&session, form, photo).await?;

    let record = outcome.record;
    Ok((
        StatusCode::CREATED,
        Json(RegistrationReceipt {
            key: record.key(),
            record,
            message: SUCCESS_MESSAGE.to_string(),
            reset_after_ms: registration.reset_after().as_millis() as u64,
        }),
    ))
}

async fn read_registration_form(
    mut multipart: Multipart,
) -> AppResult<(RegisterEquipment, Option<PhotoUpload>)> {
    let mut form = RegisterEquipment::default();
    let mut photo = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" | "equipmentName" => form.name = read_text(field).await?,
            "details" | "equipmentDetails" => form.details = read_text(field).await?,
            "photo" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid photo: {}", e)))?;

                if data.is_empty() {
                    continue;
                }
                if let Some(ct) = content_type.as_deref() {
                    if !ct.starts_with("image/") {
                        return Err(AppError::Validation(format!(
                            "Photo must be an image, got {}",
                            ct
                        )));
                    }
                }
                photo = Some(PhotoUpload {
                    data,
                    content_type,
                    file_name,
                });
            }
            other => tracing::debug!("Ignoring unknown form field {:?}", other),
        }
    }

    Ok((form, photo))
}

async fn read_text(field: axum_extra::extract::multipart::Field) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form field: {}", e)))
}
