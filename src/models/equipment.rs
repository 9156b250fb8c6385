//! Equipment model

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Collection path records are keyed under
pub const REGISTRY_COLLECTION: &str = "equipmentRegistry";
/// Blob storage prefix photos are keyed under
pub const PHOTO_COLLECTION: &str = "equipmentPhotos";

/// Persisted equipment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRecord {
    pub id: i64,
    /// Equipment name
    pub name: String,
    /// Free-form description
    pub details: String,
    /// PNG data URL of the lookup QR code
    pub qr_image: String,
    /// Public photo URL, empty when no photo was uploaded
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub submitter_email: String,
}

impl EquipmentRecord {
    /// Key the record is stored under (`equipmentRegistry/<id>`)
    pub fn key(&self) -> String {
        record_key(self.id)
    }
}

pub fn record_key(id: i64) -> String {
    format!("{}/{}", REGISTRY_COLLECTION, id)
}

pub fn photo_key(id: i64) -> String {
    format!("{}/{}", PHOTO_COLLECTION, id)
}

/// Registration form text fields
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct RegisterEquipment {
    #[validate(custom(function = "not_blank", message = "Equipment name is required"))]
    pub name: String,
    #[validate(custom(function = "not_blank", message = "Equipment details are required"))]
    pub details: String,
}

fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Photo attached to a registration
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Multipart body accepted by `POST /equipment` (documentation only)
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RegisterEquipmentForm {
    /// Equipment name
    pub name: String,
    /// Equipment details
    pub details: String,
    /// Optional photo file
    #[schema(format = Binary)]
    pub photo: Option<String>,
}

/// Response for a successful registration
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationReceipt {
    pub record: EquipmentRecord,
    /// Key the record was written under
    pub key: String,
    /// Message shown to the user
    pub message: String,
    /// Delay before the form resets
    pub reset_after_ms: u64,
}
