//! Postgres-backed equipment store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::EquipmentStore;
use crate::{
    error::{AppError, AppResult},
    models::EquipmentRecord,
};

#[derive(Clone)]
pub struct PgEquipmentStore {
    pool: Pool<Postgres>,
}

impl PgEquipmentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentStore for PgEquipmentStore {
    async fn list_records(&self) -> AppResult<Vec<EquipmentRecord>> {
        sqlx::query_as::<_, EquipmentRecord>(
            r#"
            SELECT id, name, details, qr_image, photo_url, created_at, submitter_email
            FROM equipment_registry
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::RegistryRead(e.to_string()))
    }

    async fn get_record(&self, id: i64) -> AppResult<EquipmentRecord> {
        sqlx::query_as::<_, EquipmentRecord>(
            r#"
            SELECT id, name, details, qr_image, photo_url, created_at, submitter_email
            FROM equipment_registry
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::RegistryRead(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn max_reserved_id(&self) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(id) FROM equipment_reservations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::RegistryRead(e.to_string()))
    }

    async fn reserve_id(&self, id: i64, reserved_by: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO equipment_reservations (id, reserved_by)
            VALUES ($1, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .bind(reserved_by)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::RegistryWrite(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }

    async fn put_record(&self, record: &EquipmentRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO equipment_registry
                (id, name, details, qr_image, photo_url, created_at, submitter_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                details = EXCLUDED.details,
                qr_image = EXCLUDED.qr_image,
                photo_url = EXCLUDED.photo_url,
                created_at = EXCLUDED.created_at,
                submitter_email = EXCLUDED.submitter_email
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.details)
        .bind(&record.qr_image)
        .bind(&record.photo_url)
        .bind(record.created_at)
        .bind(&record.submitter_email)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::RegistryWrite(e.to_string()))?;

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
