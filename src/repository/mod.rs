//! Repository layer for equipment records

pub mod equipment;
pub mod memory;

use async_trait::async_trait;

use crate::{error::AppResult, models::EquipmentRecord};

pub use equipment::PgEquipmentStore;
pub use memory::MemoryEquipmentStore;

/// Storage for the `equipmentRegistry` collection
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// Fetch every record (no pagination)
    async fn list_records(&self) -> AppResult<Vec<EquipmentRecord>>;

    async fn get_record(&self, id: i64) -> AppResult<EquipmentRecord>;

    /// Highest id ever reserved, including reservations whose registration failed
    async fn max_reserved_id(&self) -> AppResult<Option<i64>>;

    /// Claim `id` for a registration. Returns false when it is already taken.
    async fn reserve_id(&self, id: i64, reserved_by: &str) -> AppResult<bool>;

    /// Write the full record at `equipmentRegistry/<id>`
    async fn put_record(&self, record: &EquipmentRecord) -> AppResult<()>;

    /// Check the backing store is reachable
    async fn ping(&self) -> AppResult<()>;
}
