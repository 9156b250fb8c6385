//! In-process equipment store, used with `storage.backend = "memory"` and in tests

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::EquipmentStore;
use crate::{
    error::{AppError, AppResult},
    models::EquipmentRecord,
};

#[derive(Debug, Default)]
struct Registry {
    reservations: BTreeSet<i64>,
    records: BTreeMap<i64, EquipmentRecord>,
}

#[derive(Debug, Default)]
pub struct MemoryEquipmentStore {
    registry: RwLock<Registry>,
}

impl MemoryEquipmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed existing records, marking their ids as reserved
    pub async fn with_records(records: impl IntoIterator<Item = EquipmentRecord>) -> Self {
        let store = Self::new();
        {
            let mut registry = store.registry.write().await;
            for record in records {
                registry.reservations.insert(record.id);
                registry.records.insert(record.id, record);
            }
        }
        store
    }

    pub async fn is_reserved(&self, id: i64) -> bool {
        self.registry.read().await.reservations.contains(&id)
    }
}

#[async_trait]
impl EquipmentStore for MemoryEquipmentStore {
    async fn list_records(&self) -> AppResult<Vec<EquipmentRecord>> {
        Ok(self.registry.read().await.records.values().cloned().collect())
    }

    async fn get_record(&self, id: i64) -> AppResult<EquipmentRecord> {
        self.registry
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    async fn max_reserved_id(&self) -> AppResult<Option<i64>> {
        Ok(self.registry.read().await.reservations.last().copied())
    }

    async fn reserve_id(&self, id: i64, _reserved_by: &str) -> AppResult<bool> {
        Ok(self.registry.write().await.reservations.insert(id))
    }

    async fn put_record(&self, record: &EquipmentRecord) -> AppResult<()> {
        let mut registry = self.registry.write().await;
        registry.reservations.insert(record.id);
        registry.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
