//! Business logic services

pub mod allocator;
pub mod notifier;
pub mod qr;
pub mod registration;

use std::sync::Arc;

use crate::{
    config::AppConfig, error::AppResult, repository::EquipmentStore, storage::PhotoStore,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub registration: registration::RegistrationService,
}

impl Services {
    /// Create all services on top of the given backends
    pub fn new(
        store: Arc<dyn EquipmentStore>,
        photos: Arc<dyn PhotoStore>,
        notifier: Arc<dyn notifier::Notifier>,
        config: &AppConfig,
    ) -> Self {
        Self {
            registration: registration::RegistrationService::new(
                store,
                photos,
                notifier,
                &config.registry,
            ),
        }
    }

    /// Create services with the notifier selected by configuration
    pub fn from_config(
        store: Arc<dyn EquipmentStore>,
        photos: Arc<dyn PhotoStore>,
        config: &AppConfig,
    ) -> AppResult<Self> {
        let notifier = notifier::from_config(&config.notify)?;
        Ok(Self::new(store, photos, notifier, config))
    }
}
