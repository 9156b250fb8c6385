//! Equipment Registry
//!
//! REST JSON server for registering equipment items. Each registration gets a
//! sequential id, a QR code pointing at its lookup URL, an optional photo and
//! a chat notification.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
