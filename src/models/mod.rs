//! Data models for the equipment registry

pub mod equipment;
pub mod form;
pub mod session;

// Re-export commonly used types
pub use equipment::{EquipmentRecord, PhotoUpload, RegisterEquipment, RegistrationReceipt};
pub use form::{FormEvent, FormState, FormStatus};
pub use session::{SessionContext, Submitter, UserClaims};
