//! Equipment registration workflow
//!
//! A submission runs allocate → reserve → QR → (photo) → write → notify, one
//! step after the other. Any failure before the write aborts the submission
//! and leaves no record behind. The notification is sent in the background
//! and never affects the outcome.

use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::{task::JoinHandle, time::Instant};
use validator::Validate;

use crate::{
    config::RegistryConfig,
    error::{AppError, AppResult},
    models::{
        equipment::photo_key, EquipmentRecord, FormEvent, FormState, FormStatus, PhotoUpload,
        RegisterEquipment, SessionContext, Submitter,
    },
    repository::EquipmentStore,
    storage::PhotoStore,
};

use super::{
    allocator,
    notifier::{self, Notifier},
    qr::QrGenerator,
};

pub const SUCCESS_MESSAGE: &str = "Equipment registered.";

type FormStates = Arc<Mutex<HashMap<String, FormState>>>;

/// Result of a completed registration
pub struct RegistrationOutcome {
    pub record: EquipmentRecord,
    /// Background notification task; callers are not required to await it
    pub notification: JoinHandle<()>,
}

#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn EquipmentStore>,
    photos: Arc<dyn PhotoStore>,
    notifier: Arc<dyn Notifier>,
    qr: QrGenerator,
    max_attempts: u32,
    reset_after: Duration,
    forms: FormStates,
}

impl RegistrationService {
    pub fn new(
        store: Arc<dyn EquipmentStore>,
        photos: Arc<dyn PhotoStore>,
        notifier: Arc<dyn Notifier>,
        config: &RegistryConfig,
    ) -> Self {
        Self {
            store,
            photos,
            notifier,
            qr: QrGenerator::from_config(config),
            max_attempts: config.max_allocation_attempts.max(1),
            reset_after: config.success_reset(),
            forms: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn reset_after(&self) -> Duration {
        self.reset_after
    }

    /// List every record, ordered by id
    pub async fn list(&self) -> AppResult<Vec<EquipmentRecord>> {
        let mut records = self.store.list_records().await?;
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    pub async fn get(&self, id: i64) -> AppResult<EquipmentRecord> {
        self.store.get_record(id).await
    }

    /// Register a new equipment item on behalf of the session's user
    pub async fn register(
        &self,
        session: &SessionContext,
        form: RegisterEquipment,
        photo: Option<PhotoUpload>,
    ) -> AppResult<RegistrationOutcome> {
        let submitter = session.submitter().ok_or_else(|| {
            AppError::Authentication("Sign in to use the registration form".to_string())
        })?;
        form.validate()?;

        self.transition(submitter, FormEvent::Submit)?;
        let pending = PendingSubmission::new(self.forms.clone(), &submitter.email);

        let photo = photo.filter(|p| !p.data.is_empty());
        let result = self.run(submitter, &form, photo).await;

        pending.settle();
        let event = if result.is_ok() {
            FormEvent::Completed
        } else {
            FormEvent::Failed
        };
        self.transition(submitter, event)?;

        let record = result?;
        let message = notifier::registration_message(submitter, &record);
        let notification = notifier::spawn_notification(self.notifier.clone(), message);

        Ok(RegistrationOutcome {
            record,
            notification,
        })
    }

    /// Current form state for the session
    pub async fn form_status(&self, session: &SessionContext) -> FormStatus {
        let now = Instant::now();
        let mut forms = lock_forms(&self.forms);
        let (stored, event) = match session.submitter() {
            Some(submitter) => (forms.get(&submitter.email).copied(), FormEvent::SignedIn),
            None => (None, FormEvent::SignedOut),
        };
        let state = self.current(stored, event, now);
        if let (Some(submitter), FormState::Idle) = (session.submitter(), state) {
            forms.remove(&submitter.email);
        }
        FormStatus::from_state(state, now, self.reset_after)
    }

    /// Send an arbitrary message through the configured notifier
    pub async fn relay(&self, message: &str) -> AppResult<()> {
        self.notifier.notify(message).await
    }

    pub async fn ready(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Stored state of a form, with the session event and any elapsed reset applied
    fn current(&self, stored: Option<FormState>, session: FormEvent, now: Instant) -> FormState {
        stored
            .unwrap_or(FormState::Unauthenticated)
            .next(session, now)
            .unwrap_or(FormState::Unauthenticated)
            .resolve(now, self.reset_after)
    }

    fn transition(&self, submitter: &Submitter, event: FormEvent) -> AppResult<FormState> {
        let now = Instant::now();
        let mut forms = lock_forms(&self.forms);
        let current = self.current(forms.get(&submitter.email).copied(), FormEvent::SignedIn, now);
        let next = current.next(event, now)?;
        tracing::debug!(
            "Form for {}: {} -> {}",
            submitter.email,
            current.name(),
            next.name()
        );
        forms.insert(submitter.email.clone(), next);
        Ok(next)
    }

    async fn run(
        &self,
        submitter: &Submitter,
        form: &RegisterEquipment,
        photo: Option<PhotoUpload>,
    ) -> AppResult<EquipmentRecord> {
        let id = self.allocate(submitter).await?;
        tracing::info!("Allocated equipment id {}", id);

        let qr_image = self.qr.generate(id)?;
        tracing::debug!("Generated QR code for {}", self.qr.lookup_url(id));

        let photo_url = match photo {
            Some(photo) => {
                let key = photo_key(id);
                self.photos.upload(&key, photo.data, photo.content_type).await?;
                let url = self.photos.public_url(&key);
                tracing::info!("Uploaded photo for equipment {} to {}", id, key);
                url
            }
            None => String::new(),
        };

        let record = EquipmentRecord {
            id,
            name: form.name.clone(),
            details: form.details.clone(),
            qr_image,
            photo_url,
            created_at: Utc::now(),
            submitter_email: submitter.email.clone(),
        };
        self.store.put_record(&record).await?;
        tracing::info!("Registered equipment {} ({})", record.id, record.key());

        Ok(record)
    }

    /// Pick `max + 1` over records and reservations, and reserve it, moving
    /// past ids claimed concurrently.
    async fn allocate(&self, submitter: &Submitter) -> AppResult<i64> {
        let mut previous: Option<i64> = None;

        for attempt in 1..=self.max_attempts {
            let records = self.store.list_records().await?;
            let reserved = self.store.max_reserved_id().await?;
            let ids = records.iter().map(|r| r.id).chain(reserved);
            let candidate = match previous {
                None => allocator::next_id(ids),
                Some(previous) => allocator::next_candidate(ids, previous),
            };

            if self.store.reserve_id(candidate, &submitter.email).await? {
                return Ok(candidate);
            }

            tracing::warn!(
                "Equipment id {} already reserved (attempt {}/{})",
                candidate,
                attempt,
                self.max_attempts
            );
            previous = Some(candidate);
        }

        Err(AppError::Conflict(
            "Could not allocate an equipment id, please retry".to_string(),
        ))
    }
}

fn lock_forms(forms: &FormStates) -> MutexGuard<'_, HashMap<String, FormState>> {
    forms.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Marks a form as failed if its submission is dropped before it settles,
/// e.g. when the client disconnects mid-request.
struct PendingSubmission {
    forms: FormStates,
    email: String,
    settled: bool,
}

impl PendingSubmission {
    fn new(forms: FormStates, email: &str) -> Self {
        Self {
            forms,
            email: email.to_string(),
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for PendingSubmission {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut forms = lock_forms(&self.forms);
        if let Some(state) = forms.get(&self.email).copied() {
            if let Ok(next) = state.next(FormEvent::Failed, Instant::now()) {
                tracing::warn!("Submission for {} dropped before completion", self.email);
                forms.insert(self.email.clone(), next);
            }
        }
    }
}
