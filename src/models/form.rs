//! Registration form state machine

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Unauthenticated,
    Idle,
    Submitting,
    Success { since: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    SignedIn,
    SignedOut,
    Submit,
    Completed,
    Failed,
    ResetElapsed,
}

impl FormState {
    /// Apply an event, rejecting transitions the form does not allow.
    pub fn next(self, event: FormEvent, now: Instant) -> AppResult<FormState> {
        use FormEvent::*;
        use FormState::*;

        match (self, event) {
            (_, SignedOut) => Ok(Unauthenticated),
            (Unauthenticated, SignedIn) => Ok(Idle),
            (state, SignedIn) => Ok(state),
            (Idle, Submit) => Ok(Submitting),
            (Submitting, Completed) => Ok(Success { since: now }),
            (Submitting, Failed) => Ok(Idle),
            (Success { .. }, ResetElapsed) => Ok(Idle),
            (Submitting, Submit) => Err(AppError::Conflict(
                "A registration is already in progress".to_string(),
            )),
            (Unauthenticated, Submit) => Err(AppError::Authentication(
                "Sign in to use the registration form".to_string(),
            )),
            (state, event) => Err(AppError::Conflict(format!(
                "Cannot apply {:?} while form is {}",
                event,
                state.name()
            ))),
        }
    }

    /// Clear an expired success state.
    pub fn resolve(self, now: Instant, reset_after: Duration) -> FormState {
        match self {
            FormState::Success { since } if now.duration_since(since) >= reset_after => self
                .next(FormEvent::ResetElapsed, now)
                .unwrap_or(self),
            state => state,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormState::Unauthenticated => "unauthenticated",
            FormState::Idle => "idle",
            FormState::Submitting => "submitting",
            FormState::Success { .. } => "success",
        }
    }
}

/// Form state as reported to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormStatus {
    /// One of unauthenticated, idle, submitting, success
    pub state: String,
    /// Remaining time before a success state resets
    pub reset_in_ms: Option<u64>,
}

impl FormStatus {
    pub fn from_state(state: FormState, now: Instant, reset_after: Duration) -> Self {
        let reset_in_ms = match state {
            FormState::Success { since } => {
                Some(reset_after.saturating_sub(now.duration_since(since)).as_millis() as u64)
            }
            _ => None,
        };
        Self {
            state: state.name().to_string(),
            reset_in_ms,
        }
    }
}
