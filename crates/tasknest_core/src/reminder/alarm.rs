//! Alarm facility seam: one-shot scheduled alerts keyed by string id.
//!
//! # Invariants
//! - `register` never blocks the caller; completion arrives via callback.
//! - A new registration for an existing id replaces it in the facility.
//! - `cancel` of unknown ids is a no-op.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Calendar fields an alert fires on (local wall-clock time, one-shot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerComponents {
    pub minute: u32,
    pub hour: u32,
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl TriggerComponents {
    /// Extracts minute..year of `at` as seen in its time zone.
    pub fn from_date_time<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            minute: at.minute(),
            hour: at.hour(),
            day: at.day(),
            month: at.month(),
            year: at.year(),
        }
    }

    /// Converts epoch milliseconds into `time_zone` wall-clock fields.
    ///
    /// Returns `None` when the instant is out of chrono's range.
    pub fn from_epoch_ms<Tz: TimeZone>(epoch_ms: i64, time_zone: &Tz) -> Option<Self> {
        time_zone
            .timestamp_millis_opt(epoch_ms)
            .single()
            .map(|at| Self::from_date_time(&at))
    }
}

/// One alert registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmRequest {
    /// Registration key; the task identifier.
    pub id: String,
    pub trigger: TriggerComponents,
    pub title: String,
    pub body: String,
    /// Sound asset name.
    pub sound: String,
    /// Notification grouping tag.
    pub category: String,
    pub repeats: bool,
}

/// The alarm facility rejected a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationError {
    pub request_id: String,
    pub reason: String,
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "alarm registration `{}` rejected: {}",
            self.request_id, self.reason
        )
    }
}

impl Error for RegistrationError {}

/// Completion continuation for `AlarmFacility::register`.
pub type RegistrationCallback = Box<dyn FnOnce(Result<(), RegistrationError>) + Send + 'static>;

/// External one-shot alert service.
pub trait AlarmFacility {
    /// Submits `request`. Must return without waiting for the outcome.
    fn register(&self, request: AlarmRequest, on_complete: RegistrationCallback);

    /// Removes pending alerts by id. Unknown ids are ignored.
    fn cancel(&self, ids: &[String]);
}

impl<A: AlarmFacility + ?Sized> AlarmFacility for &A {
    fn register(&self, request: AlarmRequest, on_complete: RegistrationCallback) {
        (**self).register(request, on_complete);
    }

    fn cancel(&self, ids: &[String]) {
        (**self).cancel(ids);
    }
}

impl<A: AlarmFacility + ?Sized> AlarmFacility for Arc<A> {
    fn register(&self, request: AlarmRequest, on_complete: RegistrationCallback) {
        (**self).register(request, on_complete);
    }

    fn cancel(&self, ids: &[String]) {
        (**self).cancel(ids);
    }
}

#[derive(Debug, Default)]
struct AlarmState {
    pending: BTreeMap<String, AlarmRequest>,
    rejection: Option<String>,
    register_calls: usize,
    cancel_calls: usize,
}

/// Process-local alarm facility.
///
/// Clones share state. Completion callbacks run synchronously after the
/// internal lock is released.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAlarmFacility {
    state: Arc<Mutex<AlarmState>>,
}

impl InMemoryAlarmFacility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following registration fail with `reason`.
    pub fn reject_registrations(&self, reason: impl Into<String>) {
        self.lock().rejection = Some(reason.into());
    }

    pub fn accept_registrations(&self) {
        self.lock().rejection = None;
    }

    /// Pending requests ordered by id.
    pub fn pending(&self) -> Vec<AlarmRequest> {
        self.lock().pending.values().cloned().collect()
    }

    pub fn pending_request(&self, id: &str) -> Option<AlarmRequest> {
        self.lock().pending.get(id).cloned()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn register_calls(&self) -> usize {
        self.lock().register_calls
    }

    pub fn cancel_calls(&self) -> usize {
        self.lock().cancel_calls
    }

    fn lock(&self) -> MutexGuard<'_, AlarmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlarmFacility for InMemoryAlarmFacility {
    fn register(&self, request: AlarmRequest, on_complete: RegistrationCallback) {
        let outcome = {
            let mut state = self.lock();
            state.register_calls += 1;
            match state.rejection.clone() {
                Some(reason) => Err(RegistrationError {
                    request_id: request.id,
                    reason,
                }),
                None => {
                    state.pending.insert(request.id.clone(), request);
                    Ok(())
                }
            }
        };
        on_complete(outcome);
    }

    fn cancel(&self, ids: &[String]) {
        let mut state = self.lock();
        state.cancel_calls += 1;
        for id in ids {
            state.pending.remove(id);
        }
    }
}
