//! Form ownership and the lifecycle of the prediction request.
//!
//! The controller is an explicit state machine. A valid `submit()` moves any settled
//! state to [`SubmissionState::Loading`]; the response moves it to `Success` or
//! `Failed`. While `Loading`, further submits are ignored, so at most one prediction
//! request is open per controller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shared::domain::{FormField, UnknownFormField};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::{
    error::{ServiceError, ValidationError},
    form::FormState,
    reference::ReferenceData,
    transport::{with_timeout, PredictionService},
    ClientSettings,
};

const ABANDONED_MESSAGE: &str = "The price request was cancelled before the service answered.";

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success(f64),
    Failed(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    pub fn price(&self) -> Option<f64> {
        match self {
            SubmissionState::Success(price) => Some(*price),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What a single `submit()` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The request ran and the controller settled in this state.
    Completed(SubmissionState),
    /// Another request was already in flight; nothing happened.
    IgnoredInFlight,
    /// The form could not be serialized; nothing happened.
    Rejected(ValidationError),
    /// The controller was torn down; any response was dropped.
    Detached,
}

#[derive(Debug, Default)]
struct ControllerInner {
    form: FormState,
    state: SubmissionState,
    torn_down: bool,
}

pub struct SubmissionController {
    service: Arc<dyn PredictionService>,
    reference: Arc<ReferenceData>,
    settings: ClientSettings,
    inner: Mutex<ControllerInner>,
    events: broadcast::Sender<SubmissionState>,
}

impl SubmissionController {
    pub fn new(
        service: Arc<dyn PredictionService>,
        reference: Arc<ReferenceData>,
        settings: ClientSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            service,
            reference,
            settings,
            inner: Mutex::new(ControllerInner::default()),
            events,
        }
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        self.lock().form.set(field, value);
    }

    pub fn set_field_by_name(
        &self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), UnknownFormField> {
        let field = name.parse::<FormField>()?;
        self.set_field(field, value);
        Ok(())
    }

    pub fn form(&self) -> FormState {
        self.lock().form.clone()
    }

    pub fn state(&self) -> SubmissionState {
        self.lock().state.clone()
    }

    /// Options for the location input; empty until the reference load completes.
    pub fn location_options(&self) -> &[String] {
        self.reference.locations()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SubmissionState> {
        self.events.subscribe()
    }

    pub fn is_torn_down(&self) -> bool {
        self.lock().torn_down
    }

    pub async fn submit(&self) -> SubmitOutcome {
        let request = {
            let mut inner = self.lock();
            if inner.torn_down {
                debug!("submit after teardown ignored");
                return SubmitOutcome::Detached;
            }
            if inner.state.is_loading() {
                debug!("prediction request already in flight; submit ignored");
                return SubmitOutcome::IgnoredInFlight;
            }
            let request = match inner.form.validate(&self.settings.limits) {
                Ok(request) => request,
                Err(err) => {
                    debug!(field = %err.field(), error = %err, "form not ready; submit ignored");
                    return SubmitOutcome::Rejected(err);
                }
            };
            self.transition(&mut inner, SubmissionState::Loading);
            request
        };

        let options = self.reference.locations();
        if !options.is_empty() && !options.contains(&request.location) {
            debug!(location = %request.location, "location not among loaded options");
        }

        info!(
            total_sqft = request.total_sqft,
            bhk = request.bhk,
            bath = request.bath,
            location = %request.location,
            "submitting prediction request"
        );
        let mut in_flight = InFlight {
            controller: self,
            settled: false,
        };
        let result = with_timeout(
            self.settings.request_timeout,
            self.service.predict_home_price(&request),
        )
        .await
        .and_then(|price| {
            if price.is_finite() {
                Ok(price)
            } else {
                Err(ServiceError::Payload(format!(
                    "estimated_price is not a finite number: {price}"
                )))
            }
        });
        in_flight.settled = true;

        let mut inner = self.lock();
        if inner.torn_down {
            debug!("controller torn down; prediction response discarded");
            return SubmitOutcome::Detached;
        }

        let next = match result {
            Ok(price) => {
                info!(price, "price estimate received");
                SubmissionState::Success(price)
            }
            Err(err) => {
                error!(
                    kind = err.kind(),
                    status = ?err.status(),
                    error = %err,
                    "prediction request failed"
                );
                SubmissionState::Failed(err.user_message())
            }
        };
        self.transition(&mut inner, next.clone());
        SubmitOutcome::Completed(next)
    }

    /// Detaches the controller from its host. Responses still in flight are dropped
    /// and later submits are ignored.
    pub fn teardown(&self) {
        let mut inner = self.lock();
        if !inner.torn_down {
            inner.torn_down = true;
            debug!(in_flight = inner.state.is_loading(), "submission controller torn down");
        }
    }

    fn transition(&self, inner: &mut ControllerInner, next: SubmissionState) {
        inner.state = next.clone();
        // No subscribers is fine.
        let _ = self.events.send(next);
    }

    fn lock(&self) -> MutexGuard<'_, ControllerInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settles a request whose `submit()` future was dropped mid-flight, so the
/// controller never stays in `Loading` without an open request.
struct InFlight<'a> {
    controller: &'a SubmissionController,
    settled: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.controller.lock();
        if inner.torn_down || !inner.state.is_loading() {
            return;
        }
        warn!("prediction request abandoned before a response arrived");
        self.controller
            .transition(&mut inner, SubmissionState::Failed(ABANDONED_MESSAGE.to_string()));
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
