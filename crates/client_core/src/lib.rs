//! Client core for the home price predictor: reference data loading, form state,
//! and the submission state machine, independent of any rendering surface.

use std::time::Duration;

pub mod error;
pub mod form;
pub mod reference;
pub mod session;
pub mod submission;
pub mod transport;

pub use error::{ReferenceLoadError, ServiceError, ValidationError};
pub use form::{FormLimits, FormState};
pub use reference::{LocationSet, ReferenceData};
pub use session::FormSession;
pub use shared::domain::{FormField, UnknownFormField};
pub use submission::{SubmissionController, SubmissionState, SubmitOutcome};
pub use transport::{HttpPredictionService, PredictionService};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClientSettings {
    /// Upper bound for each call to the prediction service. `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,
    pub limits: FormLimits,
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
