//! The hosting surface: one reference loader and one controller sharing a lifetime.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::{AbortHandle, JoinHandle};
use tracing::debug;

use crate::{
    reference::{LocationSet, ReferenceData},
    submission::{SubmissionController, SubmitOutcome},
    transport::PredictionService,
    ClientSettings,
};

pub struct FormSession {
    reference: Arc<ReferenceData>,
    controller: Arc<SubmissionController>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl FormSession {
    pub fn new(service: Arc<dyn PredictionService>, settings: ClientSettings) -> Self {
        let reference = Arc::new(ReferenceData::new(
            Arc::clone(&service),
            settings.request_timeout,
        ));
        let controller = Arc::new(SubmissionController::new(
            service,
            Arc::clone(&reference),
            settings,
        ));
        Self {
            reference,
            controller,
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn reference(&self) -> &Arc<ReferenceData> {
        &self.reference
    }

    pub fn controller(&self) -> &Arc<SubmissionController> {
        &self.controller
    }

    /// Initializes the session and resolves once the location list has settled,
    /// either loaded or degraded to empty.
    pub async fn mount(&self) -> &LocationSet {
        self.reference.load().await
    }

    /// Starts the reference load without waiting for it. Poll
    /// `reference().locations()` or await `mount()` to observe the result.
    pub fn mount_in_background(&self) {
        let reference = Arc::clone(&self.reference);
        let handle = tokio::spawn(async move {
            reference.load().await;
        });
        self.track(&handle);
    }

    /// Runs `submit()` on a background task owned by this session.
    pub fn spawn_submit(&self) -> JoinHandle<SubmitOutcome> {
        let controller = Arc::clone(&self.controller);
        let handle = tokio::spawn(async move { controller.submit().await });
        self.track(&handle);
        handle
    }

    /// Cancels background work and detaches the controller. Late responses are dropped.
    pub fn teardown(&self) {
        self.reference.teardown();
        self.controller.teardown();
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        let pending = tasks.iter().filter(|task| !task.is_finished()).count();
        for task in tasks.drain(..) {
            task.abort();
        }
        debug!(pending, "form session torn down");
    }

    fn track<T>(&self, handle: &JoinHandle<T>) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle.abort_handle());
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
