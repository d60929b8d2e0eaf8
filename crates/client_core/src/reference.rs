//! Location names fetched once per session and read-only afterwards.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::{
    error::ReferenceLoadError,
    transport::{with_timeout, PredictionService},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSet(Vec<String>);

static NO_LOCATIONS: LocationSet = LocationSet::new(Vec::new());

impl LocationSet {
    pub const fn new(locations: Vec<String>) -> Self {
        Self(locations)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, location: &str) -> bool {
        self.0.iter().any(|known| known == location)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for LocationSet {
    fn from(locations: Vec<String>) -> Self {
        Self::new(locations)
    }
}

/// Loads the location list with a single request and degrades to an empty set on failure.
pub struct ReferenceData {
    service: Arc<dyn PredictionService>,
    timeout: Option<Duration>,
    locations: OnceCell<LocationSet>,
    torn_down: AtomicBool,
}

/// The host went away before the list settled.
struct Detached;

impl ReferenceData {
    pub fn new(service: Arc<dyn PredictionService>, timeout: Option<Duration>) -> Self {
        Self {
            service,
            timeout,
            locations: OnceCell::new(),
            torn_down: AtomicBool::new(false),
        }
    }

    /// Resolves once the list is known. Concurrent and repeated callers share one request;
    /// a failed load settles on the empty set and is never retried.
    ///
    /// After [`ReferenceData::teardown`] no request is issued, a response still in flight
    /// is dropped, and the set stays unloaded.
    pub async fn load(&self) -> &LocationSet {
        let settled = self
            .locations
            .get_or_try_init(|| async {
                if self.is_torn_down() {
                    return Err(Detached);
                }
                let locations = match self.fetch().await {
                    Ok(locations) => {
                        info!(count = locations.len(), "location names loaded");
                        locations
                    }
                    Err(err) => {
                        warn!(
                            kind = err.0.kind(),
                            status = ?err.0.status(),
                            error = %err,
                            "location names unavailable; continuing without options"
                        );
                        LocationSet::default()
                    }
                };
                if self.is_torn_down() {
                    debug!("reference data torn down; location response discarded");
                    return Err(Detached);
                }
                Ok(locations)
            })
            .await;

        settled.unwrap_or(&NO_LOCATIONS)
    }

    /// Detaches the loader from its host; pending and future loads settle nothing.
    pub fn teardown(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Current options; empty until [`ReferenceData::load`] completes.
    pub fn locations(&self) -> &[String] {
        self.locations
            .get()
            .map(LocationSet::as_slice)
            .unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.locations.initialized()
    }

    async fn fetch(&self) -> Result<LocationSet, ReferenceLoadError> {
        let locations = with_timeout(self.timeout, self.service.location_names()).await?;
        Ok(LocationSet::new(locations))
    }
}

#[cfg(test)]
#[path = "tests/reference_tests.rs"]
mod tests;
