//! Shared fixtures: in-process axum services and a scripted `PredictionService`.

use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use axum::Router;
use shared::protocol::PredictHomePriceRequest;
use tokio::{net::TcpListener, sync::Notify};

use crate::{error::ServiceError, transport::PredictionService};

pub(crate) async fn spawn_service(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

/// A loopback url nothing listens on.
pub(crate) async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}

pub(crate) fn hit(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

pub(crate) struct ScriptedService {
    locations: Result<Vec<String>, ServiceError>,
    prediction: Mutex<Result<f64, ServiceError>>,
    gate: Option<Arc<Notify>>,
    delay: Option<Duration>,
    pub location_calls: AtomicUsize,
    pub predict_calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub requests: Mutex<Vec<PredictHomePriceRequest>>,
}

impl ScriptedService {
    pub(crate) fn new(prediction: Result<f64, ServiceError>) -> Self {
        Self {
            locations: Ok(Vec::new()),
            prediction: Mutex::new(prediction),
            gate: None,
            delay: None,
            location_calls: AtomicUsize::new(0),
            predict_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_locations(mut self, locations: Result<Vec<String>, ServiceError>) -> Self {
        self.locations = locations;
        self
    }

    /// Holds every call until the gate is notified.
    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn set_prediction(&self, prediction: Result<f64, ServiceError>) {
        *self.prediction.lock().expect("prediction lock") = prediction;
    }

    pub(crate) fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn location_calls(&self) -> usize {
        self.location_calls.load(Ordering::SeqCst)
    }

    async fn hold(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl PredictionService for ScriptedService {
    async fn location_names(&self) -> Result<Vec<String>, ServiceError> {
        hit(&self.location_calls);
        self.hold().await;
        self.locations.clone()
    }

    async fn predict_home_price(
        &self,
        request: &PredictHomePriceRequest,
    ) -> Result<f64, ServiceError> {
        hit(&self.predict_calls);
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        self.hold().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.prediction.lock().expect("prediction lock").clone()
    }
}
