//! Transport seam between the client state machines and the prediction service.

use std::{future::Future, time::Duration};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::{
    error::ServiceErrorBody,
    protocol::{
        LocationNamesResponse, PredictHomePriceRequest, PredictHomePriceResponse,
        LOCATION_NAMES_PATH, PREDICT_HOME_PRICE_PATH,
    },
};
use tracing::debug;
use url::Url;

use crate::error::ServiceError;

#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn location_names(&self) -> Result<Vec<String>, ServiceError>;
    async fn predict_home_price(
        &self,
        request: &PredictHomePriceRequest,
    ) -> Result<f64, ServiceError>;
}

pub struct HttpPredictionService {
    http: Client,
    base_url: Url,
}

impl HttpPredictionService {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("failed to build prediction service http client")?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid prediction service url '{base_url}'"))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            bail!("prediction service url must be an http(s) url, got '{base_url}'");
        }
        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }
        url
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn location_names(&self) -> Result<Vec<String>, ServiceError> {
        let url = self.endpoint(LOCATION_NAMES_PATH);
        debug!(%url, "requesting location names");
        let response = self.http.get(url).send().await.map_err(network_error)?;
        let body: LocationNamesResponse = read_json(response).await?;
        Ok(body.locations)
    }

    async fn predict_home_price(
        &self,
        request: &PredictHomePriceRequest,
    ) -> Result<f64, ServiceError> {
        let url = self.endpoint(PREDICT_HOME_PRICE_PATH);
        debug!(%url, location = %request.location, "requesting price estimate");
        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;
        let body: PredictHomePriceResponse = read_json(response).await?;
        Ok(body.estimated_price)
    }
}

/// Runs `call`, failing with [`ServiceError::Timeout`] once `limit` elapses.
pub(crate) async fn with_timeout<T, F>(limit: Option<Duration>, call: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(ServiceError::Timeout(limit))),
        None => call.await,
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.bytes().await.map_err(network_error)?;

    if !status.is_success() {
        let detail = ServiceErrorBody::detail_from_slice(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_string()
        });
        return Err(ServiceError::Request {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(|err| ServiceError::Payload(err.to_string()))
}

fn network_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Network(err.to_string())
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
