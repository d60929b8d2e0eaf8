use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use client_core::{ClientSettings, FormLimits};
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_CONFIG_FILE: &str = "predictor.toml";
pub const DEFAULT_SERVICE_URL: &str = "https://housepriceprediction-flask-nextjs-12.onrender.com";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub service_url: String,
    /// `None` or `0` leaves request timeouts to the http client.
    pub request_timeout_secs: Option<u64>,
    pub min_sqft: f64,
    pub max_sqft: f64,
}

impl Default for Settings {
    fn default() -> Self {
        let limits = FormLimits::default();
        Self {
            service_url: DEFAULT_SERVICE_URL.into(),
            request_timeout_secs: None,
            min_sqft: limits.min_sqft,
            max_sqft: limits.max_sqft,
        }
    }
}

impl Settings {
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            request_timeout: self
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            limits: FormLimits {
                min_sqft: self.min_sqft,
                max_sqft: self.max_sqft,
            },
        }
    }
}

/// Defaults, then the config file, then `PREDICTOR__*` environment variables.
///
/// An explicitly named file must exist; the default `predictor.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    load_settings_with(path, |key| std::env::var(key).ok())
}

fn load_settings_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Settings> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let mut settings = match fs::read_to_string(&path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound && !required => Settings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, lookup);
    Ok(settings)
}

fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str::<Settings>(raw)?)
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PREDICTOR__SERVICE_URL") {
        settings.service_url = v;
    }

    if let Some(v) = lookup("PREDICTOR__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed),
            Err(_) => warn!(value = %v, "ignoring invalid PREDICTOR__REQUEST_TIMEOUT_SECS"),
        }
    }

    if let Some(v) = lookup("PREDICTOR__MIN_SQFT") {
        match v.trim().parse::<f64>() {
            Ok(parsed) => settings.min_sqft = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid PREDICTOR__MIN_SQFT"),
        }
    }

    if let Some(v) = lookup("PREDICTOR__MAX_SQFT") {
        match v.trim().parse::<f64>() {
            Ok(parsed) => settings.max_sqft = parsed,
            Err(_) => warn!(value = %v, "ignoring invalid PREDICTOR__MAX_SQFT"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
