use std::{
    io::{self, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{
    FormField, FormSession, HttpPredictionService, LocationSet, SubmissionState, SubmitOutcome,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Estimate a Bangalore home price with the prediction service")]
struct Args {
    /// Settings file; defaults to ./predictor.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Print the selectable locations and exit.
    #[arg(long)]
    list_locations: bool,
    #[arg(long)]
    total_sqft: Option<String>,
    #[arg(long)]
    bhk: Option<String>,
    #[arg(long)]
    bath: Option<String>,
    #[arg(long)]
    location: Option<String>,
}

impl Args {
    fn form_values(&self) -> [(FormField, Option<&str>); 4] {
        [
            (FormField::TotalSqft, self.total_sqft.as_deref()),
            (FormField::Bhk, self.bhk.as_deref()),
            (FormField::Bath, self.bath.as_deref()),
            (FormField::Location, self.location.as_deref()),
        ]
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = &args.service_url {
        settings.service_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = Some(secs);
    }
    info!(service_url = %settings.service_url, "starting predictor");

    let service = HttpPredictionService::new(&settings.service_url)?;
    let session = FormSession::new(Arc::new(service), settings.client_settings());
    let locations = session.mount().await;

    if args.list_locations {
        write_locations(locations, &mut io::stdout().lock())?;
        return Ok(());
    }

    let controller = session.controller();
    for (field, value) in args.form_values() {
        if let Some(value) = value {
            controller.set_field(field, value);
        }
    }

    match controller.submit().await {
        SubmitOutcome::Completed(state) => render(&state),
        SubmitOutcome::Rejected(err) => bail!("cannot submit the form: {err}"),
        SubmitOutcome::IgnoredInFlight | SubmitOutcome::Detached => {
            bail!("prediction request did not run")
        }
    }
}

/// One location per line. An empty set prints nothing, matching the silent degradation
/// of a failed location load.
fn write_locations(locations: &LocationSet, out: &mut impl Write) -> io::Result<()> {
    if locations.is_empty() {
        warn!("no locations available");
    }
    for location in locations.iter() {
        writeln!(out, "{location}")?;
    }
    Ok(())
}

fn render(state: &SubmissionState) -> Result<()> {
    match state {
        SubmissionState::Success(price) => {
            println!("Estimated price: {}", format_price(*price));
            Ok(())
        }
        SubmissionState::Failed(message) => bail!("{message}"),
        SubmissionState::Idle | SubmissionState::Loading => Ok(()),
    }
}

fn format_price(price: f64) -> String {
    format!("\u{20b9}{price:.2} Lakhs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_price_in_lakhs() {
        assert_eq!(format_price(85.4), "\u{20b9}85.40 Lakhs");
    }

    #[test]
    fn failed_state_renders_as_error() {
        let err = render(&SubmissionState::Failed("service down".into())).expect_err("failed");
        assert_eq!(err.to_string(), "service down");
        assert!(render(&SubmissionState::Success(12.0)).is_ok());
    }

    #[test]
    fn lists_locations_one_per_line() {
        let locations = LocationSet::new(vec!["Whitefield".into(), "Indiranagar".into()]);
        let mut out = Vec::new();
        write_locations(&locations, &mut out).expect("write");
        assert_eq!(out, b"Whitefield\nIndiranagar\n");
    }

    #[test]
    fn empty_location_list_prints_nothing_and_succeeds() {
        let mut out = Vec::new();
        write_locations(&LocationSet::default(), &mut out).expect("empty list is not an error");
        assert!(out.is_empty());
    }

    #[test]
    fn form_flags_map_to_fields() {
        let args = Args::parse_from([
            "predictor",
            "--total-sqft",
            "1200",
            "--bhk",
            "2",
            "--location",
            "Whitefield",
        ]);
        let values = args.form_values();
        assert_eq!(values[0], (FormField::TotalSqft, Some("1200")));
        assert_eq!(values[2], (FormField::Bath, None));
        assert_eq!(values[3], (FormField::Location, Some("Whitefield")));
    }
}
