//! Probe command handler.
//!
//! Sends a single `ST` request and prints the reply.

use std::time::Duration;

use tds530_axum::dto::LatestSampleDto;
use tds530_core::{Sample, Settings};
use tds530_runtime::{ClientOptions, InstrumentClient};
use tracing::debug;

use crate::error::CliError;

/// Total wait for the reply before giving up.
const PROBE_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// Execute the probe command.
pub async fn execute(settings: &Settings, json: bool) -> Result<(), CliError> {
    let sample = fetch(settings).await?;
    println!("{}", render(&sample, json)?);
    Ok(())
}

/// Connect, request one sample and disconnect.
pub async fn fetch(settings: &Settings) -> Result<Sample, CliError> {
    let address = settings.instrument_address();
    let options = ClientOptions {
        response_timeout: Some(PROBE_RESPONSE_TIMEOUT),
        ..ClientOptions::from_settings(settings)
    };

    debug!(address = %address, "Probing instrument");
    let mut client = InstrumentClient::connect(&address, options).await?;
    Ok(client.request_sample().await?)
}

/// Format a sample as a channel table or as the `/v1/` JSON body.
pub fn render(sample: &Sample, json: bool) -> Result<String, CliError> {
    if json {
        return serde_json::to_string_pretty(&LatestSampleDto::from(sample))
            .map_err(|e| CliError::General(e.to_string()));
    }

    let mut out = format!("Time: {}\n", sample.time_string());
    out.push_str(&format!("{:<8}{:>16}\n", "Channel", "Value"));
    for reading in &sample.readings {
        let value = reading
            .value
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        out.push_str(&format!("{:<8}{:>16}\n", reading.channel, value));
    }
    out.push_str(&format!("{} channel(s)", sample.channel_count()));
    Ok(out)
}
