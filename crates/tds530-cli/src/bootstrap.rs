//! CLI bootstrap: environment, logging and settings resolution.
//!
//! Settings are layered as flag > environment variable > `.env` file >
//! default. clap reads the environment, so the `.env` file only has to be
//! loaded into the process environment before parsing.

use std::path::PathBuf;

use tds530_core::{Settings, SettingsUpdate, env_file_path, validate_settings};
use tracing_subscriber::EnvFilter;

use crate::commands::RunArgs;
use crate::error::CliError;

/// Load `.env` from the data directory without overriding variables that
/// are already set.
///
/// Returns the path when a file was loaded.
pub fn load_env_file() -> Result<Option<PathBuf>, CliError> {
    let path = env_file_path()?;
    if !path.exists() {
        return Ok(None);
    }
    dotenvy::from_path(&path)
        .map_err(|e| CliError::Config(format!("Failed to load {}: {e}", path.display())))?;
    Ok(Some(path))
}

/// Install the `tracing` subscriber.
///
/// `RUST_LOG` wins; otherwise `info`, or `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .init();
}

/// Settings changes requested on the command line.
pub fn settings_update(args: &RunArgs) -> SettingsUpdate {
    let output_path = if args.dry_run {
        Some(None)
    } else {
        args.output.clone().map(Some)
    };

    SettingsUpdate {
        instrument_host: args.instrument.host.clone().map(Some),
        instrument_port: args.instrument.port.map(Some),
        http_host: args.http_host.clone().map(Some),
        http_port: args.http_port.map(Some),
        output_path,
        www_dir: args.www.clone().map(Some),
        poll_interval_ms: args.poll_interval_ms.map(Some),
        reconnect_delay_ms: args.reconnect_delay_ms.map(Some),
        reconnect: args.no_reconnect.then_some(Some(false)),
        ..Default::default()
    }
}

/// Defaults with the command line applied, validated.
pub fn resolve_settings(args: &RunArgs) -> Result<Settings, CliError> {
    let mut settings = Settings::with_defaults();
    settings.merge(&settings_update(args));
    validate_settings(&settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::InstrumentArgs;
    use tds530_core::{DEFAULT_HTTP_PORT, DEFAULT_INSTRUMENT_HOST};

    #[test]
    fn test_defaults_without_flags() {
        let settings = resolve_settings(&RunArgs::default()).unwrap();
        assert_eq!(settings.effective_instrument_host(), DEFAULT_INSTRUMENT_HOST);
        assert_eq!(settings.effective_http_port(), DEFAULT_HTTP_PORT);
        assert!(settings.output_path.is_none());
        assert!(settings.effective_reconnect());
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = RunArgs {
            instrument: InstrumentArgs {
                host: Some("10.1.2.3".to_string()),
                port: Some(4000),
            },
            output: Some("run".to_string()),
            no_reconnect: true,
            poll_interval_ms: Some(250),
            ..Default::default()
        };
        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.instrument_address(), "10.1.2.3:4000");
        assert_eq!(settings.output_path.as_deref(), Some("run"));
        assert!(!settings.effective_reconnect());
        assert_eq!(settings.poll_interval().as_millis(), 250);
    }

    #[test]
    fn test_dry_run_drops_output() {
        let args = RunArgs {
            output: Some("run.tsv".to_string()),
            dry_run: true,
            ..Default::default()
        };
        assert!(resolve_settings(&args).unwrap().output_path.is_none());
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let args = RunArgs {
            instrument: InstrumentArgs {
                host: None,
                port: Some(0),
            },
            ..Default::default()
        };
        let err = resolve_settings(&args).unwrap_err();
        assert_eq!(err.exit_code(), 78);
    }
}
