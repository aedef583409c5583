//! Config command handler.

use tds530_core::{
    Settings, SettingsUpdate, env_file_path, persist_instrument, validate_settings,
};

use crate::bootstrap::resolve_settings;
use crate::commands::ConfigCommand;
use crate::error::CliError;

/// Execute the config command.
pub fn execute(command: ConfigCommand) -> Result<(), CliError> {
    match command {
        ConfigCommand::Show(args) => {
            let settings = resolve_settings(&args)?;
            println!("{}", render_settings(&settings)?);
            Ok(())
        }
        ConfigCommand::SetInstrument { host, port } => set_instrument(&host, port),
    }
}

/// Settings as pretty-printed JSON.
pub fn render_settings(settings: &Settings) -> Result<String, CliError> {
    serde_json::to_string_pretty(settings).map_err(|e| CliError::General(e.to_string()))
}

/// Validate and persist the instrument address to the `.env` file.
fn set_instrument(host: &str, port: u16) -> Result<(), CliError> {
    let host = host.trim();
    let mut settings = Settings::with_defaults();
    settings.merge(&SettingsUpdate {
        instrument_host: Some(Some(host.to_string())),
        instrument_port: Some(Some(port)),
        ..Default::default()
    });
    validate_settings(&settings)?;

    persist_instrument(host, port)?;
    println!(
        "✓ Instrument set to {host}:{port} (saved to {})",
        env_file_path()?.display()
    );
    Ok(())
}
