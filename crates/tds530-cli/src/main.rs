//! `TDS530Logger` entry point.

#![cfg_attr(feature = "windowed", windows_subsystem = "windows")]

use tds530_cli::bootstrap::{init_logging, load_env_file, resolve_settings};
use tds530_cli::{Cli, CliError, Commands, RunArgs, handlers};

#[tokio::main]
async fn main() {
    // The .env file feeds clap's env fallbacks, so load it before parsing
    let env_file = load_env_file();

    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    match &env_file {
        Ok(Some(path)) => {
            tracing::debug!(target: "tds530::startup", path = %path.display(), "Loaded env file");
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(target: "tds530::startup", "{e}"),
    }

    if let Err(e) = dispatch(cli.into_command()).await {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn dispatch(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Run(args) => {
            let settings = resolve_settings(&args)?;
            handlers::run::execute(settings, args.open).await
        }
        Commands::Probe { instrument, json } => {
            let args = RunArgs {
                instrument,
                ..Default::default()
            };
            let settings = resolve_settings(&args)?;
            handlers::probe::execute(&settings, json).await
        }
        Commands::Paths => handlers::paths::execute(),
        Commands::Config { command } => handlers::config::execute(command),
    }
}
