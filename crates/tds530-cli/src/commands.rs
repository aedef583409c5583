//! Subcommands and their arguments.

use clap::{Args, Subcommand};

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the instrument, record samples and serve the web UI (default)
    Run(RunArgs),

    /// Request a single sample from the instrument and print it
    Probe {
        #[command(flatten)]
        instrument: InstrumentArgs,
        /// Print the sample as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show resolved paths (data directory, .env file, web UI)
    Paths,

    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Instrument address options.
#[derive(Args, Debug, Clone, Default)]
pub struct InstrumentArgs {
    /// Instrument hostname or IP address [default: 192.168.100.100]
    #[arg(long, env = "TDS530_HOST")]
    pub host: Option<String>,

    /// Instrument TCP port [default: 4242]
    #[arg(long, env = "TDS530_PORT")]
    pub port: Option<u16>,
}

/// Options of the `run` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub instrument: InstrumentArgs,

    /// Address the web UI binds to [default: 127.0.0.1]
    #[arg(long)]
    pub http_host: Option<String>,

    /// Port the web UI listens on [default: 5000]
    #[arg(long, env = "TDS530_HTTP_PORT")]
    pub http_port: Option<u16>,

    /// Append samples to this TSV file (".tsv" is added when missing)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Do not record, even when --output is given
    #[arg(long)]
    pub dry_run: bool,

    /// Directory with the web UI
    #[arg(long, value_name = "DIR")]
    pub www: Option<String>,

    /// Pause between samples in milliseconds [default: 0]
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Pause before reconnecting in milliseconds [default: 2000]
    #[arg(long, value_name = "MS")]
    pub reconnect_delay_ms: Option<u64>,

    /// Exit when the instrument drops the connection
    #[arg(long)]
    pub no_reconnect: bool,

    /// Open the web UI in the default browser once it is listening
    #[arg(long)]
    pub open: bool,
}

/// Configuration commands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective settings as JSON
    Show(RunArgs),

    /// Save the instrument address to the .env file in the data directory
    SetInstrument {
        /// Instrument hostname or IP address
        #[arg(long)]
        host: String,
        /// Instrument TCP port
        #[arg(long)]
        port: u16,
    },
}
