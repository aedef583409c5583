//! Main CLI parser and top-level argument handling.

use std::ffi::OsString;

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::{CommandFactory, FromArgMatches, Parser};

use crate::commands::{Commands, RunArgs};

/// Record readings from a TDS530 data logger and serve them over HTTP.
///
/// Without a subcommand, `run` is executed with the options given here.
#[derive(Parser, Debug)]
#[command(name = "TDS530Logger")]
#[command(about = "Record TDS530 data logger readings and serve them over HTTP")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse `std::env::args`, exiting on error like [`Parser::parse`].
    pub fn parse_args() -> Self {
        Self::try_parse_args_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parse `args`, rejecting top-level run options combined with a subcommand.
    ///
    /// `--verbose` is global and allowed on either side of the subcommand.
    /// Values taken from the environment do not count as given.
    pub fn try_parse_args_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = Self::command();
        let matches = command.try_get_matches_from_mut(args)?;

        if let Some((name, _)) = matches.subcommand() {
            let given = command
                .get_arguments()
                .filter(|arg| arg.get_id() != "verbose")
                .find(|arg| {
                    matches.value_source(arg.get_id().as_str()) == Some(ValueSource::CommandLine)
                })
                .map(|arg| arg.get_long().unwrap_or(arg.get_id().as_str()).to_string());
            if let Some(flag) = given {
                return Err(command.error(
                    ErrorKind::ArgumentConflict,
                    format!("'--{flag}' cannot be used with the subcommand '{name}'"),
                ));
            }
        }

        Self::from_arg_matches(&matches).map_err(|e| e.format(&mut command))
    }

    /// The command to execute, `run` when none was given.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Run(self.run))
    }
}
