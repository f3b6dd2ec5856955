use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxconv::AppCommand {
    fn from(cmd: Commands) -> fxconv::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                targets,
                base,
            } => fxconv::AppCommand::Convert {
                amount,
                targets,
                base,
            },
            Commands::History => fxconv::AppCommand::History,
            Commands::Delete { index } => fxconv::AppCommand::Delete { index },
            Commands::Currencies => fxconv::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount into one or more currencies
    Convert {
        /// Amount in the base currency, from 0 up to about 7.9e28
        amount: f64,
        /// Currency codes to convert into, e.g. EUR GBP
        #[arg(required = true)]
        targets: Vec<String>,
        /// Currency to convert from (defaults to the configured base currency)
        #[arg(short, long)]
        base: Option<String>,
    },
    /// Display the conversion history, newest first
    History,
    /// Delete a history entry by its index
    Delete {
        /// Index as shown by `history`
        index: usize,
    },
    /// List supported currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(cmd) => fxconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
