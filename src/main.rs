use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use ecb_rates::core::log::init_logging;

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

impl From<Commands> for ecb_rates::AppCommand {
    fn from(cmd: Commands) -> ecb_rates::AppCommand {
        match cmd {
            Commands::Serve => ecb_rates::AppCommand::Serve,
            Commands::Currencies => ecb_rates::AppCommand::Currencies,
            Commands::Rates {
                currency,
                start,
                end,
            } => ecb_rates::AppCommand::Rates {
                currency,
                start,
                end,
            },
            Commands::Latest { currency } => ecb_rates::AppCommand::Latest { currency },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Serve the exchange rate HTTP API
    Serve,
    /// List currency codes published by the ECB
    Currencies,
    /// Display rates for a base currency, optionally within a date range
    Rates {
        /// Base currency code, e.g. USD
        #[arg(long)]
        currency: String,
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Display the latest published rates for a base currency
    Latest {
        /// Base currency code, e.g. USD
        #[arg(long)]
        currency: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ecb_rates::cli::setup::setup(),
        Some(cmd) => ecb_rates::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
