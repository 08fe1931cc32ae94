use anyhow::Result;
use clap::{Parser, Subcommand};
use kantor::AppCommand;
use kantor::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List supported currencies
    Currencies,
    /// Convert an amount once
    Convert {
        /// Amount in the source currency, e.g. 12,50
        amount: Option<String>,
        /// Source currency code
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Show the rate history of a pair
    History {
        /// Source currency code
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Start the interactive converter (default)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Setup => {
            let result = kantor::cli::setup::setup();
            if let Err(e) = &result {
                tracing::error!(error = %e, "Setup failed");
            }
            return result;
        }
        Commands::Currencies => AppCommand::Currencies,
        Commands::Convert { amount, from, to } => AppCommand::Convert { amount, from, to },
        Commands::History { from, to } => AppCommand::History { from, to },
        Commands::Interactive => AppCommand::Interactive,
    };

    let result = kantor::run_command(command, cli.config_path.as_deref()).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
