use anyhow::Result;
use clap::{Parser, Subcommand};
use lira::core::log::init_logging;

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

impl From<Commands> for lira::AppCommand {
    fn from(cmd: Commands) -> lira::AppCommand {
        match cmd {
            Commands::Convert {
                amount,
                reverse,
                stylized,
            } => lira::AppCommand::Convert {
                amount,
                reverse,
                stylized,
            },
            Commands::Rate => lira::AppCommand::Rate,
            Commands::Interactive => lira::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount once and exit
    Convert {
        /// Amount in the source currency
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Convert from the quote currency to the base currency
        #[arg(short, long)]
        reverse: bool,
        /// Ignore the math
        #[arg(short, long)]
        stylized: bool,
    },
    /// Show the current exchange rate and where it came from
    Rate,
    /// Convert interactively (default)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => lira::cli::setup::setup(),
        Some(cmd) => lira::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            lira::run_command(lira::AppCommand::Interactive, cli.config_path.as_deref()).await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
