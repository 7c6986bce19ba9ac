use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use nbp_rates::core::RateQuery;
use nbp_rates::core::log::init_logging;

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
    /// Run the HTTP API
    Serve {
        /// Address to listen on, overrides the configuration
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on, overrides the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Mid rate of a currency on a given date (YYYY-MM-DD)
    Rate {
        code: String,
        date: String,
        #[arg(long)]
        json: bool,
    },
    /// Lowest and highest mid rate over the last N quotations
    Average {
        code: String,
        #[arg(allow_negative_numbers = true)]
        count: i64,
        #[arg(long)]
        json: bool,
    },
    /// Biggest ask/bid difference over the last N quotations
    Difference {
        code: String,
        #[arg(allow_negative_numbers = true)]
        count: i64,
        #[arg(long)]
        json: bool,
    },
}

impl From<Commands> for nbp_rates::AppCommand {
    fn from(cmd: Commands) -> nbp_rates::AppCommand {
        use nbp_rates::AppCommand;
        use nbp_rates::core::QueryMode;

        match cmd {
            Commands::Serve { host, port } => AppCommand::Serve { host, port },
            Commands::Rate { code, date, json } => AppCommand::Query {
                query: RateQuery {
                    code,
                    mode: QueryMode::DateLookup { date },
                },
                json,
            },
            Commands::Average { code, count, json } => AppCommand::Query {
                query: RateQuery {
                    code,
                    mode: QueryMode::LastN { count },
                },
                json,
            },
            Commands::Difference { code, count, json } => AppCommand::Query {
                query: RateQuery::spread(&code, count),
                json,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => nbp_rates::cli::setup::setup_at_path(path),
            None => nbp_rates::cli::setup::setup(),
        },
        Some(cmd) => nbp_rates::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
