//! fnoscope CLI - near-month futures discovery and intraday bar downloads.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

/// Options shared by every command that talks to the API.
#[derive(clap::Args, Debug, Clone)]
pub(crate) struct ApiArgs {
    /// API root URL
    #[arg(long, env = "FNOSCOPE_BASE_URL", global = true)]
    base_url: Option<String>,

    /// Bearer token for the market-data API
    #[arg(long, env = "FNOSCOPE_ACCESS_TOKEN", global = true, hide_env_values = true)]
    access_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout_secs: u64,
}

#[derive(Parser)]
#[command(name = "fnoscope")]
#[command(about = "Near-month futures discovery and intraday bar downloads", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only, no progress output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    api: ApiArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// List the default underlying universe
    Underlyings {
        /// Filter by kind (index, stock)
        #[arg(short, long)]
        kind: Option<String>,

        /// Search pattern over symbols and aliases
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Select the near-month future for each underlying
    Contracts {
        /// Read the instrument master from a file instead of the API
        #[arg(short, long)]
        master: Option<PathBuf>,

        /// Selection date (YYYY-MM-DD). Defaults to today in exchange time.
        #[arg(short, long)]
        as_of: Option<String>,

        /// Underlyings to select for. Defaults to the whole registry.
        #[arg(short, long, num_args = 1..)]
        underlying: Vec<String>,

        /// Print the selection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Discover contracts and download their bars
    Bars {
        /// Start date (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to the start date.
        #[arg(short, long)]
        end: Option<String>,

        /// Bar interval (m1, m5, m15, h1, d1, ...)
        #[arg(short, long, default_value = "m1")]
        interval: String,

        /// Underlyings to fetch. Defaults to the whole registry.
        #[arg(short, long, num_args = 1..)]
        underlying: Vec<String>,

        /// Exchange segment of the contracts (NSE_FO, BSE_FO, MCX_FO)
        #[arg(long, default_value = "NSE_FO")]
        segment: String,

        /// Pause between requests in milliseconds
        #[arg(long, default_value = "500")]
        pause_ms: u64,

        /// Deadline for a single bar fetch in seconds
        #[arg(long, default_value = "30")]
        deadline_secs: u64,

        /// Bar fetches in flight at once
        #[arg(long, default_value = "1")]
        concurrency: usize,

        /// Print bars as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Decode a saved bar response
    Decode {
        /// File holding the raw bar-series text
        file: PathBuf,

        /// Print bars as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Underlyings { kind, search } => {
            commands::underlyings::list_underlyings(kind.as_deref(), search.as_deref())
        }
        Commands::Contracts {
            master,
            as_of,
            underlying,
            json,
        } => {
            commands::contracts::contracts(
                &cli.api,
                master.as_deref(),
                as_of.as_deref(),
                &underlying,
                json,
            )
            .await
        }
        Commands::Bars {
            start,
            end,
            interval,
            underlying,
            segment,
            pause_ms,
            deadline_secs,
            concurrency,
            json,
        } => {
            let options = commands::bars::BarsOptions {
                start,
                end,
                interval,
                underlying,
                segment,
                pause_ms,
                deadline_secs,
                concurrency,
                json,
                quiet: cli.quiet,
            };
            commands::bars::bars(&cli.api, options).await
        }
        Commands::Decode { file, json } => commands::decode::decode(&file, json),
    }
}

/// Installs the log subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
