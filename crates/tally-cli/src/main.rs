//! Tally CLI - Transaction analytics and forecasting
//!
//! Usage:
//!   tally report --file transactions.csv     Full analytics report
//!   tally forecast --file tx.json --days 14  Spending forecast
//!   tally export --file tx.csv --output r.json
//!   tally serve --port 3000                  Start API server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Report {
            file,
            days,
            granularity,
            top,
            from,
            to,
            category,
            json,
        } => {
            let options = commands::resolve_options(&config, days, granularity.as_deref(), top)?;
            let range = commands::resolve_range(from.as_deref(), to.as_deref())?;
            commands::cmd_report(&file, options, range, category.as_deref(), json)
        }
        Commands::Stats { file } => commands::cmd_stats(&file),
        Commands::Trends { file, granularity } => {
            let options = commands::resolve_options(&config, None, granularity.as_deref(), None)?;
            commands::cmd_trends(&file, options.granularity)
        }
        Commands::Categories { file, top } => {
            let options = commands::resolve_options(&config, None, None, top)?;
            commands::cmd_categories(&file, options.top_n)
        }
        Commands::Forecast { file, days } => {
            let options = commands::resolve_options(&config, days, None, None)?;
            commands::cmd_forecast(&file, options.days_ahead)
        }
        Commands::Export {
            file,
            output,
            format,
        } => commands::cmd_export(&file, &output, &format, config.options()),
        Commands::Config => commands::cmd_config(&config, cli.config.as_deref()),
        Commands::Serve {
            port,
            host,
            allowed_origins,
        } => commands::cmd_serve(&host, port, allowed_origins, config).await,
    }
}
