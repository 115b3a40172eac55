//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Tally - Transaction analytics and spending forecasts
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Spending statistics, trends and forecasts from transaction files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analytics config file (defaults to the data dir override, then built-ins)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full analytics report: summary, statistics, trends, forecast, insights
    Report {
        /// Transaction file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Forecast horizon in days
        #[arg(long)]
        days: Option<u32>,

        /// Granularity: monthly or weekly
        #[arg(long)]
        granularity: Option<String>,

        /// Keep only the N largest categories, folding the rest into "Other"
        #[arg(long)]
        top: Option<usize>,

        /// Only include transactions on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Only include transactions on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Only include this category
        #[arg(long)]
        category: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Descriptive statistics of expense amounts
    Stats {
        /// Transaction file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Income and expenses per period
    Trends {
        /// Transaction file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Granularity: monthly or weekly
        #[arg(long)]
        granularity: Option<String>,
    },

    /// Expenses per category
    Categories {
        /// Transaction file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Keep only the N largest categories, folding the rest into "Other"
        #[arg(long)]
        top: Option<usize>,
    },

    /// Linear spending forecast
    Forecast {
        /// Transaction file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Forecast horizon in days
        #[arg(long)]
        days: Option<u32>,
    },

    /// Write the report to a file
    Export {
        /// Transaction file (.json, otherwise CSV)
        #[arg(short, long)]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format: json, periods-csv, categories-csv
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Show the effective analytics configuration
    Config,

    /// Start the analytics API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeatable, same-origin only when unset)
        #[arg(long = "allow-origin")]
        allowed_origins: Vec<String>,
    },
}
