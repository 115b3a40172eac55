//! Export and config command implementations

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tally_core::config::default_config_path;
use tally_core::{AnalyticsConfig, AnalyticsFacade, AnalyticsOptions, ExportFormat};

use super::load_series;

pub fn cmd_export(
    file: &Path,
    output: &Path,
    format: &str,
    options: AnalyticsOptions,
) -> Result<()> {
    let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let series = load_series(file)?;
    let report = AnalyticsFacade::new(options).compute(&series)?;
    let content = format.render(&report)?;

    fs::write(output, content)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "✅ Exported {} report for {} transactions to {}",
        format,
        report.summary.transaction_count,
        output.display()
    );
    Ok(())
}

pub fn cmd_config(config: &AnalyticsConfig, explicit: Option<&Path>) -> Result<()> {
    println!();
    println!("⚙️  Analytics Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Forecast horizon: {} days", config.days_ahead);
    println!("   Granularity:      {}", config.granularity);
    match config.top_n {
        Some(n) => println!("   Top categories:   {}", n),
        None => println!("   Top categories:   all"),
    }

    println!();
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(default_config_path);
    match path {
        Some(path) if path.exists() => println!("   Loaded from: {}", path.display()),
        Some(path) => {
            println!("   Using built-in defaults");
            println!("   Override file: {} (not present)", path.display());
        }
        None => println!("   Using built-in defaults"),
    }

    Ok(())
}
