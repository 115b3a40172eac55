//! Server command implementation

use anyhow::Result;
use tally_core::AnalyticsConfig;

pub async fn cmd_serve(
    host: &str,
    port: u16,
    allowed_origins: Vec<String>,
    analytics: AnalyticsConfig,
) -> Result<()> {
    println!("🚀 Starting Tally API server...");
    println!("   Listening: http://{}:{}", host, port);
    if allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    println!(
        "   Defaults: {} day forecast, {} periods",
        analytics.days_ahead, analytics.granularity
    );
    println!();
    println!("   Press Ctrl+C to stop");

    let config = tally_server::ServerConfig {
        allowed_origins,
        analytics,
    };

    tally_server::serve(host, port, config).await
}
