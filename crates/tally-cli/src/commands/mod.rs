//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (load_series, load_config, option resolution)
//! - `reports` - Report, stats, trends, categories and forecast output
//! - `export` - Export and config commands
//! - `serve` - API server command

pub mod core;
pub mod export;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use core::*;
pub use export::*;
pub use reports::*;
pub use serve::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
