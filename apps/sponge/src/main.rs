//! # Bob - the Sponge project tool
//!
//! The binary entry point for the Sponge web framework.
//!
//! This application provides:
//! - Project scaffolding (`bob create`)
//! - Settings-driven bootstrap and serving (`bob go`)
//! - Both at once (`bob start`)
//!
//! ## Usage
//!
//! ```bash
//! # Scaffold a new project
//! bob create myblog
//!
//! # Run the project in the current directory
//! cd myblog && bob go
//!
//! # Scaffold and run in one step
//! bob start myblog
//! ```

use clap::Parser;
use sponge::bob;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — SPONGE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("SPONGE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sponge=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = bob::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = bob::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Sponge startup banner.
fn print_banner() {
    println!(
        r"
  ███████╗██████╗  ██████╗ ███╗   ██╗ ██████╗ ███████╗
  ██╔════╝██╔══██╗██╔═══██╗████╗  ██║██╔════╝ ██╔════╝
  ███████╗██████╔╝██║   ██║██╔██╗ ██║██║  ███╗█████╗
  ╚════██║██╔═══╝ ██║   ██║██║╚██╗██║██║   ██║██╔══╝
  ███████║██║     ╚██████╔╝██║ ╚████║╚██████╔╝███████╗
  ╚══════╝╚═╝      ╚═════╝ ╚═╝  ╚═══╝ ╚═════╝ ╚══════╝

  Sponge Web Framework v{}

  Settings-driven - Scaffolded - Small
",
        env!("CARGO_PKG_VERSION")
    );
}
