//! # Cinegraph - Social Film Catalogue Server
//!
//! The main binary for the Cinegraph catalogue engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for catalogue operations
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │            apps/cinegraph (THE BINARY)          │
//! │                                                 │
//! │   ┌─────────────┐         ┌─────────────┐      │
//! │   │   CLI       │         │   HTTP API  │      │
//! │   │  (clap)     │         │   (axum)    │      │
//! │   └──────┬──────┘         └──────┬──────┘      │
//! │          │                       │              │
//! │          └───────────┬───────────┘              │
//! │                      ▼                          │
//! │            ┌──────────────────┐                 │
//! │            │  cinegraph-core  │                 │
//! │            │   (THE LOGIC)    │                 │
//! │            └──────────────────┘                 │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! cinegraph server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! cinegraph status
//! cinegraph init
//! ```

use cinegraph::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — CINEGRAPH_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("CINEGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "cinegraph=info,tower_http=debug".into());

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
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Cinegraph startup banner.
fn print_banner() {
    println!(
        r#"
   ____ ___ _   _ _____ ____ ____      _    ____  _   _
  / ___|_ _| \ | | ____/ ___|  _ \    / \  |  _ \| | | |
 | |    | ||  \| |  _|| |  _| |_) |  / _ \ | |_) | |_| |
 | |___ | || |\  | |__| |_| |  _ <  / ___ \|  __/|  _  |
  \____|___|_| \_|_____\____|_| \_\/_/   \_\_|   |_| |_|

  Social Film Catalogue Server v{}

  Films • Friends • Rankings
"#,
        env!("CARGO_PKG_VERSION")
    );
}
