//! # Pensum - Curriculum Board Server
//!
//! The main binary for the Pensum curriculum planning board.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for board operations
//! - Remote snapshot sync (GitHub contents API)
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   apps/pensum (THE BINARY)                 │
//! │                                                            │
//! │  ┌───────────┐    ┌─────────────┐    ┌─────────────────┐  │
//! │  │   CLI     │    │  HTTP API   │    │  Remote Sync    │  │
//! │  │  (clap)   │    │   (axum)    │    │  (reqwest)      │  │
//! │  └─────┬─────┘    └──────┬──────┘    └────────┬────────┘  │
//! │        │                 │                    │           │
//! │        └─────────────────┼────────────────────┘           │
//! │                          ▼                                │
//! │                  ┌──────────────┐                         │
//! │                  │ pensum-core  │                         │
//! │                  │ (THE LOGIC)  │                         │
//! │                  └──────────────┘                         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! pensum server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! pensum status
//! pensum board --search calculo
//! pensum subject save -f subject.json
//! pensum export -o pensum_data.json
//! ```

use clap::Parser;
use pensum::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — PENSUM_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PENSUM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pensum=info,tower_http=debug".into());

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

/// Print the Pensum startup banner.
fn print_banner() {
    println!(
        r#"
  ██████╗ ███████╗███╗   ██╗███████╗██╗   ██╗███╗   ███╗
  ██╔══██╗██╔════╝████╗  ██║██╔════╝██║   ██║████╗ ████║
  ██████╔╝█████╗  ██╔██╗ ██║███████╗██║   ██║██╔████╔██║
  ██╔═══╝ ██╔══╝  ██║╚██╗██║╚════██║██║   ██║██║╚██╔╝██║
  ██║     ███████╗██║ ╚████║███████║╚██████╔╝██║ ╚═╝ ██║
  ╚═╝     ╚══════╝╚═╝  ╚═══╝╚══════╝ ╚═════╝ ╚═╝     ╚═╝

  Curriculum Board v{}

  Semestres • Requisitos • Ejes
"#,
        env!("CARGO_PKG_VERSION")
    );
}
