//! Reservation service (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                     RESERVATION SERVICE                      │
//!   │                                                              │
//!   │  ┌─────────────┐   ┌──────────────┐   ┌─────────────────┐    │
//!   │  │ reservation │──▶│    rooms     │──▶│   resilience    │    │
//!   │  │   builder   │   │   fetcher    │   │ circuit breaker │    │
//!   │  └─────────────┘   └──────┬───────┘   └────────┬────────┘    │
//!   │                           │ fallback           │             │
//!   │                           ▼                    ▼             │
//!   │                      Room::fallback()   ┌─────────────┐      │  GET endpoint
//!   │                                         │ rooms client│──────┼──────────────▶ Room
//!   │                                         │  + deadline │      │                Service
//!   │                                         └─────────────┘      │
//!   │  Cross-cutting: config · observability · lifecycle           │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use reservation_service::config::{load_config, ServiceConfig};
use reservation_service::lifecycle::{signals, Application, Shutdown};
use reservation_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "reservation-service")]
#[command(about = "Create reservations backed by the room service", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of reservations to create.
    #[arg(short = 'n', long, default_value_t = 1)]
    count: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    logging::init(&config.observability.log_level)?;
    tracing::info!("reservation-service v0.1.0 starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let app = Application::build(config)?;

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_ctrl_c_handler(shutdown.clone());
    let mut cancel = shutdown.subscribe();

    for _ in 0..cli.count {
        let reservation = app
            .reservations()
            .new_reservation_until_cancelled(&mut cancel)
            .await;
        println!("{}", serde_json::to_string_pretty(&reservation)?);

        if shutdown.is_triggered() {
            break;
        }
    }

    for breaker in app.registry().all() {
        let stats = breaker.metrics();
        tracing::info!(
            name = %breaker.name(),
            state = %stats.state,
            buffered_calls = stats.buffered_calls,
            failed_calls = stats.failed_calls,
            slow_calls = stats.slow_calls,
            not_permitted_calls = stats.not_permitted_calls,
            "Circuit breaker summary"
        );
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
