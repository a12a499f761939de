//! Binary entry point: parse options, point tracing at the log file, build
//! the manager (optionally with sample customers), and drive the Ratatui
//! event loop until the user exits.
use anyhow::{Context, Result};
use clap::Parser;
use customer_manager::config::{init_logging, Cli};
use customer_manager::{run_app, App, CustomerManager, NewCustomer};
use tracing::info;

/// Sample rows loaded by `--demo`.
const DEMO_CUSTOMERS: [(&str, &str, &str); 3] = [
    ("Ann", "Lee", "ann.lee@example.com"),
    ("Bob", "Roe", "bob.roe@example.com"),
    ("Carla", "Diaz", "carla.diaz@example.com"),
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_logging(&cli)?;
    info!(log = %log_path.display(), demo = cli.demo, "starting customer manager");

    let mut manager = CustomerManager::new();
    if cli.demo {
        for (first, last, email) in DEMO_CUSTOMERS {
            let _ = manager
                .add_customer(NewCustomer::new(first, last, email))
                .context("failed to seed demo customers")?;
        }
    }

    let mut app = App::new(manager);
    run_app(&mut app)
}
