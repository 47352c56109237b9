//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open every store from a data directory and report record counts.
//! - Optionally start file logging when `LENDERS_LOG_DIR` is set.
//!
//! Usage: `lenders_cli [DATA_DIR]` (defaults to `./data`).

use lenders_core::{default_log_level, init_logging, LoggingConfig, StoreConfig, Stores};
use std::process::ExitCode;

const DEFAULT_DATA_DIR: &str = "data";
const LOG_DIR_ENV: &str = "LENDERS_LOG_DIR";
const LOG_LEVEL_ENV: &str = "LENDERS_LOG_LEVEL";

fn main() -> ExitCode {
    if let Ok(log_dir) = std::env::var(LOG_DIR_ENV) {
        let level =
            std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
        if let Err(err) = init_logging(&LoggingConfig::new(level, log_dir)) {
            eprintln!("lenders_cli logging disabled: {err}");
        }
    }

    let data_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
    let config = StoreConfig::from_data_dir(&data_dir);

    match Stores::open(&config) {
        Ok(stores) => {
            let counts = stores.counts();
            println!("lenders_core version={}", lenders_core::core_version());
            println!("data_dir={data_dir}");
            println!(
                "users={} admins={} buyers={} lenders={}",
                counts.users, counts.admins, counts.buyers, counts.lenders
            );
            println!(
                "houses={} house_applications={} investments={} investments_consistent={}",
                counts.houses,
                counts.house_applications,
                counts.investments,
                stores.investments.is_consistent()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("lenders_cli failed to open stores: {err}");
            ExitCode::FAILURE
        }
    }
}
