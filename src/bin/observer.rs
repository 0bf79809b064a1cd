//! PuckLive Observer — plánovaná smyčka poll cyklů.
//!
//! Externí scheduler nahrazuje obyčejný sleep — cyklus sám o sobě je
//! jednorázový a idempotentní (viz `poll-once`).
//!
//! Spuštění:
//!   cargo run --bin goal-observer

use anyhow::Result;
use dotenv::dotenv;
use pucklive::{build_cycle, Config};
use std::env;
use std::fs::File;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::from_env();

    info!("=== PuckLive Observer — LIVE GOAL PUSH ACTIVE ===");
    info!("Source: {}", cfg.base_url);
    info!("Poll interval: {}s", cfg.poll_interval_secs);
    info!("Logs: ./{}/", cfg.log_dir);

    // Single instance lock
    let lock_file_path = env::temp_dir().join("pucklive_observer.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => {
            info!("Acquired single-instance lock.");
            guard
        }
        Err(_) => {
            warn!("Another instance of goal-observer is already running! Exiting.");
            return Ok(());
        }
    };

    let cycle = build_cycle(&cfg)?;
    let interval = Duration::from_secs(cfg.poll_interval_secs);

    loop {
        info!("--- Poll cycle ---");
        match cycle.run(chrono::Utc::now()).await {
            Ok(outcomes) => {
                if !outcomes.is_empty() {
                    info!(
                        "Cycle OK: {}",
                        serde_json::to_string(&outcomes).unwrap_or_else(|_| "[]".into())
                    );
                }
            }
            Err(e) => {
                // fatální jen pro tenhle běh — příští cyklus se zotaví
                error!("cycle failed: {e:#}");
            }
        }

        sleep(interval).await;
    }
}
