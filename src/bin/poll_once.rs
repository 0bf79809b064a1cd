//! Jeden poll cyklus pro externí trigger (cron, scheduler funkce).
//!
//! stdout: JSON pole `{id, status, score}` při úspěchu,
//!         `{"error": "..."}` + nenulový exit při top-level selhání.

use dotenv::dotenv;
use pucklive::{build_cycle, Config};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cfg = Config::from_env();

    let result = match build_cycle(&cfg) {
        Ok(cycle) => cycle.run(chrono::Utc::now()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcomes) => {
            println!(
                "{}",
                serde_json::to_string(&outcomes).unwrap_or_else(|_| "[]".into())
            );
        }
        Err(e) => {
            println!(
                "{}",
                serde_json::json!({ "error": format!("{e:#}") })
            );
            std::process::exit(1);
        }
    }
}
