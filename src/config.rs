//! Konfigurace přes env proměnné s rozumnými defaulty.
//!
//! Debounce konce zápasu a reminder okno jsou záměrně laditelné —
//! hodnoty 3 min / 20–30 min vycházejí z chování zdroje, ne z dokumentace.

use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub log_dir: String,
    /// Základ URL online zápisu.
    pub base_url: String,
    /// Offset mezi veřejným číslem zápasu a id v URL zdroje.
    pub sheet_id_offset: i64,
    pub poll_interval_secs: u64,
    /// Jak dlouho musí trvat "3. třetina 20:00" než zápas prohlásíme za dohraný.
    pub final_debounce_secs: i64,
    /// Reminder okno: začátek zápasu za 20–30 minut.
    pub reminder_lead_min_minutes: i64,
    pub reminder_lead_max_minutes: i64,
    /// Starší rozehrané zápasy už nepollujeme (zdroj je po téhle době mrtvý).
    pub max_game_age_hours: i64,
    pub push_ttl_secs: u64,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            db_path: env_or("PUCKLIVE_DB", "pucklive.db".to_string()),
            log_dir: env_or("PUCKLIVE_LOG_DIR", "logs".to_string()),
            base_url: env_or(
                "SCOREBOARD_BASE_URL",
                "https://www.hokejovyzapis.cz/zapas".to_string(),
            ),
            sheet_id_offset: env_or("SHEET_ID_OFFSET", 228_000),
            poll_interval_secs: env_or("POLL_INTERVAL_SECS", 60),
            final_debounce_secs: env_or("FINAL_DEBOUNCE_SECS", 180),
            reminder_lead_min_minutes: env_or("REMINDER_LEAD_MIN_MINUTES", 20),
            reminder_lead_max_minutes: env_or("REMINDER_LEAD_MAX_MINUTES", 30),
            max_game_age_hours: env_or("MAX_GAME_AGE_HOURS", 12),
            push_ttl_secs: env_or("PUSH_TTL_SECS", 900),
        }
    }
}
