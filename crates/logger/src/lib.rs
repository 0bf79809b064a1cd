/// PuckLive — Logger
/// JSONL stream provozních událostí (push notifikace, poll cykly, parser alerty)

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event typy ────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct PushSentEvent {
    pub ts:      String,
    pub event:   &'static str,   // "PUSH_SENT"
    pub game_id: i64,
    pub kind:    String,         // "started" | "goal" | "finished" | "reminder"
    pub lang:    String,
    pub sent:    usize,
    pub failed:  usize,
    pub pruned:  usize,
}

#[derive(Serialize, Debug)]
pub struct CycleSummaryEvent {
    pub ts:           String,
    pub event:        &'static str,   // "CYCLE_SUMMARY"
    pub games_polled: usize,
    pub transitions:  usize,
    pub reminders:    usize,
    pub errors:       usize,
}

#[derive(Serialize, Debug)]
pub struct FetchFailedEvent {
    pub ts:      String,
    pub event:   &'static str,   // "FETCH_FAILED"
    pub game_id: i64,
    pub error:   String,
}

/// Zápis ze zdroje obsahoval název klubu, který neznáme.
/// Gól zůstane bez přiřazení týmu — tabulku je potřeba ručně doplnit.
#[derive(Serialize, Debug)]
pub struct UnmappedTeamEvent {
    pub ts:       String,
    pub event:    &'static str,  // "UNMAPPED_TEAM"
    pub game_id:  i64,
    pub raw_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_appends_jsonl_line() {
        let dir = std::env::temp_dir().join(format!("pucklive_logger_{}", std::process::id()));
        let logger = EventLogger::new(&dir);
        logger
            .log(&FetchFailedEvent {
                ts: now_iso(),
                event: "FETCH_FAILED",
                game_id: 42,
                error: "HTTP 503".into(),
            })
            .unwrap();

        let date = Utc::now().format("%Y-%m-%d").to_string();
        let content = fs::read_to_string(dir.join(format!("{date}.jsonl"))).unwrap();
        assert!(content.contains("\"FETCH_FAILED\""));
        assert!(content.contains("\"game_id\":42"));
        fs::remove_dir_all(&dir).ok();
    }
}
