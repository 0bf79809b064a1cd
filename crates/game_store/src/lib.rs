//! PuckLive — Game Store
//! SQLite persistence: zápasy + live-state blob, účty, sledované týmy,
//! push zařízení.
//!
//! Zápisy jsou cílené UPDATEy — live poll sahá jen na svoje sloupce,
//! reminder flag má vlastní zápis. Obě cesty běží v jednom cyklu a nesmí
//! si navzájem přepsat data.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use game_state::{GameStatus, LiveState};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct GameRow {
    /// Veřejné číslo zápasu — zároveň klíč do URL zdroje.
    pub id: i64,
    pub home_team: String,
    pub away_team: String,
    pub starts_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub score_home: Option<u32>,
    pub score_away: Option<u32>,
    pub status: GameStatus,
    pub live_state: Option<LiveState>,
    pub reminder_sent: bool,
    pub reminder_sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    /// "cs" | "en" | "de"; None → default jazyka řeší notifier.
    pub lang: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PushDevice {
    pub id: i64,
    pub account_id: i64,
    pub endpoint: String,
    pub p256dh: Option<String>,
    pub auth: Option<String>,
    pub platform: Option<String>,
}

pub struct GameStore {
    conn: Mutex<Connection>,
}

impl GameStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let conn = Connection::open(path).context("open sqlite db")?;
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL").ok();
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory db")?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    // ── Zápasy ────────────────────────────────────────────────────────────

    /// Naseedování / aktualizace rozpisu. Nesahá na live sloupce ani flagy.
    pub fn upsert_game(
        &self,
        id: i64,
        home_team: &str,
        away_team: &str,
        starts_at: DateTime<Utc>,
        venue: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO games(id, home_team, away_team, starts_at, venue)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                home_team=excluded.home_team,
                away_team=excluded.away_team,
                starts_at=excluded.starts_at,
                venue=excluded.venue
            "#,
            params![id, home_team, away_team, starts_at.to_rfc3339(), venue],
        )?;
        Ok(())
    }

    pub fn game(&self, id: i64) -> Result<Option<GameRow>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {GAME_COLS} FROM games WHERE id = ?1"),
            params![id],
            game_from_row,
        )
        .optional()
        .context("load game")
    }

    /// Zápasy k poll cyklu: už začaly, nejsou moc staré a nejsou dohrané.
    pub fn games_to_poll(
        &self,
        now: DateTime<Utc>,
        max_age: chrono::Duration,
    ) -> Result<Vec<GameRow>> {
        let oldest = now - max_age;
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {GAME_COLS} FROM games
            WHERE starts_at <= ?1 AND starts_at >= ?2 AND status != 'finished'
            ORDER BY starts_at
            "#
        ))?;
        let rows = stmt.query_map(
            params![now.to_rfc3339(), oldest.to_rfc3339()],
            game_from_row,
        )?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("select games to poll")
    }

    /// Zápasy pro "za chvíli se hraje" — začátek v okně a bez odeslaného reminderu.
    pub fn games_for_reminder(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<GameRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {GAME_COLS} FROM games
            WHERE starts_at >= ?1 AND starts_at <= ?2 AND reminder_sent = 0
            ORDER BY starts_at
            "#
        ))?;
        let rows = stmt.query_map(params![from.to_rfc3339(), to.to_rfc3339()], game_from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("select games for reminder")
    }

    /// Zápis výsledku live pollu. Dotýká se jen sloupců, které vlastní
    /// live cesta — reminder flag zůstává nedotčený.
    pub fn write_live(
        &self,
        id: i64,
        status: GameStatus,
        score_home: u32,
        score_away: u32,
        live_state: &LiveState,
    ) -> Result<()> {
        let blob = serde_json::to_string(live_state)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            UPDATE games
            SET status = ?2, score_home = ?3, score_away = ?4, live_state = ?5
            WHERE id = ?1
            "#,
            params![id, status.as_db_str(), score_home, score_away, blob],
        )
        .context("write live state")?;
        Ok(())
    }

    /// Samostatný zápis reminder flagu — nezávislý na live zápisu.
    pub fn mark_reminder_sent(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE games SET reminder_sent = 1, reminder_sent_at = ?2 WHERE id = ?1",
            params![id, at.to_rfc3339()],
        )
        .context("mark reminder sent")?;
        Ok(())
    }

    // ── Účty a zařízení ───────────────────────────────────────────────────

    pub fn add_account(&self, id: i64, lang: Option<&str>) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO accounts(id, lang) VALUES (?1, ?2)",
            params![id, lang],
        )?;
        Ok(())
    }

    pub fn add_follow(&self, account_id: i64, team_code: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO follows(account_id, team_code) VALUES (?1, ?2)",
            params![account_id, team_code],
        )?;
        Ok(())
    }

    pub fn add_device(
        &self,
        account_id: i64,
        endpoint: &str,
        p256dh: Option<&str>,
        auth: Option<&str>,
        platform: Option<&str>,
    ) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO push_devices(account_id, endpoint, p256dh, auth, platform)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![account_id, endpoint, p256dh, auth, platform],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Účty sledující kterýkoli z obou týmů, dedup na úrovni účtu.
    pub fn accounts_following(&self, team_a: &str, team_b: &str) -> Result<Vec<Account>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT DISTINCT a.id, a.lang
            FROM accounts a
            JOIN follows f ON f.account_id = a.id
            WHERE f.team_code IN (?1, ?2)
            ORDER BY a.id
            "#,
        )?;
        let rows = stmt.query_map(params![team_a, team_b], |row| {
            Ok(Account {
                id: row.get(0)?,
                lang: row.get(1)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("select followers")
    }

    pub fn devices_for_account(&self, account_id: i64) -> Result<Vec<PushDevice>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT id, account_id, endpoint, p256dh, auth, platform
            FROM push_devices WHERE account_id = ?1
            "#,
        )?;
        let rows = stmt.query_map(params![account_id], |row| {
            Ok(PushDevice {
                id: row.get(0)?,
                account_id: row.get(1)?,
                endpoint: row.get(2)?,
                p256dh: row.get(3)?,
                auth: row.get(4)?,
                platform: row.get(5)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .context("select devices")
    }

    /// Mazání registrace po trvale neplatném doručení (HTTP 404/410).
    pub fn delete_device(&self, device_id: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM push_devices WHERE id = ?1", params![device_id])?;
        Ok(())
    }

    pub fn device_count(&self) -> Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM push_devices", [], |r| r.get(0))
            .context("count devices")
    }
}

const GAME_COLS: &str = "id, home_team, away_team, starts_at, venue, score_home, score_away, \
                         status, live_state, reminder_sent, reminder_sent_at";

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            starts_at TEXT NOT NULL,
            venue TEXT,
            score_home INTEGER,
            score_away INTEGER,
            status TEXT NOT NULL DEFAULT 'scheduled',
            live_state TEXT,
            reminder_sent INTEGER NOT NULL DEFAULT 0,
            reminder_sent_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_games_starts ON games(starts_at);
        CREATE INDEX IF NOT EXISTS idx_games_status ON games(status);

        CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY,
            lang TEXT
        );

        CREATE TABLE IF NOT EXISTS follows (
            account_id INTEGER NOT NULL,
            team_code TEXT NOT NULL,
            PRIMARY KEY (account_id, team_code)
        );

        CREATE INDEX IF NOT EXISTS idx_follows_team ON follows(team_code);

        CREATE TABLE IF NOT EXISTS push_devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL,
            endpoint TEXT NOT NULL,
            p256dh TEXT,
            auth TEXT,
            platform TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_devices_account ON push_devices(account_id);
        "#,
    )
    .context("init schema")?;
    Ok(())
}

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<GameRow> {
    let starts_at: String = row.get(3)?;
    let status: String = row.get(7)?;
    let live_state: Option<String> = row.get(8)?;
    let reminder_sent_at: Option<String> = row.get(10)?;

    Ok(GameRow {
        id: row.get(0)?,
        home_team: row.get(1)?,
        away_team: row.get(2)?,
        starts_at: parse_ts(&starts_at).unwrap_or_else(|| {
            warn!(raw = %starts_at, "corrupt starts_at in db, falling back to now");
            Utc::now()
        }),
        venue: row.get(4)?,
        score_home: row.get(5)?,
        score_away: row.get(6)?,
        status: GameStatus::from_db_str(&status).unwrap_or_else(|| {
            warn!(status = %status, "unknown status in db, treating as scheduled");
            GameStatus::Scheduled
        }),
        live_state: live_state.and_then(|blob| match serde_json::from_str(&blob) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!("corrupt live_state blob: {e}");
                None
            }
        }),
        reminder_sent: row.get::<_, i64>(9)? != 0,
        reminder_sent_at: reminder_sent_at.and_then(|s| parse_ts(&s)),
    })
}

fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use game_state::LiveStateUpdate;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, h, m, 0).unwrap()
    }

    fn store_with_game() -> GameStore {
        let store = GameStore::open_in_memory().unwrap();
        store
            .upsert_game(101, "SPA", "KOM", ts(18, 0), Some("O2 arena"))
            .unwrap();
        store
    }

    #[test]
    fn game_round_trip() {
        let store = store_with_game();
        let game = store.game(101).unwrap().unwrap();
        assert_eq!(game.home_team, "SPA");
        assert_eq!(game.status, GameStatus::Scheduled);
        assert_eq!(game.score_home, None);
        assert!(!game.reminder_sent);
        assert!(store.game(999).unwrap().is_none());
    }

    #[test]
    fn write_live_preserves_reminder_flag() {
        let store = store_with_game();
        store.mark_reminder_sent(101, ts(17, 35)).unwrap();

        let state = LiveState::merge(
            None,
            LiveStateUpdate {
                raw_status: Some("1. třetina 02:00".into()),
                ..Default::default()
            },
        );
        store
            .write_live(101, GameStatus::Live(1), 1, 0, &state)
            .unwrap();

        let game = store.game(101).unwrap().unwrap();
        assert_eq!(game.status, GameStatus::Live(1));
        assert_eq!(game.score_home, Some(1));
        assert!(game.reminder_sent, "live zápis nesmí shodit reminder flag");
        assert_eq!(game.reminder_sent_at, Some(ts(17, 35)));
        assert_eq!(game.live_state.unwrap().raw_status, "1. třetina 02:00");
    }

    #[test]
    fn corrupt_timestamp_still_loads_row() {
        let store = store_with_game();
        store
            .conn
            .lock()
            .unwrap()
            .execute("UPDATE games SET starts_at = 'nesmysl' WHERE id = 101", [])
            .unwrap();

        // řádek se načte s náhradním časem, nepadá
        let game = store.game(101).unwrap().unwrap();
        assert_eq!(game.home_team, "SPA");
        assert_ne!(game.starts_at, ts(18, 0));
    }

    #[test]
    fn games_to_poll_filters_by_window_and_status() {
        let store = GameStore::open_in_memory().unwrap();
        let now = ts(20, 0);
        store.upsert_game(1, "SPA", "KOM", ts(19, 0), None).unwrap(); // běží
        store.upsert_game(2, "TRI", "PLZ", ts(21, 0), None).unwrap(); // ještě nezačal
        store.upsert_game(3, "LIB", "VIT", ts(2, 0), None).unwrap(); // moc starý
        store.upsert_game(4, "PCE", "OLO", ts(19, 30), None).unwrap(); // dohraný
        store
            .write_live(4, GameStatus::Finished, 3, 2, &LiveState::default())
            .unwrap();

        let ids: Vec<i64> = store
            .games_to_poll(now, chrono::Duration::hours(12))
            .unwrap()
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn reminder_window_excludes_already_sent() {
        let store = GameStore::open_in_memory().unwrap();
        store.upsert_game(1, "SPA", "KOM", ts(18, 25), None).unwrap();
        store.upsert_game(2, "TRI", "PLZ", ts(18, 25), None).unwrap();
        store.mark_reminder_sent(2, ts(18, 0)).unwrap();

        let ids: Vec<i64> = store
            .games_for_reminder(ts(18, 20), ts(18, 30))
            .unwrap()
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn followers_of_either_team_deduped() {
        let store = GameStore::open_in_memory().unwrap();
        store.add_account(1, Some("cs")).unwrap();
        store.add_account(2, Some("en")).unwrap();
        store.add_account(3, Some("de")).unwrap();
        store.add_follow(1, "SPA").unwrap();
        store.add_follow(1, "KOM").unwrap(); // sleduje oba — nesmí být 2×
        store.add_follow(2, "KOM").unwrap();
        store.add_follow(3, "TRI").unwrap(); // jiný tým

        let ids: Vec<i64> = store
            .accounts_following("SPA", "KOM")
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn device_lifecycle() {
        let store = GameStore::open_in_memory().unwrap();
        store.add_account(1, None).unwrap();
        let d1 = store
            .add_device(1, "https://push.example/a", Some("key"), Some("auth"), Some("web"))
            .unwrap();
        store
            .add_device(1, "https://push.example/b", None, None, None)
            .unwrap();

        assert_eq!(store.devices_for_account(1).unwrap().len(), 2);
        store.delete_device(d1).unwrap();
        let left = store.devices_for_account(1).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].endpoint, "https://push.example/b");
    }
}
