//! Strukturovaný live-state blob uložený u zápasu (JSON sloupec).
//!
//! Blob se NIKDY nepřepisuje celý — `merge` aplikuje jen pole, která nový
//! cyklus skutečně přinesl. Do stejného řádku zapisují nezávislé cesty
//! (live poll vs. reminder flag), takže částečný zápis je invariant,
//! ne optimalizace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalSituation {
    /// Rovnovážný stav (5 na 5).
    Even,
    PowerPlay,
    ShortHanded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    /// Interní kód týmu; None = název ze zdroje se nepodařilo namapovat.
    pub team: Option<String>,
    /// Herní čas "mm:ss".
    pub time: String,
    pub situation: GoalSituation,
    pub scorer: String,
    /// 0 až 2 asistence.
    pub assists: Vec<String>,
}

/// Střely na branku po segmentech (domácí, hosté). Chybějící řádek = nuly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotStats {
    pub first: (u32, u32),
    pub second: (u32, u32),
    pub third: (u32, u32),
    pub overtime: (u32, u32),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveState {
    /// Poslední viděný textový stav ze zdroje (po ořezání závorky).
    #[serde(default)]
    pub raw_status: String,
    /// Skóre po třetinách 1–3.
    #[serde(default)]
    pub periods: [Option<(u32, u32)>; 3],
    #[serde(default)]
    pub overtime: Option<(u32, u32)>,
    #[serde(default)]
    pub shootout: Option<(u32, u32)>,
    #[serde(default)]
    pub goals: Vec<GoalRecord>,
    #[serde(default)]
    pub shots: ShotStats,
    #[serde(default)]
    pub last_polled_at: Option<DateTime<Utc>>,
    /// Debounce timestamp normalizeru — viz `status::normalize_status`.
    #[serde(default)]
    pub regulation_end_seen_at: Option<DateTime<Utc>>,
}

/// Částečný update: None = ponechat předchozí hodnotu.
#[derive(Debug, Clone, Default)]
pub struct LiveStateUpdate {
    pub raw_status: Option<String>,
    pub periods: Option<[Option<(u32, u32)>; 3]>,
    pub overtime: Option<Option<(u32, u32)>>,
    pub shootout: Option<Option<(u32, u32)>>,
    pub goals: Option<Vec<GoalRecord>>,
    pub shots: Option<ShotStats>,
    pub last_polled_at: Option<DateTime<Utc>>,
    pub regulation_end_seen_at: Option<Option<DateTime<Utc>>>,
}

impl LiveState {
    pub fn merge(prev: Option<LiveState>, update: LiveStateUpdate) -> LiveState {
        let mut state = prev.unwrap_or_default();
        if let Some(v) = update.raw_status {
            state.raw_status = v;
        }
        if let Some(v) = update.periods {
            state.periods = v;
        }
        if let Some(v) = update.overtime {
            state.overtime = v;
        }
        if let Some(v) = update.shootout {
            state.shootout = v;
        }
        if let Some(v) = update.goals {
            state.goals = v;
        }
        if let Some(v) = update.shots {
            state.shots = v;
        }
        if let Some(v) = update.last_polled_at {
            state.last_polled_at = Some(v);
        }
        if let Some(v) = update.regulation_end_seen_at {
            state.regulation_end_seen_at = v;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 19, 30, 0).unwrap()
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let prev = LiveState {
            raw_status: "1. třetina 10:00".into(),
            periods: [Some((1, 0)), None, None],
            regulation_end_seen_at: Some(ts()),
            ..Default::default()
        };

        let merged = LiveState::merge(
            Some(prev.clone()),
            LiveStateUpdate {
                raw_status: Some("2. třetina 03:20".into()),
                ..Default::default()
            },
        );

        assert_eq!(merged.raw_status, "2. třetina 03:20");
        // nedotčená pole zůstala
        assert_eq!(merged.periods, prev.periods);
        assert_eq!(merged.regulation_end_seen_at, Some(ts()));
    }

    #[test]
    fn merge_can_clear_debounce_timestamp() {
        let prev = LiveState {
            regulation_end_seen_at: Some(ts()),
            ..Default::default()
        };
        let merged = LiveState::merge(
            Some(prev),
            LiveStateUpdate {
                regulation_end_seen_at: Some(None),
                ..Default::default()
            },
        );
        assert_eq!(merged.regulation_end_seen_at, None);
    }

    #[test]
    fn merge_from_empty_starts_with_defaults() {
        let merged = LiveState::merge(
            None,
            LiveStateUpdate {
                last_polled_at: Some(ts()),
                ..Default::default()
            },
        );
        assert_eq!(merged.last_polled_at, Some(ts()));
        assert!(merged.goals.is_empty());
        assert_eq!(merged.shots, ShotStats::default());
    }

    #[test]
    fn json_round_trip() {
        let state = LiveState {
            raw_status: "3. třetina 20:00".into(),
            periods: [Some((1, 0)), Some((0, 1)), Some((2, 0))],
            goals: vec![GoalRecord {
                team: Some("SPA".into()),
                time: "12:34".into(),
                situation: GoalSituation::PowerPlay,
                scorer: "Novák".into(),
                assists: vec!["Kovář".into()],
            }],
            shots: ShotStats {
                first: (12, 8),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: LiveState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
