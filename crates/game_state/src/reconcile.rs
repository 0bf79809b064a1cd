//! Diff nového stavu proti poslednímu uloženému → sémantické přechody.
//!
//! Všechny tři kontroly běží nezávisle nad snapshotem z PŘEDCHOZÍHO cyklu
//! (ne nad částečně aktualizovaným stavem), takže opakovaný běh se stejnými
//! daty nevyrobí žádný další přechod.

use crate::status::GameStatus;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// Přechod k odeslání — žije jen v rámci jednoho cyklu, nikdy se neukládá.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Started,
    ScoreChanged { side: Side, home: u32, away: u32 },
    Finished { home: u32, away: u32 },
    Reminder { starts_at: DateTime<Utc> },
}

impl Transition {
    pub fn kind(&self) -> &'static str {
        match self {
            Transition::Started => "started",
            Transition::ScoreChanged { .. } => "goal",
            Transition::Finished { .. } => "finished",
            Transition::Reminder { .. } => "reminder",
        }
    }
}

/// Stav zápasu tak, jak ho vidí reconciler: kanonický status + součty skóre.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub status: GameStatus,
    /// None = skóre ještě neznáme (zápas nezačal / první poll).
    pub home_total: Option<u32>,
    pub away_total: Option<u32>,
}

pub fn reconcile(prev: &Snapshot, next: &Snapshot) -> Vec<Transition> {
    let mut out = Vec::new();

    // Started: hrana "nebyl rozehraný → je rozehraný". Žádný extra flag,
    // po uložení nového stavu už hrana podruhé nenastane.
    if !prev.status.is_in_play() && next.status.is_in_play() {
        out.push(Transition::Started);
    }

    let (ph, pa) = (prev.home_total.unwrap_or(0), prev.away_total.unwrap_or(0));
    let (nh, na) = (next.home_total.unwrap_or(0), next.away_total.unwrap_or(0));

    // Gól: jen ostrý nárůst součtu. Obě strany v jednom cyklu jsou divné,
    // ale nesmí nás to položit — vystřelí oba přechody.
    if nh > ph {
        out.push(Transition::ScoreChanged {
            side: Side::Home,
            home: nh,
            away: na,
        });
    }
    if na > pa {
        out.push(Transition::ScoreChanged {
            side: Side::Away,
            home: nh,
            away: na,
        });
    }

    if !prev.status.is_finished() && next.status.is_finished() {
        out.push(Transition::Finished { home: nh, away: na });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(status: GameStatus, h: u32, a: u32) -> Snapshot {
        Snapshot {
            status,
            home_total: Some(h),
            away_total: Some(a),
        }
    }

    #[test]
    fn started_fires_on_edge_only() {
        let scheduled = snap(GameStatus::Scheduled, 0, 0);
        let live = snap(GameStatus::Live(1), 0, 0);

        assert_eq!(reconcile(&scheduled, &live), vec![Transition::Started]);
        // další cyklus už je live → nic
        assert!(reconcile(&live, &live).is_empty());
        // přestávka → třetina taky nesmí znovu vystřelit
        let inter = snap(GameStatus::Intermission(1), 0, 0);
        assert!(reconcile(&inter, &snap(GameStatus::Live(2), 0, 0)).is_empty());
    }

    #[test]
    fn goal_fires_only_on_strict_increase() {
        let prev = snap(GameStatus::Live(2), 2, 1);

        assert_eq!(
            reconcile(&prev, &snap(GameStatus::Live(2), 3, 1)),
            vec![Transition::ScoreChanged {
                side: Side::Home,
                home: 3,
                away: 1
            }]
        );
        // stejné skóre → nic
        assert!(reconcile(&prev, &snap(GameStatus::Live(2), 2, 1)).is_empty());
        // pokles (korekce zdroje) → nic
        assert!(reconcile(&prev, &snap(GameStatus::Live(2), 1, 1)).is_empty());
    }

    #[test]
    fn both_sides_scoring_in_one_cycle_fire_independently() {
        let prev = snap(GameStatus::Live(3), 1, 1);
        let got = reconcile(&prev, &snap(GameStatus::Live(3), 2, 2));
        assert_eq!(got.len(), 2);
        assert!(got.contains(&Transition::ScoreChanged {
            side: Side::Home,
            home: 2,
            away: 2
        }));
        assert!(got.contains(&Transition::ScoreChanged {
            side: Side::Away,
            home: 2,
            away: 2
        }));
    }

    #[test]
    fn unknown_previous_total_counts_as_zero() {
        let prev = Snapshot {
            status: GameStatus::Scheduled,
            home_total: None,
            away_total: None,
        };
        let got = reconcile(&prev, &snap(GameStatus::Live(1), 1, 0));
        assert!(got.contains(&Transition::Started));
        assert!(got.contains(&Transition::ScoreChanged {
            side: Side::Home,
            home: 1,
            away: 0
        }));
    }

    #[test]
    fn finished_fires_once_with_final_score() {
        let live = snap(GameStatus::Live(3), 4, 2);
        let done = snap(GameStatus::Finished, 4, 2);

        assert_eq!(
            reconcile(&live, &done),
            vec![Transition::Finished { home: 4, away: 2 }]
        );
        assert!(reconcile(&done, &done).is_empty());
    }

    #[test]
    fn identical_snapshots_produce_nothing() {
        let s = snap(GameStatus::Overtime, 3, 3);
        assert!(reconcile(&s, &s).is_empty());
    }
}
