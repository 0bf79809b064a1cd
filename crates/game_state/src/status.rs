//! Normalizace textového stavu utkání na kanonický `GameStatus`.
//!
//! Zdroj hlásí stav volným textem ("1. třetina 05:12", "Konec 2. třetiny",
//! "Prodloužení", "Konec zápasu", u mezinárodních přenosů i "Final" / "Ende").
//! Celá heuristika nad frázemi zdroje žije jen tady — downstream pracuje
//! výhradně s `GameStatus`.
//!
//! Záludnost: po konci základní hrací doby zdroj ještě pár minut hlásí
//! "3. třetina 20:00" i když se už nehraje. Povýšení na Finished proto
//! debouncujeme — viz `normalize_status`.

use chrono::{DateTime, Duration, Utc};

/// Konec zápasu ve všech podporovaných jazycích zdroje.
const FINISHED_MARKERS: [&str; 4] = ["konec zápasu", "konec utkání", "final", "ende"];

/// Hodnota hodin, na které končí třetina (čas běží nahoru).
const REGULATION_END_CLOCK: &str = "20:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Scheduled,
    /// Rozehraná třetina 1–3.
    Live(u8),
    /// Přestávka po třetině 1–2 ("Konec 1. třetiny" NENÍ konec zápasu).
    Intermission(u8),
    Overtime,
    Shootout,
    Finished,
}

impl GameStatus {
    /// Zápas právě probíhá (včetně přestávek mezi třetinami).
    pub fn is_in_play(&self) -> bool {
        matches!(
            self,
            GameStatus::Live(_)
                | GameStatus::Intermission(_)
                | GameStatus::Overtime
                | GameStatus::Shootout
        )
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, GameStatus::Finished)
    }

    pub fn as_db_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Live(1) => "live1",
            GameStatus::Live(2) => "live2",
            GameStatus::Live(_) => "live3",
            GameStatus::Intermission(1) => "intermission1",
            GameStatus::Intermission(_) => "intermission2",
            GameStatus::Overtime => "overtime",
            GameStatus::Shootout => "shootout",
            GameStatus::Finished => "finished",
        }
    }

    pub fn from_db_str(s: &str) -> Option<GameStatus> {
        match s {
            "scheduled" => Some(GameStatus::Scheduled),
            "live1" => Some(GameStatus::Live(1)),
            "live2" => Some(GameStatus::Live(2)),
            "live3" => Some(GameStatus::Live(3)),
            "intermission1" => Some(GameStatus::Intermission(1)),
            "intermission2" => Some(GameStatus::Intermission(2)),
            "overtime" => Some(GameStatus::Overtime),
            "shootout" => Some(GameStatus::Shootout),
            "finished" => Some(GameStatus::Finished),
            _ => None,
        }
    }
}

/// Výsledek normalizace pro jeden poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub status: GameStatus,
    /// Kdy jsme poprvé viděli "3. třetina 20:00" s rozhodnutým skóre.
    /// Persistuje se v live-state a vrací se nám v dalším cyklu.
    pub regulation_end_seen_at: Option<DateTime<Utc>>,
}

fn period_digit(lower: &str) -> u8 {
    if lower.contains("1.") {
        1
    } else if lower.contains("2.") {
        2
    } else {
        3
    }
}

/// Kanonický stav čistě z textu, bez debounce logiky.
fn status_from_raw(raw: &str) -> GameStatus {
    let lower = raw.trim().to_lowercase();
    if lower.is_empty() {
        return GameStatus::Scheduled;
    }

    // Přestávka dřív než finished markery — "konec 1. třetiny" obsahuje "konec"!
    if lower.contains("konec") && lower.contains("třetin") && !lower.contains("3.") {
        return GameStatus::Intermission(period_digit(&lower));
    }
    if FINISHED_MARKERS.iter().any(|m| lower.contains(m)) || lower == "konec" {
        return GameStatus::Finished;
    }
    if lower.contains("konec") && lower.contains("třetin") {
        // "Konec 3. třetiny" — základní hrací doba dohrána, ale zápas ne
        return GameStatus::Live(3);
    }
    if lower.contains("prodlouž") {
        return GameStatus::Overtime;
    }
    if lower.contains("nájezd") {
        return GameStatus::Shootout;
    }
    if lower.contains("třetina") {
        return GameStatus::Live(period_digit(&lower));
    }

    GameStatus::Scheduled
}

/// Hodiny třetí třetiny na doraz — kandidát na konec základní hrací doby.
fn is_regulation_end(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    lower.contains("3. třetina") && lower.contains(REGULATION_END_CLOCK)
}

/// Normalizuje textový stav na `GameStatus` + aktualizuje debounce timestamp.
///
/// Pravidla:
/// 1. Explicitní konec v textu → `Finished`, timestamp se maže.
/// 2. "3. třetina 20:00" + nerozhodné skóre NE: při prvním pozorování si
///    zapamatujeme čas; dokud podmínka trvá a neuběhl `debounce`, zůstává
///    stav podle textu. Po uplynutí povýšíme na `Finished` — zdroj často
///    explicitní konec vůbec nepošle.
/// 3. Remíza na konci třetí třetiny (jde se do prodloužení) nebo podmínka
///    pominula → timestamp se resetuje, stav čistě podle textu.
pub fn normalize_status(
    raw: &str,
    home_total: u32,
    away_total: u32,
    prev_seen: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    debounce: Duration,
) -> Normalized {
    let from_raw = status_from_raw(raw);

    if from_raw.is_finished() {
        return Normalized {
            status: GameStatus::Finished,
            regulation_end_seen_at: None,
        };
    }

    if is_regulation_end(raw) && home_total != away_total {
        let seen = prev_seen.unwrap_or(now);
        if now - seen >= debounce {
            return Normalized {
                status: GameStatus::Finished,
                regulation_end_seen_at: None,
            };
        }
        return Normalized {
            status: from_raw,
            regulation_end_seen_at: Some(seen),
        };
    }

    Normalized {
        status: from_raw,
        regulation_end_seen_at: None,
    }
}
