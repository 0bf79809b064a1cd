//! Pevná sada šablon (přechod × jazyk) → titulek + text + deep link.
//!
//! Výstup je čistý text, žádné HTML ani markdown. Názvy týmů dostáváme
//! už rozřešené na zobrazovací jméno.

use crate::lang::Lang;
use chrono::Local;
use game_state::{Side, Transition};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
    /// Deep link zpět do aplikace na detail zápasu.
    pub url: String,
}

pub fn compose(
    transition: &Transition,
    lang: Lang,
    home_name: &str,
    away_name: &str,
    game_id: i64,
) -> PushMessage {
    let url = format!("/zapas/{game_id}");

    let (title, body) = match transition {
        Transition::Started => match lang {
            Lang::Cs => (
                "Zápas začal".to_string(),
                format!("{home_name} – {away_name} právě začíná."),
            ),
            Lang::En => (
                "Game on".to_string(),
                format!("{home_name} vs {away_name} has just started."),
            ),
            Lang::De => (
                "Spielbeginn".to_string(),
                format!("{home_name} – {away_name} hat gerade begonnen."),
            ),
        },
        Transition::ScoreChanged { side, home, away } => {
            let team = match side {
                Side::Home => home_name,
                Side::Away => away_name,
            };
            match lang {
                Lang::Cs => (
                    format!("Gól! {home_name} {home}:{away} {away_name}"),
                    format!("{team} skóruje. Stav {home}:{away}."),
                ),
                Lang::En => (
                    format!("Goal! {home_name} {home}:{away} {away_name}"),
                    format!("{team} scores. It is {home}:{away}."),
                ),
                Lang::De => (
                    format!("Tor! {home_name} {home}:{away} {away_name}"),
                    format!("{team} trifft. Es steht {home}:{away}."),
                ),
            }
        }
        Transition::Finished { home, away } => match lang {
            Lang::Cs => (
                "Konec zápasu".to_string(),
                format!("{home_name} – {away_name} skončil {home}:{away}."),
            ),
            Lang::En => (
                "Final score".to_string(),
                format!("{home_name} vs {away_name} ended {home}:{away}."),
            ),
            Lang::De => (
                "Spielende".to_string(),
                format!("{home_name} – {away_name} endete {home}:{away}."),
            ),
        },
        Transition::Reminder { starts_at } => {
            let time = starts_at.with_timezone(&Local).format("%H:%M");
            match lang {
                Lang::Cs => (
                    "Za chvíli vhazování".to_string(),
                    format!("{home_name} – {away_name} začíná v {time}."),
                ),
                Lang::En => (
                    "Starting soon".to_string(),
                    format!("{home_name} vs {away_name} starts at {time}."),
                ),
                Lang::De => (
                    "Gleich geht's los".to_string(),
                    format!("{home_name} – {away_name} beginnt um {time}."),
                ),
            }
        }
    };

    PushMessage { title, body, url }
}
