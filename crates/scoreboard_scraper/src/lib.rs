//! PuckLive — Scoreboard Scraper
//! Stažení a rozparsování online zápisu utkání z webu svazu.
//!
//! Zdroj je obyčejná HTML stránka bez garantované struktury — parser je
//! best-effort po jednotlivých polích: chybějící tabulka shodí jen to
//! jedno pole na default, nikdy celý dokument.

pub mod fetch;
pub mod parse;
pub mod teams;

pub use fetch::{FetchError, HttpSheetFetcher, SheetFetcher};
pub use parse::{parse_sheet, ParsedSheet};
