//! PuckLive — Game State
//! Kanonický stav zápasu: normalizace textového stavu ze zdroje,
//! diff proti poslednímu uloženému stavu a strukturovaný live-state blob.
//!
//! Čistá logika bez I/O — testovatelné izolovaně od HTTP i databáze.

pub mod live;
pub mod reconcile;
pub mod status;

pub use live::{GoalRecord, GoalSituation, LiveState, LiveStateUpdate, ShotStats};
pub use reconcile::{reconcile, Side, Snapshot, Transition};
pub use status::{normalize_status, GameStatus, Normalized};
