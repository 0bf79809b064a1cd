//! PuckLive — Live Goal Notifier
//!
//! Co dělá:
//!   1. Každou minutu polluje online zápisy rozehraných zápasů
//!   2. Normalizuje textový stav zdroje na kanonický status (debounce
//!      konce základní hrací doby)
//!   3. Diffem proti uloženému stavu detekuje začátek / gól / konec
//!   4. Push notifikace ve 3 jazycích všem sledujícím obou týmů
//!   5. Nezávisle: "za chvíli se hraje" reminder 20–30 min před začátkem
//!
//! Spuštění:
//!   cargo run --bin goal-observer   # plánovaná smyčka
//!   cargo run --bin poll-once       # jeden cyklus, JSON na stdout

pub mod config;
pub mod cycle;

pub use config::Config;
pub use cycle::{build_cycle, CycleSettings, GameOutcome, PollCycle};
