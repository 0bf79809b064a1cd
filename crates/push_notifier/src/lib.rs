//! PuckLive — Push Notifier
//! Sestavení lokalizované zprávy, rozřešení příjemců podle sledovaných
//! týmů a souběžné doručení na všechna zařízení.

pub mod compose;
pub mod dispatch;
pub mod lang;
pub mod resolve;

pub use compose::{compose, PushMessage};
pub use dispatch::{DispatchStats, Dispatcher, PushError, PushPayload, PushSender, WebPushSender};
pub use lang::Lang;
pub use resolve::devices_by_lang;
