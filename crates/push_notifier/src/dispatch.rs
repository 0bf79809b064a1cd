//! Souběžné doručení jedné zprávy na dávku zařízení.
//!
//! Zařízení stejného zápasu spolu nijak nesouvisí — posílá se všem
//! najednou a částečný neúspěch je očekávaný stav. Jediný vedlejší
//! efekt: registrace s trvale neplatným endpointem (HTTP 404/410) se
//! rovnou maže ze store.

use crate::compose::PushMessage;
use async_trait::async_trait;
use futures_util::future::join_all;
use game_store::{GameStore, PushDevice};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PushError {
    /// Endpoint trvale pryč — registraci smazat.
    #[error("subscription gone")]
    Gone,
    #[error("push endpoint returned HTTP {0}")]
    Status(u16),
    #[error("push transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Serialize)]
pub struct PushPayload<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub url: &'a str,
}

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, device: &PushDevice, payload: &PushPayload<'_>) -> Result<(), PushError>;
}

/// Web-push doručení: JSON payload na endpoint zařízení s TTL a urgency
/// hintem. VAPID podpis/šifrování řeší push brána za tímhle rozhraním.
pub struct WebPushSender {
    client: reqwest::Client,
    ttl_secs: u64,
}

impl WebPushSender {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            ttl_secs,
        }
    }
}

#[async_trait]
impl PushSender for WebPushSender {
    async fn send(&self, device: &PushDevice, payload: &PushPayload<'_>) -> Result<(), PushError> {
        let resp = self
            .client
            .post(&device.endpoint)
            .header("TTL", self.ttl_secs.to_string())
            .header("Urgency", "high")
            .json(payload)
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        match resp.status().as_u16() {
            s if (200..300).contains(&s) => Ok(()),
            404 | 410 => Err(PushError::Gone),
            s => Err(PushError::Status(s)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct DispatchStats {
    pub sent: usize,
    pub failed: usize,
    /// Smazané registrace (trvale neplatný endpoint).
    pub pruned: usize,
}

pub struct Dispatcher<S: PushSender> {
    sender: S,
    store: Arc<GameStore>,
}

impl<S: PushSender> Dispatcher<S> {
    pub fn new(sender: S, store: Arc<GameStore>) -> Self {
        Self { sender, store }
    }

    /// Doručí zprávu na všechna zařízení. Nikdy nevrací chybu —
    /// částečný neúspěch je věc statistik a logu.
    pub async fn dispatch(&self, msg: &PushMessage, devices: &[PushDevice]) -> DispatchStats {
        let payload = PushPayload {
            title: &msg.title,
            body: &msg.body,
            url: &msg.url,
        };

        let payload = &payload;
        let sends = devices
            .iter()
            .map(|device| async move { (device, self.sender.send(device, payload).await) });
        let results = join_all(sends).await;

        let mut stats = DispatchStats::default();
        for (device, result) in results {
            match result {
                Ok(()) => stats.sent += 1,
                Err(PushError::Gone) => {
                    stats.pruned += 1;
                    debug!(device = device.id, "endpoint gone, pruning registration");
                    if let Err(e) = self.store.delete_device(device.id) {
                        warn!(device = device.id, "failed to prune device: {e:#}");
                    }
                }
                Err(e) => {
                    // žádné retry tady — příští přechod to zkusí znovu
                    stats.failed += 1;
                    warn!(device = device.id, "push delivery failed: {e}");
                }
            }
        }
        stats
    }
}
