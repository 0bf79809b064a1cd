//! Jeden GET na online zápis konkrétního utkání.
//!
//! URL je deterministická: veřejné číslo zápasu + pevný offset databáze
//! zdroje. Žádné retry — další pokus je věc příštího poll cyklu.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("scoreboard HTTP {status}")]
    Http { status: u16 },
    #[error("scoreboard transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait SheetFetcher: Send + Sync {
    async fn fetch(&self, game_number: i64) -> Result<String, FetchError>;
}

pub struct HttpSheetFetcher {
    client: reqwest::Client,
    base_url: String,
    /// Offset mezi veřejným číslem zápasu a id v URL zdroje.
    id_offset: i64,
}

impl HttpSheetFetcher {
    pub fn new(base_url: impl Into<String>, id_offset: i64) -> Self {
        Self {
            client: reqwest::Client::builder()
                // Imitujeme prohlížeč kvůli anti-bot ochranám na webu zdroje
                .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
                .timeout(Duration::from_secs(10))
                .gzip(true)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into(),
            id_offset,
        }
    }

    fn sheet_url(&self, game_number: i64) -> String {
        format!("{}/{}.html", self.base_url, game_number + self.id_offset)
    }
}

#[async_trait]
impl SheetFetcher for HttpSheetFetcher {
    async fn fetch(&self, game_number: i64) -> Result<String, FetchError> {
        let url = self.sheet_url(game_number);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_url_is_deterministic() {
        let fetcher = HttpSheetFetcher::new("https://www.hokejovyzapis.cz/zapas", 228_000);
        assert_eq!(
            fetcher.sheet_url(1234),
            "https://www.hokejovyzapis.cz/zapas/229234.html"
        );
        assert_eq!(fetcher.sheet_url(1234), fetcher.sheet_url(1234));
    }
}
