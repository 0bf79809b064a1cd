//! Jeden poll cyklus: reminder pass + live pipeline pro každý aktivní zápas.
//!
//! Izolace chyb je hlavní kontrakt téhle vrstvy: selhání jednoho zápasu
//! (fetch, parse, doručení, zápis) se loguje a NIKDY nezastaví zpracování
//! ostatních. Fatální je jen nedostupný store při výběru zápasů.
//!
//! Přechody se diffují proti snapshotu z PŘEDCHOZÍHO cyklu — persistovaný
//! zápis přijde až po spočítání všech přechodů. Opakovaný běh se stejným
//! HTML tak nevyrobí žádnou další notifikaci.

use crate::config::Config;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use game_state::{normalize_status, reconcile, LiveState, LiveStateUpdate, Snapshot, Transition};
use game_store::{GameRow, GameStore, PushDevice};
use logger::{
    now_iso, CycleSummaryEvent, EventLogger, FetchFailedEvent, PushSentEvent, UnmappedTeamEvent,
};
use push_notifier::{compose, devices_by_lang, Dispatcher, Lang, PushSender, WebPushSender};
use scoreboard_scraper::{parse_sheet, teams, HttpSheetFetcher, SheetFetcher};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Výstup pro trigger rozhraní — JSON pole `{id, status, score}`.
#[derive(Debug, Clone, Serialize)]
pub struct GameOutcome {
    pub id: i64,
    pub status: String,
    pub score: String,
}

#[derive(Debug, Clone, Copy)]
pub struct CycleSettings {
    pub final_debounce: Duration,
    pub reminder_lead_min: Duration,
    pub reminder_lead_max: Duration,
    pub max_game_age: Duration,
}

impl From<&Config> for CycleSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            final_debounce: Duration::seconds(cfg.final_debounce_secs),
            reminder_lead_min: Duration::minutes(cfg.reminder_lead_min_minutes),
            reminder_lead_max: Duration::minutes(cfg.reminder_lead_max_minutes),
            max_game_age: Duration::hours(cfg.max_game_age_hours),
        }
    }
}

/// Orchestrátor dostává hotové kolaboratory — fetcher, store i dispatcher
/// vlastní entry point procesu, testy si dosadí vlastní.
pub struct PollCycle<F: SheetFetcher, S: PushSender> {
    fetcher: F,
    store: Arc<GameStore>,
    dispatcher: Dispatcher<S>,
    logger: EventLogger,
    settings: CycleSettings,
}

pub fn build_cycle(cfg: &Config) -> Result<PollCycle<HttpSheetFetcher, WebPushSender>> {
    let store = Arc::new(GameStore::open(&cfg.db_path).context("open game store")?);
    let fetcher = HttpSheetFetcher::new(cfg.base_url.clone(), cfg.sheet_id_offset);
    let dispatcher = Dispatcher::new(WebPushSender::new(cfg.push_ttl_secs), store.clone());
    let logger = EventLogger::new(&cfg.log_dir);
    Ok(PollCycle::new(
        fetcher,
        store,
        dispatcher,
        logger,
        CycleSettings::from(cfg),
    ))
}

impl<F: SheetFetcher, S: PushSender> PollCycle<F, S> {
    pub fn new(
        fetcher: F,
        store: Arc<GameStore>,
        dispatcher: Dispatcher<S>,
        logger: EventLogger,
        settings: CycleSettings,
    ) -> Self {
        Self {
            fetcher,
            store,
            dispatcher,
            logger,
            settings,
        }
    }

    pub async fn run(&self, now: DateTime<Utc>) -> Result<Vec<GameOutcome>> {
        let mut reminders = 0usize;
        let mut transitions_total = 0usize;
        let mut errors = 0usize;

        // 1) Reminder pass — nezávislý na live pipeline
        let upcoming = self
            .store
            .games_for_reminder(
                now + self.settings.reminder_lead_min,
                now + self.settings.reminder_lead_max,
            )
            .context("select upcoming games")?;
        for game in upcoming {
            match self.remind(&game, now).await {
                Ok(()) => reminders += 1,
                Err(e) => {
                    errors += 1;
                    warn!(game = game.id, "reminder failed: {e:#}");
                }
            }
        }

        // 2) Live pipeline po zápasech, s izolací chyb na hranici zápasu
        let games = self
            .store
            .games_to_poll(now, self.settings.max_game_age)
            .context("select games to poll")?;
        let polled = games.len();

        let mut outcomes = Vec::new();
        for game in games {
            match self.poll_game(&game, now).await {
                Ok((outcome, fired)) => {
                    transitions_total += fired;
                    if outcome.status == "error" {
                        errors += 1;
                    }
                    outcomes.push(outcome);
                }
                Err(e) => {
                    // transientní selhání: žádný zápis, zápas vypadne
                    // z výsledků a příští cyklus to zkusí znovu
                    errors += 1;
                    warn!(game = game.id, "game poll failed: {e:#}");
                    let _ = self.logger.log(&FetchFailedEvent {
                        ts: now_iso(),
                        event: "FETCH_FAILED",
                        game_id: game.id,
                        error: format!("{e:#}"),
                    });
                }
            }
        }

        info!(
            polled,
            transitions = transitions_total,
            reminders,
            errors,
            "poll cycle completed"
        );
        let _ = self.logger.log(&CycleSummaryEvent {
            ts: now_iso(),
            event: "CYCLE_SUMMARY",
            games_polled: polled,
            transitions: transitions_total,
            reminders,
            errors,
        });

        Ok(outcomes)
    }

    /// Pipeline jednoho zápasu. Chyba kdekoli uvnitř = žádný zápis stavu.
    /// Výjimka: selhání samotného zápisu vrací outcome "error", protože
    /// notifikace už venku jsou.
    async fn poll_game(
        &self,
        game: &GameRow,
        now: DateTime<Utc>,
    ) -> Result<(GameOutcome, usize)> {
        let html = self
            .fetcher
            .fetch(game.id)
            .await
            .with_context(|| format!("fetch sheet for game {}", game.id))?;

        let sheet = parse_sheet(&html);
        for name in &sheet.unmapped_teams {
            let _ = self.logger.log(&UnmappedTeamEvent {
                ts: now_iso(),
                event: "UNMAPPED_TEAM",
                game_id: game.id,
                raw_name: name.clone(),
            });
        }

        let prev_seen = game
            .live_state
            .as_ref()
            .and_then(|s| s.regulation_end_seen_at);
        let normalized = normalize_status(
            &sheet.raw_status,
            sheet.home_total,
            sheet.away_total,
            prev_seen,
            now,
            self.settings.final_debounce,
        );

        let prev = Snapshot {
            status: game.status,
            home_total: game.score_home,
            away_total: game.score_away,
        };
        let next = Snapshot {
            status: normalized.status,
            home_total: Some(sheet.home_total),
            away_total: Some(sheet.away_total),
        };
        let transitions = reconcile(&prev, &next);

        if !transitions.is_empty() {
            let groups = devices_by_lang(&self.store, &game.home_team, &game.away_team)
                .context("resolve subscribers")?;
            for transition in &transitions {
                self.notify(game, transition, &groups).await;
            }
        }

        // Zápis až po spočítání přechodů; merge zachová cizí pole blobu
        let merged = LiveState::merge(
            game.live_state.clone(),
            LiveStateUpdate {
                raw_status: Some(sheet.raw_status.clone()),
                periods: Some(sheet.periods),
                overtime: Some(sheet.overtime),
                shootout: Some(sheet.shootout),
                goals: Some(sheet.goals.clone()),
                shots: Some(sheet.shots),
                last_polled_at: Some(now),
                regulation_end_seen_at: Some(normalized.regulation_end_seen_at),
            },
        );

        let score = format!("{}:{}", sheet.home_total, sheet.away_total);
        let outcome = match self.store.write_live(
            game.id,
            normalized.status,
            sheet.home_total,
            sheet.away_total,
            &merged,
        ) {
            Ok(()) => GameOutcome {
                id: game.id,
                status: normalized.status.as_db_str().to_string(),
                score,
            },
            Err(e) => {
                warn!(game = game.id, "live state write failed: {e:#}");
                GameOutcome {
                    id: game.id,
                    status: "error".to_string(),
                    score,
                }
            }
        };

        Ok((outcome, transitions.len()))
    }

    async fn remind(&self, game: &GameRow, now: DateTime<Utc>) -> Result<()> {
        let groups = devices_by_lang(&self.store, &game.home_team, &game.away_team)
            .context("resolve subscribers")?;
        let transition = Transition::Reminder {
            starts_at: game.starts_at,
        };
        self.notify(game, &transition, &groups).await;

        // Flag má vlastní zápis — live cesta na něj nesahá
        self.store
            .mark_reminder_sent(game.id, now)
            .context("mark reminder sent")?;
        Ok(())
    }

    async fn notify(
        &self,
        game: &GameRow,
        transition: &Transition,
        groups: &HashMap<Lang, Vec<PushDevice>>,
    ) {
        let home_name = teams::display_name(&game.home_team).unwrap_or(game.home_team.as_str());
        let away_name = teams::display_name(&game.away_team).unwrap_or(game.away_team.as_str());

        for (lang, devices) in groups {
            let msg = compose(transition, *lang, home_name, away_name, game.id);
            let stats = self.dispatcher.dispatch(&msg, devices).await;
            info!(
                game = game.id,
                kind = transition.kind(),
                lang = lang.code(),
                sent = stats.sent,
                failed = stats.failed,
                pruned = stats.pruned,
                "push dispatched"
            );
            let _ = self.logger.log(&PushSentEvent {
                ts: now_iso(),
                event: "PUSH_SENT",
                game_id: game.id,
                kind: transition.kind().to_string(),
                lang: lang.code().to_string(),
                sent: stats.sent,
                failed: stats.failed,
                pruned: stats.pruned,
            });
        }
    }
}
