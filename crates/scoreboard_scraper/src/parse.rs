//! Best-effort parser online zápisu.
//!
//! Struktura stránky (pokud zrovna drží):
//!   <div class="match-status">3. třetina 12:34 (přerušeno)</div>
//!   <table class="score-summary">
//!     <tr class="total"><td>3</td><td>1</td></tr>
//!     <tr class="periods"><td>1:0</td><td>1:1</td><td>1:0</td><td>-</td><td>-</td></tr>
//!   </table>
//!   <table class="goal-log">
//!     <tr><td>HC Sparta Praha</td><td>12:34</td><td>PP1</td><td>Novák (Kovář, Dvořák)</td></tr>
//!   </table>
//!   <table class="shot-stats">
//!     <tr><th>1. třetina</th><td>12</td><td>8</td></tr>
//!   </table>
//!
//! Každé pole se extrahuje nezávisle; chybějící uzel → default, nikdy chyba.

use crate::teams;
use game_state::{GoalRecord, GoalSituation, ShotStats};
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    /// Textový stav, ořezaný, bez závorkového dovětku. Chybí uzel → "".
    pub raw_status: String,
    pub home_total: u32,
    pub away_total: u32,
    /// Skóre po třetinách, každá nezávisle volitelná.
    pub periods: [Option<(u32, u32)>; 3],
    pub overtime: Option<(u32, u32)>,
    pub shootout: Option<(u32, u32)>,
    pub goals: Vec<GoalRecord>,
    pub shots: ShotStats,
    /// Názvy klubů, které pevná tabulka nezná — volající je hlásí.
    pub unmapped_teams: Vec<String>,
}

fn clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}:\d{2}").unwrap())
}

/// Ořízne koncový závorkový dovětek: "3. třetina 12:34 (přerušeno)" → "3. třetina 12:34"
fn strip_parenthetical(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.ends_with(')') {
        if let Some(pos) = trimmed.rfind('(') {
            return trimmed[..pos].trim().to_string();
        }
    }
    trimmed.to_string()
}

fn cell_text(el: scraper::ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// "1:0" → Some((1, 0)); "-", "", nesmysl → None
fn parse_pair(raw: &str) -> Option<(u32, u32)> {
    let (h, a) = raw.trim().split_once(':')?;
    Some((h.trim().parse().ok()?, a.trim().parse().ok()?))
}

fn parse_status(doc: &Html) -> String {
    let sel = Selector::parse("div.match-status").unwrap();
    doc.select(&sel)
        .next()
        .map(|el| strip_parenthetical(&cell_text(el)))
        .unwrap_or_default()
}

fn parse_score_summary(doc: &Html, sheet: &mut ParsedSheet) {
    let total_sel = Selector::parse("table.score-summary tr.total").unwrap();
    let periods_sel = Selector::parse("table.score-summary tr.periods").unwrap();
    let row_sel = Selector::parse("table.score-summary tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    // Primárně řádky podle tříd; tabulka bez tříd → pozičně první dva
    // řádky, které vůbec mají td buňky (čistá th hlavička se přeskočí)
    let mut data_rows = doc
        .select(&row_sel)
        .filter(|r| r.select(&td_sel).next().is_some());
    let first = data_rows.next();
    let second = data_rows.next();

    // Součty; chybějící / nenumerická buňka → 0
    if let Some(total_row) = doc.select(&total_sel).next().or(first) {
        let cells: Vec<String> = total_row.select(&td_sel).map(cell_text).collect();
        sheet.home_total = cells.first().and_then(|c| c.parse().ok()).unwrap_or(0);
        sheet.away_total = cells.get(1).and_then(|c| c.parse().ok()).unwrap_or(0);
    }

    // Dílčí skóre: 3× třetina, prodloužení, nájezdy
    if let Some(period_row) = doc.select(&periods_sel).next().or(second) {
        let cells: Vec<String> = period_row.select(&td_sel).map(cell_text).collect();
        for i in 0..3 {
            sheet.periods[i] = cells.get(i).and_then(|c| parse_pair(c));
        }
        sheet.overtime = cells.get(3).and_then(|c| parse_pair(c));
        sheet.shootout = cells.get(4).and_then(|c| parse_pair(c));
    }
}

/// "PP1" / "PP2" → přesilovka, "SH" / "oslabení" → oslabení, jinak rovnovážný stav
fn parse_situation(raw: &str) -> GoalSituation {
    let upper = raw.trim().to_uppercase();
    if upper.starts_with("PP") {
        GoalSituation::PowerPlay
    } else if upper.starts_with("SH") || raw.to_lowercase().contains("oslab") {
        GoalSituation::ShortHanded
    } else {
        GoalSituation::Even
    }
}

/// "Novák (Kovář, Dvořák)" → střelec + max 2 asistence
fn parse_players(raw: &str) -> (String, Vec<String>) {
    let trimmed = raw.trim();
    match trimmed.split_once('(') {
        Some((scorer, rest)) => {
            let assists = rest
                .trim_end_matches(')')
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .take(2)
                .collect();
            (scorer.trim().to_string(), assists)
        }
        None => (trimmed.to_string(), Vec::new()),
    }
}

fn parse_goals(doc: &Html, sheet: &mut ParsedSheet) {
    let row_sel = Selector::parse("table.goal-log tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    for row in doc.select(&row_sel) {
        let cells: Vec<String> = row.select(&td_sel).map(cell_text).collect();
        if cells.len() < 4 {
            continue; // hlavička nebo rozbitý řádek
        }

        let team = teams::code_for_name(&cells[0]).map(|c| c.to_string());
        if team.is_none() && !cells[0].is_empty() {
            tracing::warn!(name = %cells[0], "unmapped team name in goal log");
            sheet.unmapped_teams.push(cells[0].clone());
        }

        let time = clock_re()
            .find(&cells[1])
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| cells[1].clone());

        let (scorer, assists) = parse_players(&cells[3]);

        sheet.goals.push(GoalRecord {
            team,
            time,
            situation: parse_situation(&cells[2]),
            scorer,
            assists,
        });
    }
}

fn parse_shots(doc: &Html, sheet: &mut ParsedSheet) {
    let row_sel = Selector::parse("table.shot-stats tr").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let td_sel = Selector::parse("td").unwrap();

    for row in doc.select(&row_sel) {
        let label = row
            .select(&th_sel)
            .next()
            .map(cell_text)
            .unwrap_or_default()
            .to_lowercase();
        let cells: Vec<u32> = row
            .select(&td_sel)
            .map(|c| cell_text(c).parse().unwrap_or(0))
            .collect();
        let pair = (
            cells.first().copied().unwrap_or(0),
            cells.get(1).copied().unwrap_or(0),
        );

        if label.starts_with("1.") {
            sheet.shots.first = pair;
        } else if label.starts_with("2.") {
            sheet.shots.second = pair;
        } else if label.starts_with("3.") {
            sheet.shots.third = pair;
        } else if label.contains("prodlouž") {
            sheet.shots.overtime = pair;
        }
    }
}

/// Rozparsuje celý zápis. Nikdy neselže — každé pole degraduje samostatně.
pub fn parse_sheet(html: &str) -> ParsedSheet {
    let doc = Html::parse_document(html);
    let mut sheet = ParsedSheet {
        raw_status: parse_status(&doc),
        ..Default::default()
    };

    parse_score_summary(&doc, &mut sheet);
    parse_goals(&doc, &mut sheet);
    parse_shots(&doc, &mut sheet);

    sheet
}
