//! Rozřešení příjemců: sledující obou týmů → jejich zařízení,
//! seskupené podle jazyka (jedna složená zpráva na jazyk).

use crate::lang::Lang;
use anyhow::Result;
use game_store::{GameStore, PushDevice};
use std::collections::{HashMap, HashSet};

/// Dvoufázový lookup: účty podle sledovaného týmu (dedup na účtu —
/// kdo sleduje oba, počítá se jednou), pak zařízení účtu.
pub fn devices_by_lang(
    store: &GameStore,
    home_code: &str,
    away_code: &str,
) -> Result<HashMap<Lang, Vec<PushDevice>>> {
    let accounts = store.accounts_following(home_code, away_code)?;

    let mut seen = HashSet::new();
    let mut out: HashMap<Lang, Vec<PushDevice>> = HashMap::new();

    for account in accounts {
        if !seen.insert(account.id) {
            continue;
        }
        let lang = Lang::from_code(account.lang.as_deref());
        let devices = store.devices_for_account(account.id)?;
        if !devices.is_empty() {
            out.entry(lang).or_default().extend(devices);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_devices_by_language_with_default() {
        let store = GameStore::open_in_memory().unwrap();
        store.add_account(1, Some("cs")).unwrap();
        store.add_account(2, Some("en")).unwrap();
        store.add_account(3, None).unwrap(); // bez jazyka → cs
        store.add_follow(1, "SPA").unwrap();
        store.add_follow(2, "KOM").unwrap();
        store.add_follow(3, "SPA").unwrap();
        store.add_device(1, "https://p/1", None, None, None).unwrap();
        store.add_device(1, "https://p/2", None, None, None).unwrap();
        store.add_device(2, "https://p/3", None, None, None).unwrap();
        store.add_device(3, "https://p/4", None, None, None).unwrap();

        let groups = devices_by_lang(&store, "SPA", "KOM").unwrap();
        assert_eq!(groups[&Lang::Cs].len(), 3);
        assert_eq!(groups[&Lang::En].len(), 1);
        assert!(!groups.contains_key(&Lang::De));
    }

    #[test]
    fn account_following_both_teams_counted_once() {
        let store = GameStore::open_in_memory().unwrap();
        store.add_account(1, Some("de")).unwrap();
        store.add_follow(1, "SPA").unwrap();
        store.add_follow(1, "KOM").unwrap();
        store.add_device(1, "https://p/1", None, None, None).unwrap();
        store.add_device(1, "https://p/2", None, None, None).unwrap();

        let groups = devices_by_lang(&store, "SPA", "KOM").unwrap();
        // 2 zařízení, ne 4
        assert_eq!(groups[&Lang::De].len(), 2);
    }

    #[test]
    fn nobody_follows_either_team() {
        let store = GameStore::open_in_memory().unwrap();
        store.add_account(1, Some("cs")).unwrap();
        store.add_follow(1, "TRI").unwrap();

        let groups = devices_by_lang(&store, "SPA", "KOM").unwrap();
        assert!(groups.is_empty());
    }
}
