//! Pevná mapovací tabulka názvů klubů ze zdroje → interní kódy.
//!
//! Tabulka je uzavřená a udržovaná ručně. Název, který tady není
//! (přejmenovaný klub, nováček soutěže), vrací None — gól zůstane bez
//! přiřazení a volající to hlásí jako UNMAPPED_TEAM, místo aby spadl.

use unicode_normalization::UnicodeNormalization;

pub struct Team {
    pub code: &'static str,
    /// Název přesně tak, jak ho píše zdroj.
    pub name: &'static str,
}

pub const TEAMS: &[Team] = &[
    Team { code: "SPA", name: "HC Sparta Praha" },
    Team { code: "TRI", name: "HC Oceláři Třinec" },
    Team { code: "PCE", name: "HC Dynamo Pardubice" },
    Team { code: "LIB", name: "Bílí Tygři Liberec" },
    Team { code: "KOM", name: "HC Kometa Brno" },
    Team { code: "PLZ", name: "HC Škoda Plzeň" },
    Team { code: "VIT", name: "HC Vítkovice Ridera" },
    Team { code: "MHK", name: "Mountfield HK" },
    Team { code: "OLO", name: "HC Olomouc" },
    Team { code: "KVA", name: "HC Energie Karlovy Vary" },
    Team { code: "KLA", name: "Rytíři Kladno" },
    Team { code: "CEB", name: "HC Motor České Budějovice" },
    Team { code: "LIT", name: "HC Verva Litvínov" },
    Team { code: "MBL", name: "BK Mladá Boleslav" },
];

/// NFC + lowercase + trim — zdroj občas střídá kompozici diakritiky.
fn fold(name: &str) -> String {
    name.trim().nfc().collect::<String>().to_lowercase()
}

pub fn code_for_name(raw: &str) -> Option<&'static str> {
    let folded = fold(raw);
    TEAMS
        .iter()
        .find(|t| fold(t.name) == folded)
        .map(|t| t.code)
}

pub fn display_name(code: &str) -> Option<&'static str> {
    TEAMS.iter().find(|t| t.code == code).map(|t| t.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_resolve() {
        assert_eq!(code_for_name("HC Sparta Praha"), Some("SPA"));
        assert_eq!(code_for_name("  hc oceláři třinec "), Some("TRI"));
    }

    #[test]
    fn decomposed_diacritics_still_match() {
        // "Třinec" s rozloženým ř (r + combining háček)
        let decomposed = "HC Ocela\u{0301}r\u{030C}i Tr\u{030C}inec";
        assert_eq!(code_for_name(decomposed), Some("TRI"));
    }

    #[test]
    fn unknown_name_yields_none() {
        assert_eq!(code_for_name("HC Nový Klub"), None);
        assert_eq!(code_for_name(""), None);
    }

    #[test]
    fn display_name_round_trip() {
        for t in TEAMS {
            assert_eq!(display_name(t.code), Some(t.name));
        }
        assert_eq!(display_name("XXX"), None);
    }
}
