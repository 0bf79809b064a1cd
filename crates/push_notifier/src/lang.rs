#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Cs,
    En,
    De,
}

impl Lang {
    /// Neznámý nebo chybějící kód → čeština.
    pub fn from_code(code: Option<&str>) -> Lang {
        match code.map(|c| c.trim().to_lowercase()).as_deref() {
            Some("en") => Lang::En,
            Some("de") => Lang::De,
            _ => Lang::Cs,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Lang::Cs => "cs",
            Lang::En => "en",
            Lang::De => "de",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_codes_fall_back_to_czech() {
        assert_eq!(Lang::from_code(Some("en")), Lang::En);
        assert_eq!(Lang::from_code(Some("DE ")), Lang::De);
        assert_eq!(Lang::from_code(Some("fr")), Lang::Cs);
        assert_eq!(Lang::from_code(Some("")), Lang::Cs);
        assert_eq!(Lang::from_code(None), Lang::Cs);
    }
}
