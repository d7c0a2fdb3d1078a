//! Pre-translated sports vocabulary.
//!
//! Status codes, transfer types and the like come from a small closed set, so
//! they are answered from this table instead of a translation provider.

use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Team,
    MatchStatus,
    Standing,
    TransferType,
}

#[derive(Debug)]
pub struct GlossaryEntry {
    pub kind: TermKind,
    /// Spellings the feed uses for this term (codes and long names)
    pub aliases: &'static [&'static str],
    pub en: &'static str,
    pub ar: &'static str,
    pub fr: &'static str,
}

impl GlossaryEntry {
    pub fn translation(&self, language: &str) -> Option<&'static str> {
        match language {
            "en" => Some(self.en),
            "ar" => Some(self.ar),
            "fr" => Some(self.fr),
            _ => None,
        }
    }
}

macro_rules! term {
    ($kind:ident, [$($alias:literal),+ $(,)?], $en:literal, $ar:literal, $fr:literal) => {
        GlossaryEntry {
            kind: TermKind::$kind,
            aliases: &[$($alias),+],
            en: $en,
            ar: $ar,
            fr: $fr,
        }
    };
}

static ENTRIES: &[GlossaryEntry] = &[
    // Match statuses: short code and long name as sent by the sports feed
    term!(MatchStatus, ["TBD", "Time To Be Defined"], "Time To Be Defined", "لم يحدد الموعد", "Horaire à déterminer"),
    term!(MatchStatus, ["NS", "Not Started"], "Not Started", "لم تبدأ", "Pas commencé"),
    term!(MatchStatus, ["1H", "First Half"], "First Half", "الشوط الأول", "Première mi-temps"),
    term!(MatchStatus, ["HT", "Halftime"], "Halftime", "استراحة بين الشوطين", "Mi-temps"),
    term!(MatchStatus, ["2H", "Second Half"], "Second Half", "الشوط الثاني", "Deuxième mi-temps"),
    term!(MatchStatus, ["ET", "Extra Time"], "Extra Time", "الوقت الإضافي", "Prolongation"),
    term!(MatchStatus, ["BT", "Break Time"], "Break Time", "استراحة", "Pause"),
    term!(MatchStatus, ["P", "Penalty In Progress"], "Penalty In Progress", "ركلات الترجيح", "Tirs au but"),
    term!(MatchStatus, ["SUSP", "Match Suspended"], "Match Suspended", "مباراة معلقة", "Match suspendu"),
    term!(MatchStatus, ["INT", "Match Interrupted"], "Match Interrupted", "مباراة متوقفة", "Match interrompu"),
    term!(MatchStatus, ["FT", "Match Finished"], "Match Finished", "انتهت المباراة", "Match terminé"),
    term!(MatchStatus, ["AET", "Match Finished After Extra Time"], "Match Finished After Extra Time", "انتهت بعد الوقت الإضافي", "Terminé après prolongation"),
    term!(MatchStatus, ["PEN", "Match Finished After Penalty"], "Match Finished After Penalty", "انتهت بركلات الترجيح", "Terminé aux tirs au but"),
    term!(MatchStatus, ["PST", "Match Postponed"], "Match Postponed", "مباراة مؤجلة", "Match reporté"),
    term!(MatchStatus, ["CANC", "Match Cancelled"], "Match Cancelled", "مباراة ملغاة", "Match annulé"),
    term!(MatchStatus, ["ABD", "Match Abandoned"], "Match Abandoned", "مباراة ملغاة نهائيا", "Match abandonné"),
    term!(MatchStatus, ["AWD", "Technical Loss"], "Technical Loss", "خسارة إدارية", "Défaite sur tapis vert"),
    term!(MatchStatus, ["WO", "WalkOver"], "WalkOver", "انسحاب", "Forfait"),
    term!(MatchStatus, ["LIVE", "In Progress"], "In Progress", "مباشر", "En direct"),
    // Transfer types
    term!(TransferType, ["Loan"], "Loan", "إعارة", "Prêt"),
    term!(TransferType, ["Free", "Free Transfer", "Free agent"], "Free Transfer", "انتقال حر", "Transfert libre"),
    term!(TransferType, ["Transfer"], "Transfer", "انتقال", "Transfert"),
    term!(TransferType, ["Back from Loan", "Return from loan"], "Back from Loan", "عودة من الإعارة", "Retour de prêt"),
    term!(TransferType, ["N/A", "-"], "N/A", "غير متاح", "Non disponible"),
    // Standing descriptions
    term!(Standing, ["Promotion"], "Promotion", "صعود", "Promotion"),
    term!(Standing, ["Relegation"], "Relegation", "هبوط", "Relégation"),
    term!(Standing, ["Champions League"], "Champions League", "دوري أبطال أوروبا", "Ligue des champions"),
    term!(Standing, ["Europa League"], "Europa League", "الدوري الأوروبي", "Ligue Europa"),
    term!(Standing, ["Conference League"], "Conference League", "دوري المؤتمر الأوروبي", "Ligue Europa Conférence"),
    term!(Standing, ["Promotion - Champions League (Group Stage)"], "Promotion - Champions League (Group Stage)", "التأهل إلى دور المجموعات في دوري أبطال أوروبا", "Qualification - Ligue des champions (phase de groupes)"),
    // National teams that appear on most fixtures pages
    term!(Team, ["Morocco"], "Morocco", "المغرب", "Maroc"),
    term!(Team, ["Egypt"], "Egypt", "مصر", "Égypte"),
    term!(Team, ["Saudi Arabia"], "Saudi Arabia", "السعودية", "Arabie saoudite"),
    term!(Team, ["Algeria"], "Algeria", "الجزائر", "Algérie"),
    term!(Team, ["Tunisia"], "Tunisia", "تونس", "Tunisie"),
    term!(Team, ["France"], "France", "فرنسا", "France"),
    term!(Team, ["Spain"], "Spain", "إسبانيا", "Espagne"),
    term!(Team, ["Brazil"], "Brazil", "البرازيل", "Brésil"),
    term!(Team, ["Argentina"], "Argentina", "الأرجنتين", "Argentine"),
    term!(Team, ["England"], "England", "إنجلترا", "Angleterre"),
    term!(Team, ["Germany"], "Germany", "ألمانيا", "Allemagne"),
];

static INDEX: OnceLock<HashMap<(TermKind, String), &'static GlossaryEntry>> = OnceLock::new();

fn normalize(term: &str) -> String {
    term.trim().to_lowercase()
}

fn index() -> &'static HashMap<(TermKind, String), &'static GlossaryEntry> {
    INDEX.get_or_init(|| {
        ENTRIES
            .iter()
            .flat_map(|entry| {
                entry
                    .aliases
                    .iter()
                    .map(move |alias| ((entry.kind, normalize(alias)), entry))
            })
            .collect()
    })
}

/// Find the entry for `term` of the given kind (case-insensitive, trimmed).
pub fn lookup(kind: TermKind, term: &str) -> Option<&'static GlossaryEntry> {
    index().get(&(kind, normalize(term))).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_status_code() {
        let entry = lookup(TermKind::MatchStatus, "FT").expect("FT should be known");
        assert_eq!(entry.translation("ar"), Some("انتهت المباراة"));
        assert_eq!(entry.translation("en"), Some("Match Finished"));
    }

    #[test]
    fn test_lookup_long_name_and_code_share_entry() {
        let by_code = lookup(TermKind::MatchStatus, "HT").unwrap();
        let by_name = lookup(TermKind::MatchStatus, "Halftime").unwrap();
        assert!(std::ptr::eq(by_code, by_name));
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_trimmed() {
        assert!(lookup(TermKind::TransferType, "  loan ").is_some());
        assert!(lookup(TermKind::Team, "MOROCCO").is_some());
    }

    #[test]
    fn test_lookup_respects_kind() {
        assert!(lookup(TermKind::MatchStatus, "Loan").is_none());
        assert!(lookup(TermKind::TransferType, "FT").is_none());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup(TermKind::Team, "Real Madrid").is_none());
    }

    #[test]
    fn test_translation_unknown_language() {
        let entry = lookup(TermKind::TransferType, "Loan").unwrap();
        assert_eq!(entry.translation("de"), None);
    }

    #[test]
    fn test_aliases_are_unique_per_kind() {
        let total: usize = ENTRIES.iter().map(|e| e.aliases.len()).sum();
        assert_eq!(index().len(), total);
    }

    #[test]
    fn test_every_entry_is_fully_translated() {
        for entry in ENTRIES {
            assert!(!entry.en.is_empty());
            assert!(!entry.ar.is_empty(), "missing Arabic for {}", entry.en);
            assert!(!entry.fr.is_empty(), "missing French for {}", entry.en);
        }
    }
}
