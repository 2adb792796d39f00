// ============================================================
// DISPLAY NAME BUILDER
// ============================================================
// "{salutation} {first} {last}" for people, the name as-is for
// organizations, with best-effort salutation inference

use crate::domain::dataset::{ColumnRoles, Record, FULL_NAME_HINTS};
use crate::domain::generation_settings::SalutationLocale;
use crate::shared::normalize_spaces;

/// Legal-entity markers. Acronyms of three letters or fewer match
/// case-sensitively, longer words case-insensitively.
pub const ORGANIZATION_KEYWORDS: &[&str] = &[
    "SA",
    "SÀRL",
    "SARL",
    "Sàrl",
    "Sarl",
    "AG",
    "GmbH",
    "Ltd",
    "Inc",
    "LLC",
    "Association",
    "Fondation",
    "Foundation",
    "Stiftung",
    "Société",
    "Verein",
];

/// Given names that are feminine but end unlike the suffix list.
pub const FEMININE_NAMES: &[&str] = &[
    "virginia", "gudrun", "marianne", "cécile", "catherine", "lise", "nicole", "sylvie",
    "eliane", "blandine", "monique", "geneviève", "laurence", "liliane", "ursula", "herta",
    "paulette", "françoise", "elisabeth", "elisa", "christiane", "cynthia", "efinizia",
    "jacqueline", "annemarie", "myriam", "liliana", "anne", "ramona", "béatrice", "vivianne",
    "thérèse", "heidi", "edith", "monika", "julia", "iris", "hélène", "pauline", "marie",
    "paola", "beatrice", "francoise", "therese", "monica", "isabelle",
];

/// Endings that lean feminine.
pub const FEMININE_SUFFIXES: &[&str] = &[
    "anne", "anna", "elle", "ette", "ine", "ene", "ène", "a", "ia", "ya", "na", "ina", "liane",
    "iane", "line", "rine", "otte", "ille", "ise", "yse", "cie", "lie", "rie", "nie", "xie",
    "zia", "cia", "tia", "ria", "aude", "onde", "hilde", "rude", "ude", "iette",
];

/// Tokens that join two first names into a couple.
pub const COUPLE_MARKERS: &[&str] = &[" et ", " & ", " and "];

/// Salutation vocabulary for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Salutations {
    pub masculine: &'static str,
    pub feminine: &'static str,
    pub couple: &'static str,
    /// Used when no first name is available to infer from
    pub ambiguous: &'static str,
    /// Label when the row carries no usable name at all
    pub anonymous: &'static str,
}

impl Salutations {
    pub const FRENCH: Salutations = Salutations {
        masculine: "Monsieur",
        feminine: "Madame",
        couple: "Monsieur et Madame",
        ambiguous: "Monsieur/Madame",
        anonymous: "Donataire",
    };

    pub const ENGLISH: Salutations = Salutations {
        masculine: "Mr",
        feminine: "Mrs",
        couple: "Mr and Mrs",
        ambiguous: "Mr/Mrs",
        anonymous: "Recipient",
    };

    pub fn for_locale(locale: SalutationLocale) -> &'static Salutations {
        match locale {
            SalutationLocale::French => &Self::FRENCH,
            SalutationLocale::English => &Self::ENGLISH,
        }
    }
}

impl Default for Salutations {
    fn default() -> Self {
        Self::FRENCH
    }
}

/// True when the text carries a legal-entity keyword as a word.
pub fn is_organization(text: &str) -> bool {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .replace('.', "")
        })
        .filter(|word| !word.is_empty())
        .any(|word| {
            ORGANIZATION_KEYWORDS.iter().any(|kw| {
                if kw.chars().count() <= 3 {
                    word == *kw
                } else {
                    word.to_lowercase() == kw.to_lowercase()
                }
            })
        })
}

fn is_couple(first_name: &str) -> bool {
    let padded = format!(" {} ", first_name.to_lowercase());
    COUPLE_MARKERS.iter().any(|marker| padded.contains(marker))
}

/// Salutation guessed from a first name.
pub fn infer_salutation(first_name: &str, salutations: &Salutations) -> &'static str {
    let normalized = normalize_spaces(first_name).to_lowercase();
    if is_couple(&normalized) {
        return salutations.couple;
    }

    let Some(base) = normalized.split(' ').next().filter(|b| !b.is_empty()) else {
        return salutations.ambiguous;
    };

    if FEMININE_NAMES.contains(&base) || FEMININE_SUFFIXES.iter().any(|s| base.ends_with(s)) {
        salutations.feminine
    } else {
        salutations.masculine
    }
}

/// Builds the `{NOM}`-style label for a row
#[derive(Debug, Clone)]
pub struct DisplayNameBuilder<'a> {
    roles: &'a ColumnRoles,
    salutations: &'a Salutations,
}

impl<'a> DisplayNameBuilder<'a> {
    pub fn new(roles: &'a ColumnRoles, salutations: &'a Salutations) -> Self {
        Self { roles, salutations }
    }

    fn role_value(&self, record: &Record<'_>, column: Option<&str>) -> String {
        column
            .map(|c| normalize_spaces(record.value(c)))
            .unwrap_or_default()
    }

    pub fn build(&self, record: &Record<'_>) -> String {
        let first = self.role_value(record, self.roles.first_name.as_deref());
        let mut last = self.role_value(record, self.roles.last_name.as_deref());
        let organization = self.role_value(record, self.roles.organization.as_deref());

        if !organization.is_empty() && is_organization(&organization) {
            return organization;
        }

        if first.is_empty() && last.is_empty() && organization.is_empty() {
            if let Some(candidate) = full_name_candidate(record) {
                if is_organization(&candidate) {
                    return candidate;
                }
                last = candidate;
            }
        }

        if !first.is_empty() && is_couple(&first) {
            return normalize_spaces(&format!("{} {} {}", self.salutations.couple, first, last));
        }

        let explicit = self.role_value(record, self.roles.salutation.as_deref());
        let salutation = if explicit.is_empty() {
            infer_salutation(&first, self.salutations).to_string()
        } else {
            explicit
        };

        let full = normalize_spaces(&format!("{} {} {}", salutation, first, last));
        if !full.is_empty() {
            return full;
        }

        [organization, last, first]
            .into_iter()
            .find(|v| !v.is_empty())
            .unwrap_or_else(|| self.salutations.anonymous.to_string())
    }
}

/// First non-empty value of a column whose header hints at a full name.
fn full_name_candidate(record: &Record<'_>) -> Option<String> {
    record
        .fields()
        .filter(|(header, _)| {
            let lowered = header.to_lowercase();
            FULL_NAME_HINTS.iter().any(|hint| lowered.contains(hint))
        })
        .map(|(_, value)| normalize_spaces(value))
        .find(|value| !value.is_empty())
}
