// ============================================================
// COLUMN ROLES
// ============================================================
// Which columns hold first name, last name, organization,
// salutation and amount, plus the keyword tables used to guess them

use serde::{Deserialize, Serialize};

/// Semantic role a dataset column can play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    FirstName,
    LastName,
    Organization,
    Salutation,
    Amount,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 5] = [
        ColumnRole::FirstName,
        ColumnRole::LastName,
        ColumnRole::Organization,
        ColumnRole::Salutation,
        ColumnRole::Amount,
    ];

    /// Keyword rule consulted when guessing this role
    pub fn rule(&self) -> &'static RoleRule {
        match self {
            ColumnRole::FirstName => &FIRST_NAME_RULE,
            ColumnRole::LastName => &LAST_NAME_RULE,
            ColumnRole::Organization => &ORGANIZATION_RULE,
            ColumnRole::Salutation => &SALUTATION_RULE,
            ColumnRole::Amount => &AMOUNT_RULE,
        }
    }
}

/// Header keywords for one role.
///
/// Tiers are tried in order; within a tier the first column (in column
/// order) whose lowercased header contains any keyword wins. Headers that
/// contain an `exclude` keyword are never taken.
#[derive(Debug)]
pub struct RoleRule {
    pub tiers: &'static [&'static [&'static str]],
    pub exclude: &'static [&'static str],
}

impl RoleRule {
    /// Lowercased-header match against one tier
    pub fn matches(&self, tier: &[&str], header: &str) -> bool {
        let lowered = header.to_lowercase();
        tier.iter().any(|kw| lowered.contains(kw))
            && !self.exclude.iter().any(|kw| lowered.contains(kw))
    }
}

const FIRST_NAME_KEYWORDS: &[&str] = &["prénom", "prenom", "first", "vorname", "given"];

pub static FIRST_NAME_RULE: RoleRule = RoleRule {
    tiers: &[FIRST_NAME_KEYWORDS],
    exclude: &[],
};

pub static LAST_NAME_RULE: RoleRule = RoleRule {
    tiers: &[&["nom", "lastname", "last", "surname", "name"]],
    exclude: FIRST_NAME_KEYWORDS,
};

pub static ORGANIZATION_RULE: RoleRule = RoleRule {
    tiers: &[&[
        "organisation",
        "organization",
        "société",
        "societe",
        "raison",
        "entreprise",
        "compagnie",
        "company",
        "institution",
    ]],
    exclude: &[],
};

pub static SALUTATION_RULE: RoleRule = RoleRule {
    tiers: &[&["civilit", "salutation", "titre", "title", "civility"]],
    exclude: &[],
};

pub static AMOUNT_RULE: RoleRule = RoleRule {
    tiers: &[&["montant", "amount"], &["don", "contribution"]],
    exclude: &[],
};

/// Header hints for a combined full-name column, used when none of the
/// first/last/organization roles yields a value.
pub const FULL_NAME_HINTS: &[&str] = &[
    "nom complet",
    "full name",
    "donataire",
    "beneficiaire",
    "bénéficiaire",
    "beneficiary",
    "raison sociale",
    "corporate name",
    "nom",
    "name",
];

/// Resolved column for each role; `None` when nothing matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization: Option<String>,
    pub salutation: Option<String>,
    pub amount: Option<String>,
}

impl ColumnRoles {
    pub fn get(&self, role: ColumnRole) -> Option<&str> {
        match role {
            ColumnRole::FirstName => self.first_name.as_deref(),
            ColumnRole::LastName => self.last_name.as_deref(),
            ColumnRole::Organization => self.organization.as_deref(),
            ColumnRole::Salutation => self.salutation.as_deref(),
            ColumnRole::Amount => self.amount.as_deref(),
        }
    }

    pub fn set(&mut self, role: ColumnRole, column: Option<String>) {
        let slot = match role {
            ColumnRole::FirstName => &mut self.first_name,
            ColumnRole::LastName => &mut self.last_name,
            ColumnRole::Organization => &mut self.organization,
            ColumnRole::Salutation => &mut self.salutation,
            ColumnRole::Amount => &mut self.amount,
        };
        *slot = column;
    }

    /// Explicit columns from `overrides` win; guessed columns fill the rest.
    pub fn with_overrides(mut self, overrides: &ColumnRoles) -> Self {
        for role in ColumnRole::ALL {
            if let Some(column) = overrides.get(role) {
                self.set(role, Some(column.to_string()));
            }
        }
        self
    }
}
