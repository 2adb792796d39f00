// ============================================================
// COLUMN ROLE CLASSIFIER
// ============================================================
// Guess first name / last name / organization / salutation /
// amount columns from header keywords

use tracing::info;

use crate::domain::dataset::{ColumnRole, ColumnRoles, Dataset, RoleRule};

/// First header (in column order) matching `rule`, trying tiers in order.
pub fn find_column<'a>(headers: &'a [String], rule: &RoleRule) -> Option<&'a str> {
    rule.tiers.iter().find_map(|tier| {
        headers
            .iter()
            .find(|header| rule.matches(tier, header))
            .map(String::as_str)
    })
}

/// Resolve every role independently; unmatched roles stay `None`.
pub fn classify_headers(headers: &[String]) -> ColumnRoles {
    let mut roles = ColumnRoles::default();
    for role in ColumnRole::ALL {
        roles.set(role, find_column(headers, role.rule()).map(str::to_string));
    }
    roles
}

pub fn classify_columns(dataset: &Dataset) -> ColumnRoles {
    let roles = classify_headers(dataset.columns());
    info!(
        first_name = ?roles.first_name,
        last_name = ?roles.last_name,
        organization = ?roles.organization,
        salutation = ?roles.salutation,
        amount = ?roles.amount,
        "Guessed column roles"
    );
    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_french_donor_export() {
        let roles = classify_headers(&headers(&[
            "Civilité",
            "Prénom",
            "Nom",
            "Société",
            "Adresse",
            "Don 2024",
            "Montant",
        ]));

        assert_eq!(roles.salutation.as_deref(), Some("Civilité"));
        assert_eq!(roles.first_name.as_deref(), Some("Prénom"));
        assert_eq!(roles.last_name.as_deref(), Some("Nom"));
        assert_eq!(roles.organization.as_deref(), Some("Société"));
        // "montant" outranks "don" even though "Don 2024" comes first
        assert_eq!(roles.amount.as_deref(), Some("Montant"));
    }

    #[test]
    fn test_english_headers_are_case_insensitive() {
        let roles = classify_headers(&headers(&[
            "FIRST NAME",
            "Last Name",
            "Company",
            "Contribution",
        ]));

        assert_eq!(roles.first_name.as_deref(), Some("FIRST NAME"));
        assert_eq!(roles.last_name.as_deref(), Some("Last Name"));
        assert_eq!(roles.organization.as_deref(), Some("Company"));
        assert_eq!(roles.amount.as_deref(), Some("Contribution"));
        assert_eq!(roles.salutation, None);
    }

    #[test]
    fn test_no_match_is_silent() {
        let roles = classify_headers(&headers(&["id", "email", "ville"]));
        assert_eq!(roles, ColumnRoles::default());
    }

    #[test]
    fn test_first_matching_column_wins() {
        let roles = classify_headers(&headers(&["Amount paid", "Amount due"]));
        assert_eq!(roles.amount.as_deref(), Some("Amount paid"));
    }
}
