// ============================================================
// COLUMN SPECS
// ============================================================
// Where a placeholder's value comes from: one column, a
// space-joined combination, or a primary spec with fallbacks

use serde::{Deserialize, Serialize};

use crate::domain::dataset::{Dataset, Record};
use crate::domain::error::{AppError, Result};

/// Maximum number of columns one placeholder may draw from.
pub const MAX_COLUMN_SPECS: usize = 5;

/// Value source for a single placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSpec {
    /// One column, whose name may itself contain spaces
    Column(String),

    /// Non-empty values of every existing column, joined with a space
    Combination(Vec<String>),

    /// `primary`, or else the first non-empty fallback column
    WithFallback {
        primary: Box<ColumnSpec>,
        fallbacks: Vec<String>,
    },
}

impl ColumnSpec {
    /// Read a legacy string spec: an exact column name wins, otherwise a
    /// whitespace-bearing string is a combination of its words.
    pub fn interpret(raw: &str, dataset: &Dataset) -> Self {
        if dataset.has_column(raw) || !raw.trim().contains(char::is_whitespace) {
            return ColumnSpec::Column(raw.to_string());
        }
        ColumnSpec::Combination(raw.split_whitespace().map(str::to_string).collect())
    }

    /// Apply [`ColumnSpec::interpret`] to single-column primaries, so a
    /// saved `"Prénom Nom"` entry combines when no such column exists.
    pub fn interpreted(self, dataset: &Dataset) -> Self {
        match self {
            ColumnSpec::Column(name) => ColumnSpec::interpret(&name, dataset),
            ColumnSpec::WithFallback { primary, fallbacks } => ColumnSpec::WithFallback {
                primary: Box::new(primary.interpreted(dataset)),
                fallbacks,
            },
            combination => combination,
        }
    }

    /// Resolve against one row; missing columns contribute nothing.
    pub fn resolve(&self, record: &Record<'_>) -> String {
        match self {
            ColumnSpec::Column(name) => record.value(name).to_string(),
            ColumnSpec::Combination(names) => names
                .iter()
                .map(|name| record.value(name))
                .filter(|value| !value.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            ColumnSpec::WithFallback { primary, fallbacks } => {
                let value = primary.resolve(record);
                if !value.is_empty() {
                    return value;
                }
                fallbacks
                    .iter()
                    .map(|name| record.value(name))
                    .find(|value| !value.is_empty())
                    .unwrap_or("")
                    .to_string()
            }
        }
    }

    /// Spec labels that name no existing column. A combination is fine as
    /// long as one of its columns exists; every fallback must exist.
    pub fn unresolved(&self, dataset: &Dataset) -> Vec<String> {
        match self {
            ColumnSpec::Column(name) => {
                if dataset.has_column(name) {
                    Vec::new()
                } else {
                    vec![name.clone()]
                }
            }
            ColumnSpec::Combination(names) => {
                if names.iter().any(|name| dataset.has_column(name)) {
                    Vec::new()
                } else {
                    vec![names.join(" ")]
                }
            }
            ColumnSpec::WithFallback { primary, fallbacks } => {
                let mut missing = primary.unresolved(dataset);
                missing.extend(
                    fallbacks
                        .iter()
                        .filter(|name| !dataset.has_column(name))
                        .cloned(),
                );
                missing
            }
        }
    }
}

/// One placeholder and its value source; `source == None` renders blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderMapping {
    pub placeholder: String,
    pub source: Option<ColumnSpec>,
}

impl PlaceholderMapping {
    pub fn new(placeholder: &str, source: Option<ColumnSpec>) -> Self {
        Self {
            placeholder: placeholder_token(placeholder),
            source,
        }
    }

    /// Build from the front-end's priority list of columns and combine flag.
    pub fn from_columns(placeholder: &str, columns: &[String], combine: bool) -> Result<Self> {
        let columns: Vec<String> = columns
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        if columns.len() > MAX_COLUMN_SPECS {
            return Err(AppError::ValidationError(format!(
                "{} maps {} columns, at most {} are allowed",
                placeholder_token(placeholder),
                columns.len(),
                MAX_COLUMN_SPECS
            )));
        }

        let source = match columns.len() {
            0 => None,
            1 => Some(ColumnSpec::Column(columns[0].clone())),
            _ if combine => Some(ColumnSpec::Combination(columns)),
            _ => Some(ColumnSpec::WithFallback {
                primary: Box::new(ColumnSpec::Column(columns[0].clone())),
                fallbacks: columns[1..].to_vec(),
            }),
        };

        Ok(Self::new(placeholder, source))
    }

    /// Read legacy string specs against `dataset`.
    pub fn interpreted(self, dataset: &Dataset) -> Self {
        Self {
            source: self.source.map(|spec| spec.interpreted(dataset)),
            ..self
        }
    }

    pub fn resolve(&self, record: &Record<'_>) -> String {
        self.source
            .as_ref()
            .map(|spec| spec.resolve(record))
            .unwrap_or_default()
    }
}

/// Ordered placeholder → column spec table for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    entries: Vec<PlaceholderMapping>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping, replacing any earlier one for the same placeholder.
    pub fn insert(&mut self, mapping: PlaceholderMapping) {
        match self
            .entries
            .iter_mut()
            .find(|m| m.placeholder == mapping.placeholder)
        {
            Some(existing) => *existing = mapping,
            None => self.entries.push(mapping),
        }
    }

    pub fn with(mut self, mapping: PlaceholderMapping) -> Self {
        self.insert(mapping);
        self
    }

    pub fn get(&self, placeholder: &str) -> Option<&PlaceholderMapping> {
        let token = placeholder_token(placeholder);
        self.entries.iter().find(|m| m.placeholder == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaceholderMapping> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<PlaceholderMapping> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = PlaceholderMapping>>(iter: I) -> Self {
        let mut mapping = FieldMapping::new();
        for entry in iter {
            mapping.insert(entry);
        }
        mapping
    }
}

/// `NOM` and `{NOM}` both name the `{NOM}` placeholder.
pub fn placeholder_token(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') && trimmed.len() > 1 {
        trimmed.to_string()
    } else {
        format!("{{{}}}", trimmed.trim_matches(|c: char| c == '{' || c == '}'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                "Prénom".into(),
                "Nom".into(),
                "Nom complet".into(),
                "Email".into(),
            ],
            vec![
                vec!["Jean".into(), "Dupont".into(), "".into(), "".into()],
                vec!["".into(), "".into(), "Fondation X".into(), "x@y.ch".into()],
            ],
        )
    }

    #[test]
    fn test_interpret_prefers_existing_column() {
        let data = dataset();
        assert_eq!(
            ColumnSpec::interpret("Nom complet", &data),
            ColumnSpec::Column("Nom complet".into())
        );
        assert_eq!(
            ColumnSpec::interpret("Prénom Nom", &data),
            ColumnSpec::Combination(vec!["Prénom".into(), "Nom".into()])
        );
        assert_eq!(
            ColumnSpec::interpret("Ville", &data),
            ColumnSpec::Column("Ville".into())
        );
    }

    #[test]
    fn test_interpreted_primary_combines_missing_spaced_name() {
        let data = dataset();
        let cols = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

        let mapping =
            PlaceholderMapping::from_columns("{NOM}", &cols(&["Prénom Nom", "Email"]), false)
                .unwrap()
                .interpreted(&data);
        assert_eq!(
            mapping.source,
            Some(ColumnSpec::WithFallback {
                primary: Box::new(ColumnSpec::Combination(vec!["Prénom".into(), "Nom".into()])),
                fallbacks: vec!["Email".into()],
            })
        );
        assert_eq!(mapping.resolve(&data.record(0).unwrap()), "Jean Dupont");

        let spaced = PlaceholderMapping::from_columns("{ORG}", &cols(&["Nom complet"]), false)
            .unwrap()
            .interpreted(&data);
        assert_eq!(spaced.source, Some(ColumnSpec::Column("Nom complet".into())));
    }

    #[test]
    fn test_resolve_combination_and_fallback() {
        let data = dataset();
        let combo = ColumnSpec::Combination(vec!["Prénom".into(), "Ville".into(), "Nom".into()]);
        let fallback = ColumnSpec::WithFallback {
            primary: Box::new(combo.clone()),
            fallbacks: vec!["Email".into(), "Nom complet".into()],
        };

        let first = data.record(0).unwrap();
        assert_eq!(combo.resolve(&first), "Jean Dupont");
        assert_eq!(fallback.resolve(&first), "Jean Dupont");

        let second = data.record(1).unwrap();
        assert_eq!(combo.resolve(&second), "");
        assert_eq!(fallback.resolve(&second), "x@y.ch");
    }

    #[test]
    fn test_unresolved_references() {
        let data = dataset();
        assert!(ColumnSpec::Combination(vec!["Ville".into(), "Nom".into()])
            .unresolved(&data)
            .is_empty());
        assert_eq!(
            ColumnSpec::Combination(vec!["Ville".into(), "Pays".into()]).unresolved(&data),
            vec!["Ville Pays".to_string()]
        );

        let spec = ColumnSpec::WithFallback {
            primary: Box::new(ColumnSpec::Column("Nom".into())),
            fallbacks: vec!["Telephone".into(), "Email".into()],
        };
        assert_eq!(spec.unresolved(&data), vec!["Telephone".to_string()]);
    }

    #[test]
    fn test_from_columns_shapes() {
        let cols = |names: &[&str]| names.iter().map(|n| n.to_string()).collect::<Vec<_>>();

        let single = PlaceholderMapping::from_columns("NOM", &cols(&["Nom"]), false).unwrap();
        assert_eq!(single.placeholder, "{NOM}");
        assert_eq!(single.source, Some(ColumnSpec::Column("Nom".into())));

        let combined =
            PlaceholderMapping::from_columns("{NOM}", &cols(&["Prénom", "Nom"]), true).unwrap();
        assert!(matches!(combined.source, Some(ColumnSpec::Combination(ref c)) if c.len() == 2));

        let priority =
            PlaceholderMapping::from_columns("{NOM}", &cols(&["Nom", "Email"]), false).unwrap();
        assert!(matches!(priority.source, Some(ColumnSpec::WithFallback { .. })));

        let unmapped = PlaceholderMapping::from_columns("{NOM}", &cols(&["", " "]), false).unwrap();
        assert!(unmapped.source.is_none());

        let too_many = PlaceholderMapping::from_columns(
            "{NOM}",
            &cols(&["a", "b", "c", "d", "e", "f"]),
            false,
        );
        assert!(matches!(too_many, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_field_mapping_replaces_same_placeholder() {
        let mapping = FieldMapping::new()
            .with(PlaceholderMapping::new("NOM", Some(ColumnSpec::Column("a".into()))))
            .with(PlaceholderMapping::new("{DATE}", None))
            .with(PlaceholderMapping::new("{NOM}", Some(ColumnSpec::Column("b".into()))));

        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.get("NOM").unwrap().source,
            Some(ColumnSpec::Column("b".into()))
        );
    }

    #[test]
    fn test_placeholder_token() {
        assert_eq!(placeholder_token("NOM"), "{NOM}");
        assert_eq!(placeholder_token(" {NOM} "), "{NOM}");
        assert_eq!(placeholder_token("{NOM"), "{NOM}");
    }
}
