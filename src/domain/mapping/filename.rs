use serde::{Deserialize, Serialize};

use super::column_spec::{placeholder_token, ColumnSpec};
use crate::domain::dataset::Dataset;

/// Marker the front-end puts in front of a placeholder used as filename field.
pub const TEMPLATE_MARKER: &str = "__TEMPLATE__";

/// One piece of a combined filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenamePart {
    Column(String),
    Placeholder(String),
}

/// Where output file stems come from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenameSource {
    /// First non-empty resolved value, else `document_{row}`
    #[default]
    Auto,
    Column(String),
    Placeholder(String),
    /// Parts joined with `_`
    Combination(Vec<FilenamePart>),
}

impl FilenameSource {
    /// Read the front-end's filename field string against `dataset`.
    ///
    /// An existing column name wins, even when it contains spaces. Otherwise
    /// `__TEMPLATE__{NOM}` names a placeholder, a bare word names a column,
    /// and several whitespace-separated words form a combination.
    pub fn interpret(raw: Option<&str>, dataset: &Dataset) -> Self {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return FilenameSource::Auto,
        };

        match ColumnSpec::interpret(raw, dataset) {
            ColumnSpec::Combination(words) => {
                FilenameSource::Combination(words.iter().map(|word| parse_part(word)).collect())
            }
            _ => match parse_part(raw) {
                FilenamePart::Column(name) => FilenameSource::Column(name),
                FilenamePart::Placeholder(token) => FilenameSource::Placeholder(token),
            },
        }
    }
}

fn parse_part(word: &str) -> FilenamePart {
    match word.strip_prefix(TEMPLATE_MARKER) {
        Some(placeholder) => FilenamePart::Placeholder(placeholder_token(placeholder)),
        None => FilenamePart::Column(word.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["Nom".into(), "Nom complet".into()],
            vec![vec!["Dupont".into(), "Fondation Vaudoise".into()]],
        )
    }

    #[test]
    fn test_interpret_filename_field() {
        let data = dataset();
        let interpret = |raw| FilenameSource::interpret(raw, &data);

        assert_eq!(interpret(None), FilenameSource::Auto);
        assert_eq!(interpret(Some("  ")), FilenameSource::Auto);
        assert_eq!(interpret(Some("Nom")), FilenameSource::Column("Nom".into()));
        assert_eq!(
            interpret(Some("__TEMPLATE__{NOM}")),
            FilenameSource::Placeholder("{NOM}".into())
        );
        assert_eq!(
            interpret(Some("Nom __TEMPLATE__DATE")),
            FilenameSource::Combination(vec![
                FilenamePart::Column("Nom".into()),
                FilenamePart::Placeholder("{DATE}".into()),
            ])
        );
    }

    #[test]
    fn test_existing_column_with_space_is_not_split() {
        let data = dataset();
        assert_eq!(
            FilenameSource::interpret(Some(" Nom complet "), &data),
            FilenameSource::Column("Nom complet".into())
        );
    }
}
