use serde::{Deserialize, Serialize};

/// Resolved placeholder values for one row, in mapping order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueMapping {
    entries: Vec<(String, String)>,
}

impl ValueMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `placeholder` to `value`, keeping its original position if it
    /// was already present.
    pub fn insert(&mut self, placeholder: impl Into<String>, value: impl Into<String>) {
        let placeholder = placeholder.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == placeholder) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((placeholder, value)),
        }
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == placeholder)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// First value that is not blank, in mapping order.
    pub fn first_non_empty(&self) -> Option<&str> {
        self.entries
            .iter()
            .map(|(_, v)| v.as_str())
            .find(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValueMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut mapping = ValueMapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order() {
        let mut values: ValueMapping = [("{A}", ""), ("{B}", "b")].into_iter().collect();
        values.insert("{A}", "a");
        values.insert("{C}", "c");

        let keys: Vec<&str> = values.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["{A}", "{B}", "{C}"]);
        assert_eq!(values.get("{A}"), Some("a"));
    }

    #[test]
    fn test_first_non_empty() {
        let values: ValueMapping = [("{A}", " "), ("{B}", "b")].into_iter().collect();
        assert_eq!(values.first_non_empty(), Some("b"));
        assert_eq!(ValueMapping::new().first_non_empty(), None);
    }
}
