use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::Result;

pub const DOCUMENT_EXTENSION: &str = "docx";

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Hands out collision-free output paths inside one directory.
///
/// A name is taken when the file already exists on disk or was handed out
/// earlier in this run.
#[derive(Debug)]
pub struct OutputDirectory {
    root: PathBuf,
    prefix: String,
    suffix: String,
    used: HashSet<PathBuf>,
}

impl OutputDirectory {
    /// Create the directory if needed.
    pub fn create(root: &Path, prefix: &str, suffix: &str) -> Result<Self> {
        ensure_dir(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            used: HashSet::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{prefix}{stem}{suffix}.docx`, or `{prefix}{stem}_{n}{suffix}.docx`
    /// with the smallest `n >= 1` that is still free.
    pub fn claim(&mut self, stem: &str) -> PathBuf {
        let mut candidate = self.document_path(stem, None);
        let mut counter = 1;
        while self.is_taken(&candidate) {
            candidate = self.document_path(stem, Some(counter));
            counter += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }

    fn document_path(&self, stem: &str, counter: Option<usize>) -> PathBuf {
        let name = match counter {
            Some(n) => format!(
                "{}{}_{}{}.{}",
                self.prefix, stem, n, self.suffix, DOCUMENT_EXTENSION
            ),
            None => format!(
                "{}{}{}.{}",
                self.prefix, stem, self.suffix, DOCUMENT_EXTENSION
            ),
        };
        self.root.join(name)
    }

    fn is_taken(&self, path: &Path) -> bool {
        self.used.contains(path) || path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_appends_counter_on_collision() {
        let dir = tempfile::tempdir().unwrap();
        let mut output = OutputDirectory::create(dir.path(), "", "").unwrap();

        let first = output.claim("name");
        let second = output.claim("name");
        let third = output.claim("name");

        assert_eq!(first.file_name().unwrap(), "name.docx");
        assert_eq!(second.file_name().unwrap(), "name_1.docx");
        assert_eq!(third.file_name().unwrap(), "name_2.docx");
    }

    #[test]
    fn test_claim_skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Doc_name_2024.docx"), b"old").unwrap();
        let mut output = OutputDirectory::create(dir.path(), "Doc_", "_2024").unwrap();

        let path = output.claim("name");
        assert_eq!(path.file_name().unwrap(), "Doc_name_1_2024.docx");
    }

    #[test]
    fn test_create_makes_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let output = OutputDirectory::create(&nested, "", "").unwrap();

        assert!(output.root().is_dir());
    }
}
