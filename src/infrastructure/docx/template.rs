use std::fs::{self, File};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use docx_rs::Docx;
use tracing::debug;

use crate::domain::error::{AppError, Result};

/// A DOCX template kept as raw bytes so that every output starts from a
/// fresh, unshared parse.
pub struct Template {
    source: Option<PathBuf>,
    bytes: Vec<u8>,
    document: Docx,
}

impl Template {
    /// Read and parse a template file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AppError::NotFound(format!(
                "Template not found: {}",
                path.display()
            )));
        }

        let bytes = fs::read(path)
            .map_err(|e| AppError::IoError(format!("Failed to read DOCX file: {}", e)))?;
        let mut template = Self::from_bytes(bytes)?;
        template.source = Some(path.to_path_buf());
        debug!(path = %path.display(), "Loaded template");
        Ok(template)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let document = parse_docx(&bytes)?;
        Ok(Self {
            source: None,
            bytes,
            document,
        })
    }

    /// Pack an in-memory document and use it as a template.
    #[cfg(test)]
    pub fn from_docx(docx: Docx) -> Result<Self> {
        Self::from_bytes(pack_docx(docx)?)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Parsed template, for read-only inspection.
    pub fn document(&self) -> &Docx {
        &self.document
    }

    /// A new document identical to the template, owned by the caller.
    pub fn instantiate(&self) -> Result<Docx> {
        parse_docx(&self.bytes)
    }
}

fn parse_docx(bytes: &[u8]) -> Result<Docx> {
    docx_rs::read_docx(bytes)
        .map_err(|e| AppError::Template(format!("Failed to parse DOCX file: {}", e)))
}

/// Serialize a document to DOCX bytes.
pub fn pack_docx(docx: Docx) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    docx.build()
        .pack(Cursor::new(&mut buffer))
        .map_err(|e| AppError::Template(format!("Failed to write DOCX: {}", e)))?;
    Ok(buffer)
}

/// Write a document to `path`.
pub fn save_docx(docx: Docx, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    docx.build()
        .pack(file)
        .map_err(|e| AppError::Template(format!("Failed to write {}: {}", path.display(), e)))
}
