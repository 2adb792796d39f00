use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::error::{AppError, Result};

/// Bundle `files` into a deflate-compressed zip at `archive_path`, each entry
/// stored under its base name. Does nothing for an empty list.
pub fn bundle_files(files: &[PathBuf], archive_path: &Path) -> Result<Option<PathBuf>> {
    if files.is_empty() {
        return Ok(None);
    }

    let mut zip = ZipWriter::new(File::create(archive_path)?);

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                AppError::Archive(format!("Not a file path: {}", path.display()))
            })?;

        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)?;
        let mut source = File::open(path)?;
        io::copy(&mut source, &mut zip)?;
    }

    zip.finish()?;
    info!(
        archive = %archive_path.display(),
        entries = files.len(),
        "Wrote archive"
    );
    Ok(Some(archive_path.to_path_buf()))
}
