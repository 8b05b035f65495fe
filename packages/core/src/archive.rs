//! Zip archive of the rendered documents.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{DocumentError, Result};

/// Regular files directly inside `dir`, sorted by name.
pub fn list_output_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Build an in-memory deflate archive of every file in `dir`.
///
/// Entries are named by file name only. An empty directory yields
/// `DocumentError::EmptyOutput` rather than an empty archive.
pub fn build_zip(dir: &Path) -> Result<Vec<u8>> {
    let files = list_output_files(dir)?;
    if files.is_empty() {
        return Err(DocumentError::EmptyOutput);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        writer.start_file(name, options)?;
        writer.write_all(&fs::read(path)?)?;
    }

    let bytes = writer.finish()?.into_inner();
    tracing::debug!(files = files.len(), bytes = bytes.len(), "built archive");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_empty_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(build_zip(dir.path()), Err(DocumentError::EmptyOutput)));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_zip(&dir.path().join("missing"));
        assert!(matches!(result, Err(DocumentError::Io(_))));
    }

    #[test]
    fn test_zip_contains_all_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.docx"), b"second").unwrap();
        fs::write(dir.path().join("a.docx"), b"first").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let bytes = build_zip(dir.path()).unwrap();
        assert_eq!(&bytes[..2], b"PK");

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("a.docx")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "first");
    }
}
