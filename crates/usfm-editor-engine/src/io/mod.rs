//! Project files on disk.
//!
//! A project is a directory tree of `.usfm`/`.sfm` books. Files are named by
//! their path relative to the project root, and read as UTF-8 with an
//! optional byte order mark.

use relative_path::{RelativePath, RelativePathBuf};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use usfm_editor_syntax::Taxonomy;

use crate::editing::Document;
use crate::error::EditError;

const USFM_EXTENSIONS: [&str; 2] = ["usfm", "sfm"];
const BOM: &str = "\u{feff}";

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path} is not UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse { path: PathBuf, source: EditError },
    #[error("Invalid project directory: {0}")]
    InvalidProjectDir(PathBuf),
}

/// Read a book's text, without its byte order mark.
pub fn read_file(relative_path: &RelativePath, project_root: &Path) -> Result<String, IoError> {
    let path = relative_path.to_path(project_root);
    let bytes = fs::read(&path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => IoError::NotFound(path.clone()),
        _ => IoError::Io(e),
    })?;

    let mut text =
        String::from_utf8(bytes).map_err(|source| IoError::Encoding { path, source })?;
    if text.starts_with(BOM) {
        text.replace_range(..BOM.len(), "");
    }
    Ok(text)
}

/// Write a book's text, creating parent directories.
pub fn write_file(
    relative_path: &RelativePath,
    project_root: &Path,
    content: &str,
) -> Result<(), IoError> {
    let path = relative_path.to_path(project_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(())
}

/// Read and parse a book with the project's marker taxonomy.
pub fn open_document(
    relative_path: &RelativePath,
    project_root: &Path,
    taxonomy: Arc<Taxonomy>,
) -> Result<Document, IoError> {
    let text = read_file(relative_path, project_root)?;
    Document::parse_with_taxonomy(&text, taxonomy).map_err(|source| IoError::Parse {
        path: relative_path.to_path(project_root),
        source,
    })
}

pub fn save_document(
    document: &Document,
    relative_path: &RelativePath,
    project_root: &Path,
) -> Result<(), IoError> {
    write_file(relative_path, project_root, &document.text())?;
    log::debug!("saved {relative_path} at version {}", document.version());
    Ok(())
}

/// Every book under the project root, relative to it and sorted.
///
/// Hidden directories are skipped.
pub fn scan_usfm_files(project_root: &Path) -> Result<Vec<RelativePathBuf>, IoError> {
    validate_project_dir(project_root)?;

    let mut files = Vec::new();
    scan_directory(project_root, RelativePath::new(""), &mut files)?;
    files.sort();
    Ok(files)
}

fn scan_directory(
    root: &Path,
    dir: &RelativePath,
    files: &mut Vec<RelativePathBuf>,
) -> Result<(), IoError> {
    for entry in fs::read_dir(dir.to_path(root))? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::warn!("skipping non-UTF-8 name in {}", dir.to_path(root).display());
            continue;
        };
        let relative = dir.join(name);

        if entry.file_type()?.is_dir() {
            if !name.starts_with('.') {
                scan_directory(root, &relative, files)?;
            }
        } else if relative.extension().is_some_and(|ext| {
            USFM_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        }) {
            files.push(relative);
        }
    }
    Ok(())
}

pub fn validate_project_dir(path: &Path) -> Result<(), IoError> {
    if !path.is_dir() {
        return Err(IoError::InvalidProjectDir(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Cmd;
    use crate::models::VersePath;
    use crate::tests::{create_test_file, create_test_project_dir};

    #[test]
    fn test_scan_returns_project_relative_books() {
        let project = create_test_project_dir();
        create_test_file(&project, "02-EXO.SFM", "\\id EXO");
        create_test_file(&project, "01-GEN.usfm", "\\id GEN");
        create_test_file(&project, "notes.txt", "not scripture");
        create_test_file(&project, "ot/08-RUT.usfm", "\\id RUT");
        create_test_file(&project, ".backup/01-GEN.usfm", "\\id GEN");

        let files = scan_usfm_files(project.path()).unwrap();

        assert_eq!(
            files,
            vec![
                RelativePathBuf::from("01-GEN.usfm"),
                RelativePathBuf::from("02-EXO.SFM"),
                RelativePathBuf::from("ot/08-RUT.usfm"),
            ]
        );
    }

    #[test]
    fn test_invalid_project_directory() {
        let nonexistent_path = PathBuf::from("/this/path/does/not/exist");

        assert!(matches!(
            scan_usfm_files(&nonexistent_path),
            Err(IoError::InvalidProjectDir(_))
        ));
        let project = create_test_project_dir();
        let file = create_test_file(&project, "a.usfm", "");
        assert!(validate_project_dir(&file).is_err());
        validate_project_dir(project.path()).unwrap();
    }

    #[test]
    fn test_byte_order_mark_is_dropped() {
        let project = create_test_project_dir();
        create_test_file(&project, "40-MAT.usfm", "\u{feff}\\id MAT\n\\c 1");

        let text = read_file(RelativePath::new("40-MAT.usfm"), project.path()).unwrap();

        assert_eq!(text, "\\id MAT\n\\c 1");
    }

    #[test]
    fn test_read_errors() {
        let project = create_test_project_dir();
        std::fs::write(project.path().join("bad.usfm"), [0x5c, 0x63, 0xff]).unwrap();
        create_test_file(&project, "broken.usfm", "\\c 1\n\\v 1 a\\nd*");

        assert!(matches!(
            read_file(RelativePath::new("missing.usfm"), project.path()),
            Err(IoError::NotFound(_))
        ));
        assert!(matches!(
            read_file(RelativePath::new("bad.usfm"), project.path()),
            Err(IoError::Encoding { .. })
        ));
        let err = open_document(
            RelativePath::new("broken.usfm"),
            project.path(),
            Arc::new(Taxonomy::standard().clone()),
        )
        .unwrap_err();
        assert!(matches!(err, IoError::Parse { .. }));
        assert!(err.to_string().contains("broken.usfm"));
    }

    #[test]
    fn test_open_edit_save() {
        let project = create_test_project_dir();
        let path = RelativePath::new("books/08-RUT.usfm");
        write_file(path, project.path(), "\\id RUT\n\\c 1\n\\p\n\\v 1 a\n\\v 2 b").unwrap();

        let taxonomy = Arc::new(Taxonomy::standard().clone());
        let mut doc = open_document(path, project.path(), taxonomy.clone()).unwrap();
        doc.apply(Cmd::JoinWithPreviousVerse {
            at: VersePath::new(0, 2),
        })
        .unwrap();
        save_document(&doc, path, project.path()).unwrap();

        assert_eq!(
            read_file(path, project.path()).unwrap(),
            "\\id RUT\n\\c 1\n\\p\n\\v 1-2 ab"
        );
        let reopened = open_document(path, project.path(), taxonomy).unwrap();
        assert_eq!(reopened.book(), doc.book());
    }
}
