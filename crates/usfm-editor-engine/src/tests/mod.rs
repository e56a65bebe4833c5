use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Create a temporary project directory for testing
pub fn create_test_project_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a test USFM file with content, and any directories above it
pub fn create_test_file(project_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = project_dir.path().join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&file_path, content).unwrap();
    file_path
}
