//! Shared test helpers.

use std::path::PathBuf;

use tempfile::TempDir;

/// Directory holding the `.cast` fixtures.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Copy a fixture into a fresh temp directory. Keep the `TempDir` alive for
/// as long as the path is used.
pub fn temp_fixture(name: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join(name);
    std::fs::copy(fixtures_dir().join(name), &path).expect("copy fixture");
    (temp_dir, path)
}
