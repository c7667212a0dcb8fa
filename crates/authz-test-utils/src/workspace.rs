//! [`TestWorkspace`] builder for sync and validation scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding a schema, model files and generated outputs.
///
/// # Example
///
/// ```rust,no_run
/// use authz_test_utils::{TestWorkspace, fixtures};
///
/// let ws = TestWorkspace::new().with_schema(fixtures::VALID_SCHEMA);
/// ws.assert_file_exists("schema.zed");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the workspace.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `schema.zed` at the root.
    pub fn with_schema(self, schema: &str) -> Self {
        self.write("schema.zed", schema);
        self
    }

    pub fn with_file(self, rel: &str, content: &str) -> Self {
        self.write(rel, content);
        self
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }

    /// Read a file.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, rel: &str) -> String {
        let path = self.path(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read file {}: {e}", path.display()))
    }

    pub fn assert_file_exists(&self, rel: &str) {
        let path = self.path(rel);
        assert!(path.exists(), "Expected file to exist: {}", path.display());
    }

    pub fn assert_file_not_exists(&self, rel: &str) {
        let path = self.path(rel);
        assert!(!path.exists(), "Expected file NOT to exist: {}", path.display());
    }

    /// Assert that the file at `rel` contains `content`.
    pub fn assert_file_contains(&self, rel: &str, content: &str) {
        let file_content = self.read(rel);
        assert!(
            file_content.contains(content),
            "File {rel} does not contain expected content.\nExpected: {content}\nActual: {file_content}"
        );
    }

    /// Modification time of a file, for asserting that no write happened.
    pub fn modified(&self, rel: &str) -> std::time::SystemTime {
        fs::metadata(self.path(rel)).unwrap().modified().unwrap()
    }
}
