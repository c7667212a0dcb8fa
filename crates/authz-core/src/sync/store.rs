//! Artifact storage

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use authz_fs::{NormalizedPath, io};

use crate::Result;

/// Where the orchestrator reads existing artifacts and writes new ones.
pub trait ArtifactStore {
    /// Current content as raw bytes, or `None` when the artifact does not
    /// exist. Content that is not valid UTF-8 is still returned.
    fn read(&self, path: &NormalizedPath) -> Result<Option<Vec<u8>>>;

    /// Replace (or create) the artifact.
    fn write(&self, path: &NormalizedPath, content: &str) -> Result<()>;
}

/// The real filesystem, written atomically with parents created on demand.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskStore;

impl ArtifactStore for DiskStore {
    fn read(&self, path: &NormalizedPath) -> Result<Option<Vec<u8>>> {
        Ok(io::read_bytes_if_exists(path)?)
    }

    fn write(&self, path: &NormalizedPath, content: &str) -> Result<()> {
        io::write_text(path, content)?;
        Ok(())
    }
}

/// An in-memory store that counts writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.with_bytes(path, content.as_bytes())
    }

    pub fn with_bytes(self, path: &str, content: &[u8]) -> Self {
        self.files
            .borrow_mut()
            .insert(NormalizedPath::new(path).as_str().to_string(), content.to_vec());
        self
    }

    /// Stored content, decoded lossily.
    pub fn get(&self, path: &str) -> Option<String> {
        self.files
            .borrow()
            .get(NormalizedPath::new(path).as_str())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Number of writes performed through [`ArtifactStore::write`].
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl ArtifactStore for MemoryStore {
    fn read(&self, path: &NormalizedPath) -> Result<Option<Vec<u8>>> {
        Ok(self.files.borrow().get(path.as_str()).cloned())
    }

    fn write(&self, path: &NormalizedPath, content: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.files
            .borrow_mut()
            .insert(path.as_str().to_string(), content.as_bytes().to_vec());
        Ok(())
    }
}
