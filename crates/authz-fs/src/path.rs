//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Report lines and diff headers are built from this representation, so the
/// same invocation prints the same text on every platform. Conversion to a
/// native path only happens at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Converts backslashes to forward slashes and collapses repeated
    /// separators.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// An absolute segment replaces the base, matching [`Path::join`].
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        if segment_normalized.starts_with('/') || self.inner.is_empty() {
            return Self {
                inner: clean(&segment_normalized),
            };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(idx) if idx > 0 => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            _ => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 || idx + 1 == name.len() {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

/// Collapse `a//b` into `a/b` and drop `./` segments, keeping a leading `/`.
fn clean(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let absolute = path.starts_with('/');
    let parts: Vec<&str> = path
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backslashes_are_normalized() {
        let path = NormalizedPath::new("gen\\python\\resources.py");
        assert_eq!(path.as_str(), "gen/python/resources.py");
    }

    #[test]
    fn test_repeated_separators_collapse() {
        let path = NormalizedPath::new("gen//python/./resources.py");
        assert_eq!(path.as_str(), "gen/python/resources.py");
    }

    #[test]
    fn test_absolute_path_keeps_root() {
        let path = NormalizedPath::new("/tmp//out.ts");
        assert_eq!(path.as_str(), "/tmp/out.ts");
    }

    #[test]
    fn test_join_absolute_segment_replaces_base() {
        let base = NormalizedPath::new("project");
        assert_eq!(base.join("/abs/file.py").as_str(), "/abs/file.py");
        assert_eq!(base.join("file.py").as_str(), "project/file.py");
    }

    #[test]
    fn test_extension() {
        assert_eq!(NormalizedPath::new("a/b.py").extension(), Some("py"));
        assert_eq!(NormalizedPath::new("a/.hidden").extension(), None);
        assert_eq!(NormalizedPath::new("a/trailing.").extension(), None);
        assert_eq!(NormalizedPath::new("a/noext").extension(), None);
    }

    #[test]
    fn test_parent_and_file_name() {
        let path = NormalizedPath::new("src/gen/types.ts");
        assert_eq!(path.file_name(), Some("types.ts"));
        assert_eq!(path.parent().unwrap().as_str(), "src/gen");
        assert_eq!(NormalizedPath::new("/root").parent().unwrap().as_str(), "/");
        assert!(NormalizedPath::new("file").parent().is_none());
    }
}
