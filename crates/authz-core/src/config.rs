//! The optional `authz-sync.toml` configuration file
//!
//! Every key is optional. Command-line flags override values from the file,
//! which override built-in defaults.
//!
//! ```toml
//! schema = "schema.zed"
//! auto_fix = false
//! colorized_diff = true
//!
//! [[outputs]]
//! path = "resources.py"
//! generator = "python"
//!
//! [validate]
//! models = "models.py"
//! class = "Relation"
//! open_world = true
//! ```

use serde::Deserialize;

use authz_fs::{ConfigStore, NormalizedPath};

use crate::Result;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "authz-sync.toml";

fn default_true() -> bool {
    true
}

fn default_class() -> String {
    "Relation".to_string()
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    pub schema: Option<String>,
    pub auto_fix: Option<bool>,
    pub colorized_diff: Option<bool>,
    #[serde(default)]
    pub outputs: Vec<OutputEntry>,
    pub validate: Option<ValidateSection>,
}

/// One `[[outputs]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputEntry {
    pub path: String,
    pub generator: Option<String>,
}

/// The `[validate]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateSection {
    pub models: Option<String>,
    #[serde(default = "default_class")]
    pub class: String,
    #[serde(default = "default_true")]
    pub open_world: bool,
}

impl Default for ValidateSection {
    fn default() -> Self {
        Self {
            models: None,
            class: default_class(),
            open_world: true,
        }
    }
}

impl SyncConfig {
    /// Load a configuration file (TOML or JSON by extension).
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path, outputs = config.outputs.len(), "loaded config");
        Ok(config)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_optional(path: &NormalizedPath) -> Result<Self> {
        if path.is_file() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path, "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// The `[validate]` table, or its defaults when absent.
    pub fn validate_section(&self) -> ValidateSection {
        self.validate.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> NormalizedPath {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        NormalizedPath::new(path)
    }

    #[test]
    fn test_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "authz-sync.toml",
            r#"
schema = "authz/schema.zed"
auto_fix = true

[[outputs]]
path = "resources.py"

[[outputs]]
path = "web/resources.ts"
generator = "typescript"

[validate]
models = "models.py"
open_world = false
"#,
        );

        let config = SyncConfig::load(&path).unwrap();
        assert_eq!(config.schema.as_deref(), Some("authz/schema.zed"));
        assert_eq!(config.auto_fix, Some(true));
        assert_eq!(config.colorized_diff, None);
        assert_eq!(
            config.outputs,
            vec![
                OutputEntry {
                    path: "resources.py".into(),
                    generator: None
                },
                OutputEntry {
                    path: "web/resources.ts".into(),
                    generator: Some("typescript".into())
                },
            ]
        );
        let validate = config.validate_section();
        assert_eq!(validate.class, "Relation");
        assert!(!validate.open_world);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "authz-sync.toml", "auto_fixx = true\n");
        let err = SyncConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Fs(authz_fs::Error::ConfigParse { .. })));
        assert!(err.to_string().contains("auto_fixx"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = NormalizedPath::new(dir.path().join("authz-sync.toml"));
        let config = SyncConfig::load_optional(&path).unwrap();
        assert_eq!(config, SyncConfig::default());
        assert!(config.validate_section().open_world);
    }
}
