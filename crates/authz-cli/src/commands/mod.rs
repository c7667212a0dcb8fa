//! Command implementations for authz-cli

pub mod check;
pub mod generators;
pub mod inspect;
pub mod validate;

use std::path::{Path, PathBuf};

use authz_core::{DEFAULT_CONFIG_FILE, SyncConfig};
use authz_fs::NormalizedPath;

use crate::error::{CliError, Result};

pub use check::run_check;
pub use generators::run_generators;
pub use inspect::run_inspect;
pub use validate::run_validate;

/// Load `--config` when given, otherwise `authz-sync.toml` in `cwd` if it
/// exists.
pub fn load_config(cwd: &Path, explicit: Option<&Path>) -> Result<SyncConfig> {
    match explicit {
        Some(path) => {
            let path = NormalizedPath::new(cwd.join(path));
            if !path.is_file() {
                return Err(CliError::user(format!("Config file {path} does not exist")));
            }
            Ok(SyncConfig::load(&path)?)
        }
        None => Ok(SyncConfig::load_optional(&NormalizedPath::new(
            cwd.join(DEFAULT_CONFIG_FILE),
        ))?),
    }
}

/// The flag value, else the config value, resolved against `cwd`.
fn resolve_input(
    cwd: &Path,
    flag: Option<&PathBuf>,
    configured: Option<&str>,
    what: &str,
    hint: &str,
) -> Result<NormalizedPath> {
    let path = flag
        .map(|p| cwd.join(p))
        .or_else(|| configured.map(|p| cwd.join(p)))
        .ok_or_else(|| CliError::user(format!("No {what} given; {hint}")))?;
    Ok(NormalizedPath::new(path))
}

/// The schema path, checked for existence before anything else runs.
fn schema_path(cwd: &Path, flag: Option<&PathBuf>, config: &SyncConfig) -> Result<NormalizedPath> {
    let path = resolve_input(
        cwd,
        flag,
        config.schema.as_deref(),
        "schema file",
        "pass --schema or set `schema` in the config file",
    )?;
    if !path.is_file() {
        return Err(authz_core::Error::SchemaNotFound {
            path: path.to_native(),
        }
        .into());
    }
    Ok(path)
}
