//! Stash configuration – where the grasp file lives.
//!
//! The default grasp file is `<package_path>/resource/grasps.yaml`.  The
//! `grasps_file` parameter, when set, replaces that path outright.  Both can
//! come from a TOML parameter file and be overridden from the environment.
//!
//! ```toml
//! package_path = "/opt/robot/share/sr_grasp"
//! grasps_file = "/home/robot/my_grasps.yaml"
//! ```
//!
//! | Variable | Config field |
//! |---|---|
//! | `SR_GRASP_PACKAGE_PATH` | `package_path` |
//! | `SR_GRASP_GRASPS_FILE` | `grasps_file` |
//! | `SR_GRASP_CONFIG` | location of the TOML file itself |

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StashError;

/// Resource directory under the package path holding the grasp file.
pub const RESOURCE_DIR: &str = "resource";
/// File name of the default grasp file.
pub const GRASPS_FILE_NAME: &str = "grasps.yaml";

/// Resolved stash parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StashConfig {
    /// Root of the grasp package; the default grasp file lives beneath it.
    /// Defaults to the current directory.
    #[serde(default = "default_package_path")]
    pub package_path: PathBuf,

    /// Explicit grasp file, taking precedence over the package default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grasps_file: Option<PathBuf>,
}

fn default_package_path() -> PathBuf {
    PathBuf::from(".")
}

impl Default for StashConfig {
    fn default() -> Self {
        Self {
            package_path: default_package_path(),
            grasps_file: None,
        }
    }
}

impl StashConfig {
    /// The grasp file this configuration points at.
    pub fn grasps_path(&self) -> PathBuf {
        match &self.grasps_file {
            Some(file) => file.clone(),
            None => self.package_path.join(RESOURCE_DIR).join(GRASPS_FILE_NAME),
        }
    }

    /// The configuration in effect for this process: the parameter file if
    /// present, otherwise defaults, with environment overrides applied.
    pub fn resolve() -> Result<Self, StashError> {
        let mut cfg = load()?.unwrap_or_default();
        apply_env_overrides(&mut cfg);
        Ok(cfg)
    }
}

/// Return the path of the TOML parameter file: `$SR_GRASP_CONFIG`, else
/// `~/.sr_grasp/config.toml`.
pub fn config_path() -> PathBuf {
    if let Ok(p) = std::env::var("SR_GRASP_CONFIG") {
        return PathBuf::from(p);
    }
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".sr_grasp").join("config.toml")
}

/// Load the parameter file.  Returns `None` if it does not exist.
pub fn load() -> Result<Option<StashConfig>, StashError> {
    load_from(&config_path())
}

/// Load the parameter file at `path`.  Environment overrides are not applied.
pub fn load_from(path: &Path) -> Result<Option<StashConfig>, StashError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| StashError::io(path, e))?;
    let cfg: StashConfig = toml::from_str(&raw)
        .map_err(|e| StashError::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(cfg))
}

/// Apply `SR_GRASP_*` environment variable overrides to `cfg`.
pub fn apply_env_overrides(cfg: &mut StashConfig) {
    if let Ok(v) = std::env::var("SR_GRASP_PACKAGE_PATH") {
        cfg.package_path = PathBuf::from(v);
    }
    if let Ok(v) = std::env::var("SR_GRASP_GRASPS_FILE")
        && !v.is_empty()
    {
        cfg.grasps_file = Some(PathBuf::from(v));
    }
}

/// Write `cfg` to `path`, creating parent directories as needed.
pub fn save_to(cfg: &StashConfig, path: &Path) -> Result<(), StashError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StashError::io(parent, e))?;
    }
    let raw = toml::to_string_pretty(cfg).map_err(|e| StashError::Config(e.to_string()))?;
    fs::write(path, raw).map_err(|e| StashError::io(path, e))
}
