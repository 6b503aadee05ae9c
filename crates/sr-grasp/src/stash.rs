//! The grasp stash.
//!
//! An in-memory index of [`Grasp`] records keyed by id, backed by a single
//! YAML file.  The file is only touched by explicit [`GraspStash::load`] and
//! [`GraspStash::save`] calls; nothing is synced on drop.
//!
//! # File format
//!
//! A YAML sequence of grasp nodes using the middleware message field names:
//!
//! ```yaml
//! - id: pinch_grip
//!   grasp_quality: 0.8
//!   pre_grasp_posture:
//!     joint_names: [FFJ3, THJ4]
//!     points:
//!       - positions: [0.0, 0.0]
//!   grasp_posture:
//!     joint_names: [FFJ3, THJ4]
//!     points:
//!       - positions: [1.2, 0.9]
//! ```
//!
//! # Load policy
//!
//! A load is all-or-nothing.  Every node is converted and validated before
//! any of them is inserted, so an unreadable file, a YAML syntax error, a
//! malformed node, or a node without an id leaves the stash exactly as it
//! was.
//!
//! # Ordering
//!
//! [`GraspStash::all`] and [`GraspStash::get_at`] iterate in ascending id
//! order.  Positions shift as grasps are added, so indices are only stable
//! while the stash is not modified.
//!
//! # Concurrency
//!
//! None.  Two stashes pointed at the same file do not coordinate; the last
//! `save` wins.
//!
//! # Example
//!
//! ```rust
//! use sr_grasp::{Grasp, GraspStash};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("grasps.yaml");
//!
//! let mut stash = GraspStash::new(&path);
//! stash.put(Grasp::shadow_hand("open_hand")).unwrap();
//! stash.save().unwrap();
//!
//! let mut reloaded = GraspStash::new(&path);
//! reloaded.load().unwrap();
//! assert_eq!(reloaded.get("open_hand").unwrap().name(), "open_hand");
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use sr_grasp_msgs::{GraspArray, GraspMsg};
use tracing::{debug, error, info, warn};

use crate::config::StashConfig;
use crate::error::StashError;
use crate::grasp::Grasp;

/// Keyed collection of grasps with file-backed persistence.
#[derive(Debug, Clone)]
pub struct GraspStash {
    grasps: BTreeMap<String, Grasp>,
    path: PathBuf,
}

impl GraspStash {
    /// Create an empty stash backed by `path`.  The file is not read.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            grasps: BTreeMap::new(),
            path: path.into(),
        }
    }

    /// Create an empty stash backed by the grasp file `cfg` points at.
    pub fn with_config(cfg: &StashConfig) -> Self {
        Self::new(cfg.grasps_path())
    }

    /// Create an empty stash backed by the process-wide default grasp file
    /// (see [`StashConfig::resolve`]).
    pub fn with_default_path() -> Result<Self, StashError> {
        Ok(Self::with_config(&StashConfig::resolve()?))
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
    }

    // ── Index ─────────────────────────────────────────────────────────────

    /// Stash `grasp` under its id, replacing any grasp with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`StashError::InvalidKey`] if the grasp has no id; the stash is
    /// left unchanged.
    pub fn put(&mut self, grasp: Grasp) -> Result<(), StashError> {
        if grasp.id.is_empty() {
            return Err(StashError::InvalidKey);
        }
        debug!(id = %grasp.id, "Stashed grasp");
        self.grasps.insert(grasp.id.clone(), grasp);
        Ok(())
    }

    /// Up-convert a middleware grasp message and stash it.
    pub fn put_msg(&mut self, msg: &GraspMsg) -> Result<(), StashError> {
        self.put(Grasp::from_msg(msg))
    }

    /// Fetch a grasp by id.
    pub fn get(&self, id: &str) -> Result<&Grasp, StashError> {
        self.grasps
            .get(id)
            .ok_or_else(|| StashError::NotFound(id.to_string()))
    }

    /// Fetch a grasp by id for in-place editing.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut Grasp, StashError> {
        self.grasps
            .get_mut(id)
            .ok_or_else(|| StashError::NotFound(id.to_string()))
    }

    /// Fetch the grasp at `index` in id order.
    pub fn get_at(&self, index: usize) -> Result<&Grasp, StashError> {
        self.grasps
            .values()
            .nth(index)
            .ok_or(StashError::IndexOutOfRange {
                index,
                len: self.grasps.len(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.grasps.contains_key(id)
    }

    /// Number of grasps.
    pub fn len(&self) -> usize {
        self.grasps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grasps.is_empty()
    }

    /// Every id, ascending.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.grasps.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Grasp> {
        self.grasps.values()
    }

    /// All grasps in id order.
    pub fn all(&self) -> Vec<&Grasp> {
        self.grasps.values().collect()
    }

    /// All grasps as a middleware [`GraspArray`], for handing to other
    /// processes.
    pub fn to_grasp_array(&self) -> GraspArray {
        GraspArray {
            grasps: self.grasps.values().map(Grasp::to_msg).collect(),
        }
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Load the backing file into the stash.  Returns the number of grasps
    /// read.  See the module docs for the all-or-nothing policy.
    pub fn load(&mut self) -> Result<usize, StashError> {
        let path = self.path.clone();
        self.load_from(&path)
    }

    /// Re-read the backing file.  Grasps not present in the file are kept.
    pub fn refresh(&mut self) -> Result<usize, StashError> {
        self.load()
    }

    /// Load the grasps in `path` into the stash.
    ///
    /// Failures are logged and returned; the stash is left unchanged.
    pub fn load_from(&mut self, path: impl AsRef<Path>) -> Result<usize, StashError> {
        let path = path.as_ref();
        match self.read_yaml_file(path) {
            Ok(count) => {
                info!(path = %path.display(), count, "Loaded grasps from file");
                Ok(count)
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load YAML grasp file");
                Err(e)
            }
        }
    }

    fn read_yaml_file(&mut self, path: &Path) -> Result<usize, StashError> {
        let raw = fs::read_to_string(path).map_err(|e| StashError::io(path, e))?;
        if raw.trim().is_empty() {
            return Ok(0);
        }
        let doc: Value = serde_yaml::from_str(&raw).map_err(|source| StashError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_yaml(&doc)
    }

    /// Load grasps from an already parsed YAML document (a sequence of grasp
    /// nodes).  A null document holds no grasps.
    ///
    /// # Errors
    ///
    /// [`StashError::SchemaMismatch`] if the document is not a sequence or any
    /// node is not grasp-shaped, [`StashError::InvalidKey`] if any node lacks
    /// an id.  Nothing is inserted on error.
    pub fn load_yaml(&mut self, doc: &Value) -> Result<usize, StashError> {
        let nodes = match doc {
            Value::Null => return Ok(0),
            Value::Sequence(nodes) => nodes,
            _ => {
                return Err(StashError::SchemaMismatch(
                    "expected a sequence of grasps at the document root".to_string(),
                ));
            }
        };

        let mut staged = Vec::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            let grasp = Grasp::from_yaml(node).map_err(|e| match e {
                StashError::SchemaMismatch(msg) => {
                    StashError::SchemaMismatch(format!("grasp #{index}: {msg}"))
                }
                other => other,
            })?;
            if grasp.id.is_empty() {
                return Err(StashError::InvalidKey);
            }
            staged.push(grasp);
        }

        let count = staged.len();
        let mut seen = HashSet::with_capacity(count);
        for grasp in staged {
            if !seen.insert(grasp.id.clone()) {
                warn!(id = %grasp.id, "Duplicate grasp id in document; later entry wins");
            }
            self.put(grasp)?;
        }
        Ok(count)
    }

    /// Write every grasp to the backing file, overwriting it.
    pub fn save(&self) -> Result<(), StashError> {
        self.save_to(&self.path)
    }

    /// Write every grasp to `path`, overwriting it.  Missing parent
    /// directories are created.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), StashError> {
        let path = path.as_ref();
        let nodes = self
            .iter()
            .map(Grasp::to_yaml)
            .collect::<Result<Vec<_>, _>>()?;
        let raw = serde_yaml::to_string(&Value::Sequence(nodes))
            .map_err(|e| StashError::Serialization(e.to_string()))?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StashError::io(parent, e))?;
        }
        fs::write(path, raw).map_err(|e| StashError::io(path, e))?;
        info!(path = %path.display(), count = self.len(), "Saved grasps to file");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
