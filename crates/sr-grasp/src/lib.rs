//! `sr-grasp` – Grasp records and the grasp stash.
//!
//! # Modules
//!
//! - [`grasp`] – [`Grasp`][grasp::Grasp]: a single hand/arm grasp
//!   description with trajectory-point helpers and conversions to and from
//!   the middleware [`GraspMsg`][sr_grasp_msgs::GraspMsg].
//! - [`stash`] – [`GraspStash`][stash::GraspStash]: an id-keyed index of
//!   grasps that loads from and saves to a YAML file.
//! - [`config`] – [`StashConfig`][config::StashConfig]: resolves the default
//!   grasp file from the package path and the `grasps_file` parameter.
//! - [`error`] – [`StashError`][error::StashError]: the error taxonomy.

pub mod config;
pub mod error;
pub mod grasp;
pub mod stash;

pub use config::StashConfig;
pub use error::StashError;
pub use grasp::{Grasp, JointPositions, Posture, SHADOW_HAND_JOINTS};
pub use stash::GraspStash;
