//! `sr-grasp-msgs` – message shapes exchanged with the robot middleware.
//!
//! These structs mirror the grasp message family published and consumed by
//! the rest of the robot stack (`Grasp`, `GraspArray`, `JointTrajectory`,
//! `PoseStamped`, `GripperTranslation`, …).  They are plain owned values: the
//! record type in `sr-grasp` composes them rather than wrapping a foreign
//! base type.
//!
//! Every struct uses `#[serde(default)]` so a partially specified node keeps
//! field defaults, and `#[serde(deny_unknown_fields)]` so a misspelt or
//! misplaced field is rejected instead of silently dropped.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Time
// ─────────────────────────────────────────────────────────────────────────────

/// Wall-clock instant split into seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Time {
    pub secs: u32,
    pub nsecs: u32,
}

/// Signed time span, used for `time_from_start` on trajectory points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Duration {
    pub secs: i32,
    pub nsecs: i32,
}

/// Standard metadata carried by stamped messages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Header {
    pub seq: u32,
    pub stamp: Time,
    /// Reference frame the data is expressed in (e.g. `"world"`).
    pub frame_id: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Orientation as a quaternion (x, y, z, w convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    /// The identity rotation.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
        }
    }
}

/// Position plus orientation in free space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Pose {
    pub position: Point,
    pub orientation: Quaternion,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PoseStamped {
    pub header: Header,
    pub pose: Pose,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Vector3Stamped {
    pub header: Header,
    pub vector: Vector3,
}

/// An approach or retreat motion: a direction and how far to travel along it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GripperTranslation {
    pub direction: Vector3Stamped,
    /// Distance the planner should aim for (metres).
    pub desired_distance: f32,
    /// Minimum distance that must be achieved for the motion to count (metres).
    pub min_distance: f32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Trajectories
// ─────────────────────────────────────────────────────────────────────────────

/// A single waypoint.  `positions[i]` belongs to `joint_names[i]` of the
/// owning [`JointTrajectory`]; positions are radians.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct JointTrajectoryPoint {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub accelerations: Vec<f64>,
    pub effort: Vec<f64>,
    pub time_from_start: Duration,
}

impl JointTrajectoryPoint {
    /// A point carrying only positions.
    pub fn from_positions(positions: Vec<f64>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }
}

/// An ordered list of waypoints over a shared, ordered list of joint names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct JointTrajectory {
    pub header: Header,
    pub joint_names: Vec<String>,
    pub points: Vec<JointTrajectoryPoint>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Grasp
// ─────────────────────────────────────────────────────────────────────────────

/// The middleware's grasp description for a hand mounted on an arm.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GraspMsg {
    /// Name of the grasp; the stash keys on this.
    pub id: String,
    /// Hand posture before approaching the object.
    pub pre_grasp_posture: JointTrajectory,
    /// Hand posture when closing on the object.
    pub grasp_posture: JointTrajectory,
    /// End-effector pose at which to grasp.
    pub grasp_pose: PoseStamped,
    pub grasp_quality: f64,
    pub pre_grasp_approach: GripperTranslation,
    pub post_grasp_retreat: GripperTranslation,
    pub post_place_retreat: GripperTranslation,
    pub max_contact_force: f32,
    /// Objects the hand may touch while executing this grasp.
    pub allowed_touch_objects: Vec<String>,
}

/// A flat batch of grasps for transmission to other processes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GraspArray {
    pub grasps: Vec<GraspMsg>,
}
