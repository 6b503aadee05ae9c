//! The grasp record.
//!
//! A [`Grasp`] describes how a hand/arm combination closes on an object: a
//! pre-grasp posture, a grasp posture, the end-effector pose, approach and
//! retreat motions, and the objects the hand may touch.  It owns all of its
//! fields outright and converts to and from the middleware's
//! [`GraspMsg`] at the boundary.
//!
//! # Units
//!
//! Trajectory positions are stored in radians.  The per-joint helpers
//! [`Grasp::grasp_point_degrees`] and [`Grasp::set_single_joint_position`]
//! speak degrees, which is what operators tune by hand.
//!
//! # Persisted shape
//!
//! The serde representation uses the middleware message field names
//! (`pre_grasp_posture`, `grasp_pose`, `grasp_quality`, …) so grasps dumped
//! straight off a topic load unchanged.  The record-side names
//! (`pre_grasp_trajectory`, `pose`, `quality`, …) are accepted as aliases.
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use sr_grasp::grasp::{Grasp, Posture};
//!
//! let mut grasp = Grasp::new("pinch_grip");
//! let mut closed = BTreeMap::new();
//! closed.insert("FFJ3".to_string(), std::f64::consts::FRAC_PI_2);
//! grasp.set_trajectory_point(Posture::Grasp, &closed, 0);
//!
//! let degrees = grasp.grasp_point_degrees(0);
//! assert!((degrees["FFJ3"] - 90.0).abs() < 1e-9);
//! ```

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use sr_grasp_msgs::{GraspMsg, GripperTranslation, JointTrajectory, JointTrajectoryPoint, PoseStamped};

use crate::error::StashError;

/// Joint name → position.  Ordered by joint name so that the derived
/// joint-name list is deterministic.
pub type JointPositions = BTreeMap<String, f64>;

/// Every Shadow Hand joint, in the order the hand drivers publish them.
pub const SHADOW_HAND_JOINTS: [&str; 24] = [
    "FFJ1", "FFJ2", "FFJ3", "FFJ4", //
    "LFJ1", "LFJ2", "LFJ3", "LFJ4", "LFJ5", //
    "MFJ1", "MFJ2", "MFJ3", "MFJ4", //
    "RFJ1", "RFJ2", "RFJ3", "RFJ4", //
    "THJ1", "THJ2", "THJ3", "THJ4", "THJ5", //
    "WRJ1", "WRJ2",
];

const DEFAULT_QUALITY: f64 = 0.001;

fn default_quality() -> f64 {
    DEFAULT_QUALITY
}

// `id: ~` reads as an unset id, which the stash then rejects as a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Selects one of the two postures a grasp carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Posture {
    /// The open hand shape held while approaching.
    PreGrasp,
    /// The closed hand shape around the object.
    Grasp,
}

// ─────────────────────────────────────────────────────────────────────────────
// Grasp
// ─────────────────────────────────────────────────────────────────────────────

/// A single grasp description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Grasp {
    /// Unique key within a stash.  Must be non-empty before storage.
    #[serde(deserialize_with = "null_as_empty")]
    #[schemars(with = "Option<String>")]
    pub id: String,
    #[serde(rename = "pre_grasp_posture", alias = "pre_grasp_trajectory")]
    pub pre_grasp_trajectory: JointTrajectory,
    #[serde(rename = "grasp_posture", alias = "grasp_trajectory")]
    pub grasp_trajectory: JointTrajectory,
    #[serde(rename = "grasp_pose", alias = "pose")]
    pub pose: PoseStamped,
    #[serde(rename = "grasp_quality", alias = "quality", default = "default_quality")]
    pub quality: f64,
    pub pre_grasp_approach: GripperTranslation,
    pub post_grasp_retreat: GripperTranslation,
    pub post_place_retreat: GripperTranslation,
    pub max_contact_force: f32,
    pub allowed_touch_objects: Vec<String>,
}

impl Default for Grasp {
    fn default() -> Self {
        Self {
            id: String::new(),
            pre_grasp_trajectory: JointTrajectory::default(),
            grasp_trajectory: JointTrajectory::default(),
            pose: PoseStamped::default(),
            quality: DEFAULT_QUALITY,
            pre_grasp_approach: GripperTranslation::default(),
            post_grasp_retreat: GripperTranslation::default(),
            post_place_retreat: GripperTranslation::default(),
            max_contact_force: 0.0,
            allowed_touch_objects: Vec::new(),
        }
    }
}

impl Grasp {
    /// An otherwise empty grasp with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// A Shadow Hand grasp whose pre-grasp point 0 holds every hand joint at
    /// zero (the flat, open hand).
    pub fn shadow_hand(id: impl Into<String>) -> Self {
        let mut grasp = Self::new(id);
        let zeros: JointPositions = SHADOW_HAND_JOINTS
            .iter()
            .map(|name| (name.to_string(), 0.0))
            .collect();
        grasp.set_pre_grasp_point(&zeros, 0);
        grasp
    }

    /// A grasp whose grasp point 0 is `positions` (radians).
    pub fn from_joint_positions(id: impl Into<String>, positions: &JointPositions) -> Self {
        let mut grasp = Self::new(id);
        grasp.set_grasp_point(positions, 0);
        grasp
    }

    /// Deep-copy every field off a middleware grasp message.  No validation
    /// is performed here; the stash validates the id on `put`.
    pub fn from_msg(msg: &GraspMsg) -> Self {
        Self {
            id: msg.id.clone(),
            pre_grasp_trajectory: msg.pre_grasp_posture.clone(),
            grasp_trajectory: msg.grasp_posture.clone(),
            pose: msg.grasp_pose.clone(),
            quality: msg.grasp_quality,
            pre_grasp_approach: msg.pre_grasp_approach.clone(),
            post_grasp_retreat: msg.post_grasp_retreat.clone(),
            post_place_retreat: msg.post_place_retreat.clone(),
            max_contact_force: msg.max_contact_force,
            allowed_touch_objects: msg.allowed_touch_objects.clone(),
        }
    }

    /// Plain middleware message version of this grasp.
    pub fn to_msg(&self) -> GraspMsg {
        GraspMsg {
            id: self.id.clone(),
            pre_grasp_posture: self.pre_grasp_trajectory.clone(),
            grasp_posture: self.grasp_trajectory.clone(),
            grasp_pose: self.pose.clone(),
            grasp_quality: self.quality,
            pre_grasp_approach: self.pre_grasp_approach.clone(),
            post_grasp_retreat: self.post_grasp_retreat.clone(),
            post_place_retreat: self.post_place_retreat.clone(),
            max_contact_force: self.max_contact_force,
            allowed_touch_objects: self.allowed_touch_objects.clone(),
        }
    }

    /// Build a grasp from one node of a parsed YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`StashError::SchemaMismatch`] when the node is not a mapping,
    /// names a field the record does not have, nests values with the wrong
    /// shape, or has a trajectory point whose positions do not line up with
    /// the trajectory's joint names.  Fields the node omits keep their
    /// defaults.
    pub fn from_yaml(node: &serde_yaml::Value) -> Result<Self, StashError> {
        let grasp: Self = serde_yaml::from_value(node.clone())
            .map_err(|e| StashError::SchemaMismatch(e.to_string()))?;
        grasp.check_joint_alignment()?;
        Ok(grasp)
    }

    /// Every non-empty point must carry exactly one position per joint name.
    /// Empty points are the padding left by [`Grasp::set_trajectory_point`].
    fn check_joint_alignment(&self) -> Result<(), StashError> {
        for (label, trajectory) in [
            ("pre_grasp_posture", &self.pre_grasp_trajectory),
            ("grasp_posture", &self.grasp_trajectory),
        ] {
            let joints = trajectory.joint_names.len();
            for (index, p) in trajectory.points.iter().enumerate() {
                if !p.positions.is_empty() && p.positions.len() != joints {
                    return Err(StashError::SchemaMismatch(format!(
                        "{label} point {index} has {} positions for {joints} joint names",
                        p.positions.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Generic YAML node for this grasp, the inverse of [`Grasp::from_yaml`].
    pub fn to_yaml(&self) -> Result<serde_yaml::Value, StashError> {
        serde_yaml::to_value(self).map_err(|e| StashError::Serialization(e.to_string()))
    }

    /// Alias for `id`.
    pub fn name(&self) -> &str {
        &self.id
    }

    /// Alias for setting `id`.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.id = name.into();
    }

    fn trajectory(&self, posture: Posture) -> &JointTrajectory {
        match posture {
            Posture::PreGrasp => &self.pre_grasp_trajectory,
            Posture::Grasp => &self.grasp_trajectory,
        }
    }

    fn trajectory_mut(&mut self, posture: Posture) -> &mut JointTrajectory {
        match posture {
            Posture::PreGrasp => &mut self.pre_grasp_trajectory,
            Posture::Grasp => &mut self.grasp_trajectory,
        }
    }

    /// Set point `point` of the selected trajectory from a map of joint
    /// positions (radians).
    ///
    /// The trajectory's joint-name list is replaced by the map's keys, and the
    /// point's positions are written in the same order.  If the trajectory is
    /// too short it is padded with empty points; those stay empty until they
    /// are set explicitly, so set points in increasing order from 0.
    pub fn set_trajectory_point(&mut self, posture: Posture, positions: &JointPositions, point: usize) {
        let trajectory = self.trajectory_mut(posture);
        trajectory.joint_names = positions.keys().cloned().collect();
        if trajectory.points.len() < point + 1 {
            trajectory
                .points
                .resize_with(point + 1, JointTrajectoryPoint::default);
        }
        trajectory.points[point] = JointTrajectoryPoint::from_positions(positions.values().copied().collect());
    }

    pub fn set_pre_grasp_point(&mut self, positions: &JointPositions, point: usize) {
        self.set_trajectory_point(Posture::PreGrasp, positions, point);
    }

    pub fn set_grasp_point(&mut self, positions: &JointPositions, point: usize) {
        self.set_trajectory_point(Posture::Grasp, positions, point);
    }

    /// Joint positions (radians) of point `point` on the selected trajectory.
    /// Empty if the point does not exist.
    pub fn trajectory_point(&self, posture: Posture, point: usize) -> JointPositions {
        let trajectory = self.trajectory(posture);
        match trajectory.points.get(point) {
            Some(p) => trajectory
                .joint_names
                .iter()
                .cloned()
                .zip(p.positions.iter().copied())
                .collect(),
            None => JointPositions::new(),
        }
    }

    /// Joint positions of grasp point `point`, in degrees.
    pub fn grasp_point_degrees(&self, point: usize) -> JointPositions {
        self.trajectory_point(Posture::Grasp, point)
            .into_iter()
            .map(|(name, rad)| (name, rad.to_degrees()))
            .collect()
    }

    /// Overwrite one joint of grasp point `point`, given in degrees.  The
    /// other joints of the point keep their stored radians untouched.
    pub fn set_single_joint_position(&mut self, name: &str, degrees: f64, point: usize) {
        let mut positions = self.trajectory_point(Posture::Grasp, point);
        positions.insert(name.to_string(), degrees.to_radians());
        self.set_trajectory_point(Posture::Grasp, &positions, point);
    }
}

impl From<&GraspMsg> for Grasp {
    fn from(msg: &GraspMsg) -> Self {
        Self::from_msg(msg)
    }
}

impl From<&Grasp> for GraspMsg {
    fn from(grasp: &Grasp) -> Self {
        grasp.to_msg()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(pairs: &[(&str, f64)]) -> JointPositions {
        pairs.iter().map(|(n, p)| (n.to_string(), *p)).collect()
    }

    #[test]
    fn default_quality_is_small_positive() {
        let grasp = Grasp::new("g1");
        assert!((grasp.quality - 0.001).abs() < f64::EPSILON);
        assert!(grasp.pre_grasp_trajectory.points.is_empty());
    }

    #[test]
    fn shadow_hand_pre_grasp_is_all_zero() {
        let grasp = Grasp::shadow_hand("open_hand");
        let pre = grasp.trajectory_point(Posture::PreGrasp, 0);
        assert_eq!(pre.len(), 24);
        assert!(pre.values().all(|p| *p == 0.0));
        assert!(pre.contains_key("WRJ2"));
    }

    #[test]
    fn set_trajectory_point_keeps_names_and_positions_aligned() {
        let mut grasp = Grasp::new("g1");
        grasp.set_grasp_point(&positions(&[("THJ4", 1.2), ("FFJ3", 0.5)]), 0);
        let t = &grasp.grasp_trajectory;
        assert_eq!(t.joint_names, vec!["FFJ3".to_string(), "THJ4".to_string()]);
        assert_eq!(t.points[0].positions, vec![0.5, 1.2]);
    }

    #[test]
    fn set_trajectory_point_pads_with_empty_points() {
        let mut grasp = Grasp::new("g1");
        grasp.set_pre_grasp_point(&positions(&[("J1", 0.3)]), 2);
        let t = &grasp.pre_grasp_trajectory;
        assert_eq!(t.points.len(), 3);
        assert!(t.points[0].positions.is_empty());
        assert!(t.points[1].positions.is_empty());
        assert_eq!(t.points[2].positions, vec![0.3]);
        // An intermediate unset point reads back empty.
        assert!(grasp.trajectory_point(Posture::PreGrasp, 1).is_empty());
    }

    #[test]
    fn set_trajectory_point_overwrites_in_place() {
        let mut grasp = Grasp::new("g1");
        grasp.set_grasp_point(&positions(&[("J1", 0.1)]), 0);
        grasp.set_grasp_point(&positions(&[("J1", 0.2)]), 1);
        grasp.set_grasp_point(&positions(&[("J1", 0.9)]), 0);
        assert_eq!(grasp.grasp_trajectory.points.len(), 2);
        assert_eq!(grasp.trajectory_point(Posture::Grasp, 0)["J1"], 0.9);
        assert_eq!(grasp.trajectory_point(Posture::Grasp, 1)["J1"], 0.2);
    }

    #[test]
    fn grasp_point_degrees_converts_from_radians() {
        let mut grasp = Grasp::new("g1");
        grasp.set_grasp_point(&positions(&[("FFJ3", 1.0), ("THJ5", -0.5)]), 0);
        let deg = grasp.grasp_point_degrees(0);
        assert!((deg["FFJ3"] - 57.29578).abs() < 1e-4);
        assert!((deg["THJ5"] + 28.64789).abs() < 1e-4);
    }

    #[test]
    fn grasp_point_degrees_empty_for_missing_point() {
        let grasp = Grasp::new("g1");
        assert!(grasp.grasp_point_degrees(0).is_empty());
        assert!(grasp.grasp_point_degrees(5).is_empty());
    }

    #[test]
    fn set_single_joint_position_stores_radians() {
        let mut grasp = Grasp::new("g1");
        grasp.set_grasp_point(&positions(&[("FFJ3", 0.25), ("MFJ3", 0.75)]), 0);
        grasp.set_single_joint_position("FFJ3", 90.0, 0);

        let rad = grasp.trajectory_point(Posture::Grasp, 0);
        assert!((rad["FFJ3"] - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert!((rad["MFJ3"] - 0.75).abs() < 1e-9);

        let deg = grasp.grasp_point_degrees(0);
        assert!((deg["FFJ3"] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn set_single_joint_position_leaves_other_joints_bit_identical() {
        for i in 0..2000 {
            let v = f64::from(i) * 0.000731;
            let mut grasp = Grasp::new("g1");
            grasp.set_grasp_point(&positions(&[("A", v), ("B", 0.0)]), 0);
            grasp.set_single_joint_position("B", 10.0, 0);
            let rad = grasp.trajectory_point(Posture::Grasp, 0);
            assert_eq!(rad["A"], v, "joint A drifted for {v}");
            assert_eq!(rad["B"], 10.0_f64.to_radians());
        }
    }

    #[test]
    fn set_single_joint_position_adds_new_joint() {
        let mut grasp = Grasp::new("g1");
        grasp.set_single_joint_position("WRJ1", 10.0, 0);
        let deg = grasp.grasp_point_degrees(0);
        assert_eq!(deg.len(), 1);
        assert!((deg["WRJ1"] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn name_aliases_id() {
        let mut grasp = Grasp::new("g1");
        assert_eq!(grasp.name(), "g1");
        grasp.set_name("power_grip");
        assert_eq!(grasp.id, "power_grip");
    }

    #[test]
    fn from_msg_deep_copies() {
        let mut msg = GraspMsg {
            id: "g1".to_string(),
            grasp_quality: 0.7,
            allowed_touch_objects: vec!["cup".to_string()],
            ..GraspMsg::default()
        };
        msg.grasp_posture.joint_names.push("FFJ1".to_string());
        msg.grasp_posture
            .points
            .push(JointTrajectoryPoint::from_positions(vec![0.4]));

        let grasp = Grasp::from_msg(&msg);
        msg.grasp_posture.points[0].positions[0] = 9.0;
        msg.allowed_touch_objects.clear();

        assert_eq!(grasp.grasp_trajectory.points[0].positions, vec![0.4]);
        assert_eq!(grasp.allowed_touch_objects, vec!["cup".to_string()]);
        assert!((grasp.quality - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn msg_conversion_is_lossless() {
        let mut grasp = Grasp::shadow_hand("g1");
        grasp.set_grasp_point(&positions(&[("FFJ3", 1.1)]), 0);
        grasp.max_contact_force = 5.0;
        grasp.pre_grasp_approach.desired_distance = 0.1;
        let back = Grasp::from_msg(&grasp.to_msg());
        assert_eq!(grasp, back);
    }

    #[test]
    fn from_yaml_reads_message_field_names() {
        let node: serde_yaml::Value = serde_yaml::from_str(
            r#"
id: pinch_grip
grasp_quality: 0.5
grasp_posture:
  joint_names: [FFJ3, THJ4]
  points:
    - positions: [0.5, 1.0]
"#,
        )
        .unwrap();
        let grasp = Grasp::from_yaml(&node).unwrap();
        assert_eq!(grasp.id, "pinch_grip");
        assert!((grasp.quality - 0.5).abs() < f64::EPSILON);
        assert_eq!(grasp.trajectory_point(Posture::Grasp, 0)["THJ4"], 1.0);
    }

    #[test]
    fn from_yaml_accepts_record_field_names() {
        let node: serde_yaml::Value = serde_yaml::from_str(
            r#"
id: g2
quality: 0.3
pre_grasp_trajectory:
  joint_names: [J1]
  points:
    - positions: [0.0]
"#,
        )
        .unwrap();
        let grasp = Grasp::from_yaml(&node).unwrap();
        assert!((grasp.quality - 0.3).abs() < f64::EPSILON);
        assert_eq!(grasp.trajectory_point(Posture::PreGrasp, 0)["J1"], 0.0);
    }

    #[test]
    fn from_yaml_missing_quality_keeps_default() {
        let node: serde_yaml::Value = serde_yaml::from_str("id: g3").unwrap();
        let grasp = Grasp::from_yaml(&node).unwrap();
        assert!((grasp.quality - 0.001).abs() < f64::EPSILON);
    }

    #[test]
    fn from_yaml_rejects_unknown_field() {
        let node: serde_yaml::Value = serde_yaml::from_str("id: g1\ngrip: strong").unwrap();
        let err = Grasp::from_yaml(&node).unwrap_err();
        assert!(matches!(err, StashError::SchemaMismatch(_)));
    }

    #[test]
    fn from_yaml_rejects_wrong_nesting() {
        let node: serde_yaml::Value =
            serde_yaml::from_str("id: g1\ngrasp_posture: [0.1, 0.2]").unwrap();
        let err = Grasp::from_yaml(&node).unwrap_err();
        assert!(matches!(err, StashError::SchemaMismatch(_)));
    }

    #[test]
    fn from_yaml_rejects_positions_not_matching_joint_names() {
        let node: serde_yaml::Value = serde_yaml::from_str(
            r#"
id: g1
grasp_posture:
  joint_names: [FFJ3, THJ4, THJ5]
  points:
    - positions: [1.0]
"#,
        )
        .unwrap();
        let err = Grasp::from_yaml(&node).unwrap_err();
        assert!(
            matches!(&err, StashError::SchemaMismatch(msg) if msg.contains("grasp_posture point 0")),
            "{err}"
        );
    }

    #[test]
    fn from_yaml_allows_empty_padding_points() {
        let node: serde_yaml::Value = serde_yaml::from_str(
            r#"
id: g1
pre_grasp_posture:
  joint_names: [J1]
  points:
    - positions: []
    - positions: [0.4]
"#,
        )
        .unwrap();
        let grasp = Grasp::from_yaml(&node).unwrap();
        assert_eq!(grasp.trajectory_point(Posture::PreGrasp, 1)["J1"], 0.4);
    }

    #[test]
    fn from_yaml_null_id_reads_as_empty() {
        let node: serde_yaml::Value = serde_yaml::from_str("id: ~
grasp_quality: 0.2").unwrap();
        let grasp = Grasp::from_yaml(&node).unwrap();
        assert!(grasp.id.is_empty());
    }

    #[test]
    fn from_yaml_rejects_scalar_node() {
        let node = serde_yaml::Value::String("not a grasp".to_string());
        assert!(matches!(
            Grasp::from_yaml(&node),
            Err(StashError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn yaml_node_roundtrip() {
        let mut grasp = Grasp::new("g1");
        grasp.set_pre_grasp_point(&positions(&[("J1", 0.0), ("J2", 0.3)]), 0);
        grasp.allowed_touch_objects.push("table".to_string());
        let node = grasp.to_yaml().unwrap();
        assert!(node.get("pre_grasp_posture").is_some());
        assert!(node.get("grasp_quality").is_some());
        assert_eq!(Grasp::from_yaml(&node).unwrap(), grasp);
    }
}
