//! Global degree-of-freedom numbering
//!
//! Joint `i` of the canonical ordering owns the global rows
//! `[6i, 6i + 6)` in DOF order `[Ux, Uy, Uz, θx, θy, θz]`. The map is built
//! once per model snapshot and shared by assembly, restraint enforcement
//! and result recovery, so `K`, `F` and `U` always agree.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::elements::{Element, Joint};
use crate::error::{FrameError, FrameResult};

/// Degrees of freedom per joint
pub const DOFS_PER_JOINT: usize = 6;

/// Names of the six joint DOFs, in global order
pub const DOF_NAMES: [&str; DOFS_PER_JOINT] = ["Ux", "Uy", "Uz", "Rx", "Ry", "Rz"];

/// Joint id -> position table for one analysis run.
///
/// Serializes as the plain list of joint ids; the lookup table is rebuilt
/// when it is read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct DofMap {
    order: Vec<String>,
    index: HashMap<String, usize>,
}

impl DofMap {
    /// Number the joints in the order given.
    ///
    /// Fails with `DuplicateId` if two joints share an id.
    pub fn new(joints: &[Joint]) -> FrameResult<Self> {
        Self::from_ids(joints.iter().map(|j| j.id.clone()).collect())
    }

    fn from_ids(order: Vec<String>) -> FrameResult<Self> {
        let mut index = HashMap::with_capacity(order.len());
        for (i, id) in order.iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(FrameError::DuplicateId(id.clone()));
            }
        }
        Ok(Self { order, index })
    }

    /// Number of joints
    pub fn num_joints(&self) -> usize {
        self.order.len()
    }

    /// Size of the global system
    pub fn total_dofs(&self) -> usize {
        self.order.len() * DOFS_PER_JOINT
    }

    /// Joint ids in DOF order
    pub fn joint_ids(&self) -> &[String] {
        &self.order
    }

    /// Position of a joint in the canonical ordering
    pub fn joint_index(&self, joint_id: &str) -> FrameResult<usize> {
        self.index
            .get(joint_id)
            .copied()
            .ok_or_else(|| FrameError::UnknownJoint(joint_id.to_string()))
    }

    /// First global DOF of a joint
    pub fn base_dof(&self, joint_id: &str) -> FrameResult<usize> {
        Ok(self.joint_index(joint_id)? * DOFS_PER_JOINT)
    }

    /// The six global DOF indices of a joint
    pub fn joint_dofs(&self, joint_id: &str) -> FrameResult<[usize; DOFS_PER_JOINT]> {
        let base = self.base_dof(joint_id)?;
        Ok(std::array::from_fn(|i| base + i))
    }

    /// The twelve global DOF indices of an element: `from` first, then `to`
    pub fn element_dofs(&self, element: &Element) -> FrameResult<[usize; 2 * DOFS_PER_JOINT]> {
        let i_base = self.base_dof(&element.from)?;
        let j_base = self.base_dof(&element.to)?;
        Ok(std::array::from_fn(|i| {
            if i < DOFS_PER_JOINT {
                i_base + i
            } else {
                j_base + i - DOFS_PER_JOINT
            }
        }))
    }

    /// Human-readable label of a global DOF, e.g. `N3.Uy`
    pub fn dof_label(&self, dof: usize) -> Option<String> {
        let joint = self.order.get(dof / DOFS_PER_JOINT)?;
        Some(format!("{}.{}", joint, DOF_NAMES[dof % DOFS_PER_JOINT]))
    }

    /// Labels of every global DOF
    pub fn dof_labels(&self) -> Vec<String> {
        (0..self.total_dofs()).filter_map(|d| self.dof_label(d)).collect()
    }
}

impl TryFrom<Vec<String>> for DofMap {
    type Error = FrameError;

    fn try_from(order: Vec<String>) -> FrameResult<Self> {
        Self::from_ids(order)
    }
}

impl From<DofMap> for Vec<String> {
    fn from(map: DofMap) -> Self {
        map.order
    }
}

/// The six global DOF indices of `joint_id`, by its position in `joints`.
///
/// Fails with `UnknownJoint` if the joint is absent.
pub fn joint_dof_indices(joint_id: &str, joints: &[Joint]) -> FrameResult<[usize; DOFS_PER_JOINT]> {
    let position = joints
        .iter()
        .position(|j| j.id == joint_id)
        .ok_or_else(|| FrameError::UnknownJoint(joint_id.to_string()))?;

    Ok(std::array::from_fn(|i| position * DOFS_PER_JOINT + i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joints() -> Vec<Joint> {
        vec![
            Joint::new("A", 0.0, 0.0, 0.0),
            Joint::new("B", 1.0, 0.0, 0.0),
            Joint::new("C", 1.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_joint_dofs() {
        let map = DofMap::new(&joints()).unwrap();
        assert_eq!(map.total_dofs(), 18);
        assert_eq!(map.joint_dofs("B").unwrap(), [6, 7, 8, 9, 10, 11]);
        assert_eq!(joint_dof_indices("C", &joints()).unwrap(), map.joint_dofs("C").unwrap());
    }

    #[test]
    fn test_element_dofs_from_then_to() {
        let map = DofMap::new(&joints()).unwrap();
        let el = Element::from_properties("M1", "C", "A", 1.0, 1.0, 1.0, 1.0, 1.0, 1.0);

        let dofs = map.element_dofs(&el).unwrap();
        assert_eq!(&dofs[..6], &[12, 13, 14, 15, 16, 17]);
        assert_eq!(&dofs[6..], &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_joint() {
        let map = DofMap::new(&joints()).unwrap();
        assert!(matches!(map.joint_dofs("Z"), Err(FrameError::UnknownJoint(id)) if id == "Z"));
        assert!(matches!(joint_dof_indices("Z", &joints()), Err(FrameError::UnknownJoint(_))));
    }

    #[test]
    fn test_duplicate_joint() {
        let mut js = joints();
        js.push(Joint::new("A", 5.0, 5.0, 5.0));
        assert!(matches!(DofMap::new(&js), Err(FrameError::DuplicateId(_))));
    }

    #[test]
    fn test_labels() {
        let map = DofMap::new(&joints()).unwrap();
        assert_eq!(map.dof_label(7).as_deref(), Some("B.Uy"));
        assert_eq!(map.dof_label(18), None);
        assert_eq!(map.dof_labels().len(), 18);
    }

    #[test]
    fn test_deserialized_map_answers_lookups() {
        let map = DofMap::new(&joints()).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"["A","B","C"]"#);

        let restored: DofMap = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, map);
        assert_eq!(restored.joint_dofs("C").unwrap(), [12, 13, 14, 15, 16, 17]);

        assert!(serde_json::from_str::<DofMap>(r#"["A","A"]"#).is_err());
    }
}
