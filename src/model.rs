//! Frame model - one versioned snapshot of joints, elements, loads and
//! restraints

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::analysis::{self, AnalysisOptions};
use crate::assembly::{assemble, GlobalSystem};
use crate::dof::DofMap;
use crate::elements::{Element, Joint, Restraint};
use crate::error::{FrameError, FrameResult};
use crate::loads::JointLoad;
use crate::math::{Mat, SystemMatrix};
use crate::results::AnalysisResults;

/// The 3D frame model.
///
/// Joint order is insertion order and defines the global DOF numbering.
/// Every successful mutation bumps `revision`, and analysis results carry the
/// revision they were computed from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameModel {
    /// Joints, in DOF order
    pub joints: Vec<Joint>,
    /// Frame elements
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Joint loads
    #[serde(default)]
    pub loads: Vec<JointLoad>,
    /// Restraints by joint id; a joint without an entry is free
    #[serde(default)]
    pub restraints: BTreeMap<String, Restraint>,
    /// Mutation counter
    #[serde(default)]
    pub revision: u64,
}

impl FrameModel {
    /// Create a new empty model
    pub fn new() -> Self {
        Self::default()
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add a joint to the model
    pub fn add_joint(&mut self, joint: Joint) -> FrameResult<()> {
        if self.joint(&joint.id).is_some() {
            return Err(FrameError::DuplicateId(joint.id));
        }
        if joint.coords().iter().any(|c| !c.is_finite()) {
            return Err(FrameError::InvalidInput(format!(
                "joint '{}' has non-finite coordinates",
                joint.id
            )));
        }

        self.joints.push(joint);
        self.touch();
        Ok(())
    }

    /// Add an element between two existing joints
    pub fn add_element(&mut self, element: Element) -> FrameResult<()> {
        if self.element(&element.id).is_some() {
            return Err(FrameError::DuplicateId(element.id));
        }
        self.check_element(&element)?;

        self.elements.push(element);
        self.touch();
        Ok(())
    }

    /// Add a load at an existing joint
    pub fn add_load(&mut self, load: JointLoad) -> FrameResult<()> {
        if self.loads.iter().any(|l| l.id == load.id) {
            return Err(FrameError::DuplicateId(load.id));
        }
        self.require_joint(&load.joint)?;

        self.loads.push(load);
        self.touch();
        Ok(())
    }

    /// Set the restraint of a joint, replacing any previous one
    pub fn set_restraint(&mut self, joint_id: &str, restraint: Restraint) -> FrameResult<Option<Restraint>> {
        self.require_joint(joint_id)?;

        let previous = self.restraints.insert(joint_id.to_string(), restraint);
        self.touch();
        Ok(previous)
    }

    /// Remove the restraint of a joint, leaving it free
    pub fn remove_restraint(&mut self, joint_id: &str) -> Option<Restraint> {
        let removed = self.restraints.remove(joint_id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Remove a load
    pub fn remove_load(&mut self, load_id: &str) -> FrameResult<JointLoad> {
        let pos = self
            .loads
            .iter()
            .position(|l| l.id == load_id)
            .ok_or_else(|| FrameError::UnknownLoad(load_id.to_string()))?;

        self.touch();
        Ok(self.loads.remove(pos))
    }

    /// Remove an element
    pub fn remove_element(&mut self, element_id: &str) -> FrameResult<Element> {
        let pos = self
            .elements
            .iter()
            .position(|e| e.id == element_id)
            .ok_or_else(|| FrameError::UnknownElement(element_id.to_string()))?;

        self.touch();
        Ok(self.elements.remove(pos))
    }

    /// Remove a joint nothing refers to any more
    pub fn remove_joint(&mut self, joint_id: &str) -> FrameResult<Joint> {
        let pos = self
            .joints
            .iter()
            .position(|j| j.id == joint_id)
            .ok_or_else(|| FrameError::UnknownJoint(joint_id.to_string()))?;

        if let Some(referenced_by) = self.first_reference(joint_id) {
            return Err(FrameError::JointInUse {
                joint: joint_id.to_string(),
                referenced_by,
            });
        }

        self.touch();
        Ok(self.joints.remove(pos))
    }

    // ========================
    // Lookup
    // ========================

    /// Find a joint by id
    pub fn joint(&self, joint_id: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.id == joint_id)
    }

    /// Find an element by id
    pub fn element(&self, element_id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == element_id)
    }

    /// Total number of DOFs
    pub fn total_dofs(&self) -> usize {
        self.joints.len() * crate::dof::DOFS_PER_JOINT
    }

    /// Re-check the invariants the mutators enforce. Needed for models that
    /// arrive deserialized.
    pub fn validate(&self) -> FrameResult<()> {
        let mut seen = HashSet::new();
        for joint in &self.joints {
            if !seen.insert(joint.id.as_str()) {
                return Err(FrameError::DuplicateId(joint.id.clone()));
            }
            if joint.coords().iter().any(|c| !c.is_finite()) {
                return Err(FrameError::InvalidInput(format!(
                    "joint '{}' has non-finite coordinates",
                    joint.id
                )));
            }
        }

        let mut seen = HashSet::new();
        for element in &self.elements {
            if !seen.insert(element.id.as_str()) {
                return Err(FrameError::DuplicateId(element.id.clone()));
            }
            self.check_element(element)?;
        }

        let mut seen = HashSet::new();
        for load in &self.loads {
            if !seen.insert(load.id.as_str()) {
                return Err(FrameError::DuplicateId(load.id.clone()));
            }
            self.require_joint(&load.joint)?;
        }

        for joint_id in self.restraints.keys() {
            self.require_joint(joint_id)?;
        }

        Ok(())
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Run a dense linear static analysis with default options
    pub fn analyze(&self) -> FrameResult<AnalysisResults<Mat>> {
        self.analyze_with(&AnalysisOptions::default())
    }

    /// Run an analysis with the given matrix backend and options
    pub fn analyze_with<M: SystemMatrix>(&self, options: &AnalysisOptions) -> FrameResult<AnalysisResults<M>> {
        analysis::run::<M>(self, options)
    }

    /// Assemble the unconstrained `K` and `F` only
    pub fn global_system<M: SystemMatrix>(&self) -> FrameResult<GlobalSystem<M>> {
        self.validate()?;
        let dof_map = DofMap::new(&self.joints)?;
        assemble(&self.joints, &self.elements, &self.loads, &dof_map)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn require_joint(&self, joint_id: &str) -> FrameResult<&Joint> {
        self.joint(joint_id)
            .ok_or_else(|| FrameError::UnknownJoint(joint_id.to_string()))
    }

    fn check_element(&self, element: &Element) -> FrameResult<()> {
        self.require_joint(&element.from)?;
        self.require_joint(&element.to)?;
        if element.from == element.to {
            return Err(FrameError::DegenerateGeometry(format!(
                "element '{}' starts and ends at joint '{}'",
                element.id, element.from
            )));
        }
        Ok(())
    }

    fn first_reference(&self, joint_id: &str) -> Option<String> {
        if let Some(e) = self.elements.iter().find(|e| e.from == joint_id || e.to == joint_id) {
            return Some(format!("element '{}'", e.id));
        }
        if let Some(l) = self.loads.iter().find(|l| l.joint == joint_id) {
            return Some(format!("load '{}'", l.id));
        }
        self.restraints
            .contains_key(joint_id)
            .then(|| "a restraint".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Material, Section};

    fn two_joints() -> FrameModel {
        let mut model = FrameModel::new();
        model.add_joint(Joint::new("N1", 0.0, 0.0, 0.0)).unwrap();
        model.add_joint(Joint::new("N2", 4.0, 0.0, 0.0)).unwrap();
        model
    }

    fn member(id: &str, from: &str, to: &str) -> Element {
        Element::new(id, from, to, &Material::steel(), &Section::rectangular(0.2, 0.4))
    }

    #[test]
    fn test_revision_bumps() {
        let mut model = two_joints();
        assert_eq!(model.revision, 2);

        model.add_element(member("M1", "N1", "N2")).unwrap();
        model.set_restraint("N1", Restraint::fixed()).unwrap();
        assert_eq!(model.revision, 4);

        // failed mutations leave the revision alone
        assert!(model.add_joint(Joint::new("N1", 9.0, 9.0, 9.0)).is_err());
        assert_eq!(model.remove_restraint("N2"), None);
        assert_eq!(model.revision, 4);
    }

    #[test]
    fn test_element_checks() {
        let mut model = two_joints();

        let err = model.add_element(member("M1", "N1", "N3")).unwrap_err();
        assert!(matches!(err, FrameError::UnknownJoint(id) if id == "N3"));

        let err = model.add_element(member("M1", "N1", "N1")).unwrap_err();
        assert!(matches!(err, FrameError::DegenerateGeometry(_)));

        model.add_element(member("M1", "N1", "N2")).unwrap();
        let err = model.add_element(member("M1", "N2", "N1")).unwrap_err();
        assert!(matches!(err, FrameError::DuplicateId(_)));
    }

    #[test]
    fn test_restraint_replaces() {
        let mut model = two_joints();
        assert_eq!(model.set_restraint("N1", Restraint::pinned()).unwrap(), None);
        assert_eq!(
            model.set_restraint("N1", Restraint::fixed()).unwrap(),
            Some(Restraint::pinned())
        );
        assert_eq!(model.restraints.len(), 1);
        assert!(model.set_restraint("N5", Restraint::fixed()).is_err());
    }

    #[test]
    fn test_remove_joint_in_use() {
        let mut model = two_joints();
        model.add_element(member("M1", "N1", "N2")).unwrap();
        model.add_load(JointLoad::force("L1", "N2", 0.0, -1.0, 0.0)).unwrap();

        let err = model.remove_joint("N2").unwrap_err();
        assert!(matches!(err, FrameError::JointInUse { .. }));

        model.remove_element("M1").unwrap();
        let err = model.remove_joint("N2").unwrap_err();
        assert!(matches!(err, FrameError::JointInUse { referenced_by, .. } if referenced_by == "load 'L1'"));

        model.remove_load("L1").unwrap();
        assert_eq!(model.remove_joint("N2").unwrap().id, "N2");
        assert!(matches!(model.remove_joint("N2"), Err(FrameError::UnknownJoint(_))));
    }

    #[test]
    fn test_remove_unknown() {
        let mut model = two_joints();
        assert!(matches!(model.remove_load("L9"), Err(FrameError::UnknownLoad(_))));
        assert!(matches!(model.remove_element("M9"), Err(FrameError::UnknownElement(_))));
    }

    #[test]
    fn test_validate_deserialized() {
        let json = r#"{
            "joints": [{"id": "N1", "x": 0, "y": 0, "z": 0}],
            "elements": [{"id": "M1", "from": "N1", "to": "N2",
                          "e": 1, "g": 1, "a": 1, "iy": 1, "iz": 1, "j": 1}]
        }"#;
        let model: FrameModel = serde_json::from_str(json).unwrap();
        assert!(matches!(model.validate(), Err(FrameError::UnknownJoint(id)) if id == "N2"));
    }

    #[test]
    fn test_global_system_unrestrained() {
        let mut model = two_joints();
        model.add_element(member("M1", "N1", "N2")).unwrap();

        let sys: GlobalSystem<Mat> = model.global_system().unwrap();
        assert_eq!(sys.size(), 12);
        assert!(sys.stiffness[(0, 0)] > 0.0);
    }
}
