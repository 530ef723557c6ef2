//! Restraint enforcement by row/column elimination

use std::collections::BTreeMap;

use crate::assembly::GlobalSystem;
use crate::dof::DofMap;
use crate::elements::Restraint;
use crate::error::FrameResult;
use crate::math::{SystemMatrix, Vec as FrameVec};

/// The system after restraints have been applied, `K'`, `F'`
#[derive(Debug, Clone)]
pub struct ConstrainedSystem<M> {
    /// Constrained stiffness matrix
    pub stiffness: M,
    /// Constrained load vector
    pub loads: FrameVec,
    /// `fixed[d]` is true when global DOF `d` is restrained
    pub fixed: Vec<bool>,
}

impl<M> ConstrainedSystem<M> {
    /// Global indices of the restrained DOFs, ascending
    pub fn restrained_dofs(&self) -> Vec<usize> {
        (0..self.fixed.len()).filter(|&d| self.fixed[d]).collect()
    }

    /// Number of unknown displacements
    pub fn free_dofs(&self) -> usize {
        self.fixed.iter().filter(|f| !**f).count()
    }
}

/// Apply zero-displacement restraints to a copy of `system`.
///
/// Every restrained DOF gets a zero row and column with a unit diagonal in
/// `K'` and a zero entry in `F'`. The input system is left untouched so that
/// reactions can be recovered from the original `K` and `F`. With no
/// restraints `K'` and `F'` equal `K` and `F`.
pub fn apply_restraints<M: SystemMatrix>(
    system: &GlobalSystem<M>,
    restraints: &BTreeMap<String, Restraint>,
    dof_map: &DofMap,
) -> FrameResult<ConstrainedSystem<M>> {
    let mut fixed = vec![false; dof_map.total_dofs()];
    for (joint_id, restraint) in restraints {
        let base = dof_map.base_dof(joint_id)?;
        for dof in restraint.restrained_dofs() {
            fixed[base + dof] = true;
        }
    }

    let mut stiffness = system.stiffness.clone();
    let mut loads = system.loads.clone();

    stiffness.constrain(&fixed);
    for (d, _) in fixed.iter().enumerate().filter(|(_, f)| **f) {
        loads[d] = 0.0;
    }

    let constrained = ConstrainedSystem {
        stiffness,
        loads,
        fixed,
    };
    log::debug!(
        "restrained {} of {} DOFs",
        constrained.fixed.len() - constrained.free_dofs(),
        constrained.fixed.len()
    );

    Ok(constrained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::assemble;
    use crate::elements::{Element, Joint};
    use crate::error::FrameError;
    use crate::loads::JointLoad;
    use crate::math::{Mat, SparseMatrix};

    fn system<M: SystemMatrix>() -> (GlobalSystem<M>, DofMap) {
        let joints = vec![
            Joint::new("N1", 0.0, 0.0, 0.0),
            Joint::new("N2", 4.0, 0.0, 0.0),
        ];
        let map = DofMap::new(&joints).unwrap();
        let el = Element::from_properties("M1", "N1", "N2", 200e9, 77e9, 0.01, 1e-4, 2e-4, 1e-5);
        let loads = vec![
            JointLoad::force("L1", "N1", 5.0, 5.0, 5.0),
            JointLoad::force("L2", "N2", 0.0, -10.0, 0.0),
        ];
        (assemble(&joints, &[el], &loads, &map).unwrap(), map)
    }

    #[test]
    fn test_restrained_rows_and_columns() {
        let (sys, map) = system::<Mat>();
        let mut restraints = BTreeMap::new();
        restraints.insert("N1".to_string(), Restraint::pinned());

        let c = apply_restraints(&sys, &restraints, &map).unwrap();
        assert_eq!(c.restrained_dofs(), vec![0, 1, 2]);
        assert_eq!(c.free_dofs(), 9);

        for d in 0..3 {
            assert_eq!(c.loads[d], 0.0);
            for i in 0..12 {
                let expected = if i == d { 1.0 } else { 0.0 };
                assert_eq!(c.stiffness[(d, i)], expected);
                assert_eq!(c.stiffness[(i, d)], expected);
            }
        }

        // free DOFs keep their terms
        assert_eq!(c.stiffness[(7, 7)], sys.stiffness[(7, 7)]);
        assert_eq!(c.stiffness[(3, 3)], sys.stiffness[(3, 3)]);
        assert_eq!(c.loads[7], -10.0);
    }

    #[test]
    fn test_original_system_unchanged() {
        let (sys, map) = system::<Mat>();
        let before = sys.stiffness.clone();
        let mut restraints = BTreeMap::new();
        restraints.insert("N2".to_string(), Restraint::fixed());

        apply_restraints(&sys, &restraints, &map).unwrap();
        assert_eq!(sys.stiffness, before);
        assert_eq!(sys.loads[7], -10.0);
    }

    #[test]
    fn test_no_restraints_is_identity() {
        let (sys, map) = system::<Mat>();
        let c = apply_restraints(&sys, &BTreeMap::new(), &map).unwrap();
        assert_eq!(c.stiffness, sys.stiffness);
        assert_eq!(c.loads, sys.loads);
        assert!(c.restrained_dofs().is_empty());
    }

    #[test]
    fn test_sparse_restraints() {
        let (sys, map) = system::<SparseMatrix>();
        let mut restraints = BTreeMap::new();
        restraints.insert("N1".to_string(), Restraint::fixed());

        let c = apply_restraints(&sys, &restraints, &map).unwrap();
        assert_eq!(c.stiffness.get(4, 4), 1.0);
        assert_eq!(c.stiffness.get(1, 7), 0.0);
        assert_eq!(c.stiffness.get(7, 1), 0.0);
        assert_eq!(c.stiffness.get(7, 7), sys.stiffness.get(7, 7));
    }

    #[test]
    fn test_restraint_on_unknown_joint() {
        let (sys, map) = system::<Mat>();
        let mut restraints = BTreeMap::new();
        restraints.insert("N7".to_string(), Restraint::fixed());

        let err = apply_restraints(&sys, &restraints, &map).unwrap_err();
        assert!(matches!(err, FrameError::UnknownJoint(_)));
    }
}
