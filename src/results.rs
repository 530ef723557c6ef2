//! Result types for frame analysis

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assembly::GlobalSystem;
use crate::constraints::ConstrainedSystem;
use crate::dof::{DofMap, DOFS_PER_JOINT};
use crate::error::{FrameError, FrameResult};
use crate::math::{Mat, SystemMatrix, Vec as FrameVec};

/// Displacement results at a joint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        let [dx, dy, dz, rx, ry, rz] = arr;
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
        }
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Get rotation magnitude
    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }
}

/// Reaction forces at a restrained joint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reactions {
    /// Reaction force in X direction
    pub fx: f64,
    /// Reaction force in Y direction
    pub fy: f64,
    /// Reaction force in Z direction
    pub fz: f64,
    /// Reaction moment about X axis
    pub mx: f64,
    /// Reaction moment about Y axis
    pub my: f64,
    /// Reaction moment about Z axis
    pub mz: f64,
}

impl Reactions {
    /// Create from array [FX, FY, FZ, MX, MY, MZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        let [fx, fy, fz, mx, my, mz] = arr;
        Self {
            fx,
            fy,
            fz,
            mx,
            my,
            mz,
        }
    }

    /// Get total force magnitude
    pub fn force_magnitude(&self) -> f64 {
        (self.fx.powi(2) + self.fy.powi(2) + self.fz.powi(2)).sqrt()
    }

    /// Get total moment magnitude
    pub fn moment_magnitude(&self) -> f64 {
        (self.mx.powi(2) + self.my.powi(2) + self.mz.powi(2)).sqrt()
    }
}

/// Internal forces at one end of an element, in its local axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberForces {
    /// Axial force (positive = tension)
    pub axial: f64,
    /// Shear force in local y direction
    pub shear_y: f64,
    /// Shear force in local z direction
    pub shear_z: f64,
    /// Torsion
    pub torsion: f64,
    /// Bending moment about local y axis
    pub moment_y: f64,
    /// Bending moment about local z axis
    pub moment_z: f64,
}

impl MemberForces {
    /// Create from local force array at the `from` end
    pub fn from_i_node_forces(forces: &[f64; 12]) -> Self {
        Self {
            axial: -forces[0],
            shear_y: forces[1],
            shear_z: forces[2],
            torsion: -forces[3],
            moment_y: forces[4],
            moment_z: forces[5],
        }
    }

    /// Create from local force array at the `to` end
    pub fn from_j_node_forces(forces: &[f64; 12]) -> Self {
        Self {
            axial: forces[6],
            shear_y: -forces[7],
            shear_z: -forces[8],
            torsion: forces[9],
            moment_y: forces[10],
            moment_z: forces[11],
        }
    }
}

/// Summary of analysis results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Maximum translation magnitude
    pub max_displacement: f64,
    /// Joint with maximum displacement
    pub max_disp_joint: String,
    /// Maximum reaction force magnitude
    pub max_reaction: f64,
    /// Joint with maximum reaction
    pub max_reaction_joint: String,
    /// Maximum element axial force
    pub max_axial: f64,
    /// Element with maximum axial
    pub max_axial_element: String,
    /// Maximum element end moment
    pub max_moment: f64,
    /// Element with maximum moment
    pub max_moment_element: String,
    /// Total number of joints
    pub num_joints: usize,
    /// Total number of elements
    pub num_elements: usize,
    /// Total DOFs
    pub total_dofs: usize,
    /// Free DOFs (unknown)
    pub free_dofs: usize,
    /// Largest unbalanced force or moment of loads plus reactions, zero when
    /// the statics check was skipped
    pub equilibrium_residual: f64,
}

/// Everything one analysis run produced, tied to the model revision it ran on
#[derive(Debug, Clone)]
pub struct AnalysisResults<M> {
    /// Model revision the results were computed from
    pub revision: u64,
    /// DOF numbering shared by every vector and matrix below
    pub dof_map: DofMap,
    /// Unconstrained global stiffness `K`
    pub stiffness: M,
    /// Unconstrained global load vector `F`
    pub loads: FrameVec,
    /// `K'` after restraint elimination
    pub constrained_stiffness: M,
    /// `F'` after restraint elimination
    pub constrained_loads: FrameVec,
    /// Global displacements `U`
    pub displacements: FrameVec,
    /// `K U - F` at restrained DOFs, zero elsewhere
    pub reaction_vector: FrameVec,
    /// Restrained DOF mask
    pub fixed: Vec<bool>,
    /// Reactions of every restrained joint
    pub joint_reactions: BTreeMap<String, Reactions>,
    /// Local end forces of every element, `from` end then `to` end
    pub member_forces: BTreeMap<String, [f64; 12]>,
    pub(crate) summary: AnalysisSummary,
}

impl<M: SystemMatrix> AnalysisResults<M> {
    pub(crate) fn joint_slice(&self, vector: &FrameVec, joint_id: &str) -> FrameResult<[f64; 6]> {
        let base = self.dof_map.base_dof(joint_id)?;
        Ok(std::array::from_fn(|i| vector[base + i]))
    }

    /// Displacement of a joint
    pub fn node_displacement(&self, joint_id: &str) -> FrameResult<NodeDisplacement> {
        Ok(NodeDisplacement::from_array(
            self.joint_slice(&self.displacements, joint_id)?,
        ))
    }

    /// Reactions at a joint; all zero for a joint without restraints
    pub fn reactions(&self, joint_id: &str) -> FrameResult<Reactions> {
        Ok(Reactions::from_array(
            self.joint_slice(&self.reaction_vector, joint_id)?,
        ))
    }

    /// Element forces at the `from` end
    pub fn member_forces_i(&self, element_id: &str) -> FrameResult<MemberForces> {
        self.end_forces(element_id)
            .map(MemberForces::from_i_node_forces)
    }

    /// Element forces at the `to` end
    pub fn member_forces_j(&self, element_id: &str) -> FrameResult<MemberForces> {
        self.end_forces(element_id)
            .map(MemberForces::from_j_node_forces)
    }

    fn end_forces(&self, element_id: &str) -> FrameResult<&[f64; 12]> {
        self.member_forces
            .get(element_id)
            .ok_or_else(|| FrameError::UnknownElement(element_id.to_string()))
    }

    /// Peak values and counts
    pub fn summary(&self) -> &AnalysisSummary {
        &self.summary
    }

    /// Serializable view of the results. The matrices are only included on
    /// request since `K` grows with the square of the joint count.
    pub fn to_report(&self, include_matrices: bool) -> AnalysisReport {
        let displacements = self
            .dof_map
            .joint_ids()
            .iter()
            .filter_map(|id| Some((id.clone(), self.node_displacement(id).ok()?)))
            .collect();

        let member_forces = self
            .member_forces
            .iter()
            .map(|(id, f)| {
                let ends = MemberEndForces {
                    i: MemberForces::from_i_node_forces(f),
                    j: MemberForces::from_j_node_forces(f),
                    local: *f,
                };
                (id.clone(), ends)
            })
            .collect();

        let matrices = include_matrices.then(|| SystemMatrices {
            dof_labels: self.dof_map.dof_labels(),
            stiffness: rows(&self.stiffness.to_dense()),
            loads: self.loads.iter().copied().collect(),
            constrained_stiffness: rows(&self.constrained_stiffness.to_dense()),
            constrained_loads: self.constrained_loads.iter().copied().collect(),
        });

        AnalysisReport {
            revision: self.revision,
            displacements,
            reactions: self.joint_reactions.clone(),
            member_forces,
            summary: self.summary.clone(),
            matrices,
        }
    }

    pub(crate) fn build_summary(&mut self, num_elements: usize, equilibrium_residual: f64) {
        let mut summary = AnalysisSummary {
            num_joints: self.dof_map.num_joints(),
            num_elements,
            total_dofs: self.dof_map.total_dofs(),
            free_dofs: self.fixed.iter().filter(|f| !**f).count(),
            equilibrium_residual,
            ..Default::default()
        };

        for id in self.dof_map.joint_ids() {
            if let Ok(disp) = self.node_displacement(id) {
                let mag = disp.translation_magnitude();
                if mag > summary.max_displacement {
                    summary.max_displacement = mag;
                    summary.max_disp_joint = id.clone();
                }
            }
        }

        for (id, rxn) in &self.joint_reactions {
            let mag = rxn.force_magnitude();
            if mag > summary.max_reaction {
                summary.max_reaction = mag;
                summary.max_reaction_joint = id.clone();
            }
        }

        for (id, forces) in &self.member_forces {
            let axial = forces[0].abs();
            if axial > summary.max_axial {
                summary.max_axial = axial;
                summary.max_axial_element = id.clone();
            }

            let moment = forces[4]
                .abs()
                .max(forces[5].abs())
                .max(forces[10].abs())
                .max(forces[11].abs());
            if moment > summary.max_moment {
                summary.max_moment = moment;
                summary.max_moment_element = id.clone();
            }
        }

        self.summary = summary;
    }
}

/// Collect per-joint reactions of the restrained joints from the reaction
/// vector
pub(crate) fn restrained_joint_reactions(
    dof_map: &DofMap,
    reaction_vector: &FrameVec,
    fixed: &[bool],
) -> BTreeMap<String, Reactions> {
    dof_map
        .joint_ids()
        .iter()
        .enumerate()
        .filter(|(i, _)| fixed[i * DOFS_PER_JOINT..(i + 1) * DOFS_PER_JOINT].contains(&true))
        .map(|(i, id)| {
            let base = i * DOFS_PER_JOINT;
            let arr = std::array::from_fn(|d| reaction_vector[base + d]);
            (id.clone(), Reactions::from_array(arr))
        })
        .collect()
}

/// Forces at both ends of one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberEndForces {
    /// `from` end
    pub i: MemberForces,
    /// `to` end
    pub j: MemberForces,
    /// Raw local end-force vector
    pub local: [f64; 12],
}

/// Labelled global matrices and vectors, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMatrices {
    /// One label per DOF, e.g. `N2.Uy`
    pub dof_labels: Vec<String>,
    /// `K`
    pub stiffness: Vec<Vec<f64>>,
    /// `F`
    pub loads: Vec<f64>,
    /// `K'`
    pub constrained_stiffness: Vec<Vec<f64>>,
    /// `F'`
    pub constrained_loads: Vec<f64>,
}

impl SystemMatrices {
    /// Snapshot an assembled and constrained system
    pub fn from_systems<M: SystemMatrix>(
        dof_map: &DofMap,
        global: &GlobalSystem<M>,
        constrained: &ConstrainedSystem<M>,
    ) -> Self {
        Self {
            dof_labels: dof_map.dof_labels(),
            stiffness: rows(&global.stiffness.to_dense()),
            loads: global.loads.iter().copied().collect(),
            constrained_stiffness: rows(&constrained.stiffness.to_dense()),
            constrained_loads: constrained.loads.iter().copied().collect(),
        }
    }
}

/// Serializable analysis output, as returned over HTTP and WASM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Model revision analysed
    pub revision: u64,
    /// Displacement of every joint
    pub displacements: BTreeMap<String, NodeDisplacement>,
    /// Reactions of restrained joints
    pub reactions: BTreeMap<String, Reactions>,
    /// End forces of every element
    pub member_forces: BTreeMap<String, MemberEndForces>,
    /// Peak values
    pub summary: AnalysisSummary,
    /// `K`, `F`, `K'`, `F'` when requested
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub matrices: Option<SystemMatrices>,
}

fn rows(mat: &Mat) -> Vec<Vec<f64>> {
    mat.row_iter().map(|r| r.iter().copied().collect()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_force_sign_convention() {
        let f = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, -1.0, -2.0, -3.0, -4.0, 7.0, 8.0];

        let i = MemberForces::from_i_node_forces(&f);
        assert_eq!(i.axial, -1.0);
        assert_eq!(i.torsion, -4.0);
        assert_eq!(i.moment_z, 6.0);

        let j = MemberForces::from_j_node_forces(&f);
        assert_eq!(j.axial, -1.0);
        assert_eq!(j.shear_y, 2.0);
        assert_eq!(j.moment_y, 7.0);
    }

    #[test]
    fn test_restrained_joint_reactions() {
        let joints = vec![
            crate::elements::Joint::new("A", 0.0, 0.0, 0.0),
            crate::elements::Joint::new("B", 1.0, 0.0, 0.0),
        ];
        let map = DofMap::new(&joints).unwrap();
        let mut fixed = vec![false; 12];
        fixed[7] = true;
        let r = FrameVec::from_fn(12, |i, _| i as f64);

        let reactions = restrained_joint_reactions(&map, &r, &fixed);
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions["B"].fy, 7.0);
        assert_eq!(reactions["B"].fx, 6.0);
    }

    #[test]
    fn test_magnitudes() {
        let d = NodeDisplacement::from_array([3.0, 4.0, 0.0, 0.0, 0.0, 2.0]);
        assert_eq!(d.translation_magnitude(), 5.0);
        assert_eq!(d.rotation_magnitude(), 2.0);
        assert_eq!(Reactions::from_array([0.0, 0.0, 0.0, 0.0, 6.0, 8.0]).moment_magnitude(), 10.0);
    }
}
