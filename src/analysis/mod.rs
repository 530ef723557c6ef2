//! Analysis options and the linear static pipeline

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::assembly::{assemble, GlobalSystem};
use crate::constraints::{apply_restraints, ConstrainedSystem};
use crate::dof::{DofMap, DOFS_PER_JOINT};
use crate::elements::Joint;
use crate::error::{FrameError, FrameResult};
use crate::math::{Mat, SolveSettings, SparseMatrix, SystemMatrix, Vec as FrameVec};
use crate::model::FrameModel;
use crate::results::{restrained_joint_reactions, AnalysisReport, AnalysisResults, SystemMatrices};
use crate::solver;

/// Options for structural analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Always use the sparse backend
    pub sparse: bool,
    /// Switch to the sparse backend above this many DOFs
    pub sparse_threshold: usize,
    /// Relative Cholesky pivot below which the system counts as singular
    pub pivot_tolerance: f64,
    /// Check static equilibrium after analysis
    pub check_statics: bool,
    /// Allowed imbalance, relative to the summed load and reaction magnitudes
    pub statics_tolerance: f64,
    /// Reorder the sparse system with Reverse Cuthill-McKee before factorizing
    pub reorder: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            sparse: false,
            sparse_threshold: 600,
            pivot_tolerance: 1e-12,
            check_statics: true,
            statics_tolerance: 1e-6,
            reorder: true,
        }
    }
}

impl AnalysisOptions {
    /// Create options for a dense linear analysis
    pub fn linear() -> Self {
        Self::default()
    }

    /// Create options that force the sparse backend
    pub fn sparse() -> Self {
        Self {
            sparse: true,
            ..Self::default()
        }
    }

    /// Set the DOF count above which the sparse backend is chosen
    pub fn with_sparse_threshold(mut self, dofs: usize) -> Self {
        self.sparse_threshold = dofs;
        self
    }

    /// Set the singular pivot tolerance
    pub fn with_pivot_tolerance(mut self, tol: f64) -> Self {
        self.pivot_tolerance = tol;
        self
    }

    /// Enable or disable the statics check
    pub fn with_statics_check(mut self, enabled: bool) -> Self {
        self.check_statics = enabled;
        self
    }

    /// Set the statics tolerance
    pub fn with_statics_tolerance(mut self, tol: f64) -> Self {
        self.statics_tolerance = tol;
        self
    }

    /// Enable or disable bandwidth reordering
    pub fn with_reorder(mut self, enabled: bool) -> Self {
        self.reorder = enabled;
        self
    }

    /// Settings handed to the matrix backend
    pub fn solve_settings(&self) -> SolveSettings {
        SolveSettings {
            pivot_tolerance: self.pivot_tolerance,
            reorder: self.reorder,
        }
    }

    /// Whether a system of `dof_count` DOFs should use the sparse backend
    pub fn use_sparse(&self, dof_count: usize) -> bool {
        self.sparse || dof_count > self.sparse_threshold
    }

    fn validate(&self) -> FrameResult<()> {
        if !(self.pivot_tolerance.is_finite() && self.pivot_tolerance >= 0.0) {
            return Err(FrameError::InvalidInput(format!(
                "pivot tolerance must be a non-negative number, got {}",
                self.pivot_tolerance
            )));
        }
        if !(self.statics_tolerance.is_finite() && self.statics_tolerance > 0.0) {
            return Err(FrameError::InvalidInput(format!(
                "statics tolerance must be positive, got {}",
                self.statics_tolerance
            )));
        }
        Ok(())
    }
}

/// Validate a model snapshot and build its assembled and constrained systems
/// without solving
pub fn prepare<M: SystemMatrix>(
    model: &FrameModel,
) -> FrameResult<(DofMap, GlobalSystem<M>, ConstrainedSystem<M>)> {
    if model.joints.is_empty() {
        return Err(FrameError::InvalidInput("the model has no joints".to_string()));
    }
    model.validate()?;

    let dof_map = DofMap::new(&model.joints)?;
    log::debug!(
        "revision {}: {} joints, {} DOFs",
        model.revision,
        dof_map.num_joints(),
        dof_map.total_dofs()
    );

    let global = assemble::<M>(&model.joints, &model.elements, &model.loads, &dof_map)?;
    let constrained = apply_restraints(&global, &model.restraints, &dof_map)?;
    Ok((dof_map, global, constrained))
}

/// Run a linear static analysis on one model snapshot.
///
/// Any failing stage aborts the run, so either complete results or an error
/// come back.
pub fn run<M: SystemMatrix>(
    model: &FrameModel,
    options: &AnalysisOptions,
) -> FrameResult<AnalysisResults<M>> {
    options.validate()?;
    let (dof_map, global, constrained) = prepare::<M>(model)?;

    let displacements = solver::solve(&constrained, &options.solve_settings())?;
    let reaction_vector = solver::recover_reactions(&global, &displacements, &constrained.fixed);

    let joints: HashMap<&str, &Joint> = model.joints.iter().map(|j| (j.id.as_str(), j)).collect();
    let mut member_forces = BTreeMap::new();
    for element in &model.elements {
        // validate() guarantees both ends exist
        let (Some(from), Some(to)) = (joints.get(element.from.as_str()), joints.get(element.to.as_str())) else {
            return Err(FrameError::UnknownJoint(element.from.clone()));
        };
        let f = solver::member_end_forces(element, from, to, &displacements, &dof_map)?;
        member_forces.insert(element.id.clone(), std::array::from_fn(|i| f[i]));
    }

    let equilibrium_residual = if options.check_statics {
        let (residual, scale) = statics_residual(&model.joints, &global.loads, &reaction_vector);
        if residual > options.statics_tolerance * scale {
            log::warn!(
                "revision {}: loads and reactions are out of balance by {:e} (scale {:e})",
                model.revision,
                residual,
                scale
            );
        }
        residual
    } else {
        0.0
    };

    let joint_reactions = restrained_joint_reactions(&dof_map, &reaction_vector, &constrained.fixed);
    let mut results = AnalysisResults {
        revision: model.revision,
        dof_map,
        stiffness: global.stiffness,
        loads: global.loads,
        constrained_stiffness: constrained.stiffness,
        constrained_loads: constrained.loads,
        displacements,
        reaction_vector,
        fixed: constrained.fixed,
        joint_reactions,
        member_forces,
        summary: Default::default(),
    };
    results.build_summary(model.elements.len(), equilibrium_residual);

    log::info!(
        "revision {}: analysed {} DOFs, max displacement {:e} at '{}'",
        results.revision,
        results.summary().total_dofs,
        results.summary().max_displacement,
        results.summary().max_disp_joint
    );
    Ok(results)
}

/// Analyse with the backend `options` selects for the model size and return
/// the serializable report
pub fn analyze_to_report(
    model: &FrameModel,
    options: &AnalysisOptions,
    include_matrices: bool,
) -> FrameResult<AnalysisReport> {
    let dofs = model.joints.len() * DOFS_PER_JOINT;
    if options.use_sparse(dofs) {
        Ok(run::<SparseMatrix>(model, options)?.to_report(include_matrices))
    } else {
        Ok(run::<Mat>(model, options)?.to_report(include_matrices))
    }
}

/// Labelled `K`, `F`, `K'`, `F'` of a model without solving. Works for
/// models that are not yet restrained.
pub fn system_matrices(model: &FrameModel) -> FrameResult<SystemMatrices> {
    let (dof_map, global, constrained) = prepare::<Mat>(model)?;
    Ok(SystemMatrices::from_systems(&dof_map, &global, &constrained))
}

/// Net force and moment (about the global origin) of loads plus reactions.
///
/// Returns the largest of the six components together with the summed
/// magnitude of every contribution, against which it is judged.
fn statics_residual(joints: &[Joint], loads: &FrameVec, reactions: &FrameVec) -> (f64, f64) {
    let mut net = [0.0; 6];
    let mut scale = 1.0_f64;

    for (i, joint) in joints.iter().enumerate() {
        let base = i * DOFS_PER_JOINT;
        let w: [f64; 6] = std::array::from_fn(|d| loads[base + d] + reactions[base + d]);
        let [x, y, z] = joint.coords();

        let wrench = [
            w[0],
            w[1],
            w[2],
            w[3] + y * w[2] - z * w[1],
            w[4] + z * w[0] - x * w[2],
            w[5] + x * w[1] - y * w[0],
        ];
        for d in 0..6 {
            net[d] += wrench[d];
        }

        let magnitude: f64 = (0..DOFS_PER_JOINT)
            .map(|d| loads[base + d].abs() + reactions[base + d].abs())
            .sum();
        scale += magnitude * (1.0 + x.abs() + y.abs() + z.abs());
    }

    let residual = net.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    (residual, scale)
}
