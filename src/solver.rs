//! Displacement solve and result recovery

use crate::assembly::GlobalSystem;
use crate::constraints::ConstrainedSystem;
use crate::dof::DofMap;
use crate::elements::{Element, Joint};
use crate::error::{FrameError, FrameResult};
use crate::math::{SolveSettings, SystemMatrix, Vec as FrameVec, Vec12};

/// Solve `K' U = F'` for the global displacements.
///
/// Restrained DOFs come back as exactly zero. A constrained matrix that is
/// not positive definite (rigid-body modes left, or a joint connected to
/// nothing) is reported as `SingularSystem`; no zero vector is returned in
/// its place.
pub fn solve<M: SystemMatrix>(
    system: &ConstrainedSystem<M>,
    settings: &SolveSettings,
) -> FrameResult<FrameVec> {
    let n = system.loads.len();
    if n == 0 {
        return Err(FrameError::InvalidInput("the model has no joints".to_string()));
    }
    if let Some(d) = system.loads.iter().position(|v| !v.is_finite()) {
        return Err(FrameError::InvalidInput(format!(
            "load vector is not finite at DOF {}",
            d
        )));
    }

    let mut u = system.stiffness.solve(&system.loads, settings)?;

    // F' is zero there, clear the round-off
    for d in system.restrained_dofs() {
        u[d] = 0.0;
    }

    log::debug!(
        "solved {} DOFs ({} free), max |u| = {:e}",
        n,
        system.free_dofs(),
        u.amax()
    );
    Ok(u)
}

/// Support reactions `R = K U - F`, kept at restrained DOFs and zero
/// elsewhere. `K` and `F` must be the unconstrained originals.
pub fn recover_reactions<M: SystemMatrix>(
    system: &GlobalSystem<M>,
    displacements: &FrameVec,
    fixed: &[bool],
) -> FrameVec {
    let residual = system.stiffness.mul_vector(displacements) - &system.loads;

    FrameVec::from_iterator(
        residual.len(),
        residual
            .iter()
            .zip(fixed)
            .map(|(r, &is_fixed)| if is_fixed { *r } else { 0.0 }),
    )
}

/// Local end forces of one element, `k_local * T * u_element`.
///
/// Order is `[N, Vy, Vz, T, My, Mz]` at `from`, then the same at `to`,
/// acting on the element in its local axes.
pub fn member_end_forces(
    element: &Element,
    from: &Joint,
    to: &Joint,
    displacements: &FrameVec,
    dof_map: &DofMap,
) -> FrameResult<Vec12> {
    let dofs = dof_map.element_dofs(element)?;
    let u_global = Vec12::from_fn(|i, _| displacements[dofs[i]]);

    let k_local = element.local_stiffness(from, to)?;
    let t = element.transformation(from, to)?;

    Ok(k_local * (t * u_global))
}
