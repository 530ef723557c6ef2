//! Global stiffness matrix and load vector assembly

use std::collections::HashMap;

use crate::dof::{DofMap, DOFS_PER_JOINT};
use crate::elements::{Element, Joint};
use crate::error::{FrameError, FrameResult};
use crate::loads::JointLoad;
use crate::math::{SystemMatrix, Vec as FrameVec};

/// The unconstrained global system `K`, `F`
#[derive(Debug, Clone)]
pub struct GlobalSystem<M> {
    /// Global stiffness matrix, `6n x 6n`
    pub stiffness: M,
    /// Global load vector, `6n`
    pub loads: FrameVec,
}

impl<M: SystemMatrix> GlobalSystem<M> {
    /// Number of global DOFs
    pub fn size(&self) -> usize {
        self.loads.len()
    }
}

/// Assemble every element and joint load into a fresh global system.
///
/// Contributions accumulate, so elements sharing a joint and loads sharing a
/// joint superpose. Restraints are not considered here. The first element or
/// load that references a joint outside `dof_map` aborts the assembly.
pub fn assemble<M: SystemMatrix>(
    joints: &[Joint],
    elements: &[Element],
    loads: &[JointLoad],
    dof_map: &DofMap,
) -> FrameResult<GlobalSystem<M>> {
    let n_dofs = dof_map.total_dofs();
    let by_id: HashMap<&str, &Joint> = joints.iter().map(|j| (j.id.as_str(), j)).collect();

    let mut stiffness = M::zeros(n_dofs);
    for element in elements {
        let from = lookup(&by_id, &element.from)?;
        let to = lookup(&by_id, &element.to)?;
        let dofs = dof_map.element_dofs(element)?;
        let k_element = element.global_stiffness(from, to)?;

        for (a, &row) in dofs.iter().enumerate() {
            for (b, &col) in dofs.iter().enumerate() {
                stiffness.add(row, col, k_element[(a, b)]);
            }
        }
    }

    let mut f = FrameVec::zeros(n_dofs);
    for load in loads {
        let values = load.as_array();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FrameError::InvalidInput(format!(
                "load '{}' has a non-finite component",
                load.id
            )));
        }

        let base = dof_map.base_dof(&load.joint)?;
        for i in 0..DOFS_PER_JOINT {
            f[base + i] += values[i];
        }
    }

    log::debug!(
        "assembled {} elements and {} loads into {} DOFs ({} stored entries)",
        elements.len(),
        loads.len(),
        n_dofs,
        stiffness.nnz()
    );

    Ok(GlobalSystem { stiffness, loads: f })
}

fn lookup<'a>(by_id: &HashMap<&str, &'a Joint>, id: &str) -> FrameResult<&'a Joint> {
    by_id
        .get(id)
        .copied()
        .ok_or_else(|| FrameError::UnknownJoint(id.to_string()))
}
