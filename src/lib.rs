//! Frame Solver - Direct Stiffness Method engine for 3D frames
//!
//! Builds the 12x12 Euler-Bernoulli stiffness of every beam element, rotates
//! it into global axes, assembles the global system, enforces support
//! restraints by row/column elimination and solves for joint displacements,
//! support reactions and element end forces.
//!
//! The global matrix storage is pluggable through [`math::SystemMatrix`]:
//! dense (`nalgebra::DMatrix`) or sparse (triplets + skyline Cholesky).
//!
//! ## Example
//! ```rust
//! use frame_solver::prelude::*;
//!
//! let mut model = FrameModel::new();
//! model.add_joint(Joint::new("N1", 0.0, 0.0, 0.0)).unwrap();
//! model.add_joint(Joint::new("N2", 10.0, 0.0, 0.0)).unwrap();
//!
//! let section = Section::new(7.65e-3, 17.3e-6, 204e-6, 0.3e-6);
//! model
//!     .add_element(Element::new("M1", "N1", "N2", &Material::steel(), &section))
//!     .unwrap();
//!
//! model.set_restraint("N1", Restraint::fixed()).unwrap();
//! model
//!     .add_load(JointLoad::force("L1", "N2", 0.0, -10000.0, 0.0))
//!     .unwrap();
//!
//! let results = model.analyze().unwrap();
//! let tip = results.node_displacement("N2").unwrap();
//! assert!(tip.dy < 0.0);
//! ```

pub mod analysis;
pub mod api;
pub mod assembly;
pub mod config;
pub mod constraints;
pub mod dof;
pub mod elements;
pub mod error;
pub mod loads;
pub mod math;
pub mod model;
pub mod report;
pub mod results;
pub mod solver;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::AnalysisOptions;
    pub use crate::assembly::{assemble, GlobalSystem};
    pub use crate::constraints::{apply_restraints, ConstrainedSystem};
    pub use crate::dof::DofMap;
    pub use crate::elements::{Element, Joint, Material, Restraint, Section};
    pub use crate::error::{FrameError, FrameResult};
    pub use crate::loads::JointLoad;
    pub use crate::math::{Mat, SolveSettings, SparseMatrix, SystemMatrix};
    pub use crate::model::FrameModel;
    pub use crate::results::{
        AnalysisReport, AnalysisResults, AnalysisSummary, MemberForces, NodeDisplacement, Reactions,
    };
}

#[cfg(feature = "wasm")]
pub mod wasm;
