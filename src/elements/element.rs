//! Element - 3D frame element (beam/column)

use serde::{Deserialize, Serialize};

use super::{Joint, Material, Section};
use crate::error::{FrameError, FrameResult};
use crate::math::{self, Mat12};

/// A 3D Euler-Bernoulli frame element between two joints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier
    pub id: String,
    /// Id of the start joint
    pub from: String,
    /// Id of the end joint
    pub to: String,
    /// Modulus of elasticity
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Cross-sectional area
    pub a: f64,
    /// Second moment of area about local y
    pub iy: f64,
    /// Second moment of area about local z
    pub iz: f64,
    /// Torsional constant
    pub j: f64,
}

impl Element {
    /// Create an element from a material and a section
    pub fn new(id: &str, from: &str, to: &str, material: &Material, section: &Section) -> Self {
        Self::from_properties(
            id,
            from,
            to,
            material.e,
            material.g,
            section.a,
            section.iy,
            section.iz,
            section.j,
        )
    }

    /// Create an element from its six section/material properties
    #[allow(clippy::too_many_arguments)]
    pub fn from_properties(
        id: &str,
        from: &str,
        to: &str,
        e: f64,
        g: f64,
        a: f64,
        iy: f64,
        iz: f64,
        j: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            e,
            g,
            a,
            iy,
            iz,
            j,
        }
    }

    /// Properties as [E, G, A, Iy, Iz, J]
    pub fn properties(&self) -> [f64; 6] {
        [self.e, self.g, self.a, self.iy, self.iz, self.j]
    }

    /// Length between the two end joints
    pub fn length(&self, from: &Joint, to: &Joint) -> FrameResult<f64> {
        self.check_ends(from, to)?;
        math::member_length(&from.coords(), &to.coords())
    }

    /// 12x12 stiffness matrix in local coordinates
    pub fn local_stiffness(&self, from: &Joint, to: &Joint) -> FrameResult<Mat12> {
        const NAMES: [&str; 6] = ["E", "G", "A", "Iy", "Iz", "J"];
        for (name, value) in NAMES.iter().zip(self.properties()) {
            if !(value.is_finite() && value > 0.0) {
                return Err(FrameError::InvalidInput(format!(
                    "element '{}' needs a positive, finite {} (got {})",
                    self.id, name, value
                )));
            }
        }

        let length = self.length(from, to)?;
        Ok(math::member_local_stiffness(
            self.e, self.g, self.a, self.iy, self.iz, self.j, length,
        ))
    }

    /// 12x12 local-to-global transformation matrix
    pub fn transformation(&self, from: &Joint, to: &Joint) -> FrameResult<Mat12> {
        self.check_ends(from, to)?;
        math::member_transformation_matrix(&from.coords(), &to.coords())
    }

    /// 12x12 stiffness matrix in global coordinates, `T^T * k_local * T`
    pub fn global_stiffness(&self, from: &Joint, to: &Joint) -> FrameResult<Mat12> {
        let k_local = self.local_stiffness(from, to)?;
        let t = self.transformation(from, to)?;
        Ok(math::member_global_stiffness(&k_local, &t))
    }

    fn check_ends(&self, from: &Joint, to: &Joint) -> FrameResult<()> {
        if from.id != self.from {
            return Err(FrameError::InvalidInput(format!(
                "element '{}' starts at '{}', got joint '{}'",
                self.id, self.from, from.id
            )));
        }
        if to.id != self.to {
            return Err(FrameError::InvalidInput(format!(
                "element '{}' ends at '{}', got joint '{}'",
                self.id, self.to, to.id
            )));
        }
        Ok(())
    }
}
