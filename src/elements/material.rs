//! Material properties

use serde::{Deserialize, Serialize};

/// Elastic material constants used by frame elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Modulus of elasticity (Young's modulus) in Pa
    pub e: f64,
    /// Shear modulus in Pa
    pub g: f64,
    /// Poisson's ratio
    pub nu: f64,
}

impl Material {
    /// Create a material from E, G and nu
    pub fn new(e: f64, g: f64, nu: f64) -> Self {
        Self { e, g, nu }
    }

    /// Create an isotropic material from E and nu
    /// G is calculated as E / (2 * (1 + nu))
    pub fn isotropic(e: f64, nu: f64) -> Self {
        Self::new(e, e / (2.0 * (1.0 + nu)), nu)
    }

    /// Structural steel
    pub fn steel() -> Self {
        Self {
            e: 200e9,
            g: 77e9,
            nu: 0.3,
        }
    }

    /// Structural aluminium (6061-T6)
    pub fn aluminum() -> Self {
        Self::isotropic(68.9e9, 0.33)
    }

    /// Normal-weight concrete of compressive strength `fc` (Pa)
    pub fn concrete(fc: f64) -> Self {
        // ACI: E = 4700 * sqrt(f'c in MPa) MPa
        let fc_mpa = fc / 1e6;
        Self::isotropic(4700.0 * fc_mpa.sqrt() * 1e6, 0.2)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::steel()
    }
}
