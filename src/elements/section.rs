//! Section properties for frame elements

use serde::{Deserialize, Serialize};

/// Cross-section properties for frame elements
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Cross-sectional area in m²
    pub a: f64,
    /// Second moment of area about local y-axis in m⁴
    pub iy: f64,
    /// Second moment of area about local z-axis in m⁴
    pub iz: f64,
    /// Torsional constant in m⁴
    pub j: f64,
}

impl Section {
    /// Create a new section with basic properties
    pub fn new(a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { a, iy, iz, j }
    }

    /// Create a solid rectangular section.
    ///
    /// `width` runs along local z and `depth` along local y, so `iz` is the
    /// stiffness for bending in the local x-y plane.
    pub fn rectangular(width: f64, depth: f64) -> Self {
        let a = width * depth;
        let iy = depth * width.powi(3) / 12.0;
        let iz = width * depth.powi(3) / 12.0;

        // Torsional constant for rectangle (approximate)
        let (long, short) = if width > depth { (width, depth) } else { (depth, width) };
        let j = long * short.powi(3) / 3.0 * (1.0 - 0.63 * short / long);

        Self { a, iy, iz, j }
    }

    /// Create a solid circular section
    pub fn circular(diameter: f64) -> Self {
        let r = diameter / 2.0;
        let a = std::f64::consts::PI * r.powi(2);
        let i = std::f64::consts::PI * r.powi(4) / 4.0;

        Self {
            a,
            iy: i,
            iz: i,
            j: 2.0 * i,
        }
    }

    /// Get the polar moment of inertia
    pub fn ip(&self) -> f64 {
        self.iy + self.iz
    }
}

impl Default for Section {
    fn default() -> Self {
        // 200mm x 200mm square
        Self::rectangular(0.2, 0.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangular_section() {
        let section = Section::rectangular(0.3, 0.5);
        let expected_iz = 0.3 * 0.5_f64.powi(3) / 12.0;

        assert!((section.a - 0.15).abs() < 1e-10);
        assert!((section.iz - expected_iz).abs() < 1e-10);
        assert!(section.iz > section.iy);
    }

    #[test]
    fn test_circular_section() {
        let section = Section::circular(0.5);
        let r: f64 = 0.25;
        let expected_a = std::f64::consts::PI * r.powi(2);

        assert!((section.a - expected_a).abs() < 1e-10);
        assert!((section.iy - section.iz).abs() < 1e-10);
        assert!((section.j - section.ip()).abs() < 1e-10);
    }
}
