//! Joint loads - forces and moments applied directly to joints

use serde::{Deserialize, Serialize};

/// A load applied directly to a joint, in global coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointLoad {
    /// Unique identifier
    pub id: String,
    /// Id of the loaded joint
    pub joint: String,
    /// Force in X direction (N)
    #[serde(default)]
    pub fx: f64,
    /// Force in Y direction (N)
    #[serde(default)]
    pub fy: f64,
    /// Force in Z direction (N)
    #[serde(default)]
    pub fz: f64,
    /// Moment about X axis (N·m)
    #[serde(default)]
    pub mx: f64,
    /// Moment about Y axis (N·m)
    #[serde(default)]
    pub my: f64,
    /// Moment about Z axis (N·m)
    #[serde(default)]
    pub mz: f64,
}

impl JointLoad {
    /// Create a new joint load with all components
    #[allow(clippy::too_many_arguments)]
    pub fn new(id: &str, joint: &str, fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self {
            id: id.to_string(),
            joint: joint.to_string(),
            fx,
            fy,
            fz,
            mx,
            my,
            mz,
        }
    }

    /// Create a force-only joint load
    pub fn force(id: &str, joint: &str, fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(id, joint, fx, fy, fz, 0.0, 0.0, 0.0)
    }

    /// Create a moment-only joint load
    pub fn moment(id: &str, joint: &str, mx: f64, my: f64, mz: f64) -> Self {
        Self::new(id, joint, 0.0, 0.0, 0.0, mx, my, mz)
    }

    /// Get the load as an array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    /// Scale the load by a factor
    pub fn scaled(&self, factor: f64) -> Self {
        let [fx, fy, fz, mx, my, mz] = self.as_array().map(|v| v * factor);
        Self::new(&self.id, &self.joint, fx, fy, fz, mx, my, mz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_and_moment() {
        let f = JointLoad::force("L1", "N2", 1.0, -2.0, 3.0);
        assert_eq!(f.as_array(), [1.0, -2.0, 3.0, 0.0, 0.0, 0.0]);

        let m = JointLoad::moment("L2", "N2", 0.0, 0.0, 5.0);
        assert_eq!(m.as_array()[5], 5.0);
    }

    #[test]
    fn test_scaled() {
        let load = JointLoad::new("L1", "N1", 1.0, 2.0, 3.0, 4.0, 5.0, 6.0).scaled(-2.0);
        assert_eq!(load.as_array(), [-2.0, -4.0, -6.0, -8.0, -10.0, -12.0]);
        assert_eq!(load.joint, "N1");
    }

    #[test]
    fn test_missing_components_default_to_zero() {
        let load: JointLoad = serde_json::from_str(r#"{"id": "L1", "joint": "N2", "fy": -10.0}"#).unwrap();
        assert_eq!(load.as_array(), [0.0, -10.0, 0.0, 0.0, 0.0, 0.0]);
    }
}
