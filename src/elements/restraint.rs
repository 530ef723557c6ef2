//! Restraint (support) conditions

use serde::{de, Deserialize, Deserializer, Serialize};

/// Restraint conditions at a joint.
///
/// A restrained DOF is held at zero displacement. A joint with no restraint
/// record is free in all six DOFs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restraint {
    /// Restrained in X translation
    #[serde(default, deserialize_with = "flag")]
    pub dx: bool,
    /// Restrained in Y translation
    #[serde(default, deserialize_with = "flag")]
    pub dy: bool,
    /// Restrained in Z translation
    #[serde(default, deserialize_with = "flag")]
    pub dz: bool,
    /// Restrained in X rotation
    #[serde(default, deserialize_with = "flag")]
    pub rx: bool,
    /// Restrained in Y rotation
    #[serde(default, deserialize_with = "flag")]
    pub ry: bool,
    /// Restrained in Z rotation
    #[serde(default, deserialize_with = "flag")]
    pub rz: bool,
}

/// A restraint flag as a boolean or the 0/1 form
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Bit(u8),
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Flag::deserialize(deserializer)? {
        Flag::Bool(fixed) => Ok(fixed),
        Flag::Bit(0) => Ok(false),
        Flag::Bit(1) => Ok(true),
        Flag::Bit(other) => Err(de::Error::custom(format!(
            "restraint flag must be 0, 1 or a boolean, got {}",
            other
        ))),
    }
}

impl Restraint {
    /// No DOF restrained
    pub fn free() -> Self {
        Self::default()
    }

    /// Create a fully fixed support (all DOFs restrained)
    pub fn fixed() -> Self {
        Self::from_flags([true; 6])
    }

    /// Create a pinned support (translations restrained, rotations free)
    pub fn pinned() -> Self {
        Self::from_flags([true, true, true, false, false, false])
    }

    /// Roller restraining X translation only
    pub fn roller_x() -> Self {
        Self::from_flags([true, false, false, false, false, false])
    }

    /// Roller restraining Y translation only
    pub fn roller_y() -> Self {
        Self::from_flags([false, true, false, false, false, false])
    }

    /// Roller restraining Z translation only
    pub fn roller_z() -> Self {
        Self::from_flags([false, false, true, false, false, false])
    }

    /// Create from flags in DOF order [DX, DY, DZ, RX, RY, RZ]
    pub fn from_flags(flags: [bool; 6]) -> Self {
        let [dx, dy, dz, rx, ry, rz] = flags;
        Self {
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
        }
    }

    /// Create from 0/1 flags as entered in the restraint form; any non-zero
    /// value counts as fixed
    pub fn from_bits(bits: [u8; 6]) -> Self {
        Self::from_flags(bits.map(|b| b != 0))
    }

    /// Flags in DOF order [DX, DY, DZ, RX, RY, RZ]
    pub fn flags(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Get list of restrained DOF indices (0-5)
    pub fn restrained_dofs(&self) -> Vec<usize> {
        self.flags()
            .iter()
            .enumerate()
            .filter_map(|(i, &fixed)| fixed.then_some(i))
            .collect()
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.flags().contains(&true)
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.flags().iter().filter(|&&f| f).count()
    }
}
