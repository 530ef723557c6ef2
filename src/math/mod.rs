//! Mathematical utilities for frame analysis

pub mod sparse;
mod system;

use nalgebra::{DMatrix, DVector, Matrix3, SMatrix, SVector, Vector3};

use crate::error::{FrameError, FrameResult};

pub use sparse::{reverse_cuthill_mckee, SkylineCholesky, SparseMatrix};
pub use system::{SolveSettings, SystemMatrix};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 12x12 matrix for member stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for member forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Below this |ref x axis| the member is treated as parallel to global Z
const PARALLEL_TOLERANCE: f64 = 1e-8;

/// Length of the member between two points.
///
/// Fails with `DegenerateGeometry` when the length is zero or not finite.
pub fn member_length(i_node: &[f64; 3], j_node: &[f64; 3]) -> FrameResult<f64> {
    let d = Vec3::from(*j_node) - Vec3::from(*i_node);
    let length = d.norm();

    if !length.is_finite() || length <= 0.0 {
        return Err(FrameError::DegenerateGeometry(format!(
            "member from {:?} to {:?} has length {}",
            i_node, j_node, length
        )));
    }

    Ok(length)
}

/// Direction cosine matrix of a member.
///
/// Rows are the local x, y, z axes expressed in global coordinates. Local x
/// runs from `i_node` to `j_node`; local y is `Z x x` (or `X x x` when the
/// member is parallel to global Z); local z completes the right-handed triad.
pub fn member_rotation_matrix(i_node: &[f64; 3], j_node: &[f64; 3]) -> FrameResult<Mat3> {
    let length = member_length(i_node, j_node)?;
    let x = (Vec3::from(*j_node) - Vec3::from(*i_node)) / length;

    let mut reference = Vec3::z();
    if reference.cross(&x).norm() < PARALLEL_TOLERANCE {
        reference = Vec3::x();
    }

    let y = reference
        .cross(&x)
        .try_normalize(PARALLEL_TOLERANCE)
        .ok_or_else(|| {
            FrameError::DegenerateGeometry(format!(
                "cannot build a local y-axis for member from {:?} to {:?}",
                i_node, j_node
            ))
        })?;

    let z = x.cross(&y).try_normalize(PARALLEL_TOLERANCE).ok_or_else(|| {
        FrameError::DegenerateGeometry(format!(
            "cannot build a local z-axis for member from {:?} to {:?}",
            i_node, j_node
        ))
    })?;

    Ok(Mat3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
}

/// Compute the transformation matrix for a 3D frame element
///
/// # Arguments
/// * `i_node` - Start node coordinates [X, Y, Z]
/// * `j_node` - End node coordinates [X, Y, Z]
///
/// # Returns
/// 12x12 matrix `T` with `d_local = T * d_global`
pub fn member_transformation_matrix(i_node: &[f64; 3], j_node: &[f64; 3]) -> FrameResult<Mat12> {
    let r = member_rotation_matrix(i_node, j_node)?;

    let mut t = Mat12::zeros();
    for block in 0..4 {
        let offset = block * 3;
        t.fixed_view_mut::<3, 3>(offset, offset).copy_from(&r);
    }

    Ok(t)
}

/// Extract the 3x3 rotation matrix from a 12x12 transformation matrix
pub fn extract_rotation_matrix(t: &Mat12) -> Mat3 {
    t.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Compute the local stiffness matrix for a 3D frame element
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `iy` - Moment of inertia about local y-axis
/// * `iz` - Moment of inertia about local z-axis
/// * `j` - Torsional constant
/// * `length` - Member length
///
/// # Returns
/// 12x12 local stiffness matrix
pub fn member_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    iy: f64,
    iz: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    let l = length;
    let l2 = l * l;
    let l3 = l2 * l;

    let ea_l = e * a / l;
    let gj_l = g * j / l;

    let eiy_l3 = e * iy / l3;
    let eiy_l2 = e * iy / l2;
    let eiy_l = e * iy / l;

    let eiz_l3 = e * iz / l3;
    let eiz_l2 = e * iz / l2;
    let eiz_l = e * iz / l;

    #[rustfmt::skip]
    let data = [
        // Row 0: axial at i
        ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,          -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,
        // Row 1: shear Fy at i
        0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           6.0*eiz_l2,   0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           6.0*eiz_l2,
        // Row 2: shear Fz at i
        0.0,       0.0,          12.0*eiy_l3,   0.0,    -6.0*eiy_l2,   0.0,          0.0,       0.0,          -12.0*eiy_l3,  0.0,    -6.0*eiy_l2,   0.0,
        // Row 3: torsion at i
        0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,          0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,
        // Row 4: moment My at i
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    4.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    2.0*eiy_l,     0.0,
        // Row 5: moment Mz at i
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           4.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           2.0*eiz_l,
        // Row 6: axial at j
        -ea_l,     0.0,          0.0,           0.0,    0.0,           0.0,          ea_l,      0.0,          0.0,           0.0,    0.0,           0.0,
        // Row 7: shear Fy at j
        0.0,       -12.0*eiz_l3, 0.0,           0.0,    0.0,           -6.0*eiz_l2,  0.0,       12.0*eiz_l3,  0.0,           0.0,    0.0,           -6.0*eiz_l2,
        // Row 8: shear Fz at j
        0.0,       0.0,          -12.0*eiy_l3,  0.0,    6.0*eiy_l2,    0.0,          0.0,       0.0,          12.0*eiy_l3,   0.0,    6.0*eiy_l2,    0.0,
        // Row 9: torsion at j
        0.0,       0.0,          0.0,           -gj_l,  0.0,           0.0,          0.0,       0.0,          0.0,           gj_l,   0.0,           0.0,
        // Row 10: moment My at j
        0.0,       0.0,          -6.0*eiy_l2,   0.0,    2.0*eiy_l,     0.0,          0.0,       0.0,          6.0*eiy_l2,    0.0,    4.0*eiy_l,     0.0,
        // Row 11: moment Mz at j
        0.0,       6.0*eiz_l2,   0.0,           0.0,    0.0,           2.0*eiz_l,    0.0,       -6.0*eiz_l2,  0.0,           0.0,    0.0,           4.0*eiz_l,
    ];

    Mat12::from_row_slice(&data)
}

/// Global stiffness of a member: `T^T * k_local * T`
pub fn member_global_stiffness(k_local: &Mat12, t: &Mat12) -> Mat12 {
    t.transpose() * k_local * t
}
