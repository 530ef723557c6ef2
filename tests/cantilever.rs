//! Cantilever checks against closed-form beam theory

use approx::assert_relative_eq;
use frame_solver::prelude::*;

const E: f64 = 210e9;
const G: f64 = 80e9;
const A: f64 = 0.012;
const IY: f64 = 3.5e-5;
const IZ: f64 = 8.0e-5;
const J: f64 = 1.2e-6;
const L: f64 = 4.0;

/// Fixed at the origin, free at `tip`, one element
fn cantilever(tip: [f64; 3], load: JointLoad) -> FrameModel {
    let mut model = FrameModel::new();
    model.add_joint(Joint::new("N1", 0.0, 0.0, 0.0)).unwrap();
    model.add_joint(Joint::new("N2", tip[0], tip[1], tip[2])).unwrap();
    model
        .add_element(Element::from_properties("M1", "N1", "N2", E, G, A, IY, IZ, J))
        .unwrap();
    model.set_restraint("N1", Restraint::fixed()).unwrap();
    model.add_load(load).unwrap();
    model
}

#[test]
fn tip_load_in_y() {
    let model = cantilever([L, 0.0, 0.0], JointLoad::force("P", "N2", 0.0, 1.0, 0.0));
    let results = model.analyze().unwrap();

    let tip = results.node_displacement("N2").unwrap();
    assert_relative_eq!(tip.dy, L.powi(3) / (3.0 * E * IZ), max_relative = 1e-6);
    assert_relative_eq!(tip.rz, L.powi(2) / (2.0 * E * IZ), max_relative = 1e-6);
    assert_relative_eq!(tip.dx, 0.0, epsilon = 1e-15);
    assert_relative_eq!(tip.dz, 0.0, epsilon = 1e-15);

    let root = results.node_displacement("N1").unwrap();
    assert_eq!(root, NodeDisplacement::default());

    let rxn = results.reactions("N1").unwrap();
    assert_relative_eq!(rxn.fy, -1.0, max_relative = 1e-9);
    assert_relative_eq!(rxn.mz, -L, max_relative = 1e-9);
    assert_relative_eq!(rxn.fx, 0.0, epsilon = 1e-9);
}

#[test]
fn tip_load_in_z_uses_iy() {
    let p = -2500.0;
    let model = cantilever([L, 0.0, 0.0], JointLoad::force("P", "N2", 0.0, 0.0, p));
    let results = model.analyze().unwrap();

    let tip = results.node_displacement("N2").unwrap();
    assert_relative_eq!(tip.dz, p * L.powi(3) / (3.0 * E * IY), max_relative = 1e-6);
    // positive Fz at +x rotates the tip about -y
    assert_relative_eq!(tip.ry, -p * L.powi(2) / (2.0 * E * IY), max_relative = 1e-6);
}

#[test]
fn axial_and_torsion() {
    let mut model = cantilever([L, 0.0, 0.0], JointLoad::force("P", "N2", 1000.0, 0.0, 0.0));
    model
        .add_load(JointLoad::moment("T", "N2", 300.0, 0.0, 0.0))
        .unwrap();
    let results = model.analyze().unwrap();

    let tip = results.node_displacement("N2").unwrap();
    assert_relative_eq!(tip.dx, 1000.0 * L / (E * A), max_relative = 1e-9);
    assert_relative_eq!(tip.rx, 300.0 * L / (G * J), max_relative = 1e-9);

    let forces = results.member_forces_i("M1").unwrap();
    assert_relative_eq!(forces.axial, 1000.0, max_relative = 1e-9);
    assert_relative_eq!(forces.torsion, 300.0, max_relative = 1e-9);
}

#[test]
fn vertical_cantilever_uses_fallback_axis() {
    // axis along global Z: local z becomes global X
    let model = cantilever([0.0, 0.0, L], JointLoad::force("P", "N2", 1.0, 0.0, 0.0));
    let results = model.analyze().unwrap();

    let tip = results.node_displacement("N2").unwrap();
    assert_relative_eq!(tip.dx, L.powi(3) / (3.0 * E * IY), max_relative = 1e-6);
    assert_relative_eq!(tip.dy, 0.0, epsilon = 1e-15);

    let rxn = results.reactions("N1").unwrap();
    assert_relative_eq!(rxn.fx, -1.0, max_relative = 1e-9);
    assert_relative_eq!(rxn.my, -L, max_relative = 1e-9);
}

#[test]
fn skewed_cantilever_axial_load() {
    // 4 * (1, 2, 2) / 3 has length 4
    let axis = [1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0];
    let tip = axis.map(|c| c * L);
    let p = 5000.0;
    let model = cantilever(tip, JointLoad::force("P", "N2", p * axis[0], p * axis[1], p * axis[2]));
    let results = model.analyze().unwrap();

    let d = results.node_displacement("N2").unwrap();
    let along = d.dx * axis[0] + d.dy * axis[1] + d.dz * axis[2];
    assert_relative_eq!(along, p * L / (E * A), max_relative = 1e-8);
    assert_relative_eq!(d.translation_magnitude(), p * L / (E * A), max_relative = 1e-6);

    let forces = results.member_forces_j("M1").unwrap();
    assert_relative_eq!(forces.axial, p, max_relative = 1e-8);
}

#[test]
fn sparse_backend_matches() {
    let model = cantilever([L, 0.0, 0.0], JointLoad::new("P", "N2", 10.0, -20.0, 30.0, 1.0, 2.0, 3.0));

    let dense = model.analyze().unwrap();
    for reorder in [true, false] {
        let opts = AnalysisOptions::sparse().with_reorder(reorder);
        let sparse = model.analyze_with::<SparseMatrix>(&opts).unwrap();

        for i in 0..12 {
            assert_relative_eq!(
                dense.displacements[i],
                sparse.displacements[i],
                epsilon = 1e-15,
                max_relative = 1e-9
            );
        }
    }
}
