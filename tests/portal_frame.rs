//! Portal frame: equilibrium, symmetry and backend agreement

use approx::assert_relative_eq;
use frame_solver::prelude::*;

const SPAN: f64 = 6.0;
const HEIGHT: f64 = 4.0;
const GRAVITY: f64 = -60000.0;

fn portal(wind: f64) -> FrameModel {
    let steel = Material::steel();
    let column = Section::rectangular(0.3, 0.3);
    let beam = Section::rectangular(0.3, 0.5);

    let mut model = FrameModel::new();
    model.add_joint(Joint::new("N1", 0.0, 0.0, 0.0)).unwrap();
    model.add_joint(Joint::new("N2", SPAN, 0.0, 0.0)).unwrap();
    model.add_joint(Joint::new("N3", 0.0, HEIGHT, 0.0)).unwrap();
    model.add_joint(Joint::new("N4", SPAN, HEIGHT, 0.0)).unwrap();

    model.add_element(Element::new("Col1", "N1", "N3", &steel, &column)).unwrap();
    model.add_element(Element::new("Col2", "N2", "N4", &steel, &column)).unwrap();
    model.add_element(Element::new("Beam", "N3", "N4", &steel, &beam)).unwrap();

    model.set_restraint("N1", Restraint::fixed()).unwrap();
    model.set_restraint("N2", Restraint::fixed()).unwrap();

    model.add_load(JointLoad::force("D3", "N3", 0.0, GRAVITY, 0.0)).unwrap();
    model.add_load(JointLoad::force("D4", "N4", 0.0, GRAVITY, 0.0)).unwrap();
    if wind != 0.0 {
        model.add_load(JointLoad::force("W3", "N3", wind, 0.0, 0.0)).unwrap();
    }
    model
}

#[test]
fn symmetric_gravity_load() {
    let results = portal(0.0).analyze().unwrap();

    let n3 = results.node_displacement("N3").unwrap();
    let n4 = results.node_displacement("N4").unwrap();
    assert!(n3.dy < 0.0);
    assert_relative_eq!(n3.dy, n4.dy, max_relative = 1e-9);
    assert_relative_eq!(n3.dx, -n4.dx, epsilon = 1e-15, max_relative = 1e-6);
    assert_relative_eq!(n3.rz, -n4.rz, max_relative = 1e-6);

    let r1 = results.reactions("N1").unwrap();
    let r2 = results.reactions("N2").unwrap();
    assert_relative_eq!(r1.fy, -GRAVITY, max_relative = 1e-9);
    assert_relative_eq!(r2.fy, -GRAVITY, max_relative = 1e-9);
    assert_relative_eq!(r1.fx, -r2.fx, max_relative = 1e-6);
    assert_relative_eq!(r1.mz, -r2.mz, max_relative = 1e-6);

    // in-plane load leaves the out-of-plane DOFs at rest
    assert_relative_eq!(n3.dz, 0.0, epsilon = 1e-15);
    assert_relative_eq!(r1.fz, 0.0, epsilon = 1e-6);
}

#[test]
fn wind_load_equilibrium() {
    let wind = 10000.0;
    let results = portal(wind).analyze().unwrap();
    assert!(results.summary().equilibrium_residual < 1e-6);

    let r1 = results.reactions("N1").unwrap();
    let r2 = results.reactions("N2").unwrap();

    assert_relative_eq!(r1.fx + r2.fx, -wind, max_relative = 1e-9);
    assert_relative_eq!(r1.fy + r2.fy, -2.0 * GRAVITY, max_relative = 1e-9);

    // moments about the origin: loads + reactions = 0
    let load_moment = -HEIGHT * wind + SPAN * GRAVITY;
    let reaction_moment = r1.mz + r2.mz + SPAN * r2.fy;
    assert_relative_eq!(load_moment + reaction_moment, 0.0, epsilon = 1e-4);

    // the roof sways with the wind
    assert!(results.node_displacement("N3").unwrap().dx > 0.0);
    assert_eq!(results.joint_reactions.len(), 2);
}

#[test]
fn member_forces_balance_joint_loads() {
    let results = portal(0.0).analyze().unwrap();

    // each column carries half the gravity load in compression
    for column in ["Col1", "Col2"] {
        let fi = results.member_forces_i(column).unwrap();
        let fj = results.member_forces_j(column).unwrap();
        assert_relative_eq!(fi.axial, GRAVITY, max_relative = 1e-6);
        assert_relative_eq!(fj.axial, GRAVITY, max_relative = 1e-6);
    }

    let summary = results.summary();
    assert_eq!(summary.num_joints, 4);
    assert_eq!(summary.num_elements, 3);
    assert_eq!(summary.total_dofs, 24);
    assert_eq!(summary.free_dofs, 12);
    assert!(summary.max_moment > 0.0);

    assert!(matches!(
        results.member_forces_i("Brace"),
        Err(FrameError::UnknownElement(_))
    ));
}

#[test]
fn dense_and_sparse_agree() {
    let model = portal(10000.0);
    let dense = model.analyze().unwrap();
    let sparse = model
        .analyze_with::<SparseMatrix>(&AnalysisOptions::sparse())
        .unwrap();

    let scale = dense.displacements.amax();
    let diff = (&dense.displacements - &sparse.displacements).amax();
    assert!(diff <= 1e-9 * scale);

    assert_relative_eq!(
        dense.reactions("N2").unwrap().mz,
        sparse.reactions("N2").unwrap().mz,
        max_relative = 1e-6
    );
    let k_diff = (&dense.stiffness - sparse.stiffness.to_dense()).amax();
    assert!(k_diff <= 1e-9 * dense.stiffness.amax());
}

#[test]
fn results_track_revision() {
    let mut model = portal(0.0);
    let before = model.analyze().unwrap();
    assert_eq!(before.revision, model.revision);

    model.add_load(JointLoad::force("W3", "N3", 5000.0, 0.0, 0.0)).unwrap();
    assert!(model.revision > before.revision);

    let after = model.analyze().unwrap();
    assert_ne!(
        after.node_displacement("N3").unwrap(),
        before.node_displacement("N3").unwrap()
    );
}

#[test]
fn report_round_trips_through_json() {
    let results = portal(10000.0).analyze().unwrap();
    let report = results.to_report(true);

    let matrices = report.matrices.as_ref().unwrap();
    assert_eq!(matrices.dof_labels[19], "N4.Uy");
    assert_eq!(matrices.stiffness.len(), 24);
    assert_eq!(matrices.constrained_stiffness[0][0], 1.0);
    assert_eq!(matrices.constrained_loads[0], 0.0);
    assert_eq!(matrices.loads[12], 10000.0);

    let json = serde_json::to_string(&report).unwrap();
    let back: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.reactions.len(), 2);
    assert_eq!(back.displacements.len(), 4);
    assert_relative_eq!(
        back.member_forces["Beam"].i.axial,
        report.member_forces["Beam"].i.axial,
        max_relative = 1e-12
    );
}
