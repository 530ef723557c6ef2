//! Frame Solver Example - Simple Portal Frame
//!
//! Pass `--matrices` to also print the 24x24 global stiffness matrices.

use anyhow::Result;
use frame_solver::prelude::*;
use frame_solver::report::{MatrixTable, VectorTable};

fn main() -> Result<()> {
    env_logger::init();
    let show_matrices = std::env::args().any(|a| a == "--matrices");

    println!("=== Frame Solver Example: Portal Frame ===\n");

    // W12x26 (approximate properties), strong axis about local z
    // A = 7.65 in² = 0.00494 m²
    // Iz = 204 in⁴ = 8.49e-5 m⁴
    // Iy = 17.3 in⁴ = 7.2e-6 m⁴
    // J = 0.3 in⁴ = 1.25e-7 m⁴
    let steel = Material::steel();
    let w12x26 = Section::new(0.00494, 7.2e-6, 8.49e-5, 1.25e-7);

    // Create a simple portal frame
    //
    //     N3 -------- N4
    //     |          |
    //     |          |
    //     |          |
    //     N1        N2
    //     ^          ^
    //   Fixed     Fixed
    //
    let height = 4.0;
    let span = 6.0;

    let mut model = FrameModel::new();
    model.add_joint(Joint::new("N1", 0.0, 0.0, 0.0))?;
    model.add_joint(Joint::new("N2", span, 0.0, 0.0))?;
    model.add_joint(Joint::new("N3", 0.0, height, 0.0))?;
    model.add_joint(Joint::new("N4", span, height, 0.0))?;

    model.add_element(Element::new("Col1", "N1", "N3", &steel, &w12x26))?;
    model.add_element(Element::new("Col2", "N2", "N4", &steel, &w12x26))?;
    model.add_element(Element::new("Beam", "N3", "N4", &steel, &w12x26))?;

    model.set_restraint("N1", Restraint::fixed())?;
    model.set_restraint("N2", Restraint::fixed())?;

    // 20 kN/m on the beam lumped to its ends, plus 10 kN of wind at roof level
    model.add_load(JointLoad::force("D3", "N3", 0.0, -span * 20000.0 / 2.0, 0.0))?;
    model.add_load(JointLoad::force("D4", "N4", 0.0, -span * 20000.0 / 2.0, 0.0))?;
    model.add_load(JointLoad::force("W3", "N3", 10000.0, 0.0, 0.0))?;

    println!("Running linear analysis...\n");
    let results = model.analyze()?;

    println!("Joint Displacements:");
    for joint in ["N1", "N2", "N3", "N4"] {
        let disp = results.node_displacement(joint)?;
        println!(
            "  {}: DX={:.4}mm, DY={:.4}mm, RZ={:.6}rad",
            joint,
            disp.dx * 1000.0,
            disp.dy * 1000.0,
            disp.rz
        );
    }

    println!("\nSupport Reactions:");
    for (joint, rxn) in &results.joint_reactions {
        println!(
            "  {}: FX={:.2}kN, FY={:.2}kN, MZ={:.2}kN·m",
            joint,
            rxn.fx / 1000.0,
            rxn.fy / 1000.0,
            rxn.mz / 1000.0
        );
    }

    println!("\nMember Forces:");
    for element in ["Col1", "Col2", "Beam"] {
        let forces_i = results.member_forces_i(element)?;
        let forces_j = results.member_forces_j(element)?;
        println!(
            "  {}: P={:.2}kN, Vmax={:.2}kN, Mmax={:.2}kN·m",
            element,
            forces_i.axial / 1000.0,
            forces_i.shear_y.abs().max(forces_j.shear_y.abs()) / 1000.0,
            forces_i.moment_z.abs().max(forces_j.moment_z.abs()) / 1000.0
        );
    }

    let summary = results.summary();
    println!("\nSummary:");
    println!("  Max displacement: {:.4}mm at {}", summary.max_displacement * 1000.0, summary.max_disp_joint);
    println!("  Max reaction: {:.2}kN at {}", summary.max_reaction / 1000.0, summary.max_reaction_joint);
    println!("  Max axial: {:.2}kN in {}", summary.max_axial / 1000.0, summary.max_axial_element);
    println!("  Max moment: {:.2}kN·m in {}", summary.max_moment / 1000.0, summary.max_moment_element);
    println!("  Equilibrium residual: {:e}", summary.equilibrium_residual);
    println!();

    let labels = results.dof_map.dof_labels();
    if show_matrices {
        println!("{}", MatrixTable::new("Global Stiffness Matrix [K]", &labels, &results.stiffness));
        println!(
            "{}",
            MatrixTable::new("Constrained Stiffness Matrix [K']", &labels, &results.constrained_stiffness)
        );
    }
    println!("{}", VectorTable::new("Global Load Vector [F]", &labels, &results.loads));
    println!(
        "{}",
        VectorTable::new("Displacement Vector [U]", &labels, &results.displacements).with_precision(6)
    );

    println!("=== Analysis Complete ===");
    Ok(())
}
