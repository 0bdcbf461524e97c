//! Frame Solver Example - Simple Portal Frame
//!
//! Run with `RUST_LOG=info` to see the solver log.

use anyhow::Context;
use frame_solver::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    println!("=== Frame Solver Example: Portal Frame ===\n");

    // W12x26 (approximate properties, SI)
    // A = 0.00494 m², Iy = 8.49e-5 m⁴, Iz = 7.2e-6 m⁴, J = 1.25e-7 m⁴
    let section = Section::new(0.00494, 0.0025, 0.0025, 1.25e-7, 8.49e-5, 7.2e-6);
    let steel = Material::steel();

    //     3 -------- 4
    //     |          |
    //     |          |
    //     1          2
    //   Fixed      Fixed
    let height = 4.0;
    let span = 6.0;

    let mut builder = Model::builder();
    builder.add_node(Node::new(1, 0.0, 0.0, 0.0))?;
    builder.add_node(Node::new(2, span, 0.0, 0.0))?;
    builder.add_node(Node::new(3, 0.0, 0.0, height))?;
    builder.add_node(Node::new(4, span, 0.0, height))?;

    builder.add_element(Element::new(1, 1, 3, section, steel))?;
    builder.add_element(Element::new(2, 2, 4, section, steel))?;
    builder.add_element(Element::new(3, 3, 4, section, steel))?;

    builder.add_reaction(Reaction::fixed(1))?;
    builder.add_reaction(Reaction::fixed(2))?;
    builder.options(AnalysisOptions::linear().with_shear(true).with_dx(0.5));
    let model = builder.build().context("portal frame is not a valid model")?;

    // Dead: self weight plus 20 kN/m on the beam (local z is up for a level beam)
    let dead = LoadCase::new()
        .with_gravity(0.0, 0.0, -9.81)
        .with_uniform_load(UniformLoad::new(3, 0.0, 0.0, -20_000.0));
    // Wind: 10 kN at roof level along +X
    let wind = LoadCase::new().with_node_load(NodeLoad::force(3, 10_000.0, 0.0, 0.0));

    println!("Running linear analysis...\n");
    let results = model.solve_static_cases(&[dead.clone(), wind.clone()]);

    for (name, result) in ["Dead", "Wind"].iter().zip(results) {
        let result = result.with_context(|| format!("{name} case failed"))?;
        println!("=== Results for {name} ===\n");

        println!("Node Displacements:");
        for d in &result.displacements {
            println!(
                "  {}: DX={:.4}mm, DZ={:.4}mm, RY={:.6}rad",
                d.node,
                d.dx * 1000.0,
                d.dz * 1000.0,
                d.ry
            );
        }

        println!("\nSupport Reactions:");
        for r in &result.reactions {
            println!(
                "  {}: FX={:.2}kN, FZ={:.2}kN, MY={:.2}kN·m",
                r.node,
                r.fx / 1000.0,
                r.fz / 1000.0,
                r.my / 1000.0
            );
        }

        println!("\nElement Forces:");
        for series in &result.internal_forces {
            println!(
                "  {}: |N|max={:.2}kN, |M|max={:.2}kN·m, deflection max={:.4}mm",
                series.element,
                series.max_axial() / 1000.0,
                series.max_moment() / 1000.0,
                series.max_deflection() * 1000.0
            );
        }

        let summary = result.summary();
        println!("\nSummary:");
        println!("{}", serde_json::to_string_pretty(&summary)?);
        println!();
    }

    // Geometric stiffness with both cases acting together
    println!("=== Geometric Stiffness Comparison ===\n");
    let combined = LoadCase {
        node_loads: wind.node_loads.clone(),
        ..dead.clone()
    };
    let linear = model.solve_static(&combined)?;
    let geometric = model
        .with_options(AnalysisOptions::geometric().with_shear(true))?
        .solve_static(&combined)?;
    let sway = |r: &StaticResult| r.displacement(3).map_or(0.0, |d| d.dx);
    println!("Lateral displacement at 3 (linear):    {:.4}mm", sway(&linear) * 1000.0);
    println!(
        "Lateral displacement at 3 (geometric): {:.4}mm after {} iterations",
        sway(&geometric) * 1000.0,
        geometric.iterations
    );

    println!("\n=== Modal Analysis ===\n");
    let config = DynamicConfig::modes(3);
    let inertias = [AddedInertia::point_mass(3, 500.0), AddedInertia::point_mass(4, 500.0)];
    let modal = model.solve_modal(&config, &inertias, &[])?;
    println!("Total mass: {:.1} kg", modal.mass.total_mass);
    for mode in &modal.modes {
        println!(
            "  Mode {}: f={:.3}Hz, T={:.4}s, participation X={:.3}",
            mode.mode + 1,
            mode.frequency,
            mode.period,
            mode.participation[0]
        );
    }

    let condensed = model.condense(
        &CondensationSpec::guyan(vec![RetainedDofs::new(3, [true, false, false, false, false, false])]),
        &config,
        &inertias,
        &[],
    )?;
    println!(
        "\nGuyan-condensed lateral stiffness at 3: {:.1} kN/m",
        condensed.stiffness[(0, 0)] / 1000.0
    );

    println!("\n=== Analysis Complete ===");
    Ok(())
}
