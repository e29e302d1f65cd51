use gravsim::core::Simulation;
use gravsim::error::Result;

/// Two unit masses at (0, 0) and (0, 0.5), both at rest.
/// Radii are 1 each, so 0.5 < 2 and one step merges them into a single
/// particle of mass 2 at the center of mass (0, 0.25) with zero velocity
/// (the pair forces are equal and opposite, so the momentum-weighted
/// velocity cancels exactly).
#[test]
fn overlapping_pair_merges_at_center_of_mass() -> Result<()> {
    let mut sim = Simulation::default();
    sim.spawn(0.0, 0.0, 1.0, 0.0, 0.0)?;
    sim.spawn(0.0, 0.5, 1.0, 0.0, 0.0)?;

    sim.step(1.0)?;

    assert_eq!(sim.num_particles(), 1);
    let p = &sim.particles()[0];
    assert!((p.mass - 2.0).abs() < 1e-12);
    assert!((p.radius - 2.0_f64.cbrt()).abs() < 1e-12);
    assert!(p.r[0].abs() < 1e-12, "x = {}", p.r[0]);
    assert!((p.r[1] - 0.25).abs() < 1e-12, "y = {}", p.r[1]);
    assert!(p.v[0].abs() < 1e-12 && p.v[1].abs() < 1e-12);
    Ok(())
}

/// A merge product integrates in the same tick it is created: a co-moving
/// overlapping pair ends the tick at the center of mass plus one step of
/// drift.
#[test]
fn merge_product_integrates_same_tick() -> Result<()> {
    let mut sim = Simulation::default();
    sim.spawn(0.0, 0.0, 1.0, 1.0, 0.0)?;
    sim.spawn(0.0, 0.5, 1.0, 1.0, 0.0)?;

    sim.step(1.0)?;

    assert_eq!(sim.num_particles(), 1);
    let p = &sim.particles()[0];
    assert!((p.r[0] - 1.0).abs() < 1e-12, "x = {}", p.r[0]);
    assert!((p.r[1] - 0.25).abs() < 1e-12, "y = {}", p.r[1]);
    assert!((p.v[0] - 1.0).abs() < 1e-12);
    assert!(p.v[1].abs() < 1e-12);
    Ok(())
}

/// Chained contacts resolve deterministically in ascending pair order: with
/// A-B and B-C both in range, A-B merges first, which consumes B, so B-C is
/// skipped for the tick and C survives unmerged.
#[test]
fn chained_collision_consumes_each_particle_once() -> Result<()> {
    let mut sim = Simulation::default();
    // Unit masses have radius 1; 1.5 < 2 puts adjacent pairs in range while
    // A and C stay 3.0 apart, out of range.
    sim.spawn(0.0, 0.0, 1.0, 0.0, 0.0)?;
    sim.spawn(0.0, 1.5, 1.0, 0.0, 0.0)?;
    sim.spawn(0.0, 3.0, 1.0, 0.0, 0.0)?;

    sim.step(1.0)?;

    assert_eq!(sim.num_particles(), 2, "expected exactly one merge");
    let mut masses: Vec<f64> = sim.particles().iter().map(|p| p.mass).collect();
    masses.sort_by(|a, b| a.total_cmp(b));
    assert!((masses[0] - 1.0).abs() < 1e-12, "C must survive unmerged");
    assert!((masses[1] - 2.0).abs() < 1e-12, "A and B must have merged");
    assert!((sim.total_mass() - 3.0).abs() < 1e-12);
    Ok(())
}

/// Two particles spawned at identical coordinates must not produce NaN or
/// infinite velocities: the coincident pair is skipped in the force pass and
/// consumed by the merge pass in the same tick.
#[test]
fn coincident_spawn_is_singularity_safe() -> Result<()> {
    let mut sim = Simulation::default();
    sim.spawn(3.0, 4.0, 1.0, 0.0, 0.0)?;
    sim.spawn(3.0, 4.0, 1.0, 0.0, 0.0)?;

    sim.step(1.0)?;

    assert_eq!(sim.num_particles(), 1);
    let p = &sim.particles()[0];
    assert!(p.r.iter().chain(&p.v).all(|x| x.is_finite()));
    assert!((p.mass - 2.0).abs() < 1e-12);
    // No impulse was exchanged, so the merged particle sits still.
    assert!(p.v[0].abs() < 1e-12 && p.v[1].abs() < 1e-12);
    assert!((p.r[0] - 3.0).abs() < 1e-12 && (p.r[1] - 4.0).abs() < 1e-12);
    Ok(())
}

/// A merge conserves momentum component-wise for unequal masses and
/// velocities.
#[test]
fn merge_conserves_momentum_unequal_masses() -> Result<()> {
    let mut sim = Simulation::default();
    sim.spawn(0.0, 0.0, 1.0, 2.0, -1.0)?;
    sim.spawn(0.3, 0.0, 3.0, -0.5, 0.5)?;
    let p0 = sim.total_momentum();

    sim.step(1.0)?;

    assert_eq!(sim.num_particles(), 1);
    let p1 = sim.total_momentum();
    for k in 0..2 {
        assert!(
            (p1[k] - p0[k]).abs() < 1e-12,
            "momentum component {} changed: {} -> {}",
            k,
            p0[k],
            p1[k]
        );
    }
    Ok(())
}
