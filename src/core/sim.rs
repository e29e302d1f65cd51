use crate::core::particle::{Particle, ParticleId, DIM};
use crate::error::{Error, Result};
use log::{debug, trace};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Default gravitational constant (reference behavior uses G = 1).
pub const DEFAULT_G: f64 = 1.0;

/// Separation below which a pair is treated as coincident in the force pass.
///
/// Such a pair is necessarily inside merge range, so it is skipped rather
/// than allowed to produce a divide-by-zero impulse; the merge pass consumes
/// it in the same tick.
pub const MIN_SEPARATION: f64 = 1e-9;

/// Read-only per-particle view returned by [`Simulation::snapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleView {
    /// Position x.
    pub x: f64,
    /// Position y.
    pub y: f64,
    /// Contact radius, `mass.cbrt()`.
    pub radius: f64,
}

/// Gravitational N-body sandbox in D=2 with inelastic contact merges.
///
/// Each tick runs three passes over the particle collection snapshotted at
/// tick start: a pairwise force pass, a collision/merge pass, and an
/// integration pass. Mid-pass state is never observable from outside; the
/// collection mutates only between passes.
#[derive(Debug)]
pub struct Simulation {
    time_now: f64,
    ticks: u64,
    g: f64,
    next_id: ParticleId,
    particles: Vec<Particle>,
}

impl Simulation {
    /// Create an empty simulation with gravitational constant `g`.
    ///
    /// Errors: `Error::InvalidParam` if `g` is non-finite or non-positive.
    pub fn new(g: f64) -> Result<Self> {
        if !g.is_finite() || g <= 0.0 {
            return Err(Error::InvalidParam(
                "gravitational constant must be finite and > 0".into(),
            ));
        }
        Ok(Self {
            time_now: 0.0,
            ticks: 0,
            g,
            next_id: 0,
            particles: Vec::new(),
        })
    }

    /// Returns current simulation time.
    pub fn time(&self) -> f64 {
        self.time_now
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The gravitational constant this simulation was configured with.
    pub fn gravity(&self) -> f64 {
        self.g
    }

    /// Number of particles.
    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    /// Shared view of the live particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    /// Velocities as a Vec of fixed-size arrays.
    pub fn velocities(&self) -> Vec<[f64; DIM]> {
        self.particles.iter().map(|p| p.v).collect()
    }

    /// Read-only `{x, y, radius}` view for rendering.
    ///
    /// Reflects fully settled post-merge, post-integration state only; there
    /// is no way to observe a mid-pass collection.
    pub fn snapshot(&self) -> Vec<ParticleView> {
        self.particles
            .iter()
            .map(|p| ParticleView {
                x: p.r[0],
                y: p.r[1],
                radius: p.radius,
            })
            .collect()
    }

    /// Compute total mass (diagnostic; invariant across ticks without spawns).
    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(|p| p.mass).sum()
    }

    /// Compute total momentum (diagnostic; invariant across ticks without spawns).
    pub fn total_momentum(&self) -> [f64; DIM] {
        let mut out = [0.0_f64; DIM];
        for p in &self.particles {
            for (ok, mk) in out.iter_mut().zip(p.momentum()) {
                *ok += mk;
            }
        }
        out
    }

    /// Compute total kinetic energy (diagnostic).
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Insert a new particle and return its handle.
    ///
    /// Errors: `Error::InvalidParam` if `mass` is non-positive or any input
    /// is NaN/inf. Validation happens here, at the API edge; the core never
    /// constructs a particle with non-positive mass.
    pub fn spawn(&mut self, x: f64, y: f64, mass: f64, vx: f64, vy: f64) -> Result<ParticleId> {
        let id = self.next_id;
        let p = Particle::new(id, [x, y], [vx, vy], mass)?;
        self.next_id += 1;
        self.particles.push(p);
        trace!("spawned particle {} at ({}, {}) mass {}", id, x, y, mass);
        Ok(id)
    }

    /// Spawn `n` equal-mass particles at non-overlapping random positions
    /// inside the axis-aligned box `[0, extent[k]]`, with each velocity
    /// component uniform in `[-max_speed, max_speed]`.
    ///
    /// Placement uses simple rejection sampling so the cloud does not start
    /// in a merged state. A seed makes the layout reproducible.
    pub fn spawn_cloud(
        &mut self,
        n: usize,
        extent: [f64; DIM],
        mass: f64,
        max_speed: f64,
        seed: Option<u64>,
    ) -> Result<Vec<ParticleId>> {
        if n == 0 {
            return Err(Error::InvalidParam("n must be > 0".into()));
        }
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !max_speed.is_finite() || max_speed < 0.0 {
            return Err(Error::InvalidParam(
                "max_speed must be finite and >= 0".into(),
            ));
        }
        let radius = mass.cbrt();
        for &l in &extent {
            if !l.is_finite() || l < 2.0 * radius {
                return Err(Error::InvalidParam(
                    "extent must be at least 2 * radius in every dimension".into(),
                ));
            }
        }

        let mut rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        // Rejection sample non-overlapping positions
        let mut placed: Vec<[f64; DIM]> = Vec::with_capacity(n);
        let max_attempts = 1_000_000usize;
        for i in 0..n {
            let mut attempts = 0usize;
            let r = loop {
                if attempts >= max_attempts {
                    return Err(Error::InvalidParam(format!(
                        "failed to place particle {} without overlap; try fewer particles or a larger extent",
                        i
                    )));
                }
                attempts += 1;
                let mut r = [0.0_f64; DIM];
                for (k, r_k) in r.iter_mut().enumerate() {
                    *r_k = rng.random_range(radius..=(extent[k] - radius));
                }
                if !overlaps_existing(&placed, &r, radius) {
                    break r;
                }
            };
            placed.push(r);
        }

        let mut ids = Vec::with_capacity(n);
        for r in placed {
            let mut v = [0.0_f64; DIM];
            if max_speed > 0.0 {
                v.iter_mut()
                    .for_each(|x| *x = rng.random_range(-max_speed..=max_speed));
            }
            ids.push(self.spawn(r[0], r[1], mass, v[0], v[1])?);
        }
        Ok(ids)
    }

    /// Remove all particles. Idempotent.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Advance the simulation by one tick of width `dt`.
    ///
    /// Three passes run over the collection snapshotted at tick start:
    ///
    /// 1. Force pass: every unordered pair attracts with
    ///    `g * m1 * m2 / dist^2`; forces accumulate into a side buffer and
    ///    are applied after the scan, so the pass reads an immutable view.
    ///    Pairs closer than [`MIN_SEPARATION`] are skipped (see the constant).
    /// 2. Merge pass: pairs with `dist < r1 + r2`, scanned in ascending
    ///    `(i, j)` order, merge inelastically. A particle consumed by an
    ///    earlier merge is skipped for the rest of the tick; merge products
    ///    do not re-enter the scan until the next tick.
    /// 3. Integration pass: every surviving particle and every merge product
    ///    advances by its velocity.
    ///
    /// Errors: `Error::InvalidParam` for a non-finite or non-positive `dt`;
    /// `Error::Numerics` if the post-step consistency check finds a
    /// non-finite particle component.
    pub fn step(&mut self, dt: f64) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }

        let n = self.particles.len();

        // Force pass: accumulate pairwise forces against the pre-tick state,
        // then apply. Skipped coincident pairs merge below.
        let mut forces = vec![[0.0_f64; DIM]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let (pi, pj) = (&self.particles[i], &self.particles[j]);
                let mut d = [0.0_f64; DIM];
                for ((dk, &rik), &rjk) in d.iter_mut().zip(&pi.r).zip(&pj.r) {
                    *dk = rik - rjk;
                }
                let dist_sq = dot(&d, &d);
                let dist = dist_sq.sqrt();
                if dist <= MIN_SEPARATION {
                    continue;
                }
                let f = self.g * pi.mass * pj.mass / dist_sq;
                for k in 0..DIM {
                    let fk = f * d[k] / dist;
                    forces[i][k] -= fk;
                    forces[j][k] += fk;
                }
            }
        }
        for (p, f) in self.particles.iter_mut().zip(&forces) {
            p.apply_force(f[0], f[1]);
        }

        // Merge pass: positions are untouched by the force pass, so the same
        // scan order still sees the pre-tick geometry. Ascending (i, j) order
        // makes chained contacts resolve deterministically: once a particle
        // is consumed it cannot merge again this tick.
        let mut alive = vec![true; n];
        let mut products: Vec<Particle> = Vec::new();
        for i in 0..n {
            if !alive[i] {
                continue;
            }
            for j in (i + 1)..n {
                if !alive[j] {
                    continue;
                }
                let (pi, pj) = (&self.particles[i], &self.particles[j]);
                let mut d = [0.0_f64; DIM];
                for ((dk, &rik), &rjk) in d.iter_mut().zip(&pi.r).zip(&pj.r) {
                    *dk = rik - rjk;
                }
                let dist = dot(&d, &d).sqrt();
                if dist < pi.radius + pj.radius {
                    let id = self.next_id;
                    self.next_id += 1;
                    let merged = pi.merge(pj, id);
                    debug!(
                        "merged particles {} and {} into {} (mass {})",
                        pi.id, pj.id, merged.id, merged.mass
                    );
                    products.push(merged);
                    alive[i] = false;
                    alive[j] = false;
                    break;
                }
            }
        }
        if !products.is_empty() {
            let mut keep = alive.iter();
            // retain preserves survivor order; products append with fresh ids
            self.particles
                .retain(|_| *keep.next().unwrap_or(&true));
            self.particles.extend(products);
        }

        // Integration pass
        for p in &mut self.particles {
            p.integrate(dt);
        }

        self.check_finite()?;
        self.time_now += dt;
        self.ticks += 1;
        trace!(
            "tick {} complete: {} particles, t = {}",
            self.ticks,
            self.particles.len(),
            self.time_now
        );
        Ok(())
    }

    /// Post-step consistency check: no NaN/inf may leak into particle state.
    fn check_finite(&self) -> Result<()> {
        for p in &self.particles {
            let finite = p.r.iter().chain(&p.v).all(|x| x.is_finite())
                && p.mass.is_finite()
                && p.radius.is_finite();
            if !finite {
                return Err(Error::Numerics(format!(
                    "particle {} has non-finite state after step",
                    p.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            time_now: 0.0,
            ticks: 0,
            g: DEFAULT_G,
            next_id: 0,
            particles: Vec::new(),
        }
    }
}

// ============ Utility helpers ============

#[inline]
fn dot(a: &[f64; DIM], b: &[f64; DIM]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn overlaps_existing(existing: &[[f64; DIM]], r: &[f64; DIM], radius: f64) -> bool {
    let min_sq = (2.0 * radius) * (2.0 * radius);
    for q in existing {
        let mut d = [0.0_f64; DIM];
        for ((dk, &rk), &qk) in d.iter_mut().zip(r.iter()).zip(q.iter()) {
            *dk = rk - qk;
        }
        if dot(&d, &d) < min_sq {
            return true;
        }
    }
    false
}
