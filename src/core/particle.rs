use crate::error::{Error, Result};

/// Fixed spatial dimension (2D).
pub const DIM: usize = 2;

/// Stable handle for a particle, assigned by the owning [`Simulation`].
///
/// [`Simulation`]: crate::core::Simulation
pub type ParticleId = u32;

/// A point mass in the gravity sandbox.
///
/// Fields:
/// - `id`: stable identifier
/// - `r`: position vector [x, y]
/// - `v`: velocity vector [vx, vy]
/// - `mass`: particle mass (> 0)
/// - `radius`: derived from mass, always `mass.cbrt()`
///
/// The radius is never stored independently of the mass: it is recomputed on
/// construction and on merge, so `radius == mass.cbrt()` holds at all times.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: ParticleId,
    /// Position (x, y).
    pub r: [f64; DIM],
    /// Velocity (vx, vy).
    pub v: [f64; DIM],
    /// Mass (> 0).
    pub mass: f64,
    /// Contact radius, `mass.cbrt()`.
    pub radius: f64,
}

impl Particle {
    /// Create a new particle after validating invariants.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `mass` is non-positive or any component is NaN/inf.
    pub fn new(id: ParticleId, r: [f64; DIM], v: [f64; DIM], mass: f64) -> Result<Self> {
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::InvalidParam("mass must be finite and > 0".into()));
        }
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        if !v.iter().all(|x| x.is_finite()) {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        Ok(Self {
            id,
            r,
            v,
            mass,
            radius: mass.cbrt(),
        })
    }

    /// Advance the position by one timestep: `r += v * dt`.
    #[inline]
    pub fn integrate(&mut self, dt: f64) {
        for (rk, vk) in self.r.iter_mut().zip(&self.v) {
            *rk += vk * dt;
        }
    }

    /// Apply a force impulse: `v += (fx, fy) / mass`.
    ///
    /// `mass > 0` is guaranteed by construction, so the division is safe.
    #[inline]
    pub fn apply_force(&mut self, fx: f64, fy: f64) {
        self.v[0] += fx / self.mass;
        self.v[1] += fy / self.mass;
    }

    /// Inelastic merge with `other`, producing the combined particle under `id`.
    ///
    /// The product has summed mass, center-of-mass position, and the
    /// momentum-conserving velocity `(m1*v1 + m2*v2) / (m1 + m2)`. Its radius
    /// is re-derived from the combined mass.
    pub fn merge(&self, other: &Particle, id: ParticleId) -> Particle {
        let mass = self.mass + other.mass;
        let mut r = [0.0_f64; DIM];
        let mut v = [0.0_f64; DIM];
        for k in 0..DIM {
            r[k] = (self.r[k] * self.mass + other.r[k] * other.mass) / mass;
            v[k] = (self.v[k] * self.mass + other.v[k] * other.mass) / mass;
        }
        Particle {
            id,
            r,
            v,
            mass,
            radius: mass.cbrt(),
        }
    }

    /// Returns the particle's kinetic energy: 1/2 m |v|^2.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        let vsq: f64 = self.v.iter().map(|&c| c * c).sum();
        0.5 * self.mass * vsq
    }

    /// Returns the particle's momentum vector `m * v`.
    #[inline]
    pub fn momentum(&self) -> [f64; DIM] {
        [self.mass * self.v[0], self.mass * self.v[1]]
    }
}
