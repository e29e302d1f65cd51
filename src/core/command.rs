use crate::core::particle::ParticleId;
use crate::core::Simulation;
use crate::error::Result;

/// A command the external event layer delivers at a frame boundary, before
/// the frame's `step`.
///
/// The input layer translates gestures into these; the core only sees the
/// finished values (a drag gesture's duration/distance mapping is an input
/// concern and happens outside the core).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Insert a particle with the given state.
    Spawn {
        /// Position x.
        x: f64,
        /// Position y.
        y: f64,
        /// Mass (> 0).
        mass: f64,
        /// Velocity x.
        vx: f64,
        /// Velocity y.
        vy: f64,
    },
    /// Remove every particle.
    Clear,
}

impl Simulation {
    /// Apply one frame-boundary command.
    ///
    /// Returns the new particle's handle for `Command::Spawn`, `None` for
    /// `Command::Clear`. Validation is the same as for the direct calls.
    pub fn apply(&mut self, cmd: Command) -> Result<Option<ParticleId>> {
        match cmd {
            Command::Spawn { x, y, mass, vx, vy } => {
                let id = self.spawn(x, y, mass, vx, vy)?;
                Ok(Some(id))
            }
            Command::Clear => {
                self.clear();
                Ok(None)
            }
        }
    }
}
