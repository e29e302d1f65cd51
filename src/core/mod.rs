//! Core simulation data structures for the gravity sandbox.
//!
//! The physics lives in [`sim`]: a fixed-timestep loop of pairwise
//! gravitational attraction, inelastic contact merges, and linear
//! integration. [`particle`] holds the point-mass entity and [`command`] the
//! frame-boundary command surface for the external event layer.

pub mod command;
pub mod particle;
pub mod sim;

pub use command::Command;
pub use particle::{Particle, ParticleId};
pub use sim::{ParticleView, Simulation};
