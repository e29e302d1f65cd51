//! gravsim: a gravitational N-body sandbox core.
//!
//! Point masses attract pairwise (G * m1 * m2 / d^2), merge inelastically on
//! contact (summed mass, center-of-mass position, momentum-conserving
//! velocity, radius re-derived as `mass.cbrt()`), and advance in fixed
//! timesteps. The core is synchronous and single-threaded; a host frame loop
//! delivers spawn/clear commands, calls [`core::Simulation::step`] once per
//! frame, and renders from [`core::Simulation::snapshot`].
//!
//! With the `python` feature enabled the crate also builds as a Python
//! extension module exposing the same surface as a `GravitySandbox` class.

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod py;
