use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation core.
///
/// The core has a deliberately narrow failure surface: parameters are
/// validated at the API edge, and a post-step consistency check catches any
/// numerical value that escaped into the particle state.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// A non-finite value (NaN/inf) was detected in particle state.
    #[error("numerical error: {0}")]
    Numerics(String),
}
