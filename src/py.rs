use numpy::ndarray::{Array1, Array2};
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::particle::DIM;
use crate::core::Simulation;

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the Rust Simulation core.
///
/// API:
/// - __new__(g=1.0)
/// - spawn(x, y, mass, vx, vy) -> int
/// - spawn_cloud(n, extent, mass=1.0, max_speed=0.0, seed=None) -> list[int]
/// - clear()
/// - step(dt=1.0)
/// - snapshot() -> np.ndarray, shape (N, 3): columns x, y, radius
/// - get_positions() / get_velocities() -> np.ndarray, shape (N, 2)
/// - get_masses() -> np.ndarray, shape (N,)
#[pyclass]
pub struct GravitySandbox {
    sim: Simulation,
}

#[pymethods]
impl GravitySandbox {
    /// Initialize an empty sandbox with gravitational constant `g`.
    ///
    /// Errors: raises ValueError if `g` is non-finite or non-positive.
    #[new]
    #[pyo3(signature = (g=1.0))]
    fn new(g: f64) -> PyResult<Self> {
        let sim = Simulation::new(g).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Insert a particle and return its integer handle.
    ///
    /// Errors: raises ValueError on non-positive mass or non-finite input.
    fn spawn(&mut self, x: f64, y: f64, mass: f64, vx: f64, vy: f64) -> PyResult<u32> {
        self.sim.spawn(x, y, mass, vx, vy).map_err(py_err)
    }

    /// Spawn `n` equal-mass particles at non-overlapping random positions
    /// inside `[0, extent[0]] x [0, extent[1]]`.
    #[pyo3(signature = (n, extent, mass=1.0, max_speed=0.0, seed=None))]
    fn spawn_cloud(
        &mut self,
        n: usize,
        extent: Vec<f64>,
        mass: f64,
        max_speed: f64,
        seed: Option<u64>,
    ) -> PyResult<Vec<u32>> {
        if extent.len() != DIM {
            return Err(py_err(format!("extent must have length {}", DIM)));
        }
        let mut ext = [0.0_f64; DIM];
        ext.copy_from_slice(&extent);
        self.sim
            .spawn_cloud(n, ext, mass, max_speed, seed)
            .map_err(py_err)
    }

    /// Remove all particles.
    fn clear(&mut self) {
        self.sim.clear();
    }

    /// Advance by one tick of width `dt` (releases the GIL during computation).
    #[pyo3(signature = (dt=1.0))]
    fn step(&mut self, py: Python<'_>, dt: f64) -> PyResult<()> {
        py.detach(|| self.sim.step(dt)).map_err(py_err)
    }

    /// Return the render view as a NumPy array of shape (N, 3), dtype=float64,
    /// with columns x, y, radius.
    fn snapshot<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let view = self.sim.snapshot();
        let mut arr = Array2::<f64>::zeros((view.len(), 3));
        for (i, p) in view.iter().enumerate() {
            arr[[i, 0]] = p.x;
            arr[[i, 1]] = p.y;
            arr[[i, 2]] = p.radius;
        }
        Ok(arr.into_pyarray(py).to_owned().into())
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        Ok(rows_to_array2(py, &self.sim.positions()))
    }

    /// Return velocities as a NumPy array of shape (N, 2), dtype=float64.
    fn get_velocities<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        Ok(rows_to_array2(py, &self.sim.velocities()))
    }

    /// Return masses as a NumPy array of shape (N,), dtype=float64.
    fn get_masses<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray1<f64>>> {
        let masses: Array1<f64> = self.sim.particles().iter().map(|p| p.mass).collect();
        Ok(masses.into_pyarray(py).to_owned().into())
    }

    /// Number of live particles.
    fn num_particles(&self) -> usize {
        self.sim.num_particles()
    }

    /// Total system mass.
    fn total_mass(&self) -> f64 {
        self.sim.total_mass()
    }

    /// Current simulation time.
    fn time(&self) -> f64 {
        self.sim.time()
    }
}

fn rows_to_array2(py: Python<'_>, rows: &[[f64; DIM]]) -> Py<PyArray2<f64>> {
    let mut arr = Array2::<f64>::zeros((rows.len(), DIM));
    for (i, row) in rows.iter().enumerate() {
        for (k, &v) in row.iter().enumerate() {
            arr[[i, k]] = v;
        }
    }
    arr.into_pyarray(py).to_owned().into()
}

/// The gravsim Python module entry point.
#[pymodule]
fn gravsim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<GravitySandbox>()?;
    Ok(())
}
