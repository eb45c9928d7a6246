//! Dispersion relation of linear water waves
//!
//! The dispersion relation links the angular frequency `omega`, the wave number `k` and the
//! water depth `h`:
//!
//! ```text
//! omega^2 / g = k tanh(k h)      (finite depth)
//! omega^2 / g = k                (deep water)
//! ```
use cauchy::c64;
use log::warn;
use std::f64::consts::PI;

/// Acceleration of gravity in m/s^2.
pub const GRAVITY: f64 = 9.81;

/// Default number of evanescent roots in a root family.
pub const DEFAULT_EVANESCENT_MODES: usize = 10;

/// Options for the Newton-Raphson solution of the dispersion relation.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionOptions {
    /// Acceleration of gravity
    gravity: f64,
    /// Maximum number of Newton iterations
    max_iterations: usize,
    /// The iteration stops if the derivative falls below this value
    derivative_tolerance: f64,
    /// The iteration stops if the Newton step falls below this value
    step_tolerance: f64,
}

impl Default for DispersionOptions {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            max_iterations: 100,
            derivative_tolerance: 1e-15,
            step_tolerance: 1e-12,
        }
    }
}

impl DispersionOptions {
    /// Set the acceleration of gravity
    pub fn set_gravity(&mut self, gravity: f64) {
        self.gravity = gravity;
    }
    /// Get the acceleration of gravity
    pub fn gravity(&self) -> f64 {
        self.gravity
    }
    /// Set the maximum number of Newton iterations
    pub fn set_max_iterations(&mut self, max_iterations: usize) {
        self.max_iterations = max_iterations;
    }
    /// Get the maximum number of Newton iterations
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
    /// Set the tolerance below which the derivative is considered degenerate
    pub fn set_derivative_tolerance(&mut self, tolerance: f64) {
        self.derivative_tolerance = tolerance;
    }
    /// Get the tolerance below which the derivative is considered degenerate
    pub fn derivative_tolerance(&self) -> f64 {
        self.derivative_tolerance
    }
    /// Set the step size tolerance
    pub fn set_step_tolerance(&mut self, tolerance: f64) {
        self.step_tolerance = tolerance;
    }
    /// Get the step size tolerance
    pub fn step_tolerance(&self) -> f64 {
        self.step_tolerance
    }
}

/// How a Newton-Raphson iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonStatus {
    /// The step size fell below the tolerance, or the closed form was used.
    Converged,
    /// The derivative became too small to take another step.
    DegenerateDerivative,
    /// The iteration cap was reached before the step size tolerance was met.
    ///
    /// The returned wave number is the last iterate.
    ConvergenceWarning,
}

/// A wave number together with information on how it was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveNumberSolution {
    /// The wave number
    pub wavenumber: f64,
    /// Number of Newton iterations performed
    pub iterations: usize,
    /// Final state of the iteration
    pub status: NewtonStatus,
}

/// Solve the dispersion relation for the real positive wave number.
pub fn solve_wave_number(
    omega: f64,
    water_depth: f64,
    options: &DispersionOptions,
) -> WaveNumberSolution {
    let v = omega * omega / options.gravity;
    if water_depth == f64::INFINITY {
        return WaveNumberSolution {
            wavenumber: v,
            iterations: 0,
            status: NewtonStatus::Converged,
        };
    }

    let mut k = v;
    for iteration in 0..options.max_iterations {
        let tanh_kh = (k * water_depth).tanh();
        let sech2_kh = 1.0 - tanh_kh * tanh_kh;

        let f = k * tanh_kh - v;
        let df = tanh_kh + k * water_depth * sech2_kh;

        if df.abs() < options.derivative_tolerance {
            return WaveNumberSolution {
                wavenumber: k,
                iterations: iteration,
                status: NewtonStatus::DegenerateDerivative,
            };
        }

        let k_new = k - f / df;
        if (k_new - k).abs() < options.step_tolerance {
            return WaveNumberSolution {
                wavenumber: k_new,
                iterations: iteration + 1,
                status: NewtonStatus::Converged,
            };
        }
        k = k_new;
    }

    warn!(
        "Dispersion relation did not converge in {} iterations (omega={}, depth={}). Using k={}.",
        options.max_iterations, omega, water_depth, k
    );
    WaveNumberSolution {
        wavenumber: k,
        iterations: options.max_iterations,
        status: NewtonStatus::ConvergenceWarning,
    }
}

/// Compute the wave number of the propagating mode from the angular frequency.
///
/// In deep water (`water_depth = f64::INFINITY`) this is `omega^2 / g`. For finite depth the
/// real root of `k tanh(k h) = omega^2 / g` is found by Newton-Raphson iteration.
pub fn compute_wave_number(omega: f64, water_depth: f64) -> c64 {
    c64::new(
        solve_wave_number(omega, water_depth, &DispersionOptions::default()).wavenumber,
        0.0,
    )
}

/// Residual of the dispersion relation.
///
/// `k` may be complex: on the imaginary axis `tanh` behaves as `tan`, which gives the
/// evanescent branches.
pub fn dispersion_relation(k: c64, omega: f64, water_depth: f64) -> c64 {
    let v = c64::new(omega * omega / GRAVITY, 0.0);
    if water_depth == f64::INFINITY {
        return k - v;
    }
    k * (k * water_depth).tanh() - v
}

/// Angular frequency of a wave of real wave number `k`.
pub fn angular_frequency(k: f64, water_depth: f64) -> f64 {
    if water_depth == f64::INFINITY {
        (GRAVITY * k).sqrt()
    } else {
        (GRAVITY * k * (k * water_depth).tanh()).sqrt()
    }
}

/// Roots of the dispersion relation used by finite depth Green's functions.
///
/// The first root is the propagating root `k0`. For finite depth `h` it is followed by the
/// `n_evanescent` imaginary roots `i n pi / h`.
pub fn compute_root_family(k0: c64, water_depth: f64, n_evanescent: usize) -> Vec<c64> {
    let mut roots = vec![k0];
    if water_depth != f64::INFINITY {
        roots.extend((1..=n_evanescent).map(|n| c64::new(0.0, n as f64 * PI / water_depth)));
    }
    roots
}
