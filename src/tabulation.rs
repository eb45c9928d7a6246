//! Tabulation of kernel values
//!
//! A [TabulationCache] stores complex values on a grid over a horizontal coordinate `r` and a
//! vertical coordinate `z` and evaluates between the nodes by bilinear interpolation. A cache
//! is created empty and invalid, populated once and then only read.
mod io;
mod registry;

pub use registry::{clear_shared_tabulations, shared_tabulation};

use crate::types::{Error, FloatingPointPrecision, Result};
use cauchy::c64;
use num::Zero;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Distribution of the nodes of a tabulation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabulationGridShape {
    /// Evenly spaced nodes
    Legacy,
    /// Nodes refined quadratically towards `r = 0` and `z = 0`
    #[default]
    ScaledNemoh3,
}

impl TabulationGridShape {
    /// Name used in settings and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            TabulationGridShape::Legacy => "legacy",
            TabulationGridShape::ScaledNemoh3 => "scaled_nemoh3",
        }
    }

    /// Index of the shape in the list of available shapes.
    pub fn index(&self) -> usize {
        match self {
            TabulationGridShape::Legacy => 0,
            TabulationGridShape::ScaledNemoh3 => 1,
        }
    }
}

/// Create the coordinates of a tabulation grid.
///
/// The horizontal range covers `[0, rmax]` with `nr` nodes and the vertical range covers
/// `[zmin, 0]` with `nz` nodes.
pub fn tabulation_grid(
    shape: TabulationGridShape,
    nr: usize,
    rmax: f64,
    nz: usize,
    zmin: f64,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if nr < 2 || nz < 2 {
        return Err(Error::Dimension(format!(
            "A tabulation grid needs at least 2 nodes in each direction, found nr={nr}, nz={nz}."
        )));
    }
    if !(rmax > 0.0 && rmax.is_finite()) || !(zmin < 0.0 && zmin.is_finite()) {
        return Err(Error::DomainConstraint(format!(
            "Tabulation bounds must satisfy rmax > 0 and zmin < 0, found rmax={rmax}, zmin={zmin}."
        )));
    }
    let t = |i: usize, n: usize| i as f64 / (n - 1) as f64;
    let (r_range, z_range) = match shape {
        TabulationGridShape::Legacy => (
            (0..nr).map(|i| rmax * t(i, nr)).collect(),
            (0..nz).map(|j| zmin * (1.0 - t(j, nz))).collect(),
        ),
        TabulationGridShape::ScaledNemoh3 => (
            (0..nr).map(|i| rmax * t(i, nr).powi(2)).collect(),
            (0..nz).map(|j| zmin * (1.0 - t(j, nz)).powi(2)).collect(),
        ),
    };
    Ok((r_range, z_range))
}

fn check_range(name: &str, range: &[f64]) -> Result<()> {
    if range.len() < 2 {
        return Err(Error::Dimension(format!(
            "{name} range must have at least 2 nodes, found {}.",
            range.len()
        )));
    }
    if range.iter().any(|v| !v.is_finite()) || range.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::Dimension(format!(
            "{name} range must be finite and strictly increasing."
        )));
    }
    Ok(())
}

/// Complex values tabulated over a `(r, z)` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulationCache {
    r_range: Vec<f64>,
    z_range: Vec<f64>,
    /// Values in row-major order: `values[j * r_range.len() + i]` is the value at `(r_i, z_j)`
    values: Vec<c64>,
    valid: bool,
    precision: FloatingPointPrecision,
}

impl TabulationCache {
    /// Create a new, invalid, cache.
    ///
    /// Both ranges must be strictly increasing and have at least two nodes.
    pub fn new(
        r_range: Vec<f64>,
        z_range: Vec<f64>,
        precision: FloatingPointPrecision,
    ) -> Result<Self> {
        check_range("R", &r_range)?;
        check_range("Z", &z_range)?;
        let values = vec![c64::zero(); r_range.len() * z_range.len()];
        Ok(Self {
            r_range,
            z_range,
            values,
            valid: false,
            precision,
        })
    }

    /// Fill the grid with `f(r, z)` at each node and mark the cache as valid.
    pub fn populate<F: Fn(f64, f64) -> c64 + Sync>(&mut self, f: F) {
        let nr = self.r_range.len();
        let r_range = &self.r_range;
        let z_range = &self.z_range;
        let precision = self.precision;
        self.values
            .par_chunks_mut(nr)
            .enumerate()
            .for_each(|(j, row)| {
                for (i, v) in row.iter_mut().enumerate() {
                    *v = precision.round(f(r_range[i], z_range[j]));
                }
            });
        self.valid = true;
    }

    /// Set all values and mark the cache as valid.
    ///
    /// `values[j * nr + i]` is the value at `(r_i, z_j)`.
    pub fn set_values(&mut self, values: Vec<c64>) -> Result<()> {
        if values.len() != self.values.len() {
            return Err(Error::Dimension(format!(
                "Expected {} tabulated values, found {}.",
                self.values.len(),
                values.len()
            )));
        }
        let precision = self.precision;
        self.values = values.into_iter().map(|v| precision.round(v)).collect();
        self.valid = true;
        Ok(())
    }

    /// The horizontal coordinates of the grid.
    pub fn r_range(&self) -> &[f64] {
        &self.r_range
    }

    /// The vertical coordinates of the grid.
    pub fn z_range(&self) -> &[f64] {
        &self.z_range
    }

    /// The precision of the stored values.
    pub fn precision(&self) -> FloatingPointPrecision {
        self.precision
    }

    /// Check if the cache has been populated.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Value at the node `(r_range[r_index], z_range[z_index])`.
    pub fn value(&self, r_index: usize, z_index: usize) -> c64 {
        self.values[z_index * self.r_range.len() + r_index]
    }

    /// Check if `(r, z)` lies inside the tabulated rectangle.
    pub fn contains(&self, r: f64, z: f64) -> bool {
        Self::find_index(&self.r_range, r).is_some() && Self::find_index(&self.z_range, z).is_some()
    }

    /// Find `i` such that `range[i] <= v <= range[i + 1]`.
    ///
    /// Returns the first such bracket, or `None` if `v` is outside `[range[0], range[last]]`.
    pub fn find_index(range: &[f64], v: f64) -> Option<usize> {
        let (first, last) = (*range.first()?, *range.last()?);
        if range.len() < 2 || !(v >= first && v <= last) {
            return None;
        }
        if v == first {
            return Some(0);
        }
        Some(range.partition_point(|x| *x < v) - 1)
    }

    fn bracket(&self, r: f64, z: f64) -> Result<(usize, usize)> {
        if !self.valid {
            return Err(Error::CacheInvalid);
        }
        match (
            Self::find_index(&self.r_range, r),
            Self::find_index(&self.z_range, z),
        ) {
            (Some(i), Some(j)) if i + 1 < self.r_range.len() && j + 1 < self.z_range.len() => {
                Ok((i, j))
            }
            _ => Err(Error::OutOfRange { r, z }),
        }
    }

    /// Bilinear interpolation at `(r, z)`.
    ///
    /// Values are blended along `r` first, then along `z`.
    pub fn interpolate(&self, r: f64, z: f64) -> Result<c64> {
        self.interpolate_with_derivatives(r, z).map(|(v, _, _)| v)
    }

    /// Bilinear interpolation at `(r, z)` with the derivatives of the interpolant in `r` and `z`.
    pub fn interpolate_with_derivatives(&self, r: f64, z: f64) -> Result<(c64, c64, c64)> {
        let (i, j) = self.bracket(r, z)?;

        let (r1, r2) = (self.r_range[i], self.r_range[i + 1]);
        let (z1, z2) = (self.z_range[j], self.z_range[j + 1]);

        let fr = (r - r1) / (r2 - r1);
        let fz = (z - z1) / (z2 - z1);

        let v11 = self.value(i, j);
        let v21 = self.value(i + 1, j);
        let v12 = self.value(i, j + 1);
        let v22 = self.value(i + 1, j + 1);

        let v1 = v11 * (1.0 - fr) + v21 * fr;
        let v2 = v12 * (1.0 - fr) + v22 * fr;
        let result = v1 * (1.0 - fz) + v2 * fz;

        let d_dr = ((v21 - v11) * (1.0 - fz) + (v22 - v12) * fz) / (r2 - r1);
        let d_dz = (v2 - v1) / (z2 - z1);

        Ok((result, d_dr, d_dz))
    }
}
