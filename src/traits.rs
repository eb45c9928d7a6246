//! Trait definitions

use crate::green_functions::settings::{settings_hash, Setting};
use crate::mesh::MeshInput;
use crate::types::{FloatingPointPrecision, Result};
use cauchy::c64;
use rlst::DynamicArray;

/// A panel mesh as seen by the Green's function evaluators.
///
/// Only panel centres and normals are needed. Both slices must have length [MeshLike::nb_faces].
pub trait MeshLike: Sync {
    /// The centres of the panels.
    fn faces_centers(&self) -> &[[f64; 3]];

    /// The unit normals of the panels.
    fn faces_normals(&self) -> &[[f64; 3]];

    /// The number of panels.
    fn nb_faces(&self) -> usize {
        self.faces_centers().len()
    }
}

/// Single layer and double layer matrices returned by an evaluation.
pub type PotentialMatrices = (DynamicArray<c64, 2>, DynamicArray<c64, 2>);

/// Interface to a free-surface Green's function.
pub trait GreenFunction: std::fmt::Display {
    /// Assemble the single layer matrix `S` and the double layer matrix `K`.
    ///
    /// - `mesh1`: the collocation mesh, or a point array when evaluating fields in post-processing.
    /// - `mesh2`: the source mesh. This must be a mesh.
    /// - `free_surface`: `0.0` for a free surface at `z = 0`, `f64::INFINITY` for no free surface.
    /// - `water_depth`: a positive depth or `f64::INFINITY`.
    /// - `wavenumber`: the wave number of the propagating mode.
    /// - `adjoint_double_layer`: use the normals of `mesh1` (K matrix) rather than those of
    ///   `mesh2` (D matrix).
    /// - `early_dot_product`: take the dot product with the normals so that `K` has as many
    ///   columns as `S`.
    ///
    /// `S` has shape `[n1, n2]` and `K` has shape `[n1, n2]` or `[n1, 3 * n2]`.
    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &mut self,
        mesh1: &MeshInput,
        mesh2: &MeshInput,
        free_surface: f64,
        water_depth: f64,
        wavenumber: c64,
        adjoint_double_layer: bool,
        early_dot_product: bool,
    ) -> Result<PotentialMatrices>;

    /// The precision of the assembled values.
    fn floating_point_precision(&self) -> FloatingPointPrecision;

    /// The configuration of the method, including its name.
    fn exportable_settings(&self) -> Vec<Setting>;

    /// Deterministic hash of the configuration, usable as a cache key.
    fn settings_hash(&self) -> u64 {
        settings_hash(&self.exportable_settings())
    }
}
