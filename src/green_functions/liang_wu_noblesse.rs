//! Infinite depth Green's function of Liang, Wu and Noblesse (2018)
use super::{
    deep_water_wavenumber, has_wave_part, rankine_reflections, rankine_sum, source_mesh,
    validate_physical_parameters, GfSingularities,
};
use crate::assembly::{assemble, extract_colocation_data};
use crate::green_functions::settings::Setting;
use crate::kernels::{compute_horizontal_distance, deep_water_wave_term, KernelEvaluation};
use crate::mesh::MeshInput;
use crate::traits::{GreenFunction, PotentialMatrices};
use crate::types::{Error, FloatingPointPrecision, Result};
use cauchy::c64;
use std::fmt;

/// Green's function for deep water with a free surface.
///
/// Intended for small and medium problems. Evaluations with finite depth or without a free
/// surface are rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiangWuNoblesseGF {
    floating_point_precision: FloatingPointPrecision,
}

impl LiangWuNoblesseGF {
    /// Create a new Green's function.
    pub fn new() -> Self {
        Self::default()
    }

    /// Singularity mode for a wave number: the negative image at infinite frequency.
    pub fn singularities(wavenumber: c64) -> GfSingularities {
        if wavenumber.re == f64::INFINITY {
            GfSingularities::HighFreq
        } else {
            GfSingularities::LowFreq
        }
    }
}

impl fmt::Display for LiangWuNoblesseGF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LiangWuNoblesseGF()")
    }
}

impl GreenFunction for LiangWuNoblesseGF {
    fn evaluate(
        &mut self,
        mesh1: &MeshInput,
        mesh2: &MeshInput,
        free_surface: f64,
        water_depth: f64,
        wavenumber: c64,
        adjoint_double_layer: bool,
        early_dot_product: bool,
    ) -> Result<PotentialMatrices> {
        validate_physical_parameters(free_surface, water_depth)?;
        if free_surface == f64::INFINITY || water_depth != f64::INFINITY {
            return Err(Error::DomainConstraint(
                "LiangWuNoblesseGF is only implemented for infinite depth with a free surface."
                    .to_string(),
            ));
        }
        let sources = source_mesh(mesh2)?;
        let colocation = extract_colocation_data(mesh1, mesh2, adjoint_double_layer)?;

        let mode = Self::singularities(wavenumber);
        let terms = rankine_reflections(free_surface, water_depth, mode.image_sign());
        let k = if has_wave_part(free_surface, wavenumber) {
            deep_water_wavenumber(wavenumber)
        } else {
            0.0
        };

        assemble(
            &colocation,
            sources,
            adjoint_double_layer,
            early_dot_product,
            self.floating_point_precision,
            |field, source| match rankine_sum(field, source, &terms, mode.desingularizes()) {
                Some(rankine) => {
                    let r = compute_horizontal_distance(field, source);
                    rankine
                        + deep_water_wave_term(k, r, field[2], source[2])
                            .to_cartesian(field, source)
                }
                None => KernelEvaluation::default(),
            },
        )
    }

    fn floating_point_precision(&self) -> FloatingPointPrecision {
        self.floating_point_precision
    }

    fn exportable_settings(&self) -> Vec<Setting> {
        vec![Setting::new("green_function", "LiangWuNoblesseGF")]
    }
}
