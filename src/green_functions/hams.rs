//! Green's function of HAMS (Hydrodynamic Analysis of Marine Structures)
use super::{
    deep_water_wavenumber, effective_singularities, has_wave_part, rankine_reflections,
    rankine_sum, source_mesh, validate_physical_parameters, GfSingularities,
};
use crate::assembly::{assemble, extract_colocation_data};
use crate::dispersion::{compute_root_family, DEFAULT_EVANESCENT_MODES};
use crate::green_functions::settings::{non_default_summary, Setting};
use crate::kernels::{
    compute_horizontal_distance, deep_water_wave_term, finite_depth_wave_part, CylindricalTerm,
};
use crate::mesh::MeshInput;
use crate::traits::{GreenFunction, PotentialMatrices};
use crate::types::{FloatingPointPrecision, Result};
use cauchy::c64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of [HAMS].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HamsParameters {
    /// Precision of the assembled matrices
    pub floating_point_precision: FloatingPointPrecision,
    /// Number of evanescent modes for finite depth
    pub evanescent_modes: usize,
}

impl Default for HamsParameters {
    fn default() -> Self {
        Self {
            floating_point_precision: FloatingPointPrecision::Float64,
            evanescent_modes: DEFAULT_EVANESCENT_MODES,
        }
    }
}

impl HamsParameters {
    fn settings(&self) -> Vec<Setting> {
        vec![
            Setting::new("green_function", "HAMS"),
            Setting::new(
                "floating_point_precision",
                self.floating_point_precision.as_str(),
            ),
            Setting::new("evanescent_modes", self.evanescent_modes),
        ]
    }
}

/// Green's function evaluated directly from closed forms.
///
/// Coincident points are desingularized: the singular Rankine term is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HAMS {
    parameters: HamsParameters,
}

impl HAMS {
    /// Create a new Green's function.
    pub fn new(parameters: HamsParameters) -> Self {
        Self { parameters }
    }

    /// The parameters.
    pub fn parameters(&self) -> &HamsParameters {
        &self.parameters
    }
}

impl fmt::Display for HAMS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            non_default_summary(
                "HAMS",
                &self.parameters.settings(),
                &HamsParameters::default().settings()
            )
        )
    }
}

impl GreenFunction for HAMS {
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
        let sources = source_mesh(mesh2)?;
        let colocation = extract_colocation_data(mesh1, mesh2, adjoint_double_layer)?;

        let mode = effective_singularities(GfSingularities::LowFreqWithRankinePart, wavenumber);
        let terms = rankine_reflections(free_surface, water_depth, mode.image_sign());
        let wave_part = has_wave_part(free_surface, wavenumber);
        let k = if wave_part && water_depth == f64::INFINITY {
            deep_water_wavenumber(wavenumber)
        } else {
            0.0
        };
        let roots = if wave_part && water_depth.is_finite() {
            compute_root_family(wavenumber, water_depth, self.parameters.evanescent_modes)
        } else {
            vec![]
        };

        assemble(
            &colocation,
            sources,
            adjoint_double_layer,
            early_dot_product,
            self.parameters.floating_point_precision,
            |field, source| {
                let rankine = rankine_sum(field, source, &terms, true).unwrap_or_default();
                let r = compute_horizontal_distance(field, source);
                let wave = if !roots.is_empty() {
                    finite_depth_wave_part(r, field[2], source[2], &roots, water_depth)
                } else if k != 0.0 {
                    deep_water_wave_term(k, r, field[2], source[2])
                } else {
                    CylindricalTerm::default()
                };
                rankine + wave.to_cartesian(field, source)
            },
        )
    }

    fn floating_point_precision(&self) -> FloatingPointPrecision {
        self.parameters.floating_point_precision
    }

    fn exportable_settings(&self) -> Vec<Setting> {
        self.parameters.settings()
    }
}
