//! Free-surface Green's functions
//!
//! Four implementations of [GreenFunction](crate::traits::GreenFunction) are provided:
//! - [Delhommeau]: general purpose, with a tabulated wave part.
//! - [FinGreen3D]: finite depth series of Liu.
//! - [LiangWuNoblesseGF]: infinite depth with a free surface only.
//! - [HAMS]: direct closed forms, no tabulation.
//!
//! All of them share the matrix assembly of [crate::assembly] and the kernel pieces of
//! [crate::kernels].
pub mod delhommeau;
pub mod fingreen3d;
pub mod hams;
pub mod liang_wu_noblesse;
pub mod settings;

pub use delhommeau::{Delhommeau, DelhommeauParameters, FiniteDepthMethod, PronyDecompositionMethod};
pub use fingreen3d::{FinGreen3D, FinGreen3DParameters};
pub use hams::{HamsParameters, HAMS};
pub use liang_wu_noblesse::LiangWuNoblesseGF;

use crate::kernels::{rankine_term, KernelEvaluation, Reflection};
use crate::mesh::MeshInput;
use crate::traits::MeshLike;
use crate::types::{Error, Result};
use cauchy::c64;
use log::warn;
use serde::{Deserialize, Serialize};

/// Treatment of the free-surface image and of coincident points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GfSingularities {
    /// Image with a negative sign; self-influence entries are zero.
    HighFreq,
    /// Image with a positive sign; self-influence entries are zero.
    #[default]
    LowFreq,
    /// Image with a positive sign; singular Rankine terms are dropped and the rest is kept.
    LowFreqWithRankinePart,
}

impl GfSingularities {
    /// Name used in settings and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            GfSingularities::HighFreq => "high_freq",
            GfSingularities::LowFreq => "low_freq",
            GfSingularities::LowFreqWithRankinePart => "low_freq_with_rankine_part",
        }
    }

    /// Index of the mode in the list of available modes.
    pub fn index(&self) -> usize {
        match self {
            GfSingularities::HighFreq => 0,
            GfSingularities::LowFreq => 1,
            GfSingularities::LowFreqWithRankinePart => 2,
        }
    }

    /// Sign of the Rankine image about the free surface.
    pub fn image_sign(&self) -> f64 {
        match self {
            GfSingularities::HighFreq => -1.0,
            GfSingularities::LowFreq | GfSingularities::LowFreqWithRankinePart => 1.0,
        }
    }

    /// Whether coincident points are desingularized rather than masked.
    pub fn desingularizes(&self) -> bool {
        matches!(self, GfSingularities::LowFreqWithRankinePart)
    }
}

/// Check the physical parameters shared by all Green's functions.
pub(crate) fn validate_physical_parameters(free_surface: f64, water_depth: f64) -> Result<()> {
    if !(free_surface == 0.0 || free_surface == f64::INFINITY) {
        return Err(Error::DomainConstraint(format!(
            "The free surface must be at z=0 or absent (infinity), found {free_surface}."
        )));
    }
    if !(water_depth == f64::INFINITY || (water_depth.is_finite() && water_depth > 0.0)) {
        return Err(Error::DomainConstraint(format!(
            "The water depth must be positive or infinite, found {water_depth}."
        )));
    }
    Ok(())
}

/// The source mesh of an evaluation.
pub(crate) fn source_mesh<'a>(mesh2: &MeshInput<'a>) -> Result<&'a dyn MeshLike> {
    mesh2.as_mesh().ok_or_else(|| {
        Error::TypeMismatch("The second argument of an evaluation must be a mesh.".to_string())
    })
}

/// Whether the wave part contributes for this wave number.
///
/// There is no wave part without a free surface, at zero frequency or at infinite frequency.
pub(crate) fn has_wave_part(free_surface: f64, wavenumber: c64) -> bool {
    free_surface == 0.0 && wavenumber.norm() != 0.0 && wavenumber.re.is_finite()
}

/// Real wave number used by the deep water wave part.
pub(crate) fn deep_water_wavenumber(wavenumber: c64) -> f64 {
    if wavenumber.im != 0.0 {
        warn!(
            "Imaginary part of the wave number {} is ignored in deep water.",
            wavenumber
        );
    }
    wavenumber.re
}

/// Singularity mode actually used: infinite frequency always uses the negative image.
pub(crate) fn effective_singularities(mode: GfSingularities, wavenumber: c64) -> GfSingularities {
    if wavenumber.re == f64::INFINITY && mode != GfSingularities::HighFreq {
        GfSingularities::HighFreq
    } else {
        mode
    }
}

/// Rankine terms with their coefficients.
///
/// The direct term is always present. The free-surface image enters with `image_sign` when there
/// is a free surface and the sea-bed image enters with a positive sign for finite depth.
pub(crate) fn rankine_reflections(
    free_surface: f64,
    water_depth: f64,
    image_sign: f64,
) -> Vec<(Reflection, f64)> {
    let mut terms = vec![(Reflection::Direct, 1.0)];
    if free_surface == 0.0 {
        terms.push((Reflection::FreeSurface, image_sign));
    }
    if water_depth.is_finite() {
        terms.push((Reflection::SeaBed(water_depth), 1.0));
    }
    terms
}

/// Sum of Rankine terms.
///
/// A singular term is dropped when `desingularize` is set. Otherwise the pair is masked and
/// `None` is returned.
pub(crate) fn rankine_sum(
    field: &[f64; 3],
    source: &[f64; 3],
    terms: &[(Reflection, f64)],
    desingularize: bool,
) -> Option<KernelEvaluation> {
    let mut total = KernelEvaluation::default();
    for (reflection, coefficient) in terms {
        let term = rankine_term(field, source, *reflection);
        if !term.is_finite() {
            if desingularize {
                continue;
            }
            return None;
        }
        total += term.scaled(*coefficient);
    }
    Some(total)
}
