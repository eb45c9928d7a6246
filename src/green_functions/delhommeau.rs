//! Green's function of Delhommeau, as in Aquadyn and Nemoh
//!
//! The deep water wave part is tabulated once per grid configuration over the dimensionless
//! coordinates `R = k r` and `Z = k (zf + zp)` and shared between all instances with the same
//! grid. Points outside of the grid are evaluated directly.
use super::settings::{non_default_summary, settings_hash, Setting};
use super::{
    deep_water_wavenumber, effective_singularities, has_wave_part, rankine_reflections,
    rankine_sum, source_mesh, validate_physical_parameters, GfSingularities,
};
use crate::assembly::{assemble, extract_colocation_data};
use crate::dispersion::{compute_root_family, DEFAULT_EVANESCENT_MODES};
use crate::kernels::{
    compute_horizontal_distance, deep_water_wave_kernel, deep_water_wave_term,
    finite_depth_wave_part, CylindricalTerm, KernelEvaluation,
};
use crate::mesh::MeshInput;
use crate::tabulation::{shared_tabulation, tabulation_grid, TabulationCache, TabulationGridShape};
use crate::traits::{GreenFunction, PotentialMatrices};
use crate::types::{FloatingPointPrecision, Result};
use cauchy::c64;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Method for the finite depth part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiniteDepthMethod {
    /// Propagating mode only
    Legacy,
    /// Propagating and evanescent modes
    #[default]
    Newer,
}

impl FiniteDepthMethod {
    /// Name used in settings and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            FiniteDepthMethod::Legacy => "legacy",
            FiniteDepthMethod::Newer => "newer",
        }
    }

    /// Index of the method in the list of available methods.
    pub fn index(&self) -> usize {
        match self {
            FiniteDepthMethod::Legacy => 0,
            FiniteDepthMethod::Newer => 1,
        }
    }

    /// Number of evanescent modes used by the method.
    pub fn evanescent_modes(&self) -> usize {
        match self {
            FiniteDepthMethod::Legacy => 0,
            FiniteDepthMethod::Newer => DEFAULT_EVANESCENT_MODES,
        }
    }
}

/// Implementation of the Prony decomposition of the finite depth kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PronyDecompositionMethod {
    /// Python implementation
    #[default]
    Python,
    /// Fortran implementation
    Fortran,
}

impl PronyDecompositionMethod {
    /// Name used in settings and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            PronyDecompositionMethod::Python => "python",
            PronyDecompositionMethod::Fortran => "fortran",
        }
    }
}

/// Parameters of [Delhommeau].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelhommeauParameters {
    /// Number of horizontal nodes of the tabulation
    pub tabulation_nr: usize,
    /// Largest dimensionless horizontal distance of the tabulation
    pub tabulation_rmax: f64,
    /// Number of vertical nodes of the tabulation
    pub tabulation_nz: usize,
    /// Lowest dimensionless depth of the tabulation
    pub tabulation_zmin: f64,
    /// Number of integration points used to compute the tabulation
    pub tabulation_nb_integration_points: usize,
    /// Distribution of the tabulation nodes
    pub tabulation_grid_shape: TabulationGridShape,
    /// Directory in which tabulations are stored between runs
    pub tabulation_cache_dir: Option<PathBuf>,
    /// Method for the finite depth part
    pub finite_depth_method: FiniteDepthMethod,
    /// Implementation of the Prony decomposition
    pub finite_depth_prony_decomposition_method: PronyDecompositionMethod,
    /// Precision of the tabulation and of the assembled matrices
    pub floating_point_precision: FloatingPointPrecision,
    /// Treatment of the free-surface image and of coincident points
    pub gf_singularities: GfSingularities,
}

impl Default for DelhommeauParameters {
    fn default() -> Self {
        Self {
            tabulation_nr: 676,
            tabulation_rmax: 100.0,
            tabulation_nz: 372,
            tabulation_zmin: -251.0,
            tabulation_nb_integration_points: 1001,
            tabulation_grid_shape: TabulationGridShape::ScaledNemoh3,
            tabulation_cache_dir: None,
            finite_depth_method: FiniteDepthMethod::Newer,
            finite_depth_prony_decomposition_method: PronyDecompositionMethod::Python,
            floating_point_precision: FloatingPointPrecision::Float64,
            gf_singularities: GfSingularities::LowFreq,
        }
    }
}

impl DelhommeauParameters {
    /// Settings that determine the tabulation.
    fn tabulation_settings(&self) -> Vec<Setting> {
        vec![
            Setting::new("tabulation_nr", self.tabulation_nr),
            Setting::new("tabulation_rmax", self.tabulation_rmax),
            Setting::new("tabulation_nz", self.tabulation_nz),
            Setting::new("tabulation_zmin", self.tabulation_zmin),
            Setting::new(
                "tabulation_nb_integration_points",
                self.tabulation_nb_integration_points,
            ),
            Setting::new("tabulation_grid_shape", self.tabulation_grid_shape.as_str()),
            Setting::new(
                "floating_point_precision",
                self.floating_point_precision.as_str(),
            ),
        ]
    }

    /// All exportable settings; the cache directory is not part of the configuration.
    fn settings(&self) -> Vec<Setting> {
        let mut settings = vec![Setting::new("green_function", "Delhommeau")];
        settings.extend(self.tabulation_settings());
        settings.extend([
            Setting::new("finite_depth_method", self.finite_depth_method.as_str()),
            Setting::new(
                "finite_depth_prony_decomposition_method",
                self.finite_depth_prony_decomposition_method.as_str(),
            ),
            Setting::new("gf_singularities", self.gf_singularities.as_str()),
        ]);
        settings
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FiniteDepthRoots {
    water_depth: f64,
    wavenumber: c64,
    roots: Vec<c64>,
}

/// Green's function of Delhommeau.
#[derive(Debug, Clone)]
pub struct Delhommeau {
    parameters: DelhommeauParameters,
    tabulation: Arc<TabulationCache>,
    hash: u64,
    finite_depth_roots: Option<FiniteDepthRoots>,
}

/// Tabulate the dimensionless deep water kernel, or load it from the cache directory.
fn create_or_load_tabulation(parameters: &DelhommeauParameters) -> Result<Arc<TabulationCache>> {
    let (r_range, z_range) = tabulation_grid(
        parameters.tabulation_grid_shape,
        parameters.tabulation_nr,
        parameters.tabulation_rmax,
        parameters.tabulation_nz,
        parameters.tabulation_zmin,
    )?;
    let mut cache = TabulationCache::new(r_range, z_range, parameters.floating_point_precision)?;
    let hash = settings_hash(&parameters.tabulation_settings());
    let path = parameters
        .tabulation_cache_dir
        .as_ref()
        .map(|dir| dir.join(format!("tabulation_{hash:016x}.json")));

    let tabulation = shared_tabulation(hash, || {
        if let Some(path) = &path {
            match TabulationCache::load(path) {
                Ok(loaded)
                    if loaded.is_valid()
                        && loaded.r_range() == cache.r_range()
                        && loaded.z_range() == cache.z_range()
                        && loaded.precision() == cache.precision() =>
                {
                    return loaded;
                }
                Ok(_) => warn!(
                    "Ignoring tabulation {} that does not match the parameters",
                    path.display()
                ),
                Err(e) => debug!("No tabulation loaded: {e}"),
            }
        }
        cache.populate(deep_water_wave_kernel);
        cache
    });

    // The tabulation may have been built earlier by an instance without a cache directory.
    if let Some(path) = &path {
        if !path.exists() {
            if let Err(e) = tabulation.save(path) {
                warn!("Could not save tabulation: {e}");
            }
        }
    }
    Ok(tabulation)
}

impl Delhommeau {
    /// Create a new Green's function.
    ///
    /// Fails if the tabulation grid is invalid.
    pub fn new(parameters: DelhommeauParameters) -> Result<Self> {
        let tabulation = create_or_load_tabulation(&parameters)?;
        let hash = settings_hash(&parameters.settings());
        Ok(Self {
            parameters,
            tabulation,
            hash,
            finite_depth_roots: None,
        })
    }

    /// The parameters.
    pub fn parameters(&self) -> &DelhommeauParameters {
        &self.parameters
    }

    /// The tabulation of the dimensionless deep water kernel.
    pub fn tabulation(&self) -> &Arc<TabulationCache> {
        &self.tabulation
    }

    /// Index of the tabulation grid shape.
    pub fn tabulation_grid_shape_index(&self) -> usize {
        self.parameters.tabulation_grid_shape.index()
    }

    /// Index of the finite depth method.
    pub fn finite_depth_method_index(&self) -> usize {
        self.parameters.finite_depth_method.index()
    }

    /// Index of the singularity treatment.
    pub fn gf_singularities_index(&self) -> usize {
        self.parameters.gf_singularities.index()
    }

    /// Deep water wave part, interpolated inside the tabulated range.
    pub fn deep_water_wave_part(&self, k: f64, r: f64, zf: f64, zp: f64) -> CylindricalTerm {
        if k == 0.0 || !k.is_finite() {
            return CylindricalTerm::default();
        }
        match self
            .tabulation
            .interpolate_with_derivatives(k * r, k * (zf + zp))
        {
            Ok((t, dt_dr, dt_dz)) => {
                let k2 = k * k;
                CylindricalTerm {
                    value: t * k,
                    d_dr: dt_dr * k2,
                    d_dzf: dt_dz * k2,
                    d_dzp: dt_dz * k2,
                }
            }
            Err(_) => deep_water_wave_term(k, r, zf, zp),
        }
    }

    /// Roots of the dispersion relation, recomputed when the depth or the wave number changes.
    fn update_finite_depth_roots(&mut self, water_depth: f64, wavenumber: c64) {
        let stale = match &self.finite_depth_roots {
            Some(cached) => cached.water_depth != water_depth || cached.wavenumber != wavenumber,
            None => true,
        };
        if stale {
            let roots = compute_root_family(
                wavenumber,
                water_depth,
                self.parameters.finite_depth_method.evanescent_modes(),
            );
            debug!(
                "Delhommeau: {} dispersion roots for depth {water_depth}",
                roots.len()
            );
            self.finite_depth_roots = Some(FiniteDepthRoots {
                water_depth,
                wavenumber,
                roots,
            });
        }
    }
}

#[derive(Clone, Copy)]
enum WavePart<'a> {
    None,
    DeepWater(f64),
    FiniteDepth(&'a [c64], f64),
}

impl fmt::Display for Delhommeau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let settings = self.parameters.settings();
        let defaults = DelhommeauParameters::default().settings();
        write!(f, "{}", non_default_summary("Delhommeau", &settings, &defaults))
    }
}

impl GreenFunction for Delhommeau {
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

        let mode = effective_singularities(self.parameters.gf_singularities, wavenumber);
        let terms = rankine_reflections(free_surface, water_depth, mode.image_sign());
        let precision = self.parameters.floating_point_precision;

        if has_wave_part(free_surface, wavenumber) && water_depth.is_finite() {
            self.update_finite_depth_roots(water_depth, wavenumber);
        }
        let this = &*self;
        let wave = if !has_wave_part(free_surface, wavenumber) {
            WavePart::None
        } else if water_depth == f64::INFINITY {
            WavePart::DeepWater(deep_water_wavenumber(wavenumber))
        } else {
            match &this.finite_depth_roots {
                Some(cached) => WavePart::FiniteDepth(&cached.roots, water_depth),
                None => WavePart::None,
            }
        };

        assemble(
            &colocation,
            sources,
            adjoint_double_layer,
            early_dot_product,
            precision,
            |field, source| {
                let Some(rankine) = rankine_sum(field, source, &terms, mode.desingularizes())
                else {
                    return KernelEvaluation::default();
                };
                let r = compute_horizontal_distance(field, source);
                let cylindrical = match wave {
                    WavePart::None => return rankine,
                    WavePart::DeepWater(k) => this.deep_water_wave_part(k, r, field[2], source[2]),
                    WavePart::FiniteDepth(roots, depth) => {
                        finite_depth_wave_part(r, field[2], source[2], roots, depth)
                    }
                };
                rankine + cylindrical.to_cartesian(field, source)
            },
        )
    }

    fn floating_point_precision(&self) -> FloatingPointPrecision {
        self.parameters.floating_point_precision
    }

    fn exportable_settings(&self) -> Vec<Setting> {
        self.parameters.settings()
    }

    fn settings_hash(&self) -> u64 {
        self.hash
    }
}
