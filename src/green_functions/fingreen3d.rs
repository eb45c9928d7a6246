//! Finite depth Green's function following the series of Liu (2013)
use super::{rankine_reflections, rankine_sum, source_mesh, validate_physical_parameters};
use crate::assembly::{assemble, extract_colocation_data};
use crate::dispersion::{compute_root_family, DEFAULT_EVANESCENT_MODES};
use crate::green_functions::settings::Setting;
use crate::kernels::{
    compute_horizontal_distance, deep_water_wave_term, finite_depth_wave_part,
    finite_depth_wave_term, rankine_source, CylindricalTerm,
};
use crate::mesh::MeshInput;
use crate::traits::{GreenFunction, PotentialMatrices};
use crate::types::{Error, FloatingPointPrecision, Result};
use cauchy::c64;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters of [FinGreen3D].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinGreen3DParameters {
    /// Initial water depth
    pub water_depth: f64,
    /// Number of evanescent modes in the series
    pub evanescent_modes: usize,
    /// Precision of the assembled matrices
    pub floating_point_precision: FloatingPointPrecision,
}

impl Default for FinGreen3DParameters {
    fn default() -> Self {
        Self {
            water_depth: f64::INFINITY,
            evanescent_modes: DEFAULT_EVANESCENT_MODES,
            floating_point_precision: FloatingPointPrecision::Float64,
        }
    }
}

/// Green's function with a free surface at `z = 0` and a sea bed at `z = -water_depth`.
///
/// The instance keeps the water depth and the wave number of the last evaluation together with
/// the roots of the dispersion relation, which are only recomputed when one of them changes.
#[derive(Debug, Clone, PartialEq)]
pub struct FinGreen3D {
    parameters: FinGreen3DParameters,
    wavenumber: c64,
    roots: Vec<c64>,
}

impl FinGreen3D {
    /// Create a new Green's function for a water depth.
    pub fn new(water_depth: f64) -> Self {
        Self::with_parameters(FinGreen3DParameters {
            water_depth,
            ..Default::default()
        })
    }

    /// Create a new Green's function from its parameters.
    pub fn with_parameters(parameters: FinGreen3DParameters) -> Self {
        let wavenumber = c64::new(0.0, 0.0);
        let roots = compute_root_family(
            wavenumber,
            parameters.water_depth,
            parameters.evanescent_modes,
        );
        Self {
            parameters,
            wavenumber,
            roots,
        }
    }

    /// The current water depth.
    pub fn water_depth(&self) -> f64 {
        self.parameters.water_depth
    }

    /// The current wave number.
    pub fn wavenumber(&self) -> c64 {
        self.wavenumber
    }

    /// The roots of the dispersion relation for the current depth and wave number.
    pub fn dispersion_roots(&self) -> &[c64] {
        &self.roots
    }

    /// The parameters.
    pub fn parameters(&self) -> &FinGreen3DParameters {
        &self.parameters
    }

    fn update_roots(&mut self) {
        self.roots = compute_root_family(
            self.wavenumber,
            self.parameters.water_depth,
            self.parameters.evanescent_modes,
        );
        debug!(
            "FinGreen3D: {} dispersion roots for depth {} and wave number {}",
            self.roots.len(),
            self.parameters.water_depth,
            self.wavenumber
        );
    }

    /// Set the wave number and recompute the dispersion roots.
    pub fn set_wavenumber(&mut self, wavenumber: c64) {
        self.wavenumber = wavenumber;
        self.update_roots();
    }

    /// Set the water depth and recompute the dispersion roots.
    pub fn set_water_depth(&mut self, water_depth: f64) {
        self.parameters.water_depth = water_depth;
        self.update_roots();
    }

    /// One mode of the finite depth series.
    pub fn wave_term(&self, r: f64, zf: f64, zp: f64, k: c64, propagating: bool) -> c64 {
        finite_depth_wave_term(r, zf, zp, k, self.parameters.water_depth, propagating).value
    }

    fn wave_part(&self, r: f64, zf: f64, zp: f64) -> CylindricalTerm {
        if !self.wavenumber.re.is_finite() {
            return CylindricalTerm::default();
        }
        if self.parameters.water_depth == f64::INFINITY {
            deep_water_wave_term(self.wavenumber.re, r, zf, zp)
        } else {
            finite_depth_wave_part(r, zf, zp, &self.roots, self.parameters.water_depth)
        }
    }

    /// Value of the Green's function for a horizontal distance `r` between a field point at
    /// depth `zf` and a source at depth `zp`.
    ///
    /// The direct Rankine term makes this `+inf` at coincident points.
    pub fn green_function_value(&self, r: f64, zf: f64, zp: f64) -> c64 {
        let direct = rankine_source((r * r + (zf - zp) * (zf - zp)).sqrt());
        let image = rankine_source((r * r + (zf + zp) * (zf + zp)).sqrt());
        c64::new(direct + image, 0.0) + self.wave_part(r, zf, zp).value
    }
}

impl fmt::Display for FinGreen3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FinGreen3D(water_depth={:.2})", self.parameters.water_depth)
    }
}

impl GreenFunction for FinGreen3D {
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
        if free_surface != 0.0 {
            return Err(Error::DomainConstraint(
                "FinGreen3D requires a free surface at z=0.".to_string(),
            ));
        }
        let sources = source_mesh(mesh2)?;
        let colocation = extract_colocation_data(mesh1, mesh2, adjoint_double_layer)?;

        if water_depth != self.parameters.water_depth || wavenumber != self.wavenumber {
            self.parameters.water_depth = water_depth;
            self.set_wavenumber(wavenumber);
        }

        // The sea bed is accounted for by the series, so only the free-surface image is used.
        let terms = rankine_reflections(free_surface, f64::INFINITY, 1.0);
        let this = &*self;
        assemble(
            &colocation,
            sources,
            adjoint_double_layer,
            early_dot_product,
            self.parameters.floating_point_precision,
            |field, source| {
                let r = compute_horizontal_distance(field, source);
                let wave = this.wave_part(r, field[2], source[2]);
                let rankine = rankine_sum(field, source, &terms, true).unwrap_or_default();
                rankine + wave.to_cartesian(field, source)
            },
        )
    }

    fn floating_point_precision(&self) -> FloatingPointPrecision {
        self.parameters.floating_point_precision
    }

    fn exportable_settings(&self) -> Vec<Setting> {
        vec![
            Setting::new("green_function", "FinGreen3D"),
            Setting::new("water_depth", self.parameters.water_depth),
            Setting::new("evanescent_modes", self.parameters.evanescent_modes),
            Setting::new(
                "floating_point_precision",
                self.parameters.floating_point_precision.as_str(),
            ),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dispersion::compute_wave_number;
    use crate::kernels::compute_distance;
    use crate::mesh::PanelMesh;
    use crate::traits::MeshLike;
    use approx::assert_relative_eq;
    use rlst::{RandomAccessByRef, Shape};
    use std::f64::consts::PI;

    fn meshes() -> (PanelMesh, PanelMesh) {
        (
            PanelMesh::new(
                vec![[0.0, 0.0, -5.0], [1.0, 0.0, -5.0]],
                vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
            )
            .unwrap(),
            PanelMesh::new(
                vec![[0.0, 1.0, -5.0], [1.0, 1.0, -5.0]],
                vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_new() {
        let gf = FinGreen3D::new(20.0);
        assert_eq!(gf.water_depth(), 20.0);
        assert_eq!(gf.to_string(), "FinGreen3D(water_depth=20.00)");
        assert_eq!(gf.floating_point_precision(), FloatingPointPrecision::Float64);
        assert_eq!(gf.dispersion_roots().len(), DEFAULT_EVANESCENT_MODES + 1);
    }

    #[test]
    fn test_dispersion_roots() {
        let mut gf = FinGreen3D::new(20.0);
        let k = c64::new(0.5, 0.0);
        gf.set_wavenumber(k);
        let roots = gf.dispersion_roots();
        assert_eq!(roots.len(), 11);
        assert_eq!(roots[0], k);
        assert_relative_eq!(roots[3].im, 3.0 * PI / 20.0);

        gf.set_water_depth(f64::INFINITY);
        assert_eq!(gf.dispersion_roots(), &[k]);
    }

    #[test]
    fn test_evaluate_shapes() {
        let (mesh1, mesh2) = meshes();
        let mut gf = FinGreen3D::new(20.0);
        let (s, k) = gf
            .evaluate(
                &MeshInput::from(&mesh1),
                &MeshInput::from(&mesh2),
                0.0,
                20.0,
                c64::new(1.0, 0.0),
                true,
                true,
            )
            .unwrap();
        assert_eq!(s.shape(), [2, 2]);
        assert_eq!(k.shape(), [2, 2]);
        for i in 0..2 {
            for j in 0..2 {
                assert!(s.get([i, j]).unwrap().is_finite());
            }
        }
    }

    #[test]
    fn test_water_depth_change() {
        let (mesh1, mesh2) = meshes();
        let mut gf = FinGreen3D::new(10.0);
        gf.evaluate(
            &MeshInput::from(&mesh1),
            &MeshInput::from(&mesh2),
            0.0,
            15.0,
            c64::new(1.0, 0.0),
            true,
            true,
        )
        .unwrap();
        assert_eq!(gf.water_depth(), 15.0);
        assert_eq!(gf.wavenumber(), c64::new(1.0, 0.0));
        assert_relative_eq!(gf.dispersion_roots()[1].im, PI / 15.0);
    }

    #[test]
    fn test_requires_free_surface() {
        let (mesh1, mesh2) = meshes();
        let mut gf = FinGreen3D::new(10.0);
        let result = gf.evaluate(
            &MeshInput::from(&mesh1),
            &MeshInput::from(&mesh2),
            f64::INFINITY,
            10.0,
            c64::new(1.0, 0.0),
            true,
            true,
        );
        assert!(matches!(result, Err(Error::DomainConstraint(_))));
    }

    #[test]
    fn test_infinite_depth_value() {
        let mut gf = FinGreen3D::new(f64::INFINITY);
        let k = 0.4;
        gf.set_wavenumber(c64::new(k, 0.0));
        let (r, zf, zp) = (2.0, -1.0, -3.0);
        let v = gf.green_function_value(r, zf, zp);
        let expected = 1.0 / (r * r + 4.0f64).sqrt()
            + 1.0 / (r * r + 16.0f64).sqrt()
            + 2.0 * k * (k * (zf + zp)).exp();
        assert_relative_eq!(v.re, expected, epsilon = 1e-14);
        assert_eq!(v.im, 0.0);
    }

    #[test]
    fn test_zero_wavenumber_infinite_depth() {
        let gf = FinGreen3D::new(f64::INFINITY);
        let v = gf.green_function_value(1.0, -1.0, -1.0);
        assert_relative_eq!(v.re, 1.0 + 1.0 / 5.0f64.sqrt(), epsilon = 1e-14);
    }

    #[test]
    fn test_finite_depth_value() {
        let depth = 20.0;
        let mut gf = FinGreen3D::new(depth);
        let k0 = compute_wave_number(1.0, depth);
        gf.set_wavenumber(k0);
        let (r, zf, zp) = (3.0, -2.0, -4.0);
        let v = gf.green_function_value(r, zf, zp);
        let mut expected = c64::new(
            1.0 / (r * r + 4.0f64).sqrt() + 1.0 / (r * r + 36.0f64).sqrt(),
            0.0,
        );
        expected += gf.wave_term(r, zf, zp, k0, true);
        for root in &gf.dispersion_roots()[1..] {
            expected += gf.wave_term(r, zf, zp, *root, false);
        }
        assert!((v - expected).norm() < 1e-12);
        assert!(v.im != 0.0);
    }

    #[test]
    fn test_wave_term() {
        let gf = FinGreen3D::new(10.0);
        let k = c64::new(0.5, 0.0);
        // |k r| < 0.1: the horizontal factor is 1.
        let t = gf.wave_term(0.1, -1.0, -2.0, k, true);
        let expected = (k * 9.0).cosh() / (k * 10.0).cosh() * (k * 8.0).cosh() / (k * 10.0).cosh();
        assert!((t - expected).norm() < 1e-13);

        let m = c64::new(0.0, PI / 10.0);
        let t = gf.wave_term(0.1, -1.0, -2.0, m, false);
        let expected = (m * 9.0).cos() / (m * 10.0).cos() * (m * 8.0).cos() / (m * 10.0).cos();
        assert!((t - expected).norm() < 1e-13);
    }

    #[test]
    fn test_coincident_points_are_desingularized() {
        let mesh = PanelMesh::new(vec![[0.0, 0.0, -1.0]], vec![[0.0, 0.0, 1.0]]).unwrap();
        let x = mesh.faces_centers()[0];
        assert_eq!(compute_distance(&x, &x), 0.0);

        let mut gf = FinGreen3D::new(f64::INFINITY);
        assert_eq!(gf.green_function_value(0.0, -1.0, -1.0).re, f64::INFINITY);
        let (s, _) = gf
            .evaluate(
                &MeshInput::from(&mesh),
                &MeshInput::from(&mesh),
                0.0,
                f64::INFINITY,
                c64::new(1.0, 0.0),
                true,
                true,
            )
            .unwrap();
        let expected = 0.5 + 2.0 * (-2.0f64).exp();
        assert_relative_eq!(s.get([0, 0]).unwrap().re, expected, epsilon = 1e-14);
    }

    #[test]
    fn test_settings() {
        let a = FinGreen3D::new(20.0);
        let b = FinGreen3D::new(20.0);
        let c = FinGreen3D::new(30.0);
        assert_eq!(a.settings_hash(), b.settings_hash());
        assert_ne!(a.settings_hash(), c.settings_hash());
    }
}
