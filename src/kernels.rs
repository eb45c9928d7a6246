//! Building blocks of the free-surface Green's functions
//!
//! All functions in this module are pointwise. Singular terms are not treated here: the Rankine
//! source and its gradient return `+inf` at coincident points.
use cauchy::c64;
use num::{One, Zero};
use std::ops::{Add, AddAssign};

/// Euclidean distance between two points.
#[inline]
pub fn compute_distance(p1: &[f64; 3], p2: &[f64; 3]) -> f64 {
    let dx = p1[0] - p2[0];
    let dy = p1[1] - p2[1];
    let dz = p1[2] - p2[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Distance between the projections of two points on a horizontal plane.
#[inline]
pub fn compute_horizontal_distance(p1: &[f64; 3], p2: &[f64; 3]) -> f64 {
    let dx = p1[0] - p2[0];
    let dy = p1[1] - p2[1];
    (dx * dx + dy * dy).sqrt()
}

/// The Rankine source `1 / r`.
#[inline]
pub fn rankine_source(r: f64) -> f64 {
    if r == 0.0 {
        f64::INFINITY
    } else {
        1.0 / r
    }
}

/// Gradient of `1 / |p1 - p2|` with respect to `p1`.
pub fn rankine_source_gradient(p1: &[f64; 3], p2: &[f64; 3]) -> [f64; 3] {
    let dx = p1[0] - p2[0];
    let dy = p1[1] - p2[1];
    let dz = p1[2] - p2[2];
    let r = (dx * dx + dy * dy + dz * dz).sqrt();

    if r == 0.0 {
        return [f64::INFINITY; 3];
    }

    let r3 = r * r * r;
    [-dx / r3, -dy / r3, -dz / r3]
}

/// Value of a kernel for one field point and one source point, with its gradients.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KernelEvaluation {
    /// Value of the kernel
    pub value: c64,
    /// Gradient with respect to the field (collocation) point
    pub field_gradient: [c64; 3],
    /// Gradient with respect to the source point
    pub source_gradient: [c64; 3],
}

impl KernelEvaluation {
    /// Multiply all entries by a real factor.
    pub fn scaled(mut self, factor: f64) -> Self {
        self.value *= factor;
        for i in 0..3 {
            self.field_gradient[i] *= factor;
            self.source_gradient[i] *= factor;
        }
        self
    }

    /// Check that all entries are finite.
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
            && self.field_gradient.iter().all(|g| g.is_finite())
            && self.source_gradient.iter().all(|g| g.is_finite())
    }
}

impl Add for KernelEvaluation {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl AddAssign for KernelEvaluation {
    fn add_assign(&mut self, other: Self) {
        self.value += other.value;
        for i in 0..3 {
            self.field_gradient[i] += other.field_gradient[i];
            self.source_gradient[i] += other.source_gradient[i];
        }
    }
}

/// Mirror image used for a Rankine term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reflection {
    /// The source point itself
    Direct,
    /// Image about the free surface `z = 0`
    FreeSurface,
    /// Image about the sea bed `z = -depth`
    SeaBed(f64),
}

impl Reflection {
    /// Image of a point.
    #[inline]
    pub fn mirror(&self, p: &[f64; 3]) -> [f64; 3] {
        match self {
            Reflection::Direct => *p,
            Reflection::FreeSurface => [p[0], p[1], -p[2]],
            Reflection::SeaBed(depth) => [p[0], p[1], -2.0 * depth - p[2]],
        }
    }
}

/// The Rankine source `1 / |field - image(source)|` and its gradients.
///
/// At coincident points all entries are `+inf`.
pub fn rankine_term(
    field: &[f64; 3],
    source: &[f64; 3],
    reflection: Reflection,
) -> KernelEvaluation {
    let image = reflection.mirror(source);
    let value = rankine_source(compute_distance(field, &image));
    let grad = rankine_source_gradient(field, &image);
    if value.is_infinite() {
        return KernelEvaluation {
            value: c64::new(value, 0.0),
            field_gradient: [c64::new(f64::INFINITY, 0.0); 3],
            source_gradient: [c64::new(f64::INFINITY, 0.0); 3],
        };
    }
    // The mirror flips the vertical component of the source derivative.
    let zsign = match reflection {
        Reflection::Direct => 1.0,
        Reflection::FreeSurface | Reflection::SeaBed(_) => -1.0,
    };
    KernelEvaluation {
        value: c64::new(value, 0.0),
        field_gradient: [
            c64::new(grad[0], 0.0),
            c64::new(grad[1], 0.0),
            c64::new(grad[2], 0.0),
        ],
        source_gradient: [
            c64::new(-grad[0], 0.0),
            c64::new(-grad[1], 0.0),
            c64::new(-zsign * grad[2], 0.0),
        ],
    }
}

/// A term depending on the horizontal distance `r` and the depths of the field point `zf`
/// and of the source point `zp`, with its partial derivatives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CylindricalTerm {
    /// Value
    pub value: c64,
    /// Derivative with respect to the horizontal distance
    pub d_dr: c64,
    /// Derivative with respect to the depth of the field point
    pub d_dzf: c64,
    /// Derivative with respect to the depth of the source point
    pub d_dzp: c64,
}

impl CylindricalTerm {
    /// Convert to Cartesian gradients.
    ///
    /// On the vertical axis (`r = 0`) the horizontal derivatives are taken to be zero.
    pub fn to_cartesian(&self, field: &[f64; 3], source: &[f64; 3]) -> KernelEvaluation {
        let dx = field[0] - source[0];
        let dy = field[1] - source[1];
        let r = (dx * dx + dy * dy).sqrt();
        let (cx, cy) = if r > 0.0 { (dx / r, dy / r) } else { (0.0, 0.0) };
        KernelEvaluation {
            value: self.value,
            field_gradient: [self.d_dr * cx, self.d_dr * cy, self.d_dzf],
            source_gradient: [-self.d_dr * cx, -self.d_dr * cy, self.d_dzp],
        }
    }
}

impl Add for CylindricalTerm {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl AddAssign for CylindricalTerm {
    fn add_assign(&mut self, other: Self) {
        self.value += other.value;
        self.d_dr += other.d_dr;
        self.d_dzf += other.d_dzf;
        self.d_dzp += other.d_dzp;
    }
}

/// Below this value of `k (zf + zp)` the deep water wave part is neglected.
pub const DEEP_WATER_CUTOFF: f64 = -10.0;

/// Dimensionless deep water wave kernel `T(R, Z)`, with `R = k r` and `Z = k (zf + zp)`.
///
/// The dimensional wave part is `k T(k r, k (zf + zp))`. `T` does not depend on `R`; the argument
/// is kept so that tabulations over `(R, Z)` and direct evaluations share one signature.
#[inline]
pub fn deep_water_wave_kernel(_r: f64, z: f64) -> c64 {
    if z > DEEP_WATER_CUTOFF {
        c64::new(2.0 * z.exp(), 0.0)
    } else {
        c64::zero()
    }
}

/// Deep water wave part `2 k exp(k (zf + zp))`.
///
/// Zero if `k` is zero or not finite.
pub fn deep_water_wave_term(k: f64, r: f64, zf: f64, zp: f64) -> CylindricalTerm {
    if k == 0.0 || !k.is_finite() {
        return CylindricalTerm::default();
    }
    let value = deep_water_wave_kernel(k * r, k * (zf + zp)) * k;
    CylindricalTerm {
        value,
        d_dr: c64::zero(),
        d_dzf: value * k,
        d_dzp: value * k,
    }
}

/// `cosh(a) / cosh(b)` and `sinh(a) / cosh(b)`, without overflow for large `|Re b|`.
fn hyperbolic_ratios(a: c64, b: c64) -> (c64, c64) {
    if b.re.abs() < 20.0 {
        let cb = b.cosh();
        return (a.cosh() / cb, a.sinh() / cb);
    }
    // cosh and sinh have even and odd parity, so work with Re(b) > 0.
    let (a, b, sign) = if b.re < 0.0 { (-a, -b, -1.0) } else { (a, b, 1.0) };
    let one = c64::one();
    let scale = (a - b).exp() / (one + (b * -2.0).exp());
    let e = (a * -2.0).exp();
    (scale * (one + e), scale * (one - e) * sign)
}

/// One mode of the finite depth wave part.
///
/// The vertical functions are `cosh(k (z + h)) / cosh(k h)` for the propagating mode and
/// `cos(k (z + h)) / cos(k h)` for evanescent modes. The horizontal function is `1` for
/// `|k r| < 0.1` and `exp(i k r) / sqrt(k r)` otherwise.
pub fn finite_depth_wave_term(
    r: f64,
    zf: f64,
    zp: f64,
    k: c64,
    depth: f64,
    propagating: bool,
) -> CylindricalTerm {
    let kh = k * depth;
    let (phi1, dphi1, phi2, dphi2) = if propagating {
        let (c1, s1) = hyperbolic_ratios(k * (zf + depth), kh);
        let (c2, s2) = hyperbolic_ratios(k * (zp + depth), kh);
        (c1, s1 * k, c2, s2 * k)
    } else {
        let ckh = kh.cos();
        let a1 = k * (zf + depth);
        let a2 = k * (zp + depth);
        (
            a1.cos() / ckh,
            -a1.sin() / ckh * k,
            a2.cos() / ckh,
            -a2.sin() / ckh * k,
        )
    };

    let kr = k * r;
    let (horizontal, d_horizontal) = if kr.norm() < 0.1 {
        (c64::one(), c64::zero())
    } else {
        let i = c64::new(0.0, 1.0);
        let h = (i * kr).exp() / kr.sqrt();
        (h, k * h * (i - c64::new(0.5, 0.0) / kr))
    };

    CylindricalTerm {
        value: phi1 * phi2 * horizontal,
        d_dr: phi1 * phi2 * d_horizontal,
        d_dzf: dphi1 * phi2 * horizontal,
        d_dzp: phi1 * dphi2 * horizontal,
    }
}

/// Sum of the finite depth wave terms over a family of dispersion roots.
///
/// `roots[0]` is the propagating root and only contributes if its real part is positive.
/// The other roots are evanescent.
pub fn finite_depth_wave_part(
    r: f64,
    zf: f64,
    zp: f64,
    roots: &[c64],
    depth: f64,
) -> CylindricalTerm {
    let mut total = CylindricalTerm::default();
    for (index, k) in roots.iter().enumerate() {
        if index == 0 {
            if k.re > 0.0 {
                total += finite_depth_wave_term(r, zf, zp, *k, depth, true);
            }
        } else {
            total += finite_depth_wave_term(r, zf, zp, *k, depth, false);
        }
    }
    total
}

/// A sum of complex exponentials `sum_i c_i exp(a_i x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PronyDecomposition {
    coefficients: Vec<c64>,
    exponents: Vec<c64>,
}

impl PronyDecomposition {
    /// Create a new decomposition.
    pub fn new(coefficients: Vec<c64>, exponents: Vec<c64>) -> Self {
        assert_eq!(
            coefficients.len(),
            exponents.len(),
            "Number of coefficients ({}) does not match number of exponents ({}).",
            coefficients.len(),
            exponents.len()
        );
        Self {
            coefficients,
            exponents,
        }
    }

    /// The coefficients `c_i`.
    pub fn coefficients(&self) -> &[c64] {
        &self.coefficients
    }

    /// The exponents `a_i`.
    pub fn exponents(&self) -> &[c64] {
        &self.exponents
    }

    /// Evaluate the sum at `x`.
    pub fn evaluate(&self, x: f64) -> c64 {
        self.coefficients
            .iter()
            .zip(&self.exponents)
            .map(|(c, a)| *c * (*a * x).exp())
            .sum()
    }
}
