//! Assembly of the single layer and double layer matrices
//!
//! The functions in this module are shared by all Green's functions: they resolve the
//! collocation points and normals, allocate the matrices and fill them from a pointwise kernel.
use crate::kernels::KernelEvaluation;
use crate::mesh::{point_rows, MeshInput};
use crate::traits::{MeshLike, PotentialMatrices};
use crate::types::{Error, FloatingPointPrecision, Result, MAX_MATRIX_DIMENSION};
use cauchy::c64;
use itertools::izip;
use rayon::prelude::*;
use rlst::{rlst_dynamic_array2, RawAccessMut};
use std::borrow::Cow;

/// Collocation points and the normals used for the double layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ColocationData<'a> {
    /// One point per row of the matrices
    pub points: Cow<'a, [[f64; 3]]>,
    /// The collocation normals for the adjoint double layer, or the source normals otherwise
    pub normals: Cow<'a, [[f64; 3]]>,
}

/// Find the collocation points and the normals that enter the double layer matrix.
///
/// The collocation points are the panel centres of `mesh1`, or the rows of the point array.
/// With `adjoint_double_layer` the normals are those of `mesh1` (an all-zero array if `mesh1`
/// is a point array). Otherwise they are the normals of `mesh2`, which must be a mesh.
pub fn extract_colocation_data<'a>(
    mesh1: &MeshInput<'a>,
    mesh2: &MeshInput<'a>,
    adjoint_double_layer: bool,
) -> Result<ColocationData<'a>> {
    let source_normals = |mesh2: &MeshInput<'a>| match mesh2.as_mesh() {
        Some(mesh) => Ok(Cow::Borrowed(mesh.faces_normals())),
        None => Err(Error::TypeMismatch(
            "The second argument must be a mesh to take its normals.".to_string(),
        )),
    };
    match mesh1 {
        MeshInput::Mesh(mesh) => {
            let normals = if adjoint_double_layer {
                Cow::Borrowed(mesh.faces_normals())
            } else {
                source_normals(mesh2)?
            };
            Ok(ColocationData {
                points: Cow::Borrowed(mesh.faces_centers()),
                normals,
            })
        }
        MeshInput::Points(array) => {
            let points = point_rows(array)?;
            let normals = if adjoint_double_layer {
                // A free point has no normal.
                Cow::Owned(vec![[0.0; 3]; points.len()])
            } else {
                source_normals(mesh2)?
            };
            Ok(ColocationData {
                points: Cow::Owned(points),
                normals,
            })
        }
    }
}

/// Check that a matrix with the given number of rows and columns can be allocated.
pub fn validate_matrix_dimensions(rows: usize, cols: usize) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(Error::Dimension(format!(
            "Matrix dimensions must be positive, found {rows}x{cols}."
        )));
    }
    if rows > MAX_MATRIX_DIMENSION || cols > MAX_MATRIX_DIMENSION {
        return Err(Error::Dimension(format!(
            "Matrix dimensions {rows}x{cols} exceed the maximum of {MAX_MATRIX_DIMENSION}."
        )));
    }
    Ok(())
}

/// Allocate zeroed `S` and `K` matrices.
///
/// `S` has shape `[rows, cols]`. `K` has shape `[rows, cols]` if `early_dot_product` is set and
/// `[rows, 3 * cols]` otherwise.
pub fn init_matrices(
    rows: usize,
    cols: usize,
    early_dot_product: bool,
) -> Result<PotentialMatrices> {
    validate_matrix_dimensions(rows, cols)?;
    let width = if early_dot_product { 1 } else { 3 };
    let s = rlst_dynamic_array2!(c64, [rows, cols]);
    let k = rlst_dynamic_array2!(c64, [rows, width * cols]);
    Ok((s, k))
}

#[inline]
fn dot(gradient: &[c64; 3], normal: &[f64; 3]) -> c64 {
    gradient[0] * normal[0] + gradient[1] * normal[1] + gradient[2] * normal[2]
}

/// Assemble `S` and `K` from a pointwise kernel.
///
/// `kernel(field, source)` evaluates the Green's function between a collocation point and a
/// source panel centre. Without early dot product, column `3 * j + c` of `K` holds component `c`
/// of the gradient for source panel `j`. The gradient is taken with respect to the field point
/// for the adjoint double layer and with respect to the source point otherwise.
pub fn assemble<F>(
    colocation: &ColocationData,
    sources: &dyn MeshLike,
    adjoint_double_layer: bool,
    early_dot_product: bool,
    precision: FloatingPointPrecision,
    kernel: F,
) -> Result<PotentialMatrices>
where
    F: Fn(&[f64; 3], &[f64; 3]) -> KernelEvaluation + Sync,
{
    let nrows = colocation.points.len();
    let ncols = sources.nb_faces();
    let (mut s, mut k) = init_matrices(nrows, ncols, early_dot_product)?;
    let width = if early_dot_product { 1 } else { 3 };

    let points = &colocation.points;
    let normals = &colocation.normals;
    let source_centers = sources.faces_centers();

    // Both arrays are column major, so each source panel owns a contiguous block of each matrix.
    s.data_mut()
        .par_chunks_mut(nrows)
        .zip(k.data_mut().par_chunks_mut(width * nrows))
        .enumerate()
        .for_each(|(j, (s_column, k_columns))| {
            let source = &source_centers[j];
            for (i, (field, s_entry)) in izip!(points.iter(), s_column.iter_mut()).enumerate() {
                let evaluation = kernel(field, source);
                *s_entry = precision.round(evaluation.value);
                let gradient = if adjoint_double_layer {
                    &evaluation.field_gradient
                } else {
                    &evaluation.source_gradient
                };
                if early_dot_product {
                    let normal = if adjoint_double_layer {
                        &normals[i]
                    } else {
                        &normals[j]
                    };
                    k_columns[i] = precision.round(dot(gradient, normal));
                } else {
                    for (c, g) in gradient.iter().enumerate() {
                        k_columns[c * nrows + i] = precision.round(*g);
                    }
                }
            }
        });

    Ok((s, k))
}
