//! Mesh inputs

use crate::traits::MeshLike;
use crate::types::{Error, Result};
use rlst::{DynamicArray, RandomAccessByRef, Shape};

/// The first or second argument of an evaluation.
///
/// Panel meshes are used to assemble boundary operators. Point arrays of shape `[n, 3]`
/// are used to evaluate potentials or velocities at arbitrary field points.
#[derive(Clone, Copy)]
pub enum MeshInput<'a> {
    /// A panel mesh
    Mesh(&'a dyn MeshLike),
    /// An array of points with one point per row
    Points(&'a DynamicArray<f64, 2>),
}

impl<'a> MeshInput<'a> {
    /// The number of collocation points this input provides.
    pub fn len(&self) -> usize {
        match self {
            MeshInput::Mesh(mesh) => mesh.nb_faces(),
            MeshInput::Points(points) => points.shape()[0],
        }
    }

    /// Check if there are no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying mesh, if this is a mesh.
    pub fn as_mesh(&self) -> Option<&'a dyn MeshLike> {
        match self {
            MeshInput::Mesh(mesh) => Some(*mesh),
            MeshInput::Points(_) => None,
        }
    }
}

impl<'a, M: MeshLike> From<&'a M> for MeshInput<'a> {
    fn from(mesh: &'a M) -> Self {
        MeshInput::Mesh(mesh)
    }
}

impl<'a> From<&'a DynamicArray<f64, 2>> for MeshInput<'a> {
    fn from(points: &'a DynamicArray<f64, 2>) -> Self {
        MeshInput::Points(points)
    }
}

/// Read the rows of an `[n, 3]` point array.
pub(crate) fn point_rows(points: &DynamicArray<f64, 2>) -> Result<Vec<[f64; 3]>> {
    let [npoints, width] = points.shape();
    if width != 3 {
        return Err(Error::Dimension(format!(
            "Point array must have 3 columns (x, y, z coordinates), found {width}."
        )));
    }
    Ok((0..npoints)
        .map(|i| {
            [
                *points.get([i, 0]).unwrap(),
                *points.get([i, 1]).unwrap(),
                *points.get([i, 2]).unwrap(),
            ]
        })
        .collect())
}

/// A mesh given by the centres and normals of its panels.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelMesh {
    centers: Vec<[f64; 3]>,
    normals: Vec<[f64; 3]>,
}

impl PanelMesh {
    /// Create a new mesh.
    pub fn new(centers: Vec<[f64; 3]>, normals: Vec<[f64; 3]>) -> Result<Self> {
        if centers.len() != normals.len() {
            return Err(Error::Dimension(format!(
                "Number of centres ({}) does not match number of normals ({}).",
                centers.len(),
                normals.len()
            )));
        }
        Ok(Self { centers, normals })
    }

    /// Move the mesh by a vector.
    pub fn translated(&self, shift: [f64; 3]) -> Self {
        Self {
            centers: self
                .centers
                .iter()
                .map(|c| [c[0] + shift[0], c[1] + shift[1], c[2] + shift[2]])
                .collect(),
            normals: self.normals.clone(),
        }
    }
}

impl MeshLike for PanelMesh {
    fn faces_centers(&self) -> &[[f64; 3]] {
        &self.centers
    }

    fn faces_normals(&self) -> &[[f64; 3]] {
        &self.normals
    }
}
