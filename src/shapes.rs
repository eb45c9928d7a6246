//! Definition of various test shapes.

use crate::mesh::PanelMesh;
use std::f64::consts::PI;

/// Create a horizontal rectangular plate
///
/// The plate has `nx * ny` square panels of side `spacing` lying in the plane `z = depth`,
/// with the first panel centred at `(spacing / 2, spacing / 2, depth)`. All normals point up.
pub fn horizontal_plate(nx: usize, ny: usize, spacing: f64, depth: f64) -> PanelMesh {
    if nx == 0 || ny == 0 {
        panic!("Cannot create a plate with 0 panels");
    }
    let mut centers = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            centers.push([
                (i as f64 + 0.5) * spacing,
                (j as f64 + 0.5) * spacing,
                depth,
            ]);
        }
    }
    let normals = vec![[0.0, 0.0, 1.0]; centers.len()];
    PanelMesh::new(centers, normals).unwrap()
}

/// Create a sphere
///
/// The sphere of radius `radius` around `center` is split into `n_theta` bands of equal polar
/// angle and `n_phi` sectors of equal azimuth. Each panel is represented by the point at the
/// centre of its angular cell, with the outward unit normal.
pub fn sphere(n_theta: usize, n_phi: usize, radius: f64, center: [f64; 3]) -> PanelMesh {
    if n_theta == 0 || n_phi == 0 {
        panic!("Cannot create a sphere with 0 panels");
    }
    let mut centers = Vec::with_capacity(n_theta * n_phi);
    let mut normals = Vec::with_capacity(n_theta * n_phi);
    for i in 0..n_theta {
        let theta = PI * (i as f64 + 0.5) / n_theta as f64;
        for j in 0..n_phi {
            let phi = 2.0 * PI * (j as f64 + 0.5) / n_phi as f64;
            let n = [
                theta.sin() * phi.cos(),
                theta.sin() * phi.sin(),
                theta.cos(),
            ];
            centers.push([
                center[0] + radius * n[0],
                center[1] + radius * n[1],
                center[2] + radius * n[2],
            ]);
            normals.push(n);
        }
    }
    PanelMesh::new(centers, normals).unwrap()
}
