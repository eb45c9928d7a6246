//! Bempp hydro: free-surface Green's functions for marine boundary element methods
//!
//! Given a collocation mesh (or a set of field points), a source mesh, the position of the free
//! surface, the water depth and a wave number, a [GreenFunction](traits::GreenFunction)
//! assembles the single layer matrix `S` and the double layer matrix `K`.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;

pub mod assembly;
pub mod dispersion;
pub mod green_functions;
pub mod kernels;
pub mod mesh;
pub mod shapes;
pub mod tabulation;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test {
    extern crate blas_src;
    extern crate lapack_src;
}
