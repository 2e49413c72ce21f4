//! CPU mesh generation: per-material draw groups, shell surfaces, and
//! light proxy geometry over a prepared voxel model.
#![forbid(unsafe_code)]

mod build;
mod emit;
mod lights;
mod mesh;

pub use build::generate;
pub use mesh::{DrawGroup, Mesh, MeshMap, MeshMaterial};
