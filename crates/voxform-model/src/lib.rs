//! Model, material, and planar-descriptor crate.
#![forbid(unsafe_code)]

pub mod bitset;
pub mod config;
pub mod material;
pub mod model;
pub mod planar;
pub mod types;

// Re-exports for convenience
pub use bitset::Bitset;
pub use config::LoadedModelConfig;
pub use material::{BaseMaterial, DeformSettings, MapTransform, MaterialCatalog, Shell, WarpSettings};
pub use model::{FaceBuffers, Light, Model, VertexArena};
pub use planar::{Planar, PlanarError};
pub use types::{AxisFlags, Lighting, MaterialId, Side};
