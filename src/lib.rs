//! voxform: smooth-voxel mesh generation.
//!
//! Converts a prepared voxel model (grid cells plus per-material render
//! rules) into renderable triangle-mesh buffers, with a deformation pass
//! that bends the raw cuboid mesh into smooth organic shapes.
#![forbid(unsafe_code)]

pub use voxform_deform::{Deformer, change_shape, relax};
pub use voxform_geom::{Aabb, GridBounds, Vec3};
pub use voxform_mesh_cpu::{DrawGroup, Mesh, MeshMap, MeshMaterial, generate};
pub use voxform_model::{
    AxisFlags, BaseMaterial, Bitset, DeformSettings, FaceBuffers, Light, Lighting,
    LoadedModelConfig, MapTransform, MaterialCatalog, MaterialId, Model, Planar, PlanarError,
    Shell, Side, VertexArena, WarpSettings,
};

/// Runs the full pipeline: material settings propagation, deformation
/// (shape projection, relaxation, warp and scatter), then mesh
/// generation. `seed` drives the warp noise field and scatter jitter.
pub fn generate_mesh(model: &mut Model, seed: i32) -> Mesh {
    model.propagate_material_settings();
    let mut deformer = Deformer::new(seed);
    deformer.apply(model);
    log::debug!(
        target: "voxform",
        "deformed {} vertices, generating mesh for {} faces",
        model.vertices.len(),
        model.non_culled_face_count()
    );
    voxform_mesh_cpu::generate(model)
}
