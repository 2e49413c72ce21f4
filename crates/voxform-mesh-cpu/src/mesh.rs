use voxform_geom::{Aabb, Vec3};
use voxform_model::material::{BaseMaterial, MapTransform};
use voxform_model::types::Side;

/// A contiguous index-buffer range rendered with one material.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawGroup {
    pub start: usize,
    pub count: usize,
    /// Index into [`Mesh::materials`].
    pub material_index: usize,
}

/// An image reference with its resolved texture transform.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshMap {
    pub image: String,
    pub uscale: f32,
    pub vscale: f32,
    pub uoffset: f32,
    pub voffset: f32,
    pub rotation: f32,
}

impl MeshMap {
    fn new(image: &str, transform: &MapTransform) -> Self {
        Self {
            image: image.to_string(),
            // -1 is the "use default scale" sentinel
            uscale: if transform.uscale == -1.0 {
                1.0
            } else {
                transform.uscale
            },
            vscale: if transform.vscale == -1.0 {
                1.0
            } else {
                transform.vscale
            },
            uoffset: transform.uoffset,
            voffset: transform.voffset,
            rotation: transform.rotation,
        }
    }
}

/// Renderer-facing material description for one emitted base material.
#[derive(Clone, Debug)]
pub struct MeshMaterial {
    pub kind: String,
    pub side: Side,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub map: Option<MeshMap>,
    pub normal_map: Option<MeshMap>,
}

impl MeshMaterial {
    pub(crate) fn from_base(material: &BaseMaterial) -> Self {
        Self {
            kind: material.kind.clone(),
            // No back side in the output format; back faces are emitted
            // with reversed corners instead.
            side: if material.side == Side::Double {
                Side::Double
            } else {
                Side::Front
            },
            roughness: material.roughness,
            metalness: material.metalness,
            opacity: material.opacity,
            map: material
                .map
                .as_deref()
                .map(|img| MeshMap::new(img, &material.map_transform)),
            normal_map: material
                .normal_map
                .as_deref()
                .map(|img| MeshMap::new(img, &material.map_transform)),
        }
    }
}

/// Generated mesh: parallel attribute buffers, one index buffer, ordered
/// draw groups, and the emitted material list the groups refer to.
///
/// Buffers are pre-sized from the non-culled face count before emission
/// starts; generation appends but never reallocates.
#[derive(Default, Clone, Debug)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub colors: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
    pub groups: Vec<DrawGroup>,
    pub materials: Vec<MeshMaterial>,
    /// Bounding box over all emitted positions (zero when empty), for
    /// renderer accessor ranges and culling.
    pub bounds: Aabb,
}

impl Mesh {
    /// Allocates buffers for exactly `quads` quad faces plus
    /// `light_triangles` standalone triangles.
    pub fn with_capacity(quads: usize, light_triangles: usize) -> Self {
        let verts = quads * 4 + light_triangles * 3;
        Self {
            positions: Vec::with_capacity(verts * 3),
            normals: Vec::with_capacity(verts * 3),
            colors: Vec::with_capacity(verts * 3),
            uvs: Vec::with_capacity(verts * 2),
            indices: Vec::with_capacity(quads * 6 + light_triangles * 3),
            groups: Vec::new(),
            materials: Vec::new(),
            bounds: Aabb::default(),
        }
    }

    /// Recomputes the bounding box from the position buffer.
    pub fn compute_bounds(&mut self) {
        if self.positions.is_empty() {
            self.bounds = Aabb::default();
            return;
        }
        let mut min = Vec3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vec3::new(f32::MIN, f32::MIN, f32::MIN);
        for p in self.positions.chunks_exact(3) {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
        }
        self.bounds = Aabb::new(min, max);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub(crate) fn push_vertex(&mut self, pos: Vec3, normal: Vec3, color: Vec3, uv: [f32; 2]) {
        self.positions.extend_from_slice(&[pos.x, pos.y, pos.z]);
        self.normals
            .extend_from_slice(&[normal.x, normal.y, normal.z]);
        self.colors.extend_from_slice(&[color.x, color.y, color.z]);
        self.uvs.extend_from_slice(&uv);
    }
}
