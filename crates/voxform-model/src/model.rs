//! Prepared model buffers: vertex arena, face attributes, and lights.

use voxform_geom::{GridBounds, Vec3};

use crate::bitset::Bitset;
use crate::config::LoadedModelConfig;
use crate::material::{DeformSettings, MaterialCatalog, Shell, WarpSettings};
use crate::planar::Planar;
use crate::types::{AxisFlags, MaterialId};

/// An area light with optional proxy geometry.
#[derive(Clone, Debug)]
pub struct Light {
    /// Lights without a position emit no proxy geometry.
    pub position: Option<Vec3>,
    pub color: [f32; 3],
    /// Proxy diameter in model units; zero hides the proxy.
    pub size: f32,
    /// Octahedron subdivision level (0 = 8 triangles).
    pub detail: u32,
}

/// Contiguous vertex storage shared by up to 8 voxel corners per vertex.
///
/// Deformation passes never write positions directly: they stage into a
/// pending buffer and commit once per pass, so every read within a pass
/// sees the previous pass's committed state.
#[derive(Default, Clone, Debug)]
pub struct VertexArena {
    pos: Vec<Vec3>,
    pending: Vec<Vec3>,
    dirty: Bitset,
    links: Vec<Vec<u32>>,
    pub deform: Vec<Option<DeformSettings>>,
    pub warp: Vec<Option<WarpSettings>>,
    pub scatter: Vec<f32>,
    pub clamp: Vec<AxisFlags>,
    pub flatten: Vec<AxisFlags>,
    /// Box-extent distance recorded by circular deform, per vertex.
    pub ring: Vec<f32>,
}

impl VertexArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn push(&mut self, pos: Vec3) -> u32 {
        let idx = self.pos.len() as u32;
        self.pos.push(pos);
        self.pending.push(pos);
        self.dirty.push(false);
        self.links.push(Vec::new());
        self.deform.push(None);
        self.warp.push(None);
        self.scatter.push(0.0);
        self.clamp.push(AxisFlags::default());
        self.flatten.push(AxisFlags::default());
        self.ring.push(0.0);
        idx
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos.is_empty()
    }

    #[inline]
    pub fn position(&self, v: u32) -> Vec3 {
        self.pos[v as usize]
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.pos
    }

    /// Records `b` as a relaxation neighbor of `a` (one direction).
    pub fn link(&mut self, a: u32, b: u32) {
        self.links[a as usize].push(b);
    }

    #[inline]
    pub fn links_of(&self, v: u32) -> &[u32] {
        &self.links[v as usize]
    }

    /// Stages a pending position for the next commit.
    #[inline]
    pub fn stage(&mut self, v: u32, p: Vec3) {
        debug_assert!(p.is_finite());
        self.pending[v as usize] = p;
        self.dirty.set(v as usize, true);
    }

    /// Adopts every staged position verbatim (boundary vertices move freely).
    pub fn commit_unconstrained(&mut self) {
        for i in 0..self.pos.len() {
            if self.dirty.get(i) {
                self.pos[i] = self.pending[i];
                self.dirty.set(i, false);
            }
        }
    }

    /// Adopts staged positions, keeping the original coordinate on any
    /// axis with a clamp or flatten flag set.
    pub fn commit_constrained(&mut self) {
        for i in 0..self.pos.len() {
            if self.dirty.get(i) {
                let keep = self.clamp[i].or(self.flatten[i]);
                let staged = self.pending[i];
                if keep.any() {
                    let current = self.pos[i];
                    self.pos[i] = Vec3::new(
                        if keep.x { current.x } else { staged.x },
                        if keep.y { current.y } else { staged.y },
                        if keep.z { current.z } else { staged.z },
                    );
                } else {
                    self.pos[i] = staged;
                }
                self.dirty.set(i, false);
            }
        }
    }
}

/// Per-face quad attributes, immutable once preparation finishes.
/// Corners are stored 4 per face in a fixed winding order.
#[derive(Default, Clone, Debug)]
pub struct FaceBuffers {
    pub vert_indices: Vec<u32>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    pub materials: Vec<MaterialId>,
    pub culled: Bitset,
    pub smooth: Bitset,
    pub equidistant: Bitset,
}

impl FaceBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one quad face; returns its face index.
    pub fn push_face(
        &mut self,
        verts: [u32; 4],
        normals: [Vec3; 4],
        colors: [Vec3; 4],
        uvs: [[f32; 2]; 4],
        material: MaterialId,
    ) -> usize {
        let face = self.materials.len();
        self.vert_indices.extend_from_slice(&verts);
        self.normals.extend_from_slice(&normals);
        self.colors.extend_from_slice(&colors);
        self.uvs.extend_from_slice(&uvs);
        self.materials.push(material);
        self.culled.push(false);
        self.smooth.push(false);
        self.equidistant.push(false);
        face
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn corner(&self, face: usize, c: usize) -> usize {
        face * 4 + c
    }

    pub fn non_culled_count(&self) -> usize {
        self.face_count() - self.culled.count_ones()
    }
}

/// A finalized voxel model ready for deformation and mesh generation.
///
/// Produced by an external preparation stage; this crate only defines the
/// buffers and the material-settings propagation it needs.
#[derive(Clone, Debug)]
pub struct Model {
    pub bounds: GridBounds,
    pub catalog: MaterialCatalog,
    pub vertices: VertexArena,
    pub faces: FaceBuffers,
    pub lights: Vec<Light>,
    /// Raw deformation shape name ("sphere", "cylinder-x", ...). Unknown
    /// names behave like "box" (no-op).
    pub shape: Option<String>,
    /// Faces across which the model tiles seamlessly; deformation is
    /// suppressed near these boundaries.
    pub tile: Planar,
    pub scale: Vec3,
    /// Default shell list, inherited by materials without an override.
    pub shell: Vec<Shell>,
    pub clamp_colors: bool,
}

impl Model {
    pub fn new(catalog: MaterialCatalog) -> Self {
        Self {
            bounds: GridBounds::new(),
            catalog,
            vertices: VertexArena::new(),
            faces: FaceBuffers::new(),
            lights: Vec::new(),
            shape: None,
            tile: Planar::NONE,
            scale: Vec3::new(1.0, 1.0, 1.0),
            shell: Vec::new(),
            clamp_colors: false,
        }
    }

    /// Builds an empty model seeded with loaded configuration.
    pub fn from_config(cfg: LoadedModelConfig) -> Self {
        let mut model = Self::new(cfg.catalog);
        model.shape = cfg.shape;
        model.tile = cfg.tile;
        model.scale = cfg.scale;
        model.shell = cfg.shell;
        model.clamp_colors = cfg.clamp_colors;
        model
    }

    #[inline]
    pub fn non_culled_face_count(&self) -> usize {
        self.faces.non_culled_count()
    }

    /// Shell list in effect for a material: its override, else the model
    /// default.
    pub fn effective_shell(&self, material: MaterialId) -> &[Shell] {
        match self.catalog.get(material).and_then(|m| m.shell.as_deref()) {
            Some(shell) => shell,
            None => &self.shell,
        }
    }

    /// Copies per-material deformation settings and boundary constraints
    /// onto the vertices their faces touch.
    ///
    /// When materials disagree on a shared vertex, the stronger setting
    /// wins: higher relaxation count, higher warp amplitude, higher
    /// scatter. Clamp/flatten flags accumulate (OR).
    pub fn propagate_material_settings(&mut self) {
        for face in 0..self.faces.face_count() {
            let Some(material) = self.catalog.get(self.faces.materials[face]) else {
                continue;
            };
            let deform = material.deform;
            let warp = material.warp;
            let scatter = material.scatter;
            let clamp = material.clamp;
            let flatten = material.flatten;

            for c in 0..4 {
                let v = self.faces.vert_indices[face * 4 + c] as usize;
                if let Some(d) = deform {
                    let replace = match self.vertices.deform[v] {
                        Some(existing) => d.count > existing.count,
                        None => true,
                    };
                    if replace {
                        self.vertices.deform[v] = Some(d);
                    }
                }
                if let Some(w) = warp {
                    let replace = match self.vertices.warp[v] {
                        Some(existing) => w.amplitude > existing.amplitude,
                        None => true,
                    };
                    if replace {
                        self.vertices.warp[v] = Some(w);
                    }
                }
                if scatter > self.vertices.scatter[v] {
                    self.vertices.scatter[v] = scatter;
                }

                let pos = self.vertices.position(self.faces.vert_indices[face * 4 + c]);
                if let Some(p) = clamp {
                    let flags = p.boundary_flags(pos, &self.bounds);
                    self.vertices.clamp[v] = self.vertices.clamp[v].or(flags);
                }
                if let Some(p) = flatten {
                    let flags = p.boundary_flags(pos, &self.bounds);
                    self.vertices.flatten[v] = self.vertices.flatten[v].or(flags);
                }
            }
        }
    }
}
