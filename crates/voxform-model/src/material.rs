use std::collections::HashMap;

use serde::Deserialize;

use crate::planar::Planar;
use crate::types::{Lighting, MaterialId, Side};

/// One outward-offset duplicate surface layer of a material.
#[derive(Clone, Debug, PartialEq)]
pub struct Shell {
    /// Outward distance in model units (multiplied by the model scale).
    pub distance: f32,
    pub color: [f32; 3],
    /// Base material the shell surface is rendered with.
    pub material: MaterialId,
}

/// Iterative relaxation settings (Laplacian smoothing toward link means).
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct DeformSettings {
    pub count: u32,
    #[serde(default = "one")]
    pub strength: f32,
    #[serde(default = "one")]
    pub damping: f32,
}

/// Coherent-noise warp settings.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct WarpSettings {
    pub amplitude: f32,
    #[serde(default = "one")]
    pub frequency: f32,
}

/// Texture transform; `-1` scale means "use the default of 1".
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapTransform {
    pub uscale: f32,
    pub vscale: f32,
    pub uoffset: f32,
    pub voffset: f32,
    pub rotation: f32,
}

impl Default for MapTransform {
    fn default() -> Self {
        Self {
            uscale: -1.0,
            vscale: -1.0,
            uoffset: 0.0,
            voffset: 0.0,
            rotation: 0.0,
        }
    }
}

fn one() -> f32 {
    1.0
}

/// A render-state grouping key shared by many faces. The mesh generator
/// emits one contiguous draw group per base material, in catalog order.
#[derive(Clone, Debug)]
pub struct BaseMaterial {
    pub id: MaterialId,
    pub key: String,
    /// Material type name passed through to the renderer adapter.
    pub kind: String,
    pub side: Side,
    pub lighting: Lighting,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub map: Option<String>,
    pub normal_map: Option<String>,
    pub map_transform: MapTransform,
    /// Shell list override; `None` inherits the model default.
    pub shell: Option<Vec<Shell>>,
    pub deform: Option<DeformSettings>,
    pub warp: Option<WarpSettings>,
    pub scatter: f32,
    pub clamp: Option<Planar>,
    pub flatten: Option<Planar>,
}

impl BaseMaterial {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            id: MaterialId(0),
            key: key.into(),
            kind: "standard".to_string(),
            side: Side::default(),
            lighting: Lighting::default(),
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            map: None,
            normal_map: None,
            map_transform: MapTransform::default(),
            shell: None,
            deform: None,
            warp: None,
            scatter: 0.0,
            clamp: None,
            flatten: None,
        }
    }
}

/// Ordered base-material list. Order is load-bearing: draw groups are
/// emitted in catalog order and renderers match groups to materials by it.
#[derive(Default, Clone, Debug)]
pub struct MaterialCatalog {
    pub materials: Vec<BaseMaterial>,
    by_key: HashMap<String, MaterialId>,
}

impl MaterialCatalog {
    pub fn new() -> Self {
        Self {
            materials: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    /// Appends a material, assigning the next id in declaration order.
    pub fn add(&mut self, mut material: BaseMaterial) -> MaterialId {
        let id = MaterialId(self.materials.len() as u16);
        material.id = id;
        self.by_key.insert(material.key.clone(), id);
        self.materials.push(material);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&BaseMaterial> {
        self.materials.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut BaseMaterial> {
        self.materials.get_mut(id.0 as usize)
    }

    pub fn get_id(&self, key: &str) -> Option<MaterialId> {
        self.by_key.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BaseMaterial> {
        self.materials.iter()
    }

    /// Maximum configured relaxation step count over all materials.
    pub fn maximum_deform_count(&self) -> u32 {
        self.materials
            .iter()
            .filter_map(|m| m.deform.map(|d| d.count))
            .max()
            .unwrap_or(0)
    }
}
