//! TOML configuration for materials and model-level generation settings.

use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use voxform_geom::Vec3;

use crate::material::{BaseMaterial, DeformSettings, MapTransform, MaterialCatalog, Shell, WarpSettings};
use crate::planar::Planar;
use crate::types::{Lighting, MaterialId, Side};

/// Catalog plus resolved model-level settings, ready to seed a `Model`.
#[derive(Clone, Debug)]
pub struct LoadedModelConfig {
    pub catalog: MaterialCatalog,
    pub shape: Option<String>,
    pub tile: Planar,
    pub scale: Vec3,
    pub shell: Vec<Shell>,
    pub clamp_colors: bool,
}

impl LoadedModelConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ModelConfig = toml::from_str(toml_str)?;

        let mut entries: Vec<(String, MaterialEntry)> = cfg.materials.into_iter().collect();
        // HashMap iteration order is nondeterministic; sort keys so
        // MaterialId assignment (and thus draw-group order) is stable.
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut catalog = MaterialCatalog::new();
        for (key, entry) in &entries {
            let mut material = BaseMaterial::new(key.clone());
            if let Some(kind) = &entry.kind {
                material.kind = kind.clone();
            }
            material.side = entry.side;
            material.lighting = entry.lighting;
            material.roughness = entry.roughness;
            material.metalness = entry.metalness;
            material.opacity = entry.opacity;
            material.map = entry.map.clone();
            material.normal_map = entry.normal_map.clone();
            material.map_transform = entry.map_transform;
            material.deform = entry.deform;
            material.warp = entry.warp;
            material.scatter = entry.scatter;
            material.clamp = parse_optional_planar(entry.clamp.as_deref())?;
            material.flatten = parse_optional_planar(entry.flatten.as_deref())?;
            catalog.add(material);
        }

        // Shell targets reference materials by key, so they resolve after
        // every id is assigned.
        for (key, entry) in &entries {
            if entry.shell.is_empty() {
                continue;
            }
            let shells = resolve_shells(&entry.shell, &catalog)?;
            let id = catalog.get_id(key).expect("just inserted");
            catalog.get_mut(id).expect("just inserted").shell = Some(shells);
        }
        let model_shell = resolve_shells(&cfg.model.shell, &catalog)?;

        let tile = parse_optional_planar(cfg.model.tile.as_deref())?.unwrap_or(Planar::NONE);
        let scale = cfg.model.scale.map_or(Vec3::new(1.0, 1.0, 1.0), |s| {
            Vec3::new(s[0], s[1], s[2])
        });

        Ok(Self {
            catalog,
            shape: cfg.model.shape,
            tile,
            scale,
            shell: model_shell,
            clamp_colors: cfg.model.clamp_colors,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

fn parse_optional_planar(raw: Option<&str>) -> Result<Option<Planar>, Box<dyn Error>> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Ok(Some(Planar::parse(s)?)),
    }
}

fn resolve_shells(
    entries: &[ShellEntry],
    catalog: &MaterialCatalog,
) -> Result<Vec<Shell>, Box<dyn Error>> {
    let mut shells = Vec::with_capacity(entries.len());
    for e in entries {
        let material: MaterialId = catalog
            .get_id(&e.material)
            .ok_or_else(|| format!("shell references unknown material '{}'", e.material))?;
        shells.push(Shell {
            distance: e.distance,
            color: e.color,
            material,
        });
    }
    Ok(shells)
}

// --- Config ---

#[derive(Deserialize)]
struct ModelConfig {
    #[serde(default)]
    model: ModelSettings,
    materials: HashMap<String, MaterialEntry>,
}

#[derive(Deserialize, Default)]
struct ModelSettings {
    shape: Option<String>,
    tile: Option<String>,
    scale: Option<[f32; 3]>,
    #[serde(default)]
    shell: Vec<ShellEntry>,
    #[serde(default)]
    clamp_colors: bool,
}

#[derive(Deserialize)]
struct ShellEntry {
    distance: f32,
    color: [f32; 3],
    material: String,
}

#[derive(Deserialize)]
struct MaterialEntry {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    side: Side,
    #[serde(default)]
    lighting: Lighting,
    #[serde(default = "default_roughness")]
    roughness: f32,
    #[serde(default)]
    metalness: f32,
    #[serde(default = "default_opacity")]
    opacity: f32,
    map: Option<String>,
    normal_map: Option<String>,
    #[serde(default)]
    map_transform: MapTransform,
    #[serde(default)]
    shell: Vec<ShellEntry>,
    deform: Option<DeformSettings>,
    warp: Option<WarpSettings>,
    #[serde(default)]
    scatter: f32,
    clamp: Option<String>,
    flatten: Option<String>,
}

fn default_roughness() -> f32 {
    1.0
}

fn default_opacity() -> f32 {
    1.0
}
