//! Vertex deformation engine: circular projection, iterative relaxation,
//! noise warp, and random scatter.
#![forbid(unsafe_code)]

use fastnoise_lite::{FastNoiseLite, NoiseType};
use voxform_geom::Vec3;
use voxform_model::Model;
use voxform_model::planar::PLANE_EPSILON;

/// Deformation shape of a whole model.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Shape {
    Sphere,
    CylinderX,
    CylinderY,
    CylinderZ,
    Box,
}

impl Shape {
    /// Unknown names behave like "box": no deformation at all.
    fn parse(name: &str) -> Shape {
        match name {
            "sphere" => Shape::Sphere,
            "cylinder-x" => Shape::CylinderX,
            "cylinder-y" => Shape::CylinderY,
            "cylinder-z" => Shape::CylinderZ,
            _ => Shape::Box,
        }
    }

    /// Per-axis projection strength: 1 participates, 0 passes through.
    fn strengths(self) -> (f32, f32, f32) {
        match self {
            Shape::Sphere => (1.0, 1.0, 1.0),
            Shape::CylinderX => (0.0, 1.0, 1.0),
            Shape::CylinderY => (1.0, 0.0, 1.0),
            Shape::CylinderZ => (1.0, 1.0, 0.0),
            Shape::Box => (0.0, 0.0, 0.0),
        }
    }
}

/// Applies the model's configured shape by projecting vertices onto the
/// inscribed sphere or cylinder. "box" and unknown shapes are no-ops.
pub fn change_shape(model: &mut Model) {
    let Some(name) = model.shape.clone() else {
        return;
    };
    let shape = Shape::parse(&name);
    if shape == Shape::Box {
        return;
    }
    let (sx, sy, sz) = shape.strengths();
    circular_deform(model, sx, sy, sz);
}

fn circular_deform(model: &mut Model, sx: f32, sy: f32, sz: f32) {
    let center = model.bounds.center();
    for v in 0..model.vertices.len() as u32 {
        let o = model.vertices.position(v) - center;
        let box_extent = (o.x * sx)
            .abs()
            .max((o.y * sy).abs())
            .max((o.z * sz).abs());
        let radius = (o.x * o.x * sx + o.y * o.y * sy + o.z * o.z * sz).sqrt();
        if radius == 0.0 {
            // Degenerate center point stays put
            continue;
        }
        let factor = box_extent / radius;
        model.vertices.stage(
            v,
            Vec3::new(
                o.x * ((1.0 - sx) + sx * factor) + center.x,
                o.y * ((1.0 - sy) + sy * factor) + center.y,
                o.z * ((1.0 - sz) + sz * factor) + center.z,
            ),
        );
        model.vertices.ring[v as usize] = box_extent;
    }

    // Shape projection may move boundary vertices freely
    model.vertices.commit_unconstrained();

    mark_equidistant_faces(model);
}

/// Flags faces whose 4 corners sit at one ring distance, for consumers
/// that need to identify faces lying on a perfect spherical shell.
fn mark_equidistant_faces(model: &mut Model) {
    for face in 0..model.faces.face_count() {
        if model.faces.culled.get(face) {
            continue;
        }
        let ring = model.vertices.ring[model.faces.vert_indices[face * 4] as usize];
        let mut equidistant = true;
        for c in 1..4 {
            let r = model.vertices.ring[model.faces.vert_indices[face * 4 + c] as usize];
            if r != ring {
                equidistant = false;
                break;
            }
        }
        model.faces.equidistant.set(face, equidistant);
    }
}

/// Runs `maximum_count` relaxation steps, each moving vertices toward the
/// mean of their linked neighbors with exponentially decaying strength.
///
/// All reads within a step see the previous step's committed positions;
/// clamp/flatten constraints apply at every commit.
pub fn relax(model: &mut Model, maximum_count: u32) {
    for step in 0..maximum_count {
        for v in 0..model.vertices.len() as u32 {
            let Some(deform) = model.vertices.deform[v as usize] else {
                continue;
            };
            if deform.count <= step {
                continue;
            }
            let mean = {
                let links = model.vertices.links_of(v);
                if links.is_empty() {
                    continue;
                }
                let mut sum = Vec3::ZERO;
                for &l in links {
                    sum += model.vertices.position(l);
                }
                sum / links.len() as f32
            };
            let strength = deform.damping.powi(step as i32) * deform.strength;
            if strength != 0.0 {
                let current = model.vertices.position(v);
                model.vertices.stage(v, current + (mean - current) * strength);
            }
        }
        model.vertices.commit_constrained();
    }
    log::debug!(
        target: "deform",
        "relaxation done steps={} vertices={}",
        maximum_count,
        model.vertices.len()
    );
}

/// Noise warp and random scatter with an explicit seed, so deformation is
/// reproducible.
pub struct Deformer {
    noise: FastNoiseLite,
    rng: fastrand::Rng,
}

impl Deformer {
    pub fn new(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        // Per-vertex warp frequency scales the sample coordinates instead
        noise.set_frequency(Some(1.0));
        Self {
            noise,
            rng: fastrand::Rng::with_seed(seed as u32 as u64),
        }
    }

    /// Full deformation pipeline: shape projection, relaxation, then
    /// warp and scatter.
    pub fn apply(&mut self, model: &mut Model) {
        change_shape(model);
        let maximum_count = model.catalog.maximum_deform_count();
        if maximum_count > 0 {
            relax(model, maximum_count);
        }
        self.warp_and_scatter(model);
    }

    /// Adds a coherent-noise offset plus uniform jitter to every vertex
    /// carrying warp or scatter settings. Vertices near a tiled boundary
    /// are skipped so tiled meshes keep seamless edges.
    pub fn warp_and_scatter(&mut self, model: &mut Model) {
        let tile = model.tile;
        let tiled = tile.any();
        let lo = model.bounds.vertex_min();
        let hi = model.bounds.vertex_max();

        for v in 0..model.vertices.len() as u32 {
            let p = model.vertices.position(v);
            if tiled
                && ((tile.nx && p.x < lo.x + PLANE_EPSILON)
                    || (tile.px && p.x > hi.x - PLANE_EPSILON)
                    || (tile.ny && p.y < lo.y + PLANE_EPSILON)
                    || (tile.py && p.y > hi.y - PLANE_EPSILON)
                    || (tile.nz && p.z < lo.z + PLANE_EPSILON)
                    || (tile.pz && p.z > hi.z - PLANE_EPSILON))
            {
                continue;
            }

            let (amplitude, frequency) = model.vertices.warp[v as usize]
                .map_or((0.0, 0.0), |w| (w.amplitude, w.frequency));
            let scatter = model.vertices.scatter[v as usize];
            if amplitude == 0.0 && scatter == 0.0 {
                continue;
            }

            let mut offset = Vec3::ZERO;
            if amplitude != 0.0 {
                // Distinct phase per axis, coordinates cross-sampled
                // cyclically so axis displacements decorrelate.
                offset.x = self.noise.get_noise_3d(
                    (p.x + 0.19) * frequency,
                    p.y * frequency,
                    p.z * frequency,
                ) * amplitude;
                offset.y = self.noise.get_noise_3d(
                    (p.y + 0.17) * frequency,
                    p.z * frequency,
                    p.x * frequency,
                ) * amplitude;
                offset.z = self.noise.get_noise_3d(
                    (p.z + 0.13) * frequency,
                    p.x * frequency,
                    p.y * frequency,
                ) * amplitude;
            }
            if scatter != 0.0 {
                offset.x += (self.rng.f32() * 2.0 - 1.0) * scatter;
                offset.y += (self.rng.f32() * 2.0 - 1.0) * scatter;
                offset.z += (self.rng.f32() * 2.0 - 1.0) * scatter;
            }

            model.vertices.stage(v, p + offset);
        }

        model.vertices.commit_constrained();
    }
}
