//! Light proxy geometry: a recursively subdivided octahedron per visible
//! area light, appended as one trailing draw group.

use voxform_geom::Vec3;
use voxform_model::model::Light;
use voxform_model::Model;

use crate::mesh::{DrawGroup, Mesh};

#[inline]
fn is_visible(light: &Light) -> bool {
    light.position.is_some() && light.size > 0.0
}

/// Triangles the proxies will add: `8 * 4^detail` per visible light.
pub(crate) fn proxy_triangle_count(lights: &[Light]) -> usize {
    lights
        .iter()
        .filter(|l| is_visible(l))
        .map(|l| 8 * 4usize.pow(l.detail))
        .sum()
}

pub(crate) fn generate_lights(model: &Model, mesh: &mut Mesh) {
    if !model.lights.iter().any(is_visible) {
        return;
    }

    // The octahedron that is subdivided according to light detail
    let v_top = Vec3::new(0.0, 1.0, 0.0);
    let v_front = Vec3::new(0.0, 0.0, -1.0);
    let v_right = Vec3::new(1.0, 0.0, 0.0);
    let v_back = Vec3::new(0.0, 0.0, 1.0);
    let v_left = Vec3::new(-1.0, 0.0, 0.0);
    let v_bottom = Vec3::new(0.0, -1.0, 0.0);

    let start = mesh.indices.len();
    for light in model.lights.iter().filter(|l| is_visible(l)) {
        let position = light.position.expect("visible lights have a position");
        let scale = light.size / 2.0;
        let detail = light.detail;

        create_light_face(position, light.color, scale, detail, v_front, v_right, v_top, mesh);
        create_light_face(position, light.color, scale, detail, v_right, v_back, v_top, mesh);
        create_light_face(position, light.color, scale, detail, v_back, v_left, v_top, mesh);
        create_light_face(position, light.color, scale, detail, v_left, v_front, v_top, mesh);
        create_light_face(position, light.color, scale, detail, v_front, v_bottom, v_right, mesh);
        create_light_face(position, light.color, scale, detail, v_right, v_bottom, v_back, mesh);
        create_light_face(position, light.color, scale, detail, v_back, v_bottom, v_left, mesh);
        create_light_face(position, light.color, scale, detail, v_left, v_bottom, v_front, mesh);
    }
    let count = mesh.indices.len() - start;

    // Light proxies always use the first emitted material; the renderer
    // is expected to bind an emissive/unlit material there.
    mesh.groups.push(DrawGroup {
        start,
        count,
        material_index: 0,
    });
}

fn create_light_face(
    position: Vec3,
    color: [f32; 3],
    scale: f32,
    divisions: u32,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    mesh: &mut Mesh,
) {
    if divisions == 0 {
        let base = mesh.vertex_count() as u32;
        let color = Vec3::new(color[0], color[1], color[2]);
        // Flat normal by rendering convention, not geometry
        let normal = Vec3::new(0.0, 0.0, 1.0);
        for v in [v2, v1, v0] {
            mesh.push_vertex(position + v * scale, normal, color, [0.0, 0.0]);
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    } else {
        // Normalizing the edge midpoints projects them back onto the unit
        // sphere, turning the linear subdivision into a spherical one.
        let v10 = ((v1 + v0) / 2.0).normalized();
        let v12 = ((v1 + v2) / 2.0).normalized();
        let v02 = ((v0 + v2) / 2.0).normalized();
        create_light_face(position, color, scale, divisions - 1, v10, v1, v12, mesh);
        create_light_face(position, color, scale, divisions - 1, v0, v10, v02, mesh);
        create_light_face(position, color, scale, divisions - 1, v02, v12, v2, mesh);
        create_light_face(position, color, scale, divisions - 1, v10, v12, v02, mesh);
    }
}
