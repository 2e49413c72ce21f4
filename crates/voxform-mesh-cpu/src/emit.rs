//! Per-face emission: corner gathering, back-side corner swap, normal
//! resolution, and the flat 4-vertex/6-index quad layout.

use voxform_geom::Vec3;
use voxform_model::material::BaseMaterial;
use voxform_model::types::{Lighting, Side};
use voxform_model::{Model, Shell};

use crate::mesh::Mesh;

/// Resolves the four corner normals of a quad for a lighting mode.
///
/// Flat (and Both without the smooth flag) creases the quad along its
/// diagonal: corners 0..2 share the first triangle normal and corner 3
/// alone carries the second. That corner-3 assignment is a documented
/// approximation kept for compatibility; Quad removes the crease by
/// blending both triangle normals into one shared vector.
pub(crate) fn resolve_corner_normals(
    lighting: Lighting,
    smooth: bool,
    normals: [Vec3; 4],
) -> [Vec3; 4] {
    match lighting {
        Lighting::Smooth => normals,
        Lighting::Both if smooth => normals,
        _ => {
            let norm_face1 = (normals[2] + normals[1] + normals[0]).normalized();
            let norm_face2 = (normals[0] + normals[3] + normals[2]).normalized();
            if lighting == Lighting::Quad {
                let combined_length = norm_face1.length() + norm_face2.length();
                let blended = (norm_face1 + norm_face2) / combined_length;
                [blended; 4]
            } else {
                [norm_face1, norm_face1, norm_face1, norm_face2]
            }
        }
    }
}

/// Gathered per-corner attributes of one face, after any side swap.
struct Corners {
    positions: [Vec3; 4],
    normals: [Vec3; 4],
    colors: [Vec3; 4],
    uvs: [[f32; 2]; 4],
}

fn gather_corners(model: &Model, face: usize, side: Side) -> Corners {
    let mut positions = [Vec3::ZERO; 4];
    let mut normals = [Vec3::ZERO; 4];
    let mut colors = [Vec3::ZERO; 4];
    let mut uvs = [[0.0f32; 2]; 4];
    for c in 0..4 {
        let corner = model.faces.corner(face, c);
        positions[c] = model.vertices.position(model.faces.vert_indices[corner]);
        normals[c] = model.faces.normals[corner];
        colors[c] = model.faces.colors[corner];
        uvs[c] = model.faces.uvs[corner];
    }
    if side == Side::Back {
        // Rendered back-facing by reversing two opposite corners rather
        // than by reversing triangle winding.
        positions.swap(0, 2);
        normals.swap(0, 2);
        colors.swap(0, 2);
        uvs.swap(0, 2);
    }
    Corners {
        positions,
        normals,
        colors,
        uvs,
    }
}

#[inline]
fn clamp_color(color: Vec3) -> Vec3 {
    if color.length() > 0.0 {
        color.normalized()
    } else {
        color
    }
}

fn push_quad(mesh: &mut Mesh, corners: &Corners, normals: [Vec3; 4], clamp_colors: bool) {
    let base = mesh.vertex_count() as u32;
    for c in 0..4 {
        let color = if clamp_colors {
            clamp_color(corners.colors[c])
        } else {
            corners.colors[c]
        };
        mesh.push_vertex(corners.positions[c], normals[c], color, corners.uvs[c]);
    }
    mesh.indices
        .extend_from_slice(&[base + 2, base + 1, base, base, base + 3, base + 2]);
}

/// Emits one non-culled face as 4 fresh vertices and 2 triangles.
pub(crate) fn emit_face(model: &Model, face: usize, material: &BaseMaterial, mesh: &mut Mesh) {
    let corners = gather_corners(model, face, material.side);
    let smooth = model.faces.smooth.get(face);
    let resolved = resolve_corner_normals(material.lighting, smooth, corners.normals);
    push_quad(mesh, &corners, resolved, model.clamp_colors);
}

/// Emits one shell copy of a face: corners pushed outward along their
/// lighting-resolved normals, colored with the shell color, rendered by
/// the shell's target material.
pub(crate) fn emit_shell_face(
    model: &Model,
    face: usize,
    shell: &Shell,
    target: &BaseMaterial,
    mesh: &mut Mesh,
) {
    let mut corners = gather_corners(model, face, target.side);
    let smooth = model.faces.smooth.get(face);
    let resolved = resolve_corner_normals(target.lighting, smooth, corners.normals);
    for c in 0..4 {
        let direction = resolved[c].normalized();
        corners.positions[c] += direction.scaled(model.scale) * shell.distance;
        corners.colors[c] = Vec3::new(shell.color[0], shell.color[1], shell.color[2]);
    }
    push_quad(mesh, &corners, resolved, false);
}
