use std::time::Instant;

use voxform_model::{MaterialId, Model, Shell};

use crate::emit::{emit_face, emit_shell_face};
use crate::lights::{generate_lights, proxy_triangle_count};
use crate::mesh::{DrawGroup, Mesh, MeshMaterial};

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

/// One shell layer to emit: every non-culled face of `source` produces an
/// offset copy rendered by the shell's target material.
struct ShellInstance {
    source: MaterialId,
    shell: Shell,
}

fn collect_shells(model: &Model, live_faces: &[usize]) -> Vec<ShellInstance> {
    let mut shells = Vec::new();
    for material in model.catalog.iter() {
        // A shell copies existing faces; materials without any live face
        // have nothing to copy and produce no group.
        if live_faces[material.id.0 as usize] == 0 {
            continue;
        }
        for shell in model.effective_shell(material.id) {
            shells.push(ShellInstance {
                source: material.id,
                shell: shell.clone(),
            });
        }
    }
    shells
}

/// Generates the complete mesh for a prepared (and already deformed)
/// model: per-material draw groups in catalog order, shell groups sorted
/// by target material, and one trailing light-proxy group.
pub fn generate(model: &Model) -> Mesh {
    let total_start = Instant::now();

    let mat_count = model.catalog.len();

    // Per-material face counts size both the face scan and the shell
    // copies, so buffers allocate once up front.
    let mut face_usage = vec![0usize; mat_count];
    let mut live_faces = vec![0usize; mat_count];
    for face in 0..model.faces.face_count() {
        let m = model.faces.materials[face].0 as usize;
        face_usage[m] += 1;
        if !model.faces.culled.get(face) {
            live_faces[m] += 1;
        }
    }
    let shells = collect_shells(model, &live_faces);

    // A material is emitted when faces reference it (even all-culled ones)
    // or a shell renders with it; untouched materials get no group and no
    // materials entry.
    let mut used = vec![false; mat_count];
    for (i, &n) in face_usage.iter().enumerate() {
        used[i] = n > 0;
    }
    for instance in &shells {
        used[instance.shell.material.0 as usize] = true;
    }

    let shell_quads: usize = shells
        .iter()
        .map(|s| live_faces[s.source.0 as usize])
        .sum();
    let quads = model.non_culled_face_count() + shell_quads;
    let light_triangles = proxy_triangle_count(&model.lights);
    let mut mesh = Mesh::with_capacity(quads, light_triangles);

    let mut emitted_index = vec![None::<usize>; mat_count];
    for (i, material) in model.catalog.iter().enumerate() {
        if used[i] {
            emitted_index[i] = Some(mesh.materials.len());
            mesh.materials.push(MeshMaterial::from_base(material));
        }
    }

    let faces_start = Instant::now();
    for (i, material) in model.catalog.iter().enumerate() {
        // Shell-target-only materials are emitted but own no face group
        if face_usage[i] == 0 {
            continue;
        }
        let start = mesh.indices.len();
        for face in 0..model.faces.face_count() {
            if model.faces.materials[face].0 as usize == i && !model.faces.culled.get(face) {
                emit_face(model, face, material, &mut mesh);
            }
        }
        mesh.groups.push(DrawGroup {
            start,
            count: mesh.indices.len() - start,
            material_index: emitted_index[i].expect("used materials are emitted"),
        });
    }
    let faces_ms = elapsed_ms(faces_start);

    let shells_start = Instant::now();
    let mut ordered: Vec<&ShellInstance> = shells.iter().collect();
    // Ascending target order keeps renderers from re-binding materials
    // out of sequence while walking the groups.
    ordered.sort_by_key(|s| emitted_index[s.shell.material.0 as usize]);
    for instance in ordered {
        let target = model
            .catalog
            .get(instance.shell.material)
            .expect("shell target resolved at load time");
        let start = mesh.indices.len();
        for face in 0..model.faces.face_count() {
            if model.faces.materials[face] == instance.source && !model.faces.culled.get(face) {
                emit_shell_face(model, face, &instance.shell, target, &mut mesh);
            }
        }
        mesh.groups.push(DrawGroup {
            start,
            count: mesh.indices.len() - start,
            material_index: emitted_index[instance.shell.material.0 as usize]
                .expect("shell targets are emitted"),
        });
    }
    let shells_ms = elapsed_ms(shells_start);

    let lights_start = Instant::now();
    generate_lights(model, &mut mesh);
    let lights_ms = elapsed_ms(lights_start);

    mesh.compute_bounds();

    log::info!(
        target: "perf",
        "ms faces={} shells={} lights={} total={} mesh_generate groups={} vertices={} indices={}",
        faces_ms,
        shells_ms,
        lights_ms,
        elapsed_ms(total_start),
        mesh.groups.len(),
        mesh.vertex_count(),
        mesh.indices.len()
    );

    mesh
}
