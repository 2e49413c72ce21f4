use voxform_deform::{Deformer, change_shape, relax};
use voxform_geom::Vec3;
use voxform_model::{BaseMaterial, DeformSettings, MaterialCatalog, MaterialId, Model, Planar, WarpSettings};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn single_material_model() -> (Model, MaterialId) {
    let mut catalog = MaterialCatalog::new();
    let mid = catalog.add(BaseMaterial::new("m"));
    (Model::new(catalog), mid)
}

/// 3x3x3 lattice of vertices spanning the vertex space of a 2x2x2 grid.
fn lattice_model() -> Model {
    let (mut model, _mid) = single_material_model();
    model.bounds.include(0, 0, 0);
    model.bounds.include(1, 1, 1);
    for z in 0..3 {
        for y in 0..3 {
            for x in 0..3 {
                model
                    .vertices
                    .push(Vec3::new(x as f32, y as f32, z as f32));
            }
        }
    }
    model
}

#[test]
fn sphere_deform_projects_onto_box_extent() {
    let mut model = lattice_model();
    model.shape = Some("sphere".to_string());
    let center = model.bounds.center();

    let before: Vec<Vec3> = model.vertices.positions().to_vec();
    change_shape(&mut model);

    for (i, &p0) in before.iter().enumerate() {
        let o = p0 - center;
        let box_extent = o.x.abs().max(o.y.abs()).max(o.z.abs());
        let p1 = model.vertices.position(i as u32);
        let radius = (p1 - center).length();
        if o.length() == 0.0 {
            // Exact center vertex is left unmoved
            assert_eq!(p1, p0);
        } else {
            assert!(
                approx(radius, box_extent, 1e-5),
                "vertex {i}: radius {radius} != box extent {box_extent}"
            );
            assert!(approx(model.vertices.ring[i], box_extent, 1e-6));
        }
    }
}

#[test]
fn cylinder_deform_passes_through_its_axis() {
    let mut model = lattice_model();
    model.shape = Some("cylinder-y".to_string());

    let before: Vec<Vec3> = model.vertices.positions().to_vec();
    change_shape(&mut model);

    for (i, &p0) in before.iter().enumerate() {
        // Y does not participate in the projection
        assert_eq!(model.vertices.position(i as u32).y, p0.y, "vertex {i}");
    }
}

#[test]
fn box_and_unknown_shapes_are_no_ops() {
    for name in ["box", "pyramid", ""] {
        let mut model = lattice_model();
        model.shape = Some(name.to_string());
        let before: Vec<Vec3> = model.vertices.positions().to_vec();
        change_shape(&mut model);
        assert_eq!(model.vertices.positions(), &before[..], "shape '{name}'");
    }
}

#[test]
fn sphere_deform_marks_equidistant_faces() {
    let mut model = lattice_model();
    model.shape = Some("sphere".to_string());

    // One face whose corners all sit at box extent 1 from the center,
    // one face touching the unmoved center vertex (ring 0, mixed values).
    let on_shell = [0u32, 2, 8, 6]; // corners of the z=0 plane
    let mixed = [0u32, 1, 13, 3]; // vertex 13 is the lattice center
    let n = [Vec3::new(0.0, 0.0, -1.0); 4];
    let c = [Vec3::new(1.0, 1.0, 1.0); 4];
    let uv = [[0.0, 0.0]; 4];
    let mid = model.catalog.get_id("m").unwrap();
    let f0 = model.faces.push_face(on_shell, n, c, uv, mid);
    let f1 = model.faces.push_face(mixed, n, c, uv, mid);

    change_shape(&mut model);

    assert!(model.faces.equidistant.get(f0));
    assert!(!model.faces.equidistant.get(f1));
}

#[test]
fn relaxation_converges_to_link_mean_in_one_step() {
    let (mut model, _mid) = single_material_model();
    model.bounds.include(0, 0, 0);

    let center = model.vertices.push(Vec3::new(0.3, 0.3, 0.3));
    let neighbors = [
        model.vertices.push(Vec3::new(1.0, 0.0, 0.0)),
        model.vertices.push(Vec3::new(-1.0, 0.0, 0.0)),
        model.vertices.push(Vec3::new(0.0, 1.0, 2.0)),
        model.vertices.push(Vec3::new(0.0, -1.0, 2.0)),
    ];
    for n in neighbors {
        model.vertices.link(center, n);
    }
    model.vertices.deform[center as usize] = Some(DeformSettings {
        count: 1,
        strength: 1.0,
        damping: 1.0,
    });

    relax(&mut model, 1);

    let p = model.vertices.position(center);
    assert!(approx(p.x, 0.0, 1e-6));
    assert!(approx(p.y, 0.0, 1e-6));
    assert!(approx(p.z, 1.0, 1e-6));
}

#[test]
fn relaxation_reads_are_synchronous_within_a_step() {
    // Two linked vertices pulling toward each other must both read the
    // other's pre-step position, landing at swapped coordinates.
    let (mut model, _mid) = single_material_model();
    model.bounds.include(0, 0, 0);
    let a = model.vertices.push(Vec3::new(0.0, 0.0, 0.0));
    let b = model.vertices.push(Vec3::new(2.0, 0.0, 0.0));
    model.vertices.link(a, b);
    model.vertices.link(b, a);
    let settings = Some(DeformSettings {
        count: 1,
        strength: 1.0,
        damping: 1.0,
    });
    model.vertices.deform[a as usize] = settings;
    model.vertices.deform[b as usize] = settings;

    relax(&mut model, 1);

    assert_eq!(model.vertices.position(a), Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(model.vertices.position(b), Vec3::new(0.0, 0.0, 0.0));
}

#[test]
fn damping_decays_strength_per_step() {
    // damping 0 kills every step after the first
    let (mut model, _mid) = single_material_model();
    model.bounds.include(0, 0, 0);
    let v = model.vertices.push(Vec3::new(0.0, 0.0, 0.0));
    let anchor = model.vertices.push(Vec3::new(1.0, 0.0, 0.0));
    model.vertices.link(v, anchor);
    model.vertices.deform[v as usize] = Some(DeformSettings {
        count: 5,
        strength: 0.5,
        damping: 0.0,
    });

    relax(&mut model, 5);

    // Step 0 moves halfway; steps 1..5 have strength 0.5 * 0^s = 0
    assert!(approx(model.vertices.position(v).x, 0.5, 1e-6));
}

#[test]
fn clamped_axes_are_bit_identical_through_all_passes() {
    let (mut model, _mid) = single_material_model();
    model.bounds.include(0, 0, 0);
    let v = model.vertices.push(Vec3::new(0.125, 0.5, 0.625));
    let anchor = model.vertices.push(Vec3::new(3.0, 3.0, 3.0));
    model.vertices.link(v, anchor);
    model.vertices.deform[v as usize] = Some(DeformSettings {
        count: 2,
        strength: 1.0,
        damping: 0.9,
    });
    model.vertices.warp[v as usize] = Some(WarpSettings {
        amplitude: 0.7,
        frequency: 3.0,
    });
    model.vertices.scatter[v as usize] = 0.4;
    model.vertices.clamp[v as usize].x = true;
    model.vertices.flatten[v as usize].z = true;

    let x0 = model.vertices.position(v).x.to_bits();
    let z0 = model.vertices.position(v).z.to_bits();

    relax(&mut model, 2);
    let mut deformer = Deformer::new(7);
    deformer.warp_and_scatter(&mut model);

    assert_eq!(model.vertices.position(v).x.to_bits(), x0);
    assert_eq!(model.vertices.position(v).z.to_bits(), z0);
    // The unconstrained axis did move
    assert!(model.vertices.position(v).y != 0.5);
}

#[test]
fn zero_amplitude_and_scatter_is_a_no_op() {
    let mut model = lattice_model();
    let before: Vec<Vec3> = model.vertices.positions().to_vec();
    let mut deformer = Deformer::new(42);
    deformer.warp_and_scatter(&mut model);
    assert_eq!(model.vertices.positions(), &before[..]);
}

#[test]
fn warp_and_scatter_is_reproducible_for_a_seed() {
    let run = |seed: i32| {
        let mut model = lattice_model();
        for v in 0..model.vertices.len() {
            model.vertices.warp[v] = Some(WarpSettings {
                amplitude: 0.3,
                frequency: 1.7,
            });
            model.vertices.scatter[v] = 0.1;
        }
        let mut deformer = Deformer::new(seed);
        deformer.warp_and_scatter(&mut model);
        model.vertices.positions().to_vec()
    };

    let a = run(1234);
    let b = run(1234);
    assert_eq!(a, b);

    let c = run(4321);
    assert!(a != c, "different seeds should scatter differently");
}

#[test]
fn tiled_boundaries_suppress_warp_and_scatter() {
    let mut model = lattice_model();
    model.tile = Planar::parse("-x").unwrap();
    for v in 0..model.vertices.len() {
        model.vertices.scatter[v] = 0.5;
    }
    let before: Vec<Vec3> = model.vertices.positions().to_vec();

    let mut deformer = Deformer::new(99);
    deformer.warp_and_scatter(&mut model);

    for (i, &p0) in before.iter().enumerate() {
        let p1 = model.vertices.position(i as u32);
        if p0.x < 0.1 {
            assert_eq!(p1, p0, "tiled-edge vertex {i} must not move");
        } else {
            assert!(p1 != p0, "interior vertex {i} should scatter");
        }
    }
}

#[test]
fn apply_runs_shape_relax_and_warp() {
    let mut catalog = MaterialCatalog::new();
    let mut m = BaseMaterial::new("m");
    m.deform = Some(DeformSettings {
        count: 1,
        strength: 0.5,
        damping: 1.0,
    });
    catalog.add(m);
    let mut model = Model::new(catalog);
    model.bounds.include(0, 0, 0);
    model.bounds.include(1, 1, 1);
    model.shape = Some("sphere".to_string());
    for z in 0..3 {
        for y in 0..3 {
            for x in 0..3 {
                model
                    .vertices
                    .push(Vec3::new(x as f32, y as f32, z as f32));
            }
        }
    }
    let before: Vec<Vec3> = model.vertices.positions().to_vec();

    let mut deformer = Deformer::new(5);
    deformer.apply(&mut model);

    // The corner vertices were pulled inward onto the sphere
    let center = model.bounds.center();
    let corner = model.vertices.position(0);
    assert!(approx((corner - center).length(), 1.0, 1e-5));
    assert!(model.vertices.positions() != &before[..]);
}
