use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use proptest::strategy::Strategy;
use voxform_geom::{GridBounds, Vec3};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
fn vapprox(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx(a.x, b.x, eps) && approx(a.y, b.y, eps) && approx(a.z, b.z, eps)
}

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e6)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Addition commutativity: a + b == b + a (element-wise)
    #[test]
    fn vec3_add_commutative(
        a in arb_vec3(),
        b in arb_vec3(),
    ) {
        prop_assert!(vapprox(a + b, b + a, 1e-5));
    }

    // Distributive property of dot over addition: (a + b)·c = a·c + b·c
    #[test]
    fn vec3_dot_distributive(
        a in arb_vec3(),
        b in arb_vec3(),
        c in arb_vec3(),
    ) {
        let left = (a + b).dot(c);
        let right = a.dot(c) + b.dot(c);
        prop_assert!(approx_abs_rel(left, right, 1e-6, 1e-5));
    }

    // Normalized length: |normalize(v)| = 1 for non-zero, else unchanged
    #[test]
    fn vec3_normalized_length(
        v in arb_vec3(),
    ) {
        let n = v.normalized();
        if v.length() > 0.0 {
            prop_assert!(approx(n.length(), 1.0, 1e-3));
        } else {
            prop_assert!(vapprox(n, v, 1e-6));
        }
    }

    // Component-wise scale agrees with per-axis multiplication
    #[test]
    fn vec3_scaled_matches_components(
        a in arb_vec3(),
        b in arb_vec3(),
    ) {
        let s = a.scaled(b);
        prop_assert!(approx_abs_rel(s.x, a.x * b.x, 1e-6, 1e-5));
        prop_assert!(approx_abs_rel(s.y, a.y * b.y, 1e-6, 1e-5));
        prop_assert!(approx_abs_rel(s.z, a.z * b.z, 1e-6, 1e-5));
    }

    // Include is order-independent: any permutation yields the same bounds
    #[test]
    fn bounds_include_order_independent(
        cells in proptest::collection::vec((-64i32..64, -64i32..64, -64i32..64), 1..16),
    ) {
        let mut fwd = GridBounds::new();
        for &(x, y, z) in &cells {
            fwd.include(x, y, z);
        }
        let mut rev = GridBounds::new();
        for &(x, y, z) in cells.iter().rev() {
            rev.include(x, y, z);
        }
        prop_assert_eq!(fwd, rev);
    }

    // Every included cell lies inside the final extents
    #[test]
    fn bounds_contain_included_cells(
        cells in proptest::collection::vec((-64i32..64, -64i32..64, -64i32..64), 1..16),
    ) {
        let mut b = GridBounds::new();
        for &(x, y, z) in &cells {
            b.include(x, y, z);
        }
        for &(x, y, z) in &cells {
            prop_assert!(b.min_x <= x && x <= b.max_x);
            prop_assert!(b.min_y <= y && y <= b.max_y);
            prop_assert!(b.min_z <= z && z <= b.max_z);
        }
    }
}
