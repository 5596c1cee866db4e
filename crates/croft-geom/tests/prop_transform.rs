use croft_geom::{Transform, Vec3, rotate_yaw, rotate_yaw_inv};
use proptest::prelude::*;

fn small_f32() -> impl Strategy<Value = f32> {
    -1_000.0f32..=1_000.0
}

fn yaw() -> impl Strategy<Value = f32> {
    -720.0f32..=720.0
}

proptest! {
    // rotate_yaw_inv undoes rotate_yaw up to float noise
    #[test]
    fn yaw_rotation_round_trips(x in small_f32(), y in small_f32(), z in small_f32(), deg in yaw()) {
        let v = Vec3::new(x, y, z);
        let back = rotate_yaw_inv(rotate_yaw(v, deg), deg);
        prop_assert!((back - v).length() < 1e-2);
    }

    // yaw rotation preserves length and the Y component
    #[test]
    fn yaw_rotation_is_rigid(x in small_f32(), y in small_f32(), z in small_f32(), deg in yaw()) {
        let v = Vec3::new(x, y, z);
        let r = rotate_yaw(v, deg);
        prop_assert!((r.length() - v.length()).abs() < 1e-1);
        prop_assert_eq!(r.y, v.y);
    }

    // then() agrees with nested apply for arbitrary parent/child pairs
    #[test]
    fn compose_matches_nested(
        px in small_f32(), pz in small_f32(), pyaw in yaw(),
        cx in small_f32(), cz in small_f32(), cyaw in yaw(),
        x in small_f32(), z in small_f32(),
    ) {
        let parent = Transform::new(Vec3::new(px, 0.0, pz), pyaw);
        let child = Transform::new(Vec3::new(cx, 0.0, cz), cyaw);
        let p = Vec3::new(x, 0.5, z);
        let a = parent.then(child).apply(p);
        let b = parent.apply(child.apply(p));
        prop_assert!((a - b).length() < 1.0);
    }
}
