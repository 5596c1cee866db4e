use croft_geom::Vec3;

use crate::mesh_build::MeshBuild;

/// Axis-aligned box used as the source mesh for every building kind: `w`/`d`
/// centered on the origin in the ground plane, `h` rising from y = 0 so a
/// piece sits on its cell. 24 vertices, 12 triangles.
pub fn box_mesh(extent: [f32; 3]) -> MeshBuild {
    let hw = extent[0] * 0.5;
    let h = extent[1];
    let hd = extent[2] * 0.5;
    let mut mb = MeshBuild::default();
    mb.reserve_quads(6);
    let white = [255u8; 4];
    let uv = |u1: f32, v1: f32| [(0.0, 0.0), (u1, 0.0), (u1, v1), (0.0, v1)];

    // +Y / -Y
    mb.add_quad(
        Vec3::new(-hw, h, -hd),
        Vec3::new(hw, h, -hd),
        Vec3::new(hw, h, hd),
        Vec3::new(-hw, h, hd),
        Vec3::new(0.0, 1.0, 0.0),
        uv(extent[0], extent[2]),
        white,
    );
    mb.add_quad(
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(-hw, 0.0, hd),
        Vec3::new(0.0, -1.0, 0.0),
        uv(extent[0], extent[2]),
        white,
    );
    // +X / -X
    mb.add_quad(
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(hw, h, hd),
        Vec3::new(hw, h, -hd),
        Vec3::new(1.0, 0.0, 0.0),
        uv(extent[2], extent[1]),
        white,
    );
    mb.add_quad(
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(-hw, 0.0, hd),
        Vec3::new(-hw, h, hd),
        Vec3::new(-hw, h, -hd),
        Vec3::new(-1.0, 0.0, 0.0),
        uv(extent[2], extent[1]),
        white,
    );
    // +Z / -Z
    mb.add_quad(
        Vec3::new(-hw, 0.0, hd),
        Vec3::new(hw, 0.0, hd),
        Vec3::new(hw, h, hd),
        Vec3::new(-hw, h, hd),
        Vec3::new(0.0, 0.0, 1.0),
        uv(extent[0], extent[1]),
        white,
    );
    mb.add_quad(
        Vec3::new(-hw, 0.0, -hd),
        Vec3::new(hw, 0.0, -hd),
        Vec3::new(hw, h, -hd),
        Vec3::new(-hw, h, -hd),
        Vec3::new(0.0, 0.0, -1.0),
        uv(extent[0], extent[1]),
        white,
    );
    mb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_24_verts_and_sits_on_ground() {
        let mb = box_mesh([1.0, 2.0, 0.5]);
        assert_eq!(mb.vertex_count(), 24);
        assert_eq!(mb.triangle_count(), 12);
        let ys: Vec<f32> = mb.pos.chunks(3).map(|v| v[1]).collect();
        assert!(ys.iter().all(|&y| (0.0..=2.0).contains(&y)));
        assert!(ys.iter().any(|&y| y == 0.0));
        assert!(ys.iter().any(|&y| y == 2.0));
        let xs: Vec<f32> = mb.pos.chunks(3).map(|v| v[0]).collect();
        assert!(xs.iter().all(|&x| (-0.5..=0.5).contains(&x)));
    }
}
