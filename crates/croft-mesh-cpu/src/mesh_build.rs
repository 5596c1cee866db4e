use croft_geom::{Transform, Vec3};

/// Growable CPU mesh: interleaved positions/normals/uvs/colors plus 32-bit
/// indices. Combined batches routinely exceed the 16-bit vertex range, so
/// the index type is u32 throughout.
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub idx: Vec<u32>,
    pub col: Vec<u8>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.idx.clear();
        self.col.clear();
    }

    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        // 4 vertices per quad
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.idx.reserve(n_quads * 6);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends a quad (two triangles), fixing winding so the face agrees
    /// with the supplied normal.
    pub fn add_quad(
        &mut self,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        d: Vec3,
        n: Vec3,
        uvs: [(f32, f32); 4],
        rgba: [u8; 4],
    ) {
        let base = (self.pos.len() / 3) as u32;
        let mut vs = [a, d, c, b];
        let mut uvs = [uvs[0], uvs[3], uvs[2], uvs[1]];
        let e1 = vs[1] - vs[0];
        let e2 = vs[2] - vs[0];
        let cross = Vec3 {
            x: e1.y * e2.z - e1.z * e2.y,
            y: e1.z * e2.x - e1.x * e2.z,
            z: e1.x * e2.y - e1.y * e2.x,
        };
        if (cross.x * n.x + cross.y * n.y + cross.z * n.z) < 0.0 {
            vs.swap(1, 3);
            uvs.swap(1, 3);
        }
        for i in 0..4 {
            self.pos.extend_from_slice(&[vs[i].x, vs[i].y, vs[i].z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[uvs[i].0, uvs[i].1]);
            self.col
                .extend_from_slice(&[rgba[0], rgba[1], rgba[2], rgba[3]]);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Appends every vertex of `src` transformed by `t`, re-tinted with
    /// `rgba`, with indices rebased onto this build.
    pub fn append_transformed(&mut self, src: &MeshBuild, t: &Transform, rgba: [u8; 4]) {
        let base = (self.pos.len() / 3) as u32;
        let verts = src.vertex_count();
        self.pos.reserve(verts * 3);
        self.norm.reserve(verts * 3);
        self.uv.reserve(verts * 2);
        self.col.reserve(verts * 4);
        self.idx.reserve(src.idx.len());
        for i in 0..verts {
            let p = t.apply(Vec3::new(src.pos[i * 3], src.pos[i * 3 + 1], src.pos[i * 3 + 2]));
            let n = t.apply_dir(Vec3::new(
                src.norm[i * 3],
                src.norm[i * 3 + 1],
                src.norm[i * 3 + 2],
            ));
            self.pos.extend_from_slice(&[p.x, p.y, p.z]);
            self.norm.extend_from_slice(&[n.x, n.y, n.z]);
            self.uv.extend_from_slice(&[src.uv[i * 2], src.uv[i * 2 + 1]]);
            self.col
                .extend_from_slice(&[rgba[0], rgba[1], rgba[2], rgba[3]]);
        }
        self.idx.extend(src.idx.iter().map(|i| i + base));
    }

    pub fn positions(&self) -> &[f32] {
        &self.pos
    }

    pub fn indices(&self) -> &[u32] {
        &self.idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_emits_four_verts_six_indices() {
        let mut mb = MeshBuild::default();
        mb.add_quad(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            [255; 4],
        );
        assert_eq!(mb.vertex_count(), 4);
        assert_eq!(mb.triangle_count(), 2);
        assert!(mb.idx.iter().all(|&i| (i as usize) < mb.vertex_count()));
    }

    #[test]
    fn append_rebases_indices_and_moves_points() {
        let mut src = MeshBuild::default();
        src.add_quad(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            [255; 4],
        );
        let mut dst = MeshBuild::default();
        let t = Transform::from_pos(Vec3::new(10.0, 0.0, 0.0));
        dst.append_transformed(&src, &t, [1, 2, 3, 4]);
        dst.append_transformed(&src, &t, [1, 2, 3, 4]);
        assert_eq!(dst.vertex_count(), 8);
        assert_eq!(dst.idx.len(), 12);
        // Second copy's indices point at the second vertex block.
        assert!(dst.idx[6..].iter().all(|&i| i >= 4));
        assert!((dst.pos[0] - 10.0).abs() < 1e-6);
        assert_eq!(&dst.col[0..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut mb = MeshBuild::default();
        mb.reserve_quads(8);
        let cap = mb.pos.capacity();
        mb.add_quad(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
            [(0.0, 0.0); 4],
            [255; 4],
        );
        mb.clear_keep_capacity();
        assert!(mb.is_empty());
        assert!(mb.pos.capacity() >= cap);
    }
}
