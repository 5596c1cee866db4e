use croft_buildings::BuildingKind;
use croft_geom::Vec3;
use croft_grid::{CHUNK_SIZE, Direction, GridMap, GridPos};
use proptest::prelude::*;

fn dim() -> impl Strategy<Value = i32> {
    1i32..=48
}

fn cell_size() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.5f32), Just(1.0), Just(2.0), Just(4.0)]
}

proptest! {
    // Bounds check matches the configured width/height exactly
    #[test]
    fn validity_matches_bounds(w in dim(), h in dim(), x in -64i32..=64, y in -64i32..=64) {
        let g = GridMap::new(w, h, 1.0, Vec3::ZERO);
        let expect = x >= 0 && x < w && y >= 0 && y < h;
        prop_assert_eq!(g.is_valid_position(GridPos::new(x, y)), expect);
        // Out-of-range cells are never occupied and never covered.
        if !expect {
            prop_assert!(!g.is_cell_occupied(GridPos::new(x, y)));
            prop_assert!(!g.is_direction_covered(GridPos::new(x, y), Direction::Top));
        }
    }

    // world_to_grid inverts cell_center for every in-range cell
    #[test]
    fn cell_center_round_trips(
        w in dim(), h in dim(), cs in cell_size(),
        ox in -100.0f32..=100.0, oz in -100.0f32..=100.0,
        x in 0i32..=47, y in 0i32..=47,
    ) {
        let g = GridMap::new(w, h, cs, Vec3::new(ox, 0.0, oz));
        let pos = GridPos::new(x.min(w - 1), y.min(h - 1));
        prop_assert_eq!(g.world_to_grid(g.cell_center(pos)), pos);
    }

    // Marking a footprint occupies exactly the covered cells
    #[test]
    fn footprint_marks_exactly_covered_cells(
        ox in 0i32..=40, oy in 0i32..=40, fw in 1i32..=4, fh in 1i32..=4,
    ) {
        let mut g = GridMap::new(48, 48, 1.0, Vec3::ZERO);
        let origin = GridPos::new(ox.min(48 - fw), oy.min(48 - fh));
        prop_assert!(g.can_place_footprint(origin, (fw, fh)));
        g.mark_footprint(origin, (fw, fh), true);
        for x in 0..48 {
            for y in 0..48 {
                let p = GridPos::new(x, y);
                let covered = x >= origin.x && x < origin.x + fw && y >= origin.y && y < origin.y + fh;
                prop_assert_eq!(g.is_cell_occupied(p), covered);
            }
        }
        g.mark_footprint(origin, (fw, fh), false);
        prop_assert_eq!(g.stats().occupied_cells, 0);
    }

    // Chunk-local coordinates invert the chunk walk addressing
    #[test]
    fn chunk_local_round_trips(x in 0i32..=47, y in 0i32..=47) {
        let g = GridMap::new(48, 48, 1.0, Vec3::ZERO);
        let pos = GridPos::new(x, y);
        let coord = croft_grid::ChunkCoord::new(x.div_euclid(CHUNK_SIZE), y.div_euclid(CHUNK_SIZE));
        prop_assert!(g.chunk(coord).is_some());
        let local = (x.rem_euclid(CHUNK_SIZE), y.rem_euclid(CHUNK_SIZE));
        prop_assert_eq!(GridMap::chunk_local_to_grid(coord, local), pos);
    }

    // A placed wall covers its own slot and blocks the opposite boundary,
    // and duplicate placement is rejected with the original retained
    #[test]
    fn wall_adjacency_symmetry(x in 1i32..=46, y in 1i32..=46, di in 0usize..4) {
        let d = Direction::from_index(di).unwrap();
        let mut g = GridMap::new(48, 48, 1.0, Vec3::ZERO);
        let p = GridPos::new(x, y);
        let q = p.toward(d);
        g.mark_footprint(p, (1, 1), true);
        g.set_floor(p, Some(1));
        g.mark_footprint(q, (1, 1), true);
        g.set_floor(q, Some(2));

        prop_assert!(g.wall_placement_allowed(p, d));
        g.set_wall(p, d, 3, BuildingKind::Wall);
        prop_assert!(g.is_direction_covered(p, d));
        prop_assert!(!g.wall_placement_allowed(p, d));
        prop_assert!(!g.wall_placement_allowed(q, d.opposite()));
        prop_assert_eq!(g.slot_at(p, d).unwrap().entity, 3);
    }

    // Hit classification always returns the sector whose axis dominates
    #[test]
    fn hit_direction_picks_dominant_axis(dx in -0.49f32..=0.49, dz in -0.49f32..=0.49) {
        let g = GridMap::new(8, 8, 1.0, Vec3::ZERO);
        let p = GridPos::new(3, 3);
        let hit = g.cell_center(p) + Vec3::new(dx, 0.0, dz);
        let d = g.hit_direction(p, hit);
        if dz.abs() > dx.abs() {
            prop_assert_eq!(d, if dz >= 0.0 { Direction::Top } else { Direction::Bottom });
        } else if dx.abs() > dz.abs() {
            prop_assert_eq!(d, if dx >= 0.0 { Direction::Right } else { Direction::Left });
        }
    }
}
