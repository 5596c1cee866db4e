use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use croft::{BuildSession, GridConfig};
use croft_buildings::{BuildingKind, BuildingRegistry};
use croft_grid::{Direction, GridPos};
use croft_mesh_cpu::edge_offset;

/// Headless building sandbox: loads the building registry, scripts a small
/// construction session, and reports the combined batches it produces.
#[derive(Parser, Debug)]
#[command(name = "croft")]
struct Args {
    /// Directory holding materials.toml, buildings.toml, and grid.toml
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    /// Override the configured grid width
    #[arg(long)]
    width: Option<i32>,
    /// Override the configured grid height
    #[arg(long)]
    height: Option<i32>,
    /// Override the configured cell size
    #[arg(long)]
    cell_size: Option<f32>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        log::error!("sandbox failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let registry = BuildingRegistry::load_from_paths(
        args.assets.join("materials.toml"),
        args.assets.join("buildings.toml"),
    )?;
    let mut config = match GridConfig::from_path(args.assets.join("grid.toml")) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("no grid.toml ({}); using defaults", e);
            GridConfig::default()
        }
    };
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    if let Some(cs) = args.cell_size {
        config.cell_size = cs;
    }

    let mut session = BuildSession::headless(registry, config)?;
    let center = GridPos::new(config.width / 2, config.height / 2);
    session.set_player_pos(session.grid.cell_center(center));
    log::info!(
        "grid {}x{} (cell size {}), {} chunks",
        config.width,
        config.height,
        config.cell_size,
        session.grid_stats().chunks
    );

    // A 3x3 cabin: floors, a walled perimeter, one door on the south face.
    let origin = center.offset(-1, -1);
    for dy in 0..3 {
        for dx in 0..3 {
            let p = origin.offset(dx, dy);
            if !place_floor(&mut session, p) {
                log::warn!("floor at ({}, {}) did not place", p.x, p.y);
            }
        }
    }
    session.cancel();
    let updated = session.step();
    log::info!("tick {}: rebuilt {:?}", session.tick, updated);

    let door_cell = origin.offset(1, 0);
    for dy in 0..3 {
        for dx in 0..3 {
            let p = origin.offset(dx, dy);
            for d in Direction::ALL {
                if !outward(d, dx, dy) {
                    continue;
                }
                let kind = if p == door_cell && d == Direction::Bottom {
                    BuildingKind::Door
                } else {
                    BuildingKind::Wall
                };
                if !place_edge(&mut session, kind, p, d) {
                    log::warn!("{:?} at ({}, {}) {:?} did not place", kind, p.x, p.y, d);
                }
            }
        }
    }
    session.cancel();
    let updated = session.step();
    log::info!("tick {}: rebuilt {:?}", session.tick, updated);

    for kind in BuildingKind::PLACEABLE {
        if let Some(c) = session.combined(kind) {
            log::info!(
                "{}: {} vertices, {} triangles, material {:?}",
                kind.name(),
                c.build.vertex_count(),
                c.build.triangle_count(),
                c.material
            );
        }
    }

    // Swing the door once and wait out the transition window.
    let door_hit = session.grid.cell_center(door_cell)
        + edge_offset(Direction::Bottom, session.grid.cell_size() * 0.4);
    if session.interact_door(door_hit) {
        let transition = session.registry.door_transition_ticks;
        for _ in 0..=transition {
            session.step();
        }
        log::info!("door opened after {} ticks", transition);
    }

    let stats = session.grid_stats();
    let batches = session.batch_stats();
    log::info!(
        "{} occupied cells, {} wall slots; {} tracked positions, {} combined vertices",
        stats.occupied_cells,
        stats.wall_slots,
        batches.tracked_positions,
        batches.vertices
    );

    // Round-trip the world through the persistence records.
    let snapshot = croft_io::snapshot_world(&session.grid);
    let json = croft_io::to_json(&snapshot)?;
    let mut restored = BuildSession::headless(session.registry.clone(), config)?;
    let count = croft_io::replay_world(
        &croft_io::from_json(&json)?,
        &mut restored.grid,
        &mut restored.entities,
        &mut restored.batches,
    );
    restored.step();
    log::info!(
        "replayed {} cells from a {} byte snapshot; restored batches match: {}",
        count,
        json.len(),
        restored.batch_stats().vertices == batches.vertices
    );
    Ok(())
}

/// True when direction `d` faces out of a 3x3 block from local cell (dx, dy).
fn outward(d: Direction, dx: i32, dy: i32) -> bool {
    match d {
        Direction::Bottom => dy == 0,
        Direction::Top => dy == 2,
        Direction::Left => dx == 0,
        Direction::Right => dx == 2,
    }
}

/// Script one full floor placement interaction.
fn place_floor(session: &mut BuildSession, cell: GridPos) -> bool {
    use croft_placement::PlacementState;
    if session.placement_state() == PlacementState::Idle
        && !session.start_placing(BuildingKind::Floor)
    {
        return false;
    }
    session.pointer_down();
    let hit = session.grid.cell_center(cell);
    session.pointer_move(hit);
    session.pointer_up();
    session.confirm()
}

/// Script one full wall/door placement interaction onto `(cell, d)`.
fn place_edge(session: &mut BuildSession, kind: BuildingKind, cell: GridPos, d: Direction) -> bool {
    use croft_placement::PlacementState;
    if session.placement_state() != PlacementState::Previewing(kind)
        && session.placement_state() != PlacementState::Dragging(kind)
    {
        session.cancel();
        if !session.start_placing(kind) {
            return false;
        }
    }
    session.pointer_down();
    let hit = session.grid.cell_center(cell) + edge_offset(d, session.grid.cell_size() * 0.4);
    session.pointer_move(hit);
    session.pointer_up();
    let on_target = session
        .placement
        .preview()
        .is_some_and(|p| p.cell == cell && p.direction == Some(d));
    if !on_target {
        session.cancel();
        return false;
    }
    session.confirm()
}
