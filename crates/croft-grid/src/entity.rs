use std::collections::HashMap;

use croft_buildings::BuildingKind;

use crate::coords::GridPos;
use crate::direction::Direction;

pub type EntityId = u32;

/// Durable record of a placed floor. The cell wall table in the grid is
/// authoritative for attachments; the record does not duplicate it.
#[derive(Clone, Debug)]
pub struct FloorRecord {
    pub pos: GridPos,
    pub size: (i32, i32),
}

/// Durable record of a wall or door. It sits on the boundary between two
/// adjacent floor cells, or on the outer edge of one floor with the other
/// side open.
#[derive(Clone, Debug)]
pub struct EdgeRecord {
    pub pos: GridPos,
    pub direction: Direction,
    /// Owning floor first, then the floor across the boundary if any.
    pub floors: [Option<EntityId>; 2],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DoorPhase {
    Idle,
    Transitioning { until_tick: u64 },
}

/// Logical door state. The open flag and collider flip only once the
/// transition window elapses; interaction requests that arrive while a
/// transition is in flight are dropped.
#[derive(Clone, Copy, Debug)]
pub struct DoorState {
    pub open: bool,
    pub collider_enabled: bool,
    phase: DoorPhase,
}

impl Default for DoorState {
    fn default() -> Self {
        Self {
            open: false,
            collider_enabled: true,
            phase: DoorPhase::Idle,
        }
    }
}

impl DoorState {
    #[inline]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, DoorPhase::Transitioning { .. })
    }

    /// Request an open/close toggle. Returns false when a transition is
    /// already in flight and the request is ignored.
    pub fn request_toggle(&mut self, now_tick: u64, transition_ticks: u64) -> bool {
        if self.is_transitioning() {
            return false;
        }
        self.phase = DoorPhase::Transitioning {
            until_tick: now_tick.saturating_add(transition_ticks),
        };
        true
    }

    /// Advance the transition. Returns true on the tick the door settles.
    pub fn advance(&mut self, now_tick: u64) -> bool {
        match self.phase {
            DoorPhase::Transitioning { until_tick } if now_tick >= until_tick => {
                self.open = !self.open;
                self.collider_enabled = !self.open;
                self.phase = DoorPhase::Idle;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
pub enum Entity {
    Floor(FloorRecord),
    Wall(EdgeRecord),
    Door { edge: EdgeRecord, state: DoorState },
}

impl Entity {
    #[inline]
    pub fn kind(&self) -> BuildingKind {
        match self {
            Entity::Floor(_) => BuildingKind::Floor,
            Entity::Wall(_) => BuildingKind::Wall,
            Entity::Door { .. } => BuildingKind::Door,
        }
    }

    #[inline]
    pub fn grid_pos(&self) -> GridPos {
        match self {
            Entity::Floor(f) => f.pos,
            Entity::Wall(e) => e.pos,
            Entity::Door { edge, .. } => edge.pos,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeRecord> {
        match self {
            Entity::Wall(e) | Entity::Door { edge: e, .. } => Some(e),
            Entity::Floor(_) => None,
        }
    }
}

/// Owning store for placed entity records with monotonic id allocation.
#[derive(Default)]
pub struct EntityStore {
    inner: HashMap<EntityId, Entity>,
    next_id: EntityId,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn alloc_id(&mut self) -> EntityId {
        // Id 0 is reserved as "never a valid entity".
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.next_id
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = self.alloc_id();
        self.inner.insert(id, entity);
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.inner.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.inner.get_mut(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.inner.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.inner.iter().map(|(k, v)| (*k, v))
    }

    /// Door records only, for the per-tick transition sweep.
    pub fn doors_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut DoorState)> {
        self.inner.iter_mut().filter_map(|(k, v)| match v {
            Entity::Door { state, .. } => Some((*k, state)),
            _ => None,
        })
    }
}
