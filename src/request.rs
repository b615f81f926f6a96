//! Search requests as supplied by callers, in world coordinates.
use glam::{IVec2, IVec3};
use strum::{Display, EnumIter, EnumString};

use crate::FloorId;

/// Connectivity of the ring a [`Stance`] selects.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum StanceKind {
    /// Rings counted in 8-connected hops, matching the search.
    #[default]
    Ordinal,
    /// Rings counted in 4-connected hops.
    Cardinal,
}

/// Keep a fixed BFS hop distance from a reference tile.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stance {
    pub kind: StanceKind,
    pub distance: u32,
}

impl Stance {
    pub fn new(kind: StanceKind, distance: u32) -> Self {
        Stance { kind, distance }
    }

    /// An 8-connected ring at `distance` hops.
    pub fn at_range(distance: u32) -> Self {
        Self::new(StanceKind::Ordinal, distance)
    }
}

/// Where a search should end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Goal {
    Tile(IVec2),
    /// Any of these tiles. Duplicates are ignored.
    AnyOf(Vec<IVec2>),
    /// Any valid tile on the stance ring around `center`.
    Stance { center: IVec2, stance: Stance },
}

/// A path query on one floor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub floor: FloorId,
    pub start: IVec2,
    pub goal: Goal,
    /// Tiles occupied by creatures. Entries on other floors are ignored.
    pub occupied: Vec<IVec3>,
}

impl SearchRequest {
    pub fn new(floor: FloorId, start: IVec2, goal: Goal) -> Self {
        SearchRequest {
            floor,
            start,
            goal,
            occupied: Vec::new(),
        }
    }

    pub fn to_tile(floor: FloorId, start: IVec2, end: IVec2) -> Self {
        Self::new(floor, start, Goal::Tile(end))
    }

    pub fn to_any(floor: FloorId, start: IVec2, goals: impl IntoIterator<Item = IVec2>) -> Self {
        Self::new(floor, start, Goal::AnyOf(goals.into_iter().collect()))
    }

    pub fn at_stance(floor: FloorId, start: IVec2, center: IVec2, stance: Stance) -> Self {
        Self::new(floor, start, Goal::Stance { center, stance })
    }

    pub fn with_occupied(mut self, occupied: impl IntoIterator<Item = IVec3>) -> Self {
        self.occupied = occupied.into_iter().collect();
        self
    }
}
