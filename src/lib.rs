//! Weighted A* route finding for tile-based, multi-floor worlds.
//!
//! A [`Navigator`](crate::pathfind::Navigator) holds one walkability bitmap and one
//! optional avoidance-cost overlay per floor. Searches borrow a caller-owned
//! [`ScratchBuffers`](crate::scratch::ScratchBuffers) so that repeated queries on
//! large floors never reinitialize or reallocate their bookkeeping arrays.
//!
//! ```rust
//! use floorpath::prelude::*;
//!
//! let mut navigator = Navigator::new();
//! // 5x5 floor, every tile walkable.
//! navigator.load_floor(7, 5, 5, IVec2::new(100, 200), &[0xFF; 4]).unwrap();
//!
//! let mut scratch = ScratchBuffers::new();
//! let request = SearchRequest::to_tile(7, IVec2::new(100, 200), IVec2::new(104, 204));
//! let result = navigator.find_path(&mut scratch, &request, &NeverCancel);
//!
//! assert_eq!(result.status, PathStatus::PathFound);
//! assert_eq!(result.path.unwrap().len(), 4);
//! ```
use std::cmp::Ordering;
use std::hash::BuildHasherDefault;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

mod astar;
pub mod cancel;
pub mod error;
mod goal;
pub mod grid;
mod macros;
pub mod neighbor;
pub mod overlay;
pub mod path;
pub mod pathfind;
pub mod request;
pub mod scratch;
pub mod settings;

pub use glam::{IVec2, IVec3};

pub mod prelude {
    pub use crate::cancel::{Cancellation, Deadline, NeverCancel, Probe};
    pub use crate::error::NavError;
    pub use crate::grid::{FloorGrid, GridStore};
    pub use crate::overlay::{AvoidanceArea, CostOverlay, OverlayStore};
    pub use crate::path::{Path, PathStatus, SearchResult};
    pub use crate::pathfind::Navigator;
    pub use crate::request::{Goal, SearchRequest, Stance, StanceKind};
    pub use crate::scratch::ScratchBuffers;
    pub use crate::settings::{SearchSettings, SearchSettingsBuilder};
    pub use crate::{IVec2, IVec3};
}

/// Floor (Z-level) identifier.
pub type FloorId = i32;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;
type FxIndexSet<K> = IndexSet<K, BuildHasherDefault<FxHasher>>;

/// Open-set entry. `BinaryHeap` is a max-heap, so the ordering is reversed to
/// pop the lowest `(f, h, g)` first.
#[derive(Debug)]
pub(crate) struct SmallestCostHolder {
    pub(crate) estimated_cost: u32,
    pub(crate) heuristic: u32,
    pub(crate) cost: u32,
    pub(crate) index: u32,
}

impl SmallestCostHolder {
    fn key(&self) -> (u32, u32, u32) {
        (self.estimated_cost, self.heuristic, self.cost)
    }
}

impl PartialEq for SmallestCostHolder {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SmallestCostHolder {}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        other.key().cmp(&self.key())
    }
}
