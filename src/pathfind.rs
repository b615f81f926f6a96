//! The [`Navigator`]: floor storage plus every path query.
use std::time::Instant;

use glam::{IVec2, IVec3, UVec2};
use rustc_hash::FxHashSet;

use crate::{
    astar::{astar_floor, heuristic, FloorView, Goals, SearchOutcome, SearchParams},
    cancel::Cancellation,
    error::NavError,
    goal,
    grid::{FloorGrid, GridStore},
    macros::timed,
    neighbor::ORDINAL_STEPS,
    overlay::{AvoidanceArea, OverlayStore, BLOCKED},
    path::{Path, PathStatus, SearchResult},
    request::{Goal, SearchRequest, Stance},
    scratch::ScratchBuffers,
    settings::SearchSettings,
    FloorId, FxIndexSet,
};

/// Walkability and avoidance data for every floor, and the searches that use them.
///
/// Loading and rebuilding take `&mut self`, searches take `&self`, so a shared
/// `Navigator` can serve any number of threads as long as each brings its own
/// [`ScratchBuffers`].
///
/// Example usage:
/// ```
/// use floorpath::prelude::*;
///
/// let mut navigator = Navigator::new();
/// navigator.load_floor(0, 8, 8, IVec2::ZERO, &[0xFF; 8]).unwrap();
/// navigator
///     .rebuild_overlay(0, &[AvoidanceArea::new(2, 0, 1, 7, 255)])
///     .unwrap();
///
/// let request = SearchRequest::to_tile(0, IVec2::new(0, 0), IVec2::new(5, 0));
/// let result = ScratchBuffers::with_thread_local(|scratch| {
///     navigator.find_path(scratch, &request, &NeverCancel)
/// });
///
/// assert_eq!(result.status, PathStatus::PathFound);
/// assert!(result.path.unwrap().contains(IVec3::new(2, 7, 0)));
/// ```
#[derive(Debug, Default, Clone)]
pub struct Navigator {
    grids: GridStore,
    overlays: OverlayStore,
    settings: SearchSettings,
}

/// A request resolved against its floor.
struct Prepared<'a> {
    view: FloorView<'a>,
    start: usize,
    goals: Goals,
    target: UVec2,
    occupied: FxHashSet<usize>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: SearchSettings) -> Self {
        Navigator {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn grids(&self) -> &GridStore {
        &self.grids
    }

    pub fn overlays(&self) -> &OverlayStore {
        &self.overlays
    }

    /// Replaces all walkability data for `floor`.
    /// An existing overlay whose dimensions or origin no longer match is dropped.
    ///
    /// # Arguments
    /// * `floor` - The floor (Z-level) id.
    /// * `width`, `height` - Floor dimensions in tiles.
    /// * `origin` - World coordinates of the floor's top-left tile.
    /// * `bitmap` - One bit per tile, bit index `y * width + x`, least significant bit first.
    pub fn load_floor(
        &mut self,
        floor: FloorId,
        width: u32,
        height: u32,
        origin: IVec2,
        bitmap: &[u8],
    ) -> Result<(), NavError> {
        let grid = self.grids.load_floor(floor, width, height, origin, bitmap)?;
        self.overlays.retain_matching(floor, grid);
        Ok(())
    }

    /// Removes a floor and its overlay. Returns false if it wasn't loaded.
    pub fn unload_floor(&mut self, floor: FloorId) -> bool {
        self.overlays.clear(floor);
        self.grids.unload_floor(floor).is_some()
    }

    /// Replaces the avoidance overlay of a loaded floor.
    pub fn rebuild_overlay(
        &mut self,
        floor: FloorId,
        areas: &[AvoidanceArea],
    ) -> Result<(), NavError> {
        self.overlays.rebuild(floor, self.grids.floor(floor), areas)
    }

    pub fn is_walkable(&self, floor: FloorId, x: i32, y: i32) -> bool {
        self.grids.is_walkable(floor, x, y)
    }

    /// Overlay cost at a world tile, 0 where no overlay applies.
    pub fn cost_at(&self, floor: FloorId, x: i32, y: i32) -> u8 {
        self.grids
            .floor(floor)
            .map_or(0, |grid| self.overlays.cost_at(floor, grid, x, y))
    }

    fn view(&self, floor: FloorId) -> Option<FloorView<'_>> {
        let grid = self.grids.floor(floor)?;
        Some(FloorView {
            grid,
            overlay: self.overlays.overlay(floor),
        })
    }

    fn occupied_indices(grid: &FloorGrid, floor: FloorId, occupied: &[IVec3]) -> FxHashSet<usize> {
        occupied
            .iter()
            .filter(|pos| pos.z == floor)
            .filter_map(|pos| grid.to_local(pos.truncate()))
            .map(|local| grid.index(local))
            .collect()
    }

    /// Resolves a request into floor-local search parameters, or the terminal
    /// status it ends with before any search runs.
    fn prepare<'a>(
        &'a self,
        scratch: &mut ScratchBuffers,
        request: &SearchRequest,
    ) -> Result<Prepared<'a>, SearchResult> {
        let floor = request.floor;
        let fail = |status| SearchResult::failed(status, Default::default());

        let Some(view) = self.view(floor) else {
            log::warn!("Floor {} is not loaded", floor);
            return Err(fail(PathStatus::NoValidStart));
        };
        let grid = view.grid;

        let Some(start_local) = grid.to_local(request.start) else {
            log::warn!("Start is out of bounds: {:?} on floor {}", request.start, floor);
            return Err(fail(PathStatus::NoValidStart));
        };
        if view.cost(start_local) == BLOCKED {
            log::warn!("Start is blocked: {:?} on floor {}", request.start, floor);
            return Err(fail(PathStatus::NoValidStart));
        }
        let start = grid.index(start_local);
        let occupied = Self::occupied_indices(grid, floor, &request.occupied);

        let goals = match &request.goal {
            Goal::Tile(end) => {
                let Some(end_local) = grid.to_local(*end) else {
                    log::warn!("Goal is out of bounds: {:?} on floor {}", end, floor);
                    return Err(fail(PathStatus::NoValidEnd));
                };
                Goals::Tile(grid.index(end_local))
            }
            Goal::AnyOf(ends) => {
                let set: FxIndexSet<usize> = ends
                    .iter()
                    .filter_map(|&end| {
                        let local = grid.to_local(end);
                        if local.is_none() {
                            log::warn!("Dropping out of bounds goal {:?} on floor {}", end, floor);
                        }
                        local
                    })
                    .map(|local| grid.index(local))
                    .collect();
                if set.is_empty() {
                    return Err(fail(PathStatus::NoValidEnd));
                }
                Goals::Set(set)
            }
            Goal::Stance { center, stance } => {
                let Some(center_local) = grid.to_local(*center) else {
                    log::warn!("Stance center is out of bounds: {:?} on floor {}", center, floor);
                    return Err(fail(PathStatus::NoValidEnd));
                };
                let ring = goal::ring_tiles(view, scratch, center_local, *stance, &occupied);
                if ring.is_empty() {
                    log::debug!(
                        "No {} tiles {} hops from {:?} on floor {}",
                        stance.kind,
                        stance.distance,
                        center,
                        floor
                    );
                    return Err(fail(PathStatus::NoPathFound));
                }
                Goals::Set(ring.into_iter().collect())
            }
        };

        if goals.contains(start) {
            let at = grid.to_world(start_local).extend(floor);
            return Err(SearchResult::reached(at, Default::default()));
        }

        // Multi-goal searches aim the heuristic at the member nearest the start,
        // picked once. Other members can still be reached first.
        let target = match &goals {
            Goals::Tile(end) => grid.local(*end),
            Goals::Set(set) => set
                .iter()
                .map(|&i| grid.local(i))
                .min_by_key(|&local| heuristic(&self.settings, start_local, local))
                .unwrap_or(start_local),
        };

        Ok(Prepared {
            view,
            start,
            goals,
            target,
            occupied,
        })
    }

    fn run<C: Cancellation + ?Sized>(
        &self,
        scratch: &mut ScratchBuffers,
        prepared: &Prepared,
        cancel: &C,
    ) -> SearchOutcome {
        let params = SearchParams {
            start: prepared.start,
            goals: &prepared.goals,
            target: prepared.target,
            occupied: &prepared.occupied,
        };

        timed!("astar_floor", {
            astar_floor(&self.settings, prepared.view, scratch, &params, cancel)
        })
    }

    /// Finds a walking path for `request`.
    ///
    /// Dispatches on [`Goal`]: a single tile, the first reached of a set of tiles,
    /// or the first reached tile of a stance ring.
    ///
    /// # Arguments
    /// * `scratch` - Buffers owned by the calling thread.
    /// * `request` - Floor, start, goal and creature occupancy in world coordinates.
    /// * `cancel` - Polled periodically; a cancelled search reports [`PathStatus::NoPathFound`].
    ///
    /// # Returns
    /// A [`SearchResult`] whose path excludes the start tile and ends on the reached goal.
    pub fn find_path<C: Cancellation + ?Sized>(
        &self,
        scratch: &mut ScratchBuffers,
        request: &SearchRequest,
        cancel: &C,
    ) -> SearchResult {
        let started = Instant::now();

        let prepared = match self.prepare(scratch, request) {
            Ok(prepared) => prepared,
            Err(mut result) => {
                result.elapsed = started.elapsed();
                return result;
            }
        };

        match self.run(scratch, &prepared, cancel) {
            SearchOutcome::Found { goal, cost } => {
                let grid = prepared.view.grid;
                let steps = scratch
                    .trace(goal)
                    .into_iter()
                    .map(|index| grid.to_world(grid.local(index)).extend(request.floor))
                    .collect();

                SearchResult::found(Path::new(steps, cost), started.elapsed())
            }
            SearchOutcome::Exhausted | SearchOutcome::Cancelled => {
                SearchResult::failed(PathStatus::NoPathFound, started.elapsed())
            }
        }
    }

    /// Finds a path to whichever of `goals` the search expands first.
    ///
    /// The heuristic aims at the member nearest `start`, so when members lie at very
    /// different distances the reached member isn't guaranteed to be the cheapest.
    pub fn find_path_to_any<C: Cancellation + ?Sized>(
        &self,
        scratch: &mut ScratchBuffers,
        floor: FloorId,
        start: IVec2,
        goals: &[IVec2],
        occupied: &[IVec3],
        cancel: &C,
    ) -> SearchResult {
        let request = SearchRequest::to_any(floor, start, goals.iter().copied())
            .with_occupied(occupied.iter().copied());
        self.find_path(scratch, &request, cancel)
    }

    /// Runs the same search as [`Navigator::find_path`] without building the path.
    ///
    /// # Returns
    /// The number of steps, `Some(0)` if the start already satisfies the goal, or
    /// `None` when [`Navigator::find_path`] would fail.
    pub fn path_length<C: Cancellation + ?Sized>(
        &self,
        scratch: &mut ScratchBuffers,
        request: &SearchRequest,
        cancel: &C,
    ) -> Option<usize> {
        let prepared = match self.prepare(scratch, request) {
            Ok(prepared) => prepared,
            Err(result) => return result.len(),
        };

        match self.run(scratch, &prepared, cancel) {
            SearchOutcome::Found { goal, .. } => Some(scratch.hops(goal)),
            SearchOutcome::Exhausted | SearchOutcome::Cancelled => None,
        }
    }

    /// True when [`Navigator::path_length`] would return a length.
    pub fn is_reachable<C: Cancellation + ?Sized>(
        &self,
        scratch: &mut ScratchBuffers,
        request: &SearchRequest,
        cancel: &C,
    ) -> bool {
        self.path_length(scratch, request, cancel).is_some()
    }

    /// Single-goal wrapper that first snaps unwalkable endpoints.
    ///
    /// An unwalkable or out of bounds start moves to its passable 8-neighbor closest
    /// to the end, then an unwalkable end moves to its passable 8-neighbor closest to
    /// the start. If no such neighbor exists the result is
    /// [`PathStatus::NoValidStart`] or [`PathStatus::NoValidEnd`]. Requests with a
    /// goal set or stance are passed to [`Navigator::find_path`] unchanged.
    pub fn find_path_snapped<C: Cancellation + ?Sized>(
        &self,
        scratch: &mut ScratchBuffers,
        request: &SearchRequest,
        cancel: &C,
    ) -> SearchResult {
        let started = Instant::now();

        let Goal::Tile(end) = request.goal else {
            return self.find_path(scratch, request, cancel);
        };

        let Some(view) = self.view(request.floor) else {
            log::warn!("Floor {} is not loaded", request.floor);
            return SearchResult::failed(PathStatus::NoValidStart, started.elapsed());
        };

        let Some(start) = self.snap(view, request.start, end) else {
            log::warn!("No walkable tile at or around start {:?}", request.start);
            return SearchResult::failed(PathStatus::NoValidStart, started.elapsed());
        };

        let Some(end) = self.snap(view, end, start) else {
            log::warn!("No walkable tile at or around goal {:?}", end);
            return SearchResult::failed(PathStatus::NoValidEnd, started.elapsed());
        };

        let snapped = SearchRequest {
            start,
            goal: Goal::Tile(end),
            ..request.clone()
        };

        let mut result = self.find_path(scratch, &snapped, cancel);
        result.elapsed = started.elapsed();
        result
    }

    /// `tile` itself if passable, else its passable 8-neighbor closest to `toward`.
    fn snap(&self, view: FloorView, tile: IVec2, toward: IVec2) -> Option<IVec2> {
        let grid = view.grid;
        if grid.to_local(tile).is_some_and(|local| view.is_passable(local)) {
            return Some(tile);
        }

        ORDINAL_STEPS
            .iter()
            .filter_map(|step| {
                Some(IVec2::new(
                    tile.x.checked_add(step.dx)?,
                    tile.y.checked_add(step.dy)?,
                ))
            })
            .filter(|&candidate| {
                grid.to_local(candidate)
                    .is_some_and(|local| view.is_passable(local))
            })
            .min_by_key(|&candidate| {
                let dx = (candidate.x as i64 - toward.x as i64).unsigned_abs() as u32;
                let dy = (candidate.y as i64 - toward.y as i64).unsigned_abs() as u32;
                self.settings.octile(dx, dy)
            })
    }

    /// Tiles exactly `stance.distance` BFS hops from `center`, in world coordinates.
    ///
    /// Occupied tiles are left out. An empty result means no valid stand-off tile
    /// exists at that distance.
    pub fn ring_tiles(
        &self,
        scratch: &mut ScratchBuffers,
        floor: FloorId,
        center: IVec2,
        stance: Stance,
        occupied: &[IVec3],
    ) -> Vec<IVec2> {
        let Some(view) = self.view(floor) else {
            log::warn!("Floor {} is not loaded", floor);
            return Vec::new();
        };
        let grid = view.grid;

        let Some(center_local) = grid.to_local(center) else {
            log::warn!("Stance center is out of bounds: {:?} on floor {}", center, floor);
            return Vec::new();
        };

        let occupied = Self::occupied_indices(grid, floor, occupied);
        goal::ring_tiles(view, scratch, center_local, stance, &occupied)
            .into_iter()
            .map(|index| grid.to_world(grid.local(index)))
            .collect()
    }
}
