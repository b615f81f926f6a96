//! Weighted A* shared by every query mode.
use glam::UVec2;
use rustc_hash::FxHashSet;

use crate::{
    cancel::Cancellation,
    grid::FloorGrid,
    neighbor::{NeighborBuf, Neighborhood, OrdinalNeighborhood},
    overlay::{CostOverlay, BLOCKED},
    scratch::{ScratchBuffers, NO_PARENT},
    settings::SearchSettings,
    FxIndexSet, SmallestCostHolder,
};

/// Read-only data of the floor being searched.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FloorView<'a> {
    pub(crate) grid: &'a FloorGrid,
    pub(crate) overlay: Option<&'a CostOverlay>,
}

impl FloorView<'_> {
    #[inline(always)]
    pub(crate) fn cost(&self, local: UVec2) -> u8 {
        self.overlay.map_or(0, |overlay| overlay.cost_local(local))
    }

    /// Walkable and not blocked by the overlay.
    #[inline(always)]
    pub(crate) fn is_passable(&self, local: UVec2) -> bool {
        self.grid.is_walkable_index(self.grid.index(local)) && self.cost(local) != BLOCKED
    }
}

/// Destination of a search, as linear tile indices.
#[derive(Debug, Clone)]
pub(crate) enum Goals {
    Tile(usize),
    Set(FxIndexSet<usize>),
}

impl Goals {
    #[inline(always)]
    pub(crate) fn contains(&self, index: usize) -> bool {
        match self {
            Goals::Tile(goal) => *goal == index,
            Goals::Set(goals) => goals.contains(&index),
        }
    }
}

/// Everything a single search needs besides the floor and scratch buffers.
pub(crate) struct SearchParams<'a> {
    pub(crate) start: usize,
    pub(crate) goals: &'a Goals,
    /// Tile the heuristic and the straight-line penalty aim at.
    pub(crate) target: UVec2,
    pub(crate) occupied: &'a FxHashSet<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// A goal tile was expanded. Its parent chain is left in the scratch buffers.
    Found { goal: usize, cost: u32 },
    Exhausted,
    Cancelled,
}

#[inline(always)]
fn axis_distances(pos: UVec2, target: UVec2) -> (u32, u32) {
    (pos.x.abs_diff(target.x), pos.y.abs_diff(target.y))
}

#[inline(always)]
pub(crate) fn heuristic(settings: &SearchSettings, pos: UVec2, target: UVec2) -> u32 {
    let (dx, dy) = axis_distances(pos, target);
    settings.octile(dx, dy)
}

/// True when stepping from `from` to `to` shrinks the larger of the two axis
/// distances to `target`.
#[inline(always)]
fn reduces_dominant_axis(from: UVec2, to: UVec2, target: UVec2) -> bool {
    let (fx, fy) = axis_distances(from, target);
    let (tx, ty) = axis_distances(to, target);
    tx.max(ty) < fx.max(fy)
}

/// A* search over 8-connected moves on a single floor.
///
/// # Arguments
/// * `settings` - Step costs, tie-breaks and cancellation cadence.
/// * `view` - The floor grid and its optional cost overlay.
/// * `scratch` - Buffers owned by the calling thread. Sized and reset here.
/// * `params` - Start tile, goal test, heuristic target and occupied tiles.
/// * `cancel` - Polled every `cancel_check_interval` pops.
///
/// # Returns
/// [`SearchOutcome::Found`] on the first expansion of a goal tile. Parent links for
/// reconstruction stay valid in `scratch` until its next search.
pub(crate) fn astar_floor<C: Cancellation + ?Sized>(
    settings: &SearchSettings,
    view: FloorView,
    scratch: &mut ScratchBuffers,
    params: &SearchParams,
    cancel: &C,
) -> SearchOutcome {
    let grid = view.grid;
    let (width, height) = (grid.width(), grid.height());
    let target = params.target;

    scratch.ensure_capacity(grid.len());
    scratch.begin_search();

    let start_h = heuristic(settings, grid.local(params.start), target);
    scratch.relax(params.start, 0, NO_PARENT);
    scratch.open.push(SmallestCostHolder {
        estimated_cost: start_h,
        heuristic: start_h,
        cost: 0,
        index: params.start as u32,
    });

    let mut neighbors = NeighborBuf::new();
    let mut pops: u32 = 0;

    while let Some(SmallestCostHolder { cost, index, .. }) = scratch.open.pop() {
        pops = pops.wrapping_add(1);
        if pops % settings.cancel_check_interval == 0 && cancel.is_cancelled() {
            log::debug!("Search cancelled after {} pops", pops);
            return SearchOutcome::Cancelled;
        }

        let current = index as usize;
        if scratch.is_closed(current) || cost > scratch.cost(current) {
            continue;
        }

        if params.goals.contains(current) {
            return SearchOutcome::Found {
                goal: current,
                cost,
            };
        }

        scratch.close(current);
        let pos = grid.local(current);

        neighbors.clear();
        OrdinalNeighborhood.neighbors(pos, width, height, &mut neighbors);

        for &(neighbor_pos, step) in neighbors.iter() {
            let neighbor = grid.index(neighbor_pos);
            if scratch.is_closed(neighbor) {
                continue;
            }

            let tile_cost = view.cost(neighbor_pos);
            if tile_cost == BLOCKED {
                continue;
            }

            // Destinations may be structurally unwalkable, so adjacency-snapped
            // goals stay reachable.
            let is_goal = params.goals.contains(neighbor);
            if !grid.is_walkable_index(neighbor) && (tile_cost > 0 || !is_goal) {
                continue;
            }

            let diagonal = step.is_diagonal();
            let mut step_cost = if diagonal {
                settings.diagonal_cost
            } else if reduces_dominant_axis(pos, neighbor_pos, target) {
                settings.orthogonal_cost
            } else {
                settings.orthogonal_cost + settings.straight_penalty
            };
            step_cost += tile_cost as u32;

            if !is_goal && params.occupied.contains(&neighbor) {
                step_cost = step_cost.saturating_add(settings.occupied_cost);
            }

            let new_cost = cost.saturating_add(step_cost);
            if new_cost >= scratch.cost(neighbor) {
                continue;
            }

            scratch.relax(neighbor, new_cost, current as u32);

            let h = heuristic(settings, neighbor_pos, target);
            let mut estimated_cost = new_cost.saturating_add(h);
            if diagonal {
                estimated_cost = estimated_cost.saturating_add(settings.diagonal_tie_break);
            }

            scratch.open.push(SmallestCostHolder {
                estimated_cost,
                heuristic: h,
                cost: new_cost,
                index: neighbor as u32,
            });
        }
    }

    SearchOutcome::Exhausted
}
