//! Breadth-first selection of stand-off goal tiles.
use glam::UVec2;
use rustc_hash::FxHashSet;

use crate::{
    astar::FloorView,
    neighbor::{CardinalNeighborhood, NeighborBuf, Neighborhood, OrdinalNeighborhood},
    request::{Stance, StanceKind},
    scratch::{ScratchBuffers, NO_PARENT},
};

/// Collects the tiles exactly `stance.distance` unweighted hops from `center`.
///
/// Hops only pass through walkable tiles not blocked by the overlay; occupied tiles
/// can be passed through but are never returned. Exploration stops at the ring, so
/// the cost is bounded by the ring's area rather than the floor's.
///
/// # Arguments
/// * `view` - The floor being searched.
/// * `scratch` - The calling thread's buffers. Hop counts are stored in the best-cost array.
/// * `center` - Floor-local reference tile. It doesn't need to be walkable itself.
/// * `stance` - Ring connectivity and hop distance.
/// * `occupied` - Linear indices of tiles occupied by creatures.
///
/// # Returns
/// Linear tile indices in discovery order. Empty when no valid tile exists at that
/// exact distance.
pub(crate) fn ring_tiles(
    view: FloorView,
    scratch: &mut ScratchBuffers,
    center: UVec2,
    stance: Stance,
    occupied: &FxHashSet<usize>,
) -> Vec<usize> {
    match stance.kind {
        StanceKind::Ordinal => bfs_ring(
            &OrdinalNeighborhood,
            view,
            scratch,
            center,
            stance.distance,
            occupied,
        ),
        StanceKind::Cardinal => bfs_ring(
            &CardinalNeighborhood,
            view,
            scratch,
            center,
            stance.distance,
            occupied,
        ),
    }
}

fn bfs_ring<N: Neighborhood>(
    neighborhood: &N,
    view: FloorView,
    scratch: &mut ScratchBuffers,
    center: UVec2,
    distance: u32,
    occupied: &FxHashSet<usize>,
) -> Vec<usize> {
    let grid = view.grid;
    let (width, height) = (grid.width(), grid.height());

    scratch.ensure_capacity(grid.len());
    scratch.begin_search();

    let center_index = grid.index(center);
    scratch.relax(center_index, 0, NO_PARENT);
    scratch.queue.push_back(center_index as u32);

    let mut ring = Vec::new();
    let mut neighbors = NeighborBuf::new();

    while let Some(index) = scratch.queue.pop_front() {
        let current = index as usize;
        let hops = scratch.best_cost[current];
        let pos = grid.local(current);

        if hops == distance {
            if view.is_passable(pos) && !occupied.contains(&current) {
                ring.push(current);
            }
            continue;
        }

        neighbors.clear();
        neighborhood.neighbors(pos, width, height, &mut neighbors);

        for &(neighbor_pos, _) in neighbors.iter() {
            let neighbor = grid.index(neighbor_pos);
            if scratch.is_open(neighbor) || !view.is_passable(neighbor_pos) {
                continue;
            }

            scratch.relax(neighbor, hops + 1, current as u32);
            scratch.queue.push_back(neighbor as u32);
        }
    }

    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::{pack_bitmap, FloorGrid},
        overlay::{AvoidanceArea, CostOverlay},
    };
    use glam::IVec2;

    fn floor(rows: &[&str]) -> FloorGrid {
        let width = rows[0].len() as u32;
        let flags: Vec<bool> = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '.'))
            .collect();
        FloorGrid::new(0, width, rows.len() as u32, IVec2::ZERO, &pack_bitmap(&flags)).unwrap()
    }

    fn open_floor(size: u32) -> FloorGrid {
        let flags = vec![true; (size * size) as usize];
        FloorGrid::new(0, size, size, IVec2::ZERO, &pack_bitmap(&flags)).unwrap()
    }

    fn unoccupied_ring(
        view: FloorView,
        scratch: &mut ScratchBuffers,
        center: UVec2,
        stance: Stance,
    ) -> Vec<usize> {
        ring_tiles(view, scratch, center, stance, &FxHashSet::default())
    }

    fn locals(grid: &FloorGrid, ring: &[usize]) -> Vec<UVec2> {
        let mut tiles: Vec<UVec2> = ring.iter().map(|&i| grid.local(i)).collect();
        tiles.sort_by_key(|p| (p.y, p.x));
        tiles
    }

    #[test]
    fn test_ordinal_ring_is_square() {
        let grid = open_floor(9);
        let view = FloorView {
            grid: &grid,
            overlay: None,
        };
        let mut scratch = ScratchBuffers::new();

        let ring = unoccupied_ring(view, &mut scratch, UVec2::new(4, 4), Stance::at_range(2));

        assert_eq!(ring.len(), 16);
        for pos in locals(&grid, &ring) {
            assert_eq!(pos.x.abs_diff(4).max(pos.y.abs_diff(4)), 2);
        }
    }

    #[test]
    fn test_cardinal_ring_is_diamond() {
        let grid = open_floor(9);
        let view = FloorView {
            grid: &grid,
            overlay: None,
        };
        let mut scratch = ScratchBuffers::new();

        let ring = ring_tiles(
            view,
            &mut scratch,
            UVec2::new(4, 4),
            Stance::new(StanceKind::Cardinal, 2),
            &FxHashSet::default(),
        );

        assert_eq!(ring.len(), 8);
        for pos in locals(&grid, &ring) {
            assert_eq!(pos.x.abs_diff(4) + pos.y.abs_diff(4), 2);
        }
    }

    #[test]
    fn test_ring_follows_walls() {
        // (2, 2) is 2 hops away as the crow flies but 4 around the wall.
        let grid = floor(&[
            ".....",
            ".#...",
            ".#...",
            ".#...",
            ".....",
        ]);
        let view = FloorView {
            grid: &grid,
            overlay: None,
        };
        let mut scratch = ScratchBuffers::new();

        let ring = locals(
            &grid,
            &unoccupied_ring(view, &mut scratch, UVec2::new(0, 2), Stance::at_range(1)),
        );
        assert_eq!(ring, vec![UVec2::new(0, 1), UVec2::new(0, 3)]);

        let ring = locals(
            &grid,
            &unoccupied_ring(view, &mut scratch, UVec2::new(0, 2), Stance::at_range(3)),
        );
        assert_eq!(
            ring,
            vec![
                UVec2::new(2, 0),
                UVec2::new(2, 1),
                UVec2::new(2, 3),
                UVec2::new(2, 4)
            ]
        );

        let ring = locals(
            &grid,
            &unoccupied_ring(view, &mut scratch, UVec2::new(0, 2), Stance::at_range(4)),
        );
        assert!(ring.contains(&UVec2::new(2, 2)));
    }

    #[test]
    fn test_ring_excludes_occupied_and_blocked() {
        let grid = open_floor(5);
        let overlay = CostOverlay::paint(&grid, &[AvoidanceArea::blocked_tile(3, 2)]);
        let view = FloorView {
            grid: &grid,
            overlay: Some(&overlay),
        };
        let mut scratch = ScratchBuffers::new();
        let occupied: FxHashSet<usize> = [grid.index(UVec2::new(1, 2))].into_iter().collect();

        let ring = locals(
            &grid,
            &ring_tiles(view, &mut scratch, UVec2::new(2, 2), Stance::at_range(1), &occupied),
        );

        assert_eq!(ring.len(), 6);
        assert!(!ring.contains(&UVec2::new(3, 2)));
        assert!(!ring.contains(&UVec2::new(1, 2)));
    }

    #[test]
    fn test_ring_beyond_extent_is_empty() {
        let grid = open_floor(5);
        let view = FloorView {
            grid: &grid,
            overlay: None,
        };
        let mut scratch = ScratchBuffers::new();

        let ring = unoccupied_ring(view, &mut scratch, UVec2::new(0, 0), Stance::at_range(5));
        assert!(ring.is_empty());

        let ring = unoccupied_ring(view, &mut scratch, UVec2::new(0, 0), Stance::at_range(4));
        assert_eq!(ring.len(), 9);
    }

    #[test]
    fn test_ring_distance_zero_is_center() {
        let grid = open_floor(3);
        let view = FloorView {
            grid: &grid,
            overlay: None,
        };
        let mut scratch = ScratchBuffers::new();

        let ring = unoccupied_ring(view, &mut scratch, UVec2::new(1, 1), Stance::at_range(0));
        assert_eq!(ring, vec![grid.index(UVec2::new(1, 1))]);
    }
}
