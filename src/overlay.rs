//! Per-floor avoidance costs painted from rectangular areas.
use glam::{IVec2, UVec2};
use ndarray::{s, Array2};

use crate::{error::NavError, grid::FloorGrid, FloorId, FxIndexMap};

/// Overlay cost that makes a tile impassable regardless of walkability.
pub const BLOCKED: u8 = u8::MAX;

/// A rectangle of tiles to avoid, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvoidanceArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// 0 adds nothing, [`BLOCKED`] forbids entry.
    pub cost: u8,
}

impl AvoidanceArea {
    pub fn new(x: i32, y: i32, width: u32, height: u32, cost: u8) -> Self {
        AvoidanceArea {
            x,
            y,
            width,
            height,
            cost,
        }
    }

    /// A single blocked tile.
    pub fn blocked_tile(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 1, BLOCKED)
    }
}

/// Dense avoidance costs for one floor, indexed `[[y, x]]` in floor-local coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostOverlay {
    costs: Array2<u8>,
    /// World origin of the grid the areas were translated against.
    origin: IVec2,
}

impl CostOverlay {
    /// Paints `areas` over a zeroed overlay matching `grid`.
    /// Overlapping areas keep the highest cost, everything is clipped to the floor.
    pub fn paint(grid: &FloorGrid, areas: &[AvoidanceArea]) -> Self {
        let (width, height) = (grid.width() as i64, grid.height() as i64);
        let mut costs = Array2::zeros((height as usize, width as usize));

        for area in areas.iter().filter(|a| a.cost > 0) {
            let min_x = area.x as i64 - grid.origin().x as i64;
            let min_y = area.y as i64 - grid.origin().y as i64;
            let x0 = min_x.clamp(0, width);
            let y0 = min_y.clamp(0, height);
            let x1 = (min_x + area.width as i64).clamp(0, width);
            let y1 = (min_y + area.height as i64).clamp(0, height);
            if x0 >= x1 || y0 >= y1 {
                continue;
            }

            costs
                .slice_mut(s![y0 as usize..y1 as usize, x0 as usize..x1 as usize])
                .mapv_inplace(|c: u8| c.max(area.cost));
        }

        CostOverlay {
            costs,
            origin: grid.origin(),
        }
    }

    pub fn width(&self) -> u32 {
        self.costs.ncols() as u32
    }

    pub fn height(&self) -> u32 {
        self.costs.nrows() as u32
    }

    /// Cost at a floor-local tile, 0 outside the overlay.
    #[inline(always)]
    pub fn cost_local(&self, local: UVec2) -> u8 {
        self.costs
            .get([local.y as usize, local.x as usize])
            .copied()
            .unwrap_or(0)
    }

    /// True when the overlay was painted for a grid with the same dimensions and origin.
    pub(crate) fn matches(&self, grid: &FloorGrid) -> bool {
        self.width() == grid.width()
            && self.height() == grid.height()
            && self.origin == grid.origin()
    }
}

/// Owns the [`CostOverlay`] of every floor that has one.
#[derive(Debug, Default, Clone)]
pub struct OverlayStore {
    overlays: FxIndexMap<FloorId, CostOverlay>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the overlay for `floor` and paints `areas` fresh.
    ///
    /// An empty area list leaves the floor without an overlay.
    ///
    /// # Arguments
    /// * `floor` - The floor to rebuild.
    /// * `grid` - The floor's grid, providing origin and dimensions.
    ///   Pass `None` if the floor isn't loaded.
    /// * `areas` - Avoidance rectangles in world coordinates.
    pub fn rebuild(
        &mut self,
        floor: FloorId,
        grid: Option<&FloorGrid>,
        areas: &[AvoidanceArea],
    ) -> Result<(), NavError> {
        let grid = grid.ok_or(NavError::FloorNotLoaded(floor))?;

        self.overlays.shift_remove(&floor);
        if areas.is_empty() {
            log::debug!("Cleared overlay for floor {}", floor);
            return Ok(());
        }

        self.overlays.insert(floor, CostOverlay::paint(grid, areas));
        log::debug!("Rebuilt overlay for floor {} from {} areas", floor, areas.len());
        Ok(())
    }

    pub fn clear(&mut self, floor: FloorId) -> Option<CostOverlay> {
        self.overlays.shift_remove(&floor)
    }

    pub fn overlay(&self, floor: FloorId) -> Option<&CostOverlay> {
        self.overlays.get(&floor)
    }

    /// Cost at a world tile. 0 if the floor has no overlay or the tile is outside every area.
    pub fn cost_at(&self, floor: FloorId, grid: &FloorGrid, x: i32, y: i32) -> u8 {
        match (self.overlays.get(&floor), grid.to_local(IVec2::new(x, y))) {
            (Some(overlay), Some(local)) => overlay.cost_local(local),
            _ => 0,
        }
    }

    /// Drops the overlay of `floor` if its dimensions or origin no longer match `grid`.
    pub(crate) fn retain_matching(&mut self, floor: FloorId, grid: &FloorGrid) {
        if self
            .overlays
            .get(&floor)
            .is_some_and(|overlay| !overlay.matches(grid))
        {
            log::debug!("Dropping stale overlay for reshaped floor {}", floor);
            self.overlays.shift_remove(&floor);
        }
    }
}
