//! Per-floor walkability bitmaps.
use glam::{IVec2, UVec2};

use crate::{error::NavError, FloorId, FxIndexMap};

/// Static walkability of one floor.
///
/// Tiles are stored one bit each, bit index `y * width + x`, least significant bit
/// first within every byte. A set bit means walkable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorGrid {
    width: u32,
    height: u32,
    origin: IVec2,
    bits: Vec<u8>,
}

impl FloorGrid {
    /// Creates a floor from a packed walkability bitmap.
    ///
    /// # Arguments
    /// * `floor` - The floor id, only used for error reporting.
    /// * `width` - Width of the floor in tiles.
    /// * `height` - Height of the floor in tiles.
    /// * `origin` - World coordinates of the tile at local `(0, 0)`.
    /// * `bitmap` - Packed walkability bits. Extra trailing bytes are ignored.
    pub fn new(
        floor: FloorId,
        width: u32,
        height: u32,
        origin: IVec2,
        bitmap: &[u8],
    ) -> Result<Self, NavError> {
        if width == 0 || height == 0 {
            return Err(NavError::ZeroDimension {
                floor,
                width,
                height,
            });
        }

        let tiles = (width as u64) * (height as u64);
        // Linear indices and parent links are stored as u32, and every tile
        // needs a world coordinate that fits in i32.
        let far_x = origin.x as i64 + width as i64 - 1;
        let far_y = origin.y as i64 + height as i64 - 1;
        if tiles >= u32::MAX as u64 || far_x > i32::MAX as i64 || far_y > i32::MAX as i64 {
            return Err(NavError::DimensionOverflow {
                floor,
                width,
                height,
            });
        }

        let expected = (tiles as usize).div_ceil(8);
        if bitmap.len() < expected {
            return Err(NavError::BitmapTooShort {
                floor,
                expected,
                actual: bitmap.len(),
            });
        }

        Ok(FloorGrid {
            width,
            height,
            origin,
            bits: bitmap[..expected].to_vec(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// World coordinates of local tile `(0, 0)`.
    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    /// Number of tiles on the floor.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of walkable tiles.
    pub fn walkable_count(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_walkable_index(i)).count()
    }

    /// Translates a world tile into floor-local coordinates, or `None` if it lies
    /// outside the floor.
    #[inline]
    pub fn to_local(&self, world: IVec2) -> Option<UVec2> {
        let x = world.x as i64 - self.origin.x as i64;
        let y = world.y as i64 - self.origin.y as i64;
        if !(0..self.width as i64).contains(&x) || !(0..self.height as i64).contains(&y) {
            return None;
        }

        Some(UVec2::new(x as u32, y as u32))
    }

    #[inline]
    pub fn to_world(&self, local: UVec2) -> IVec2 {
        local.as_ivec2() + self.origin
    }

    #[inline(always)]
    pub(crate) fn index(&self, local: UVec2) -> usize {
        local.y as usize * self.width as usize + local.x as usize
    }

    #[inline(always)]
    pub(crate) fn local(&self, index: usize) -> UVec2 {
        let width = self.width as usize;
        UVec2::new((index % width) as u32, (index / width) as u32)
    }

    /// Walkability by world coordinates. Out-of-bounds tiles are not walkable.
    pub fn is_walkable(&self, world: IVec2) -> bool {
        self.to_local(world)
            .is_some_and(|local| self.is_walkable_index(self.index(local)))
    }

    #[inline(always)]
    pub(crate) fn is_walkable_index(&self, index: usize) -> bool {
        (self.bits[index >> 3] >> (index & 7)) & 1 == 1
    }
}

/// Owns the [`FloorGrid`] of every loaded floor.
#[derive(Debug, Default, Clone)]
pub struct GridStore {
    floors: FxIndexMap<FloorId, FloorGrid>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all walkability data for `floor`.
    ///
    /// On error the previously loaded grid, if any, is kept.
    pub fn load_floor(
        &mut self,
        floor: FloorId,
        width: u32,
        height: u32,
        origin: IVec2,
        bitmap: &[u8],
    ) -> Result<&FloorGrid, NavError> {
        let grid = FloorGrid::new(floor, width, height, origin, bitmap)?;
        log::debug!(
            "Loaded floor {} ({}x{} at {:?}, {} walkable)",
            floor,
            width,
            height,
            origin,
            grid.walkable_count()
        );

        let (index, _) = self.floors.insert_full(floor, grid);
        Ok(&self.floors[index])
    }

    /// Removes a floor. Returns the removed grid.
    pub fn unload_floor(&mut self, floor: FloorId) -> Option<FloorGrid> {
        self.floors.shift_remove(&floor)
    }

    pub fn floor(&self, floor: FloorId) -> Option<&FloorGrid> {
        self.floors.get(&floor)
    }

    /// Loaded floor ids, in load order.
    pub fn floors(&self) -> impl Iterator<Item = FloorId> + '_ {
        self.floors.keys().copied()
    }

    /// Returns false for unloaded floors and out-of-bounds tiles.
    pub fn is_walkable(&self, floor: FloorId, x: i32, y: i32) -> bool {
        self.floors
            .get(&floor)
            .is_some_and(|grid| grid.is_walkable(IVec2::new(x, y)))
    }
}

/// Packs a row-major slice of walkability flags into a bitmap for [`GridStore::load_floor`].
pub fn pack_bitmap(walkable: &[bool]) -> Vec<u8> {
    let mut bits = vec![0u8; walkable.len().div_ceil(8)];
    for (i, &w) in walkable.iter().enumerate() {
        if w {
            bits[i >> 3] |= 1 << (i & 7);
        }
    }
    bits
}
