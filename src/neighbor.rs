use glam::UVec2;
use smallvec::SmallVec;

use std::fmt::Debug;

/// A step to an adjacent tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub dx: i32,
    pub dy: i32,
}

impl Step {
    pub const fn new(dx: i32, dy: i32) -> Self {
        Step { dx, dy }
    }

    #[inline(always)]
    pub fn is_diagonal(self) -> bool {
        self.dx != 0 && self.dy != 0
    }
}

pub(crate) const CARDINAL_STEPS: [Step; 4] = [
    Step::new(0, -1),
    Step::new(1, 0),
    Step::new(0, 1),
    Step::new(-1, 0),
];

pub(crate) const ORDINAL_STEPS: [Step; 8] = [
    Step::new(0, -1),
    Step::new(1, 0),
    Step::new(0, 1),
    Step::new(-1, 0),
    Step::new(1, -1),
    Step::new(1, 1),
    Step::new(-1, 1),
    Step::new(-1, -1),
];

/// Tiles adjacent to a position, with the step that reaches them.
pub type NeighborBuf = SmallVec<[(UVec2, Step); 8]>;

pub trait Neighborhood: Clone + Copy + Debug + Default + Sync + Send {
    fn steps(&self) -> &'static [Step];

    /// Pushes every in-bounds neighbor of `pos` on a `width` x `height` floor into `target`.
    #[inline(always)]
    fn neighbors(&self, pos: UVec2, width: u32, height: u32, target: &mut NeighborBuf) {
        for &step in self.steps() {
            let nx = pos.x as i64 + step.dx as i64;
            let ny = pos.y as i64 + step.dy as i64;

            if nx >= 0 && ny >= 0 && nx < width as i64 && ny < height as i64 {
                target.push((UVec2::new(nx as u32, ny as u32), step));
            }
        }
    }
}

/// 4-connected movement.
#[derive(Clone, Copy, Debug, Default)]
pub struct CardinalNeighborhood;

impl Neighborhood for CardinalNeighborhood {
    #[inline(always)]
    fn steps(&self) -> &'static [Step] {
        &CARDINAL_STEPS
    }
}

/// 8-connected movement. The A* search always uses this neighborhood.
#[derive(Clone, Copy, Debug, Default)]
pub struct OrdinalNeighborhood;

impl Neighborhood for OrdinalNeighborhood {
    #[inline(always)]
    fn steps(&self) -> &'static [Step] {
        &ORDINAL_STEPS
    }
}
