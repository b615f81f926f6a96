//! Reusable per-thread bookkeeping for searches.
//!
//! Every array is addressed by linear tile index (`y * width + x`). Rather than
//! clearing them before each search, [`ScratchBuffers::begin_search`] bumps a visit
//! token; a tile only counts as touched when its mark equals the current token.
use std::cell::RefCell;
use std::collections::{BinaryHeap, VecDeque};

use crate::SmallestCostHolder;

/// Parent link of the search root.
pub(crate) const NO_PARENT: u32 = u32::MAX;

/// Scratch arrays shared by A* and the ring selector.
///
/// Each thread or task running searches needs its own instance. Capacity grows to
/// the largest floor searched and is never released.
#[derive(Debug)]
pub struct ScratchBuffers {
    pub(crate) best_cost: Vec<u32>,
    pub(crate) parent: Vec<u32>,
    pub(crate) open_mark: Vec<i32>,
    pub(crate) closed_mark: Vec<i32>,
    token: i32,
    pub(crate) open: BinaryHeap<SmallestCostHolder>,
    pub(crate) queue: VecDeque<u32>,
}

impl Default for ScratchBuffers {
    fn default() -> Self {
        Self::new()
    }
}

thread_local! {
    static LOCAL: RefCell<ScratchBuffers> = RefCell::new(ScratchBuffers::new());
}

impl ScratchBuffers {
    pub fn new() -> Self {
        ScratchBuffers {
            best_cost: Vec::new(),
            parent: Vec::new(),
            open_mark: Vec::new(),
            closed_mark: Vec::new(),
            token: 0,
            open: BinaryHeap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Creates buffers already sized for `tiles` tiles.
    pub fn with_capacity(tiles: usize) -> Self {
        let mut scratch = Self::new();
        scratch.ensure_capacity(tiles);
        scratch
    }

    /// Runs `f` with this thread's shared buffers.
    ///
    /// # Panics
    /// If called again from inside `f`.
    pub fn with_thread_local<R>(f: impl FnOnce(&mut ScratchBuffers) -> R) -> R {
        LOCAL.with(|scratch| f(&mut scratch.borrow_mut()))
    }

    /// Number of tiles the buffers can address.
    pub fn capacity(&self) -> usize {
        self.best_cost.len()
    }

    /// The current visit token.
    pub fn token(&self) -> i32 {
        self.token
    }

    /// Grows every array to hold at least `tiles` entries. Never shrinks.
    pub fn ensure_capacity(&mut self, tiles: usize) {
        if tiles <= self.capacity() {
            return;
        }

        // New entries carry mark 0, which no live token ever equals.
        self.best_cost.resize(tiles, u32::MAX);
        self.parent.resize(tiles, NO_PARENT);
        self.open_mark.resize(tiles, 0);
        self.closed_mark.resize(tiles, 0);
    }

    /// Starts a new search, invalidating every mark left by earlier ones.
    pub fn begin_search(&mut self) -> i32 {
        self.open.clear();
        self.queue.clear();

        match self.token.checked_add(1) {
            Some(token) => self.token = token,
            None => {
                log::debug!("Visit token overflowed, resetting {} marks", self.capacity());
                self.open_mark.fill(0);
                self.closed_mark.fill(0);
                self.token = 1;
            }
        }

        self.token
    }

    #[inline(always)]
    pub(crate) fn is_open(&self, index: usize) -> bool {
        self.open_mark[index] == self.token
    }

    #[inline(always)]
    pub(crate) fn is_closed(&self, index: usize) -> bool {
        self.closed_mark[index] == self.token
    }

    #[inline(always)]
    pub(crate) fn close(&mut self, index: usize) {
        self.closed_mark[index] = self.token;
    }

    /// Cost recorded for `index` in this search, `u32::MAX` if untouched.
    #[inline(always)]
    pub(crate) fn cost(&self, index: usize) -> u32 {
        if self.is_open(index) {
            self.best_cost[index]
        } else {
            u32::MAX
        }
    }

    /// Records a better cost and parent for `index`.
    #[inline(always)]
    pub(crate) fn relax(&mut self, index: usize, cost: u32, parent: u32) {
        self.best_cost[index] = cost;
        self.parent[index] = parent;
        self.open_mark[index] = self.token;
    }

    /// Number of steps from the search root to `index`.
    pub(crate) fn hops(&self, index: usize) -> usize {
        let mut hops = 0;
        let mut current = self.parent[index];
        while current != NO_PARENT {
            hops += 1;
            current = self.parent[current as usize];
        }
        hops
    }

    /// Walks parent links from `index` back to the root, returning the tiles in
    /// walking order with the root excluded.
    pub(crate) fn trace(&self, index: usize) -> Vec<usize> {
        let mut steps = Vec::with_capacity(self.hops(index));
        let mut current = index as u32;
        while self.parent[current as usize] != NO_PARENT {
            steps.push(current as usize);
            current = self.parent[current as usize];
        }
        steps.reverse();
        steps
    }

    #[cfg(test)]
    pub(crate) fn set_token(&mut self, token: i32) {
        self.token = token;
    }
}
