//! This module defines the [`Path`] and [`SearchResult`] types returned by searches.
use std::collections::VecDeque;
use std::time::Duration;

use glam::IVec3;
use strum::{Display, IntoStaticStr};

/// Waypoints of a walk in world coordinates, starting one step after the start tile.
#[derive(Debug, Clone, Default)]
pub struct Path {
    path: VecDeque<IVec3>,
    cost: u32,
}

impl Path {
    /// Create a new path from a vector of world positions.
    /// # Arguments
    /// * `path` - Waypoints in walking order, start tile excluded
    /// * `cost` - The total movement cost of the path
    ///
    pub fn new(path: Vec<IVec3>, cost: u32) -> Self {
        Path {
            path: path.into(),
            cost,
        }
    }

    /// Returns true if the path contains the given position
    pub fn contains(&self, pos: IVec3) -> bool {
        self.path.contains(&pos)
    }

    /// Returns the waypoints as a slice.
    ///
    /// # Example
    ///
    /// ```rust
    /// use floorpath::prelude::*;
    ///
    /// let path = Path::new(vec![IVec3::new(1, 2, 0), IVec3::new(2, 3, 0)], 60);
    /// assert_eq!(path.path(), &[IVec3::new(1, 2, 0), IVec3::new(2, 3, 0)]);
    /// ```
    pub fn path(&self) -> &[IVec3] {
        self.path.as_slices().0
    }

    /// Returns the movement cost of the path, including tie-break penalties,
    /// overlay costs and occupancy costs.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Returns the number of steps in the path
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Returns true if the path is empty
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Pops the next waypoint.
    pub fn pop(&mut self) -> Option<IVec3> {
        self.path.pop_front()
    }

    /// Returns the next waypoint without removing it.
    pub fn next(&self) -> Option<IVec3> {
        self.path.front().copied()
    }

    /// Returns the final waypoint.
    pub fn goal(&self) -> Option<IVec3> {
        self.path.back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IVec3> {
        self.path.iter()
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Path {}

impl IntoIterator for Path {
    type Item = IVec3;
    type IntoIter = std::collections::vec_deque::IntoIter<IVec3>;

    fn into_iter(self) -> Self::IntoIter {
        self.path.into_iter()
    }
}

/// Terminal state of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PathStatus {
    PathFound,
    /// The goal is unreachable, or the search was cancelled.
    NoPathFound,
    NoValidStart,
    NoValidEnd,
    /// The start tile already satisfies the goal.
    WaypointReached,
}

/// Outcome of a path query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub status: PathStatus,
    /// Present for [`PathStatus::PathFound`] and, empty, for [`PathStatus::WaypointReached`].
    pub path: Option<Path>,
    /// The goal tile the walk ends on.
    pub reached: Option<IVec3>,
    pub elapsed: Duration,
}

impl SearchResult {
    pub(crate) fn failed(status: PathStatus, elapsed: Duration) -> Self {
        SearchResult {
            status,
            path: None,
            reached: None,
            elapsed,
        }
    }

    pub(crate) fn reached(at: IVec3, elapsed: Duration) -> Self {
        SearchResult {
            status: PathStatus::WaypointReached,
            path: Some(Path::default()),
            reached: Some(at),
            elapsed,
        }
    }

    pub(crate) fn found(path: Path, elapsed: Duration) -> Self {
        SearchResult {
            status: PathStatus::PathFound,
            reached: path.goal(),
            path: Some(path),
            elapsed,
        }
    }

    /// True for [`PathStatus::PathFound`] and [`PathStatus::WaypointReached`].
    pub fn is_success(&self) -> bool {
        matches!(
            self.status,
            PathStatus::PathFound | PathStatus::WaypointReached
        )
    }

    /// Number of steps, if the search succeeded.
    pub fn len(&self) -> Option<usize> {
        self.path.as_ref().map(Path::len)
    }
}
