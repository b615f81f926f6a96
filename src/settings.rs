//! Tuning constants for the weighted A* search.

/// Cost of one orthogonal step.
pub const DEFAULT_ORTHOGONAL_COST: u32 = 10;
/// Cost of one diagonal step. Above two orthogonal steps, so diagonals only win
/// together with the straight-line penalty.
pub const DEFAULT_DIAGONAL_COST: u32 = 30;
/// Added to the f score of nodes reached by a diagonal step.
pub const DEFAULT_DIAGONAL_TIE_BREAK: u32 = 1;
/// Added to the g score of orthogonal steps that do not shrink the dominant
/// axis distance to the heuristic target.
pub const DEFAULT_STRAIGHT_PENALTY: u32 = 11;
/// Cost of entering a tile occupied by a creature.
pub const DEFAULT_OCCUPIED_COST: u32 = 100_000;
/// Priority-queue pops between two cancellation polls.
pub const DEFAULT_CANCEL_CHECK_INTERVAL: u32 = 1000;

/// Settings used by every search a [`crate::pathfind::Navigator`] runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchSettings {
    pub(crate) orthogonal_cost: u32,
    pub(crate) diagonal_cost: u32,
    pub(crate) diagonal_tie_break: u32,
    pub(crate) straight_penalty: u32,
    pub(crate) occupied_cost: u32,
    pub(crate) cancel_check_interval: u32,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            orthogonal_cost: DEFAULT_ORTHOGONAL_COST,
            diagonal_cost: DEFAULT_DIAGONAL_COST,
            diagonal_tie_break: DEFAULT_DIAGONAL_TIE_BREAK,
            straight_penalty: DEFAULT_STRAIGHT_PENALTY,
            occupied_cost: DEFAULT_OCCUPIED_COST,
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }
}

impl SearchSettings {
    pub fn orthogonal_cost(&self) -> u32 {
        self.orthogonal_cost
    }

    pub fn diagonal_cost(&self) -> u32 {
        self.diagonal_cost
    }

    pub fn diagonal_tie_break(&self) -> u32 {
        self.diagonal_tie_break
    }

    pub fn straight_penalty(&self) -> u32 {
        self.straight_penalty
    }

    pub fn occupied_cost(&self) -> u32 {
        self.occupied_cost
    }

    pub fn cancel_check_interval(&self) -> u32 {
        self.cancel_check_interval
    }

    /// Octile distance using the configured step costs.
    #[inline(always)]
    pub(crate) fn octile(&self, dx: u32, dy: u32) -> u32 {
        let (min, max) = if dx < dy { (dx, dy) } else { (dy, dx) };
        self.orthogonal_cost
            .saturating_mul(max - min)
            .saturating_add(self.diagonal_cost.saturating_mul(min))
    }
}

/// Builder for [`SearchSettings`].
///
/// Example usage:
/// ```
/// use floorpath::prelude::*;
///
/// let settings = SearchSettingsBuilder::new()
///     .occupied_cost(5_000)
///     .cancel_check_interval(250)
///     .build();
///
/// let navigator = Navigator::with_settings(settings);
/// assert_eq!(navigator.settings().occupied_cost(), 5_000);
/// ```
#[derive(Clone, Debug, Default)]
pub struct SearchSettingsBuilder {
    settings: SearchSettings,
}

impl SearchSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cost of one orthogonal step. Must be at least 1.
    pub fn orthogonal_cost(mut self, cost: u32) -> Self {
        if cost == 0 {
            panic!("Orthogonal cost must be at least 1");
        }

        self.settings.orthogonal_cost = cost;
        self
    }

    /// Cost of one diagonal step. Must be at least the orthogonal cost.
    pub fn diagonal_cost(mut self, cost: u32) -> Self {
        self.settings.diagonal_cost = cost;
        self
    }

    /// Tie-break added to the f score of diagonally reached nodes.
    pub fn diagonal_tie_break(mut self, tie_break: u32) -> Self {
        self.settings.diagonal_tie_break = tie_break;
        self
    }

    /// Penalty for orthogonal steps that leave the dominant axis distance unchanged.
    /// Set to 0 to disable straight-line shaping.
    pub fn straight_penalty(mut self, penalty: u32) -> Self {
        self.settings.straight_penalty = penalty;
        self
    }

    /// Cost of stepping onto a tile occupied by a creature.
    pub fn occupied_cost(mut self, cost: u32) -> Self {
        self.settings.occupied_cost = cost;
        self
    }

    /// How many priority-queue pops happen between cancellation polls.
    /// Must be at least 1.
    pub fn cancel_check_interval(mut self, interval: u32) -> Self {
        if interval == 0 {
            panic!("Cancel check interval must be at least 1");
        }

        self.settings.cancel_check_interval = interval;
        self
    }

    pub fn build(self) -> SearchSettings {
        if self.settings.diagonal_cost < self.settings.orthogonal_cost {
            panic!("Diagonal cost must be at least the orthogonal cost");
        }

        self.settings
    }
}
