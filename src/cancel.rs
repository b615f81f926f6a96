//! Cooperative cancellation probes polled by long searches.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Polled by a search every [`crate::settings::SearchSettings::cancel_check_interval`] pops.
/// A cancelled search reports [`crate::path::PathStatus::NoPathFound`].
pub trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// Never cancels.
#[derive(Copy, Clone, Debug, Default)]
pub struct NeverCancel;

impl Cancellation for NeverCancel {
    #[inline]
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl Cancellation for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<C: Cancellation + ?Sized> Cancellation for Arc<C> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<C: Cancellation + ?Sized> Cancellation for &C {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Adapts a closure into a [`Cancellation`].
#[derive(Copy, Clone, Debug)]
pub struct Probe<F>(pub F);

impl<F: Fn() -> bool> Cancellation for Probe<F> {
    fn is_cancelled(&self) -> bool {
        (self.0)()
    }
}

/// Cancels once a point in time has passed.
#[derive(Copy, Clone, Debug)]
pub struct Deadline(pub Instant);

impl Deadline {
    /// A deadline `budget` from now.
    ///
    /// Budgets past the latest representable instant are shortened until they fit,
    /// which still leaves them far beyond any search's run time.
    pub fn after(budget: Duration) -> Self {
        let now = Instant::now();
        let mut budget = budget;
        loop {
            if let Some(deadline) = now.checked_add(budget) {
                return Deadline(deadline);
            }
            budget /= 2;
        }
    }
}

impl Cancellation for Deadline {
    fn is_cancelled(&self) -> bool {
        Instant::now() >= self.0
    }
}
