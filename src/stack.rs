//! Coordination between progress bars that are live at the same time.
//!
//! When loops nest, several bars share one terminal. [`ActiveBars`] counts the bars that
//! have started drawing but not yet finished, and the renderer uses that count to decide
//! whether a new bar needs its own line and whether an erased bar should hand the cursor
//! back to the line above.
//!
//! # Sharing
//!
//! `ActiveBars` is a cheap handle (an [`Arc`] bump) over one counter. Every bar built with
//! the default configuration shares [`ActiveBars::global`]. Tests and embedders that want
//! isolation create their own with [`ActiveBars::new`] and pass it to the builder.
//!
//! Updates happen in call order on the thread driving iteration; the atomic only exists
//! so the handle is `Send + Sync`.

use std::{
    fmt,
    sync::{
        Arc, LazyLock,
        atomic::{AtomicUsize, Ordering},
    },
};

static GLOBAL: LazyLock<ActiveBars> = LazyLock::new(ActiveBars::new);

/// A shared counter of bars that are currently drawn on the terminal.
#[derive(Clone, Default)]
pub struct ActiveBars {
    live: Arc<AtomicUsize>,
}

impl fmt::Debug for ActiveBars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveBars")
            .field("count", &self.count())
            .finish()
    }
}

impl ActiveBars {
    /// Creates a new counter, independent from every other one.
    ///
    /// # Examples
    ///
    /// ```
    /// use iter_gauge::ActiveBars;
    ///
    /// let bars = ActiveBars::new();
    /// assert_eq!(bars.count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the process-wide counter used by default.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL.clone()
    }

    /// Returns the number of bars that have started and not yet finished.
    #[must_use]
    pub fn count(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Returns `true` if both handles point to the same counter.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.live, &other.live)
    }

    /// Registers a bar that just drew for the first time. Returns the new count.
    pub(crate) fn enter(&self) -> usize {
        self.live.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Unregisters a finished bar. Returns the number of bars still live.
    ///
    /// Saturates at zero so a stray close cannot wrap the counter.
    pub(crate) fn exit(&self) -> usize {
        let prev = self
            .live
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                Some(n.saturating_sub(1))
            })
            .unwrap_or_default();
        prev.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::ActiveBars;

    /// Enter / Exit
    /// Verifies counting in call order, as nested loops produce it.
    #[test]
    fn test_enter_exit_ordering() {
        let bars = ActiveBars::new();

        assert_eq!(bars.enter(), 1, "outer bar is alone");
        assert_eq!(bars.enter(), 2, "inner bar stacks below");
        assert_eq!(bars.exit(), 1, "outer bar still live");
        assert_eq!(bars.exit(), 0);
        assert_eq!(bars.count(), 0);
    }

    /// Saturation
    /// An unbalanced exit must not wrap around.
    #[test]
    fn test_exit_saturates() {
        let bars = ActiveBars::new();
        assert_eq!(bars.exit(), 0);
        assert_eq!(bars.count(), 0);
    }

    /// Handle Sharing
    /// Clones observe each other; fresh counters are isolated.
    #[test]
    fn test_handles_share_state() {
        let a = ActiveBars::new();
        let b = a.clone();
        let c = ActiveBars::new();

        a.enter();
        assert_eq!(b.count(), 1);
        assert_eq!(c.count(), 0);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert!(ActiveBars::global().same_as(&ActiveBars::global()));
    }
}
