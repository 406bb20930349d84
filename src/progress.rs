//! Core progress state.
//!
//! [`Progress`] owns everything one gauge needs: the immutable total, the consumed count,
//! the label, the leave policy, the start instant, and handles to the shared
//! [`ActiveBars`] counter and the [`DrawTarget`]. Its only mutator is
//! [`Progress::advance`], which records the step and draws exactly one frame.
//!
//! # Lifecycle
//!
//! * **Created:** nothing is drawn and the bar is not counted as live.
//! * **Running:** the first advance registers the bar in [`ActiveBars`] (emitting a
//!   newline first if another bar already owns the current line) and every advance redraws.
//! * **Finished:** reaching the total draws a final frame, unregisters the bar, and either
//!   leaves the line on screen or erases it. Later advances still count but never draw.
//!
//! # Snapshots
//!
//! Rendering reads a [`ProgressSnapshot`], an owned copy of the state taken at one
//! instant. Derived metrics (percentage, remaining time, seconds per item) live on the
//! snapshot and are guarded against a zero consumed count.

use std::time::Duration;

use compact_str::CompactString;
use web_time::Instant;

use crate::{
    builder::{ProgressBuilder, ProgressOptions},
    error::Result,
    render::{self, Ending},
    stack::ActiveBars,
    target::DrawTarget,
};

/// A progress indicator with a known total.
///
/// Usually owned by a [`ProgressIter`](crate::ProgressIter), but it can be driven by hand
/// through [`counter`] for work that completes in chunks of varying size.
#[derive(Debug)]
pub struct Progress {
    pub(crate) total: u64,
    pub(crate) consumed: u64,
    pub(crate) label: CompactString,
    pub(crate) leave: bool,
    pub(crate) start: Instant,
    pub(crate) active: ActiveBars,
    pub(crate) target: DrawTarget,
    pub(crate) started: bool,
    pub(crate) finished: bool,
    pub(crate) draws: u64,
}

/// Creates a manually driven progress bar drawing to stdout.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) if `total`
/// is zero.
///
/// # Examples
///
/// ```
/// let mut pb = iter_gauge::counter(100)?;
/// for _ in 0..10 {
///     pb.advance(10);
/// }
/// assert!(pb.is_finished());
/// # Ok::<(), iter_gauge::Error>(())
/// ```
pub fn counter(total: u64) -> Result<Progress> {
    ProgressBuilder::new(total).build()
}

impl Progress {
    /// Creates a progress bar with default options.
    ///
    /// # Errors
    ///
    /// Fails if `total` is zero.
    pub fn new(total: u64) -> Result<Self> {
        ProgressBuilder::new(total).build()
    }

    /// Creates a progress bar from a set of options.
    ///
    /// # Errors
    ///
    /// Fails if `total` is zero.
    pub fn with_options(total: u64, options: ProgressOptions) -> Result<Self> {
        ProgressBuilder::from_options(total, options).build()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Gets the total item count. Fixed at creation.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Gets the number of items recorded so far, including any over-advance.
    #[must_use]
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Gets the label; empty when none was given.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the bar stays on screen once finished.
    #[must_use]
    pub const fn leave(&self) -> bool {
        self.leave
    }

    /// Whether the first advance has happened.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Whether the bar reached its total or was closed.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of frames drawn so far.
    #[must_use]
    pub const fn draw_count(&self) -> u64 {
        self.draws
    }

    /// The live-bar counter this bar registers with.
    #[must_use]
    pub const fn active_bars(&self) -> &ActiveBars {
        &self.active
    }

    // ========================================================================
    // Timing
    // ========================================================================

    /// Time since the bar was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Estimated time until the total is reached.
    ///
    /// Zero before the first advance and once the total has been passed.
    #[must_use]
    pub fn remaining_estimate(&self) -> Duration {
        self.snapshot().remaining()
    }

    /// Average seconds spent per item, or `0.0` before the first advance.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.snapshot().rate()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Records `n` finished items and redraws.
    ///
    /// The first call registers the bar as live. The call that brings `consumed` to the
    /// total draws the final frame and applies the leave policy. Advancing past the total
    /// is tolerated: the count keeps growing but nothing more is drawn. `advance(0)` does
    /// nothing.
    pub fn advance(&mut self, n: u64) {
        if n == 0 {
            tracing::trace!(label = %self.label, "ignoring zero-sized advance");
            return;
        }

        if self.finished {
            self.consumed = self.consumed.saturating_add(n);
            tracing::trace!(
                label = %self.label,
                consumed = self.consumed,
                total = self.total,
                "advance after completion"
            );
            return;
        }

        let stacked = if self.started {
            false
        } else {
            self.started = true;
            let live = self.active.enter();
            tracing::debug!(label = %self.label, total = self.total, live, "progress started");
            live > 1
        };

        self.consumed = self.consumed.saturating_add(n);

        let ending = if self.consumed >= self.total {
            self.complete()
        } else {
            Ending::Open
        };
        self.draw(stacked, ending);
    }

    /// Finishes the bar early, applying the leave policy to its current line.
    ///
    /// A bar that never drew is simply marked finished. Closing a finished bar does nothing.
    pub fn close(&mut self) {
        if self.finished {
            return;
        }

        if !self.started {
            self.finished = true;
            tracing::debug!(label = %self.label, "closed before first advance");
            return;
        }

        let ending = self.complete();
        self.draw(false, ending);
    }

    /// Creates an owned snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.into()
    }

    fn complete(&mut self) -> Ending {
        self.finished = true;
        let live = self.active.exit();
        tracing::debug!(
            label = %self.label,
            consumed = self.consumed,
            elapsed = ?self.elapsed(),
            leave = self.leave,
            live,
            "progress finished"
        );
        Ending::Close {
            others_live: live > 0,
        }
    }

    fn draw(&mut self, stacked: bool, ending: Ending) {
        let frame = render::frame(&self.snapshot(), stacked, ending);
        self.target.write_frame(&frame);
        self.draws += 1;
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        // An abandoned bar keeps its last frame; only make sure it reached the terminal.
        if self.started && !self.finished {
            self.target.flush();
        }
    }
}

/// An owned copy of a [`Progress`] state at a specific instant.
///
/// This is what the renderer consumes. It holds no handles and is never updated.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSnapshot {
    pub(crate) label: CompactString,
    pub(crate) total: u64,
    pub(crate) consumed: u64,
    pub(crate) elapsed: Duration,
    pub(crate) leave: bool,
    pub(crate) finished: bool,
}

impl From<&Progress> for ProgressSnapshot {
    fn from(progress: &Progress) -> Self {
        Self {
            label: progress.label.clone(),
            total: progress.total,
            consumed: progress.consumed,
            elapsed: progress.elapsed(),
            leave: progress.leave,
            finished: progress.finished,
        }
    }
}

impl ProgressSnapshot {
    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the total item count.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the raw consumed count.
    #[must_use]
    pub const fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Returns the consumed count clamped to the total, as displayed.
    #[must_use]
    pub fn displayed(&self) -> u64 {
        self.consumed.min(self.total)
    }

    /// Returns the elapsed time at the instant of the snapshot.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the leave policy.
    #[must_use]
    pub const fn leave(&self) -> bool {
        self.leave
    }

    /// Returns whether the bar had finished.
    #[must_use]
    pub const fn finished(&self) -> bool {
        self.finished
    }

    /// Completion percentage, floored and clamped to `0..=100`.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        (u128::from(self.displayed()) * 100 / u128::from(self.total)) as u64
    }

    /// Estimates the remaining time as `elapsed * (total - consumed) / consumed`.
    ///
    /// Returns [`Duration::ZERO`] before the first item and once the total is reached.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        if self.consumed == 0 {
            return Duration::ZERO;
        }
        let left = self.total.saturating_sub(self.consumed);
        let millis = self.elapsed.as_millis() * u128::from(left) / u128::from(self.consumed);
        Duration::from_millis(u64::try_from(millis).unwrap_or(u64::MAX))
    }

    /// Average seconds per item, from whole elapsed milliseconds.
    ///
    /// Returns `0.0` before the first item.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn rate(&self) -> f64 {
        if self.consumed == 0 {
            return 0.0;
        }
        self.elapsed.as_millis() as f64 / 1000.0 / self.consumed as f64
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ProgressSnapshot;
    use crate::{ActiveBars, DrawTarget, ProgressBuilder};

    fn quiet(total: u64) -> super::Progress {
        ProgressBuilder::new(total)
            .with_target(DrawTarget::hidden())
            .with_active_bars(ActiveBars::new())
            .build()
            .unwrap()
    }

    fn snap(total: u64, consumed: u64, elapsed: Duration) -> ProgressSnapshot {
        ProgressSnapshot {
            total,
            consumed,
            elapsed,
            ..Default::default()
        }
    }

    /// Basic Lifecycle
    /// Created -> Running -> Finished, with one draw per advance.
    #[test]
    fn test_basic_lifecycle() {
        let mut p = quiet(4);
        assert!(!p.is_started());
        assert_eq!(p.active_bars().count(), 0);
        assert_eq!(p.draw_count(), 0);

        p.advance(1);
        assert!(p.is_started());
        assert_eq!(p.active_bars().count(), 1);

        p.advance(3);
        assert_eq!(p.consumed(), 4);
        assert!(p.is_finished());
        assert_eq!(p.active_bars().count(), 0);
        assert_eq!(p.draw_count(), 2);
    }

    /// Zero Total
    /// Construction must reject a bar that could never make progress.
    #[test]
    fn test_zero_total_rejected() {
        let err = ProgressBuilder::new(0).build().unwrap_err();
        assert!(matches!(err, crate::Error::InvalidConfiguration(_)));
        assert!(super::counter(0).is_err());
    }

    /// Manual Chunks
    /// Ten advances of ten reach exactly one hundred and finalize once.
    #[test]
    fn test_manual_chunks() {
        let mut p = quiet(100);
        for _ in 0..10 {
            p.advance(10);
        }
        assert_eq!(p.consumed(), 100);
        assert!(p.is_finished());
        assert_eq!(p.draw_count(), 10);
    }

    /// Over-Advance
    /// Counts keep growing, display clamps, nothing more is drawn.
    #[test]
    fn test_over_advance_is_tolerated() {
        let mut p = quiet(5);
        p.advance(8);
        assert!(p.is_finished());
        assert_eq!(p.consumed(), 8);

        p.advance(1);
        assert_eq!(p.consumed(), 9);
        assert_eq!(p.draw_count(), 1, "no draw after completion");

        let s = p.snapshot();
        assert_eq!(s.percent(), 100);
        assert_eq!(s.displayed(), 5);
        assert_eq!(s.remaining(), Duration::ZERO);
    }

    /// Zero-Sized Advance
    #[test]
    fn test_zero_advance_is_noop() {
        let mut p = quiet(3);
        p.advance(0);
        assert!(!p.is_started());
        assert_eq!(p.draw_count(), 0);
        assert_eq!(p.active_bars().count(), 0);
    }

    /// Close
    /// Closing early unregisters a started bar; closing twice is harmless.
    #[test]
    fn test_close() {
        let mut p = quiet(10);
        p.advance(3);
        assert_eq!(p.active_bars().count(), 1);

        p.close();
        assert!(p.is_finished());
        assert_eq!(p.active_bars().count(), 0);
        assert_eq!(p.draw_count(), 2);

        p.close();
        assert_eq!(p.draw_count(), 2);

        let mut untouched = quiet(10);
        untouched.close();
        assert!(untouched.is_finished());
        assert_eq!(untouched.draw_count(), 0);
    }

    /// Division Guards
    /// Nothing consumed yet: metrics fall back to neutral values.
    #[test]
    #[allow(clippy::float_cmp)]
    fn test_guards_before_first_advance() {
        let p = quiet(10);
        assert_eq!(p.remaining_estimate(), Duration::ZERO);
        assert_eq!(p.rate(), 0.0);
        assert_eq!(p.snapshot().percent(), 0);
    }

    /// Metrics
    /// Remaining time and rate follow the average over the whole run.
    #[test]
    #[allow(clippy::float_cmp)]
    fn test_metrics() {
        let s = snap(10, 4, Duration::from_secs(8));
        assert_eq!(s.remaining(), Duration::from_secs(12));
        assert_eq!(s.rate(), 2.0);
        assert_eq!(s.percent(), 40);

        let s = snap(3, 1, Duration::from_millis(1500));
        assert_eq!(s.percent(), 33);
        assert_eq!(s.remaining(), Duration::from_secs(3));
        assert_eq!(s.rate(), 1.5);
    }

    /// Elapsed Time
    /// An injected start instant is honored.
    #[test]
    fn test_elapsed_from_start_time() {
        let start = web_time::Instant::now()
            .checked_sub(Duration::from_secs(5))
            .unwrap();
        let p = ProgressBuilder::new(10)
            .with_target(DrawTarget::hidden())
            .with_start_time(start)
            .build()
            .unwrap();
        assert!(p.elapsed() >= Duration::from_secs(5));
    }
}
