//! Fluent interface for constructing [`Progress`] instances.
//!
//! The iterator helpers and [`counter`](crate::counter) cover the common cases. Reach for
//! [`ProgressBuilder`] when a bar needs a non-default collaborator:
//!
//! * **Live-bar counter:** bars stack on separate lines only when they share an
//!   [`ActiveBars`]. The process-wide counter is used unless another is injected, which
//!   keeps tests independent from each other.
//! * **Draw target:** stdout by default; [`DrawTarget::memory`] captures frames.
//! * **Start time:** set explicitly to account for work done before the bar existed.

use compact_str::CompactString;
use web_time::Instant;

use crate::{
    error::{Error, Result},
    progress::Progress,
    stack::ActiveBars,
    target::DrawTarget,
};

/// User-facing display options.
///
/// The defaults (no label, keep the finished bar on screen) produce the same output as
/// passing no options at all.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProgressOptions {
    /// Text printed before the gauge, followed by `": "`. Omitted when empty.
    pub label: CompactString,
    /// Keep the finished bar on screen (`true`) or erase its line (`false`).
    pub leave: bool,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            label: CompactString::default(),
            leave: true,
        }
    }
}

impl ProgressOptions {
    /// Options with only a label set.
    #[must_use]
    pub fn labeled(label: impl Into<CompactString>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<CompactString>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the leave policy.
    #[must_use]
    pub const fn with_leave(mut self, leave: bool) -> Self {
        self.leave = leave;
        self
    }
}

/// A builder for [`Progress`] instances.
#[derive(Debug)]
pub struct ProgressBuilder {
    total: u64,
    options: ProgressOptions,
    start: Option<Instant>,
    active: Option<ActiveBars>,
    target: DrawTarget,
}

impl ProgressBuilder {
    /// Starts building a bar for `total` items.
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self::from_options(total, ProgressOptions::default())
    }

    /// Starts building a bar from existing options.
    #[must_use]
    pub fn from_options(total: u64, options: ProgressOptions) -> Self {
        Self {
            total,
            options,
            start: None,
            active: None,
            target: DrawTarget::default(),
        }
    }

    /// Sets the label printed before the gauge.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<CompactString>) -> Self {
        self.options.label = label.into();
        self
    }

    /// Sets whether the finished bar stays on screen.
    #[must_use]
    pub const fn with_leave(mut self, leave: bool) -> Self {
        self.options.leave = leave;
        self
    }

    /// Registers the bar with a specific live-bar counter instead of the global one.
    #[must_use]
    pub fn with_active_bars(mut self, active: ActiveBars) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets where frames are written.
    #[must_use]
    pub fn with_target(mut self, target: DrawTarget) -> Self {
        self.target = target;
        self
    }

    /// Sets the start time explicitly.
    #[must_use]
    pub const fn with_start_time(mut self, start: Instant) -> Self {
        self.start = Some(start);
        self
    }

    /// Consumes the builder and returns the constructed [`Progress`].
    ///
    /// The start time is captured here unless one was set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the total is zero.
    pub fn build(self) -> Result<Progress> {
        if self.total == 0 {
            return Err(Error::InvalidConfiguration(
                "total must be at least 1".to_owned(),
            ));
        }

        Ok(Progress {
            total: self.total,
            consumed: 0,
            label: self.options.label,
            leave: self.options.leave,
            start: self.start.unwrap_or_else(Instant::now),
            active: self.active.unwrap_or_else(ActiveBars::global),
            target: self.target,
            started: false,
            finished: false,
            draws: 0,
        })
    }
}
