//! Iterator adapters that draw a gauge while a sequence is consumed.
//!
//! [`ProgressIter`] wraps a known-length source and owns one [`Progress`]. Asking for the
//! next element first records the previous one as done, so the gauge advances only after
//! the caller's loop body has run:
//!
//! * The first `next()` yields an element without drawing.
//! * Every later `next()` calls [`Progress::advance(1)`](Progress::advance), then yields.
//! * The `next()` that finds the source exhausted records the last element, which draws
//!   the final frame.
//!
//! A source shorter than the configured total still finishes the bar on exhaustion.
//!
//! # Example
//!
//! ```no_run
//! for item in iter_gauge::wrap(vec!["a", "b", "c"])? {
//!     // ...
//! #   let _ = item;
//! }
//!
//! for i in iter_gauge::range_with(5, iter_gauge::ProgressOptions::labeled("warmup"))? {
//!     // ...
//! #   let _ = i;
//! }
//! # Ok::<(), iter_gauge::Error>(())
//! ```

use std::{iter::FusedIterator, ops::Range};

use compact_str::CompactString;

use crate::{
    builder::{ProgressBuilder, ProgressOptions},
    error::Result,
    progress::Progress,
    stack::ActiveBars,
};

/// A wrapped owned sequence.
pub type Wrapped<T> = ProgressIter<std::vec::IntoIter<T>>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Phase {
    Created,
    Running,
    Finished,
}

/// An iterator adapter that advances a [`Progress`] once per consumed element.
///
/// Single pass, forward only. Once finished it keeps returning `None`.
#[derive(Debug)]
pub struct ProgressIter<I> {
    iter: I,
    progress: Progress,
    phase: Phase,
}

impl<I> ProgressIter<I> {
    /// Creates a new `ProgressIter`.
    ///
    /// Note: This is usually constructed via [`wrap`], [`range`], or
    /// [`ProgressIteratorExt`].
    pub const fn new(iter: I, progress: Progress) -> Self {
        Self {
            iter,
            progress,
            phase: Phase::Created,
        }
    }

    /// The total the gauge counts towards.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.progress.total()
    }

    /// The progress state driven by this iterator.
    #[must_use]
    pub const fn state(&self) -> &Progress {
        &self.progress
    }

    /// Whether the source has been exhausted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

impl<I: Iterator> Iterator for ProgressIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.phase {
            Phase::Finished => return None,
            Phase::Running => self.progress.advance(1),
            Phase::Created => self.phase = Phase::Running,
        }

        let item = self.iter.next();

        if item.is_none() {
            self.phase = Phase::Finished;
            // Source ran out before the total; finish the bar anyway.
            self.progress.close();
        }

        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.phase {
            Phase::Finished => (0, Some(0)),
            Phase::Created | Phase::Running => self.iter.size_hint(),
        }
    }
}

impl<I: ExactSizeIterator> ExactSizeIterator for ProgressIter<I> {}

impl<I: Iterator> FusedIterator for ProgressIter<I> {}

/// Wraps an owned copy of `items` with a default gauge on stdout.
///
/// # Errors
///
/// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) if `items`
/// is empty.
pub fn wrap<T>(items: impl Into<Vec<T>>) -> Result<Wrapped<T>> {
    items.into().into_iter().progress()
}

/// Like [`wrap`], with a label printed before the gauge.
///
/// # Errors
///
/// Fails if `items` is empty.
pub fn wrap_with_label<T>(
    items: impl Into<Vec<T>>,
    label: impl Into<CompactString>,
) -> Result<Wrapped<T>> {
    items.into().into_iter().progress_with_label(label)
}

/// Like [`wrap`], with explicit display options.
///
/// # Errors
///
/// Fails if `items` is empty.
pub fn wrap_with<T>(items: impl Into<Vec<T>>, options: ProgressOptions) -> Result<Wrapped<T>> {
    items.into().into_iter().progress_with_options(options)
}

/// Iterates `0..n` with a default gauge on stdout.
///
/// # Errors
///
/// Fails if `n` is zero.
pub fn range(n: usize) -> Result<ProgressIter<Range<usize>>> {
    (0..n).progress()
}

/// Like [`range`], with explicit display options.
///
/// # Errors
///
/// Fails if `n` is zero.
pub fn range_with(n: usize, options: ProgressOptions) -> Result<ProgressIter<Range<usize>>> {
    (0..n).progress_with_options(options)
}

/// Extension trait to attach a gauge to any iterator of known length.
pub trait ProgressIteratorExt: ExactSizeIterator + Sized {
    /// Wraps the iterator with a default gauge sized from [`ExactSizeIterator::len`].
    ///
    /// # Errors
    ///
    /// Fails if the iterator is empty.
    fn progress(self) -> Result<ProgressIter<Self>> {
        self.progress_with_options(ProgressOptions::default())
    }

    /// Wraps the iterator with a labeled gauge.
    ///
    /// # Errors
    ///
    /// Fails if the iterator is empty.
    fn progress_with_label(self, label: impl Into<CompactString>) -> Result<ProgressIter<Self>> {
        self.progress_with_options(ProgressOptions::labeled(label))
    }

    /// Wraps the iterator with a gauge configured by `options`.
    ///
    /// # Errors
    ///
    /// Fails if the iterator is empty.
    fn progress_with_options(self, options: ProgressOptions) -> Result<ProgressIter<Self>> {
        let progress = ProgressBuilder::from_options(self.len() as u64, options).build()?;
        Ok(ProgressIter::new(self, progress))
    }

    /// Wraps the iterator using an existing [`Progress`] instance.
    fn progress_with(self, progress: Progress) -> ProgressIter<Self> {
        ProgressIter::new(self, progress)
    }

    /// Wraps the iterator with a gauge registered in a specific [`ActiveBars`] counter.
    ///
    /// # Errors
    ///
    /// Fails if the iterator is empty.
    fn progress_in(self, active: &ActiveBars) -> Result<ProgressIter<Self>> {
        let progress = ProgressBuilder::new(self.len() as u64)
            .with_active_bars(active.clone())
            .build()?;
        Ok(ProgressIter::new(self, progress))
    }
}

impl<I: ExactSizeIterator> ProgressIteratorExt for I {}
