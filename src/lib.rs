//! # `iter_gauge`
//!
//! A tqdm-style progress gauge for loops over sequences of known length.
//!
//! Wrapping a sequence leaves its values untouched and redraws one terminal line per
//! consumed element:
//!
//! ```text
//! resize:  60%|████████████        | 3/5 [00:03<00:02, 1.00s/it]
//! ```
//!
//! It is designed to be:
//!
//! * **Synchronous**: no timer thread. The clock is read on each step and the gauge is
//!   drawn exactly once per step.
//! * **Stackable**: nested loops get one line per live bar. A finished inner bar can erase
//!   itself and hand the cursor back to the bar above.
//! * **Testable**: the live-bar counter and the output target are injectable handles.
//!
//! ## Modules
//!
//! * [`builder`]: Fluent construction and the [`ProgressOptions`] (`label`, `leave`).
//! * [`iter`]: [`wrap`], [`range`] and the [`ProgressIteratorExt`] extension trait.
//! * [`progress`]: The [`Progress`] state machine, [`counter`] for manual driving, and
//!   [`ProgressSnapshot`].
//! * [`render`]: Line formatting and terminal control sequences.
//! * [`stack`]: [`ActiveBars`], the shared count of bars on screen.
//! * [`target`]: [`DrawTarget`], where frames are written.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod builder;
pub mod error;
pub mod iter;
pub mod progress;
pub mod render;
pub mod stack;
pub mod target;

pub use builder::{ProgressBuilder, ProgressOptions};
pub use error::{Error, Result};
pub use iter::{
    ProgressIter, ProgressIteratorExt, Wrapped, range, range_with, wrap, wrap_with,
    wrap_with_label,
};
pub use progress::{Progress, ProgressSnapshot, counter};
pub use stack::ActiveBars;
pub use target::DrawTarget;
