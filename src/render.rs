//! Turning a [`ProgressSnapshot`] into terminal output.
//!
//! A rendered line looks like:
//!
//! ```text
//! label:  40%|████████            | 4/10 [00:08<00:12, 2.00s/it]
//! ```
//!
//! The label prefix is omitted when the label is empty. The gauge is always
//! [`GAUGE_WIDTH`] cells wide with no partial cells.
//!
//! Each draw wraps the line with the control bytes for in-place redraw: a leading newline
//! when the bar stacks under another live bar, a carriage return, and on completion either
//! a trailing newline (`leave`) or the escapes that erase the line.

use std::{fmt::Write as _, time::Duration};

use crate::progress::ProgressSnapshot;

/// Number of cells in the gauge.
pub const GAUGE_WIDTH: usize = 20;

const FILLED: char = '█';
const BLANK: char = ' ';

/// Clears the whole current line.
pub const ERASE_LINE: &str = "\x1b[2K";
/// Moves the cursor up one line.
pub const CURSOR_UP: &str = "\x1b[1A";
/// Moves the cursor far enough right to land at the end of a gauge line.
pub const CURSOR_FORWARD: &str = "\x1b[100C";

/// How a frame ends.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Ending {
    /// The bar keeps running; the cursor stays on its line.
    Open,
    /// Final frame. `others_live` is true if another bar is still drawn above.
    Close { others_live: bool },
}

/// Renders the gauge line for a snapshot, without any control characters.
#[must_use]
pub fn render_line(snapshot: &ProgressSnapshot) -> String {
    let mut line = String::with_capacity(64 + snapshot.label().len());

    if !snapshot.label().is_empty() {
        line.push_str(snapshot.label());
        line.push_str(": ");
    }

    // Writing into a String cannot fail.
    let _ = write!(
        line,
        "{:>3}%|{}| {}/{} [{}<{}, {:.2}s/it]",
        snapshot.percent(),
        gauge(snapshot),
        snapshot.consumed(),
        snapshot.total(),
        format_clock(snapshot.elapsed()),
        format_clock(snapshot.remaining()),
        snapshot.rate(),
    );
    line
}

/// Number of filled gauge cells. Cell `i` is filled iff `i / width < consumed / total`.
#[must_use]
pub fn filled_cells(snapshot: &ProgressSnapshot) -> usize {
    let total = u128::from(snapshot.total());
    let shown = u128::from(snapshot.displayed());
    (0..GAUGE_WIDTH as u128)
        .take_while(|i| i * total < GAUGE_WIDTH as u128 * shown)
        .count()
}

/// Renders the gauge cells, left-to-right fill.
#[must_use]
pub fn gauge(snapshot: &ProgressSnapshot) -> String {
    let filled = filled_cells(snapshot);
    std::iter::repeat_n(FILLED, filled)
        .chain(std::iter::repeat_n(BLANK, GAUGE_WIDTH - filled))
        .collect()
}

/// Formats a duration as `mm:ss` from whole seconds.
///
/// Minutes are not wrapped into hours, so long runs widen past two digits.
#[must_use]
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Builds the complete bytes written for one draw.
pub(crate) fn frame(snapshot: &ProgressSnapshot, stacked: bool, ending: Ending) -> String {
    let line = render_line(snapshot);
    let mut out = String::with_capacity(line.len() + 16);

    if stacked {
        out.push('\n');
    }
    out.push('\r');
    out.push_str(&line);

    match ending {
        Ending::Open => {}
        Ending::Close { .. } if snapshot.leave() => out.push('\n'),
        Ending::Close { others_live } => {
            out.push_str(ERASE_LINE);
            if others_live {
                out.push_str(CURSOR_UP);
                out.push_str(CURSOR_FORWARD);
            }
        }
    }
    out
}
