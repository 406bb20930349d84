//! Shared helpers for the integration tests.
//!
//! Timing fields depend on the wall clock, so captured output is compared after masking
//! each `[mm:ss<mm:ss, r.rrs/it]` block to `[T]`. The mask checks the block's shape first.

#![allow(dead_code)]

use iter_gauge::{ActiveBars, DrawTarget, Progress, ProgressBuilder, ProgressOptions};

pub const ERASE_LINE: &str = "\x1b[2K";
pub const CURSOR_UP: &str = "\x1b[1A";
pub const CURSOR_FORWARD: &str = "\x1b[100C";

/// Builds a bar that writes into `target` and registers with `active`.
pub fn captured(
    total: u64,
    options: ProgressOptions,
    active: &ActiveBars,
    target: &DrawTarget,
) -> Progress {
    ProgressBuilder::from_options(total, options)
        .with_active_bars(active.clone())
        .with_target(target.clone())
        .build()
        .expect("non-zero total")
}

/// A fresh memory target and an isolated live-bar counter.
pub fn isolated() -> (ActiveBars, DrawTarget) {
    (ActiveBars::new(), DrawTarget::memory())
}

/// Captured output with timing blocks masked.
pub fn masked(target: &DrawTarget) -> String {
    mask_timing(&target.contents().expect("memory target"))
}

/// The expected gauge line for `k` of `n`, with the timing block masked.
pub fn line(label: &str, pct: u64, filled: usize, k: u64, n: u64) -> String {
    let prefix = if label.is_empty() {
        String::new()
    } else {
        format!("{label}: ")
    };
    format!(
        "{prefix}{pct:>3}%|{}{}| {k}/{n} [T]",
        "█".repeat(filled),
        " ".repeat(20 - filled)
    )
}

/// Replaces every timing block with `[T]`, asserting its shape.
pub fn mask_timing(output: &str) -> String {
    let mut out = String::with_capacity(output.len());
    let mut rest = output;

    while let Some(open) = rest.find(" [") {
        out.push_str(&rest[..open]);
        let close = open + rest[open..].find(']').expect("unterminated timing block");
        assert_timing_shape(&rest[open + 2..close]);
        out.push_str(" [T]");
        rest = &rest[close + 1..];
    }

    out.push_str(rest);
    out
}

fn assert_timing_shape(block: &str) {
    let (clocks, rate) = block
        .split_once(", ")
        .unwrap_or_else(|| panic!("missing rate in {block:?}"));
    let (elapsed, remaining) = clocks
        .split_once('<')
        .unwrap_or_else(|| panic!("missing remaining time in {block:?}"));

    for clock in [elapsed, remaining] {
        let (m, s) = clock
            .split_once(':')
            .unwrap_or_else(|| panic!("bad clock {clock:?}"));
        assert!(m.len() >= 2 && m.chars().all(|c| c.is_ascii_digit()), "{clock:?}");
        assert!(s.len() == 2 && s.chars().all(|c| c.is_ascii_digit()), "{clock:?}");
    }

    let rate = rate
        .strip_suffix("s/it")
        .unwrap_or_else(|| panic!("bad rate {rate:?}"));
    let (_, decimals) = rate.split_once('.').expect("rate has decimals");
    assert_eq!(decimals.len(), 2, "rate {rate:?}");
    rate.parse::<f64>().expect("rate is a number");
}
