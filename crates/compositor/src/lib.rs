#![deny(warnings)]

//! Text-block compositing for terminal frames.
//!
//! Blocks are newline-separated strings that may carry ANSI escape sequences.
//! [`overlay`] places one block on top of another at a column/row offset,
//! clipping whatever falls outside the background. Widths are measured in
//! terminal columns via [`display_width`], never in bytes or chars.

pub mod ansi;
pub mod block;

pub use ansi::{display_width, max_width};
pub use block::{Block, Cell};

/// Composite `fg` onto `bg` with its top-left corner at column `x`, row `y`.
///
/// Negative or oversized offsets clip instead of failing. When `transparent`
/// is set, whitespace cells of `fg` do not cover `bg` unless a background
/// color is in force on them.
///
/// Example:
/// let out = overlay(1, 0, "X", "....", false);
/// assert_eq!(out, ".X..");
pub fn overlay(x: i32, y: i32, fg: &str, bg: &str, transparent: bool) -> String {
    Block::parse(bg)
        .overlay(x, y, &Block::parse(fg), transparent)
        .render()
}

/// Offset that centers a span of `inner` columns or rows in `outer`. Negative
/// when `inner` is larger.
pub fn center_offset(outer: usize, inner: usize) -> i32 {
    (outer as i32) / 2 - (inner as i32) / 2
}
