//! Cell grids parsed from styled text.

use crate::ansi::{self, Token};

const RESET: &str = "\x1b[0m";

/// One terminal column.
///
/// A wide glyph occupies its lead cell plus a trailing continuation cell
/// with `width == 0` and empty text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    text: String,
    width: usize,
    /// Escape sequences in force when the cell was written.
    style: String,
    /// A background color was in force, so even a space is visible.
    painted: bool,
}

impl Cell {
    fn blank() -> Self {
        Self::glyph(' ', String::new(), false)
    }

    fn glyph(c: char, style: String, painted: bool) -> Self {
        Self {
            text: c.to_string(),
            width: ansi::char_width(c),
            style,
            painted,
        }
    }

    fn continuation(style: String, painted: bool) -> Self {
        Self {
            text: String::new(),
            width: 0,
            style,
            painted,
        }
    }

    /// Space carrying over this cell's style, for a split wide glyph.
    fn vacated(&self) -> Self {
        Self::glyph(' ', self.style.clone(), self.painted)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_continuation(&self) -> bool {
        self.width == 0
    }

    /// Unpainted whitespace lets the background show through a transparent
    /// overlay.
    pub fn is_blank(&self) -> bool {
        !self.painted && self.width == 1 && self.text.chars().all(char::is_whitespace)
    }
}

/// A rectangular-ish grid of cells; lines may be ragged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<Vec<Cell>>,
}

impl Block {
    /// Parse newline-separated text. Styles carry across line breaks until
    /// reset.
    pub fn parse(text: &str) -> Self {
        let mut style = ansi::Style::default();
        let lines = text
            .split('\n')
            .map(|line| {
                let mut cells: Vec<Cell> = Vec::new();
                for tok in ansi::tokens(line) {
                    match tok {
                        Token::Escape(seq) => style.apply(seq),
                        Token::Char(c) => match ansi::char_width(c) {
                            0 if c.is_control() => {}
                            // combining marks ride on the previous glyph
                            0 => {
                                if let Some(prev) =
                                    cells.iter_mut().rev().find(|cell| !cell.is_continuation())
                                {
                                    prev.text.push(c);
                                }
                            }
                            w => {
                                let prefix = style.prefix();
                                let painted = style.has_background();
                                if w > 1 {
                                    cells.push(Cell::glyph(c, prefix.clone(), painted));
                                    cells.push(Cell::continuation(prefix, painted));
                                } else {
                                    cells.push(Cell::glyph(c, prefix, painted));
                                }
                            }
                        },
                    }
                }
                cells
            })
            .collect();
        Self { lines }
    }

    /// Display width of the widest line.
    pub fn width(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn lines(&self) -> &[Vec<Cell>] {
        &self.lines
    }

    /// Draw `fg` over `self` with its top-left corner at (`x`, `y`).
    ///
    /// Anything outside `self`'s width and height is clipped. With
    /// `transparent`, whitespace in `fg` leaves the cell underneath intact.
    pub fn overlay(&self, x: i32, y: i32, fg: &Block, transparent: bool) -> Block {
        let bounds = self.width() as i64;
        let mut out = self.clone();
        let fg_width = fg.width();
        let blank = Cell::blank();

        for (row, fg_line) in fg.lines.iter().enumerate() {
            let by = i64::from(y) + row as i64;
            let Ok(by) = usize::try_from(by) else {
                continue;
            };
            let Some(line) = out.lines.get_mut(by) else {
                break;
            };
            for col in 0..fg_width {
                let cell = fg_line.get(col).unwrap_or(&blank);
                if cell.is_continuation() || (transparent && cell.is_blank()) {
                    continue;
                }
                let bx = i64::from(x) + col as i64;
                if bx < 0 || bx + cell.width as i64 > bounds {
                    continue;
                }
                put(line, bx as usize, cell);
            }
        }
        out
    }

    /// Back to text, emitting a style only when it changes and resetting at
    /// the end of each styled line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let mut current = "";
            for cell in line.iter().filter(|c| !c.is_continuation()) {
                if cell.style != current {
                    if !current.is_empty() {
                        out.push_str(RESET);
                    }
                    out.push_str(&cell.style);
                    current = &cell.style;
                }
                out.push_str(&cell.text);
            }
            if !current.is_empty() {
                out.push_str(RESET);
            }
        }
        out
    }
}

/// Write `cell` at column `at`, padding the line and splitting any wide glyph
/// it partly covers.
fn put(line: &mut Vec<Cell>, at: usize, cell: &Cell) {
    let end = at + cell.width;
    if line.len() < end {
        line.resize(end, Cell::blank());
    }
    if line[at].is_continuation() && at > 0 {
        line[at - 1] = line[at - 1].vacated();
    }
    if line[end - 1].width > 1 && end < line.len() {
        line[end] = line[end].vacated();
    }
    line[at] = cell.clone();
    if cell.width > 1 {
        line[at + 1] = Cell::continuation(cell.style.clone(), cell.painted);
    }
}
