//! Escape-sequence aware scanning and display-width measurement.

use unicode_width::UnicodeWidthChar;

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// A printable character or a complete escape sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Char(char),
    Escape(&'a str),
}

/// Iterator over the [`Token`]s of a string.
pub struct Tokens<'a> {
    src: &'a str,
    pos: usize,
}

/// Split `s` into characters and escape sequences.
///
/// Recognizes CSI (`ESC [ ... final`), OSC (`ESC ] ... BEL` or `ESC ] ... ESC \`)
/// and two-byte `ESC x` sequences. An unterminated sequence runs to the end
/// of the input.
pub fn tokens(s: &str) -> Tokens<'_> {
    Tokens { src: s, pos: 0 }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.src[self.pos..];
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;
        if first != ESC {
            self.pos += first.len_utf8();
            return Some(Token::Char(first));
        }
        let end = match chars.next() {
            None => rest.len(),
            Some((_, '[')) => chars
                .find(|&(_, c)| ('\x40'..='\x7e').contains(&c))
                .map_or(rest.len(), |(j, c)| j + c.len_utf8()),
            Some((_, ']')) => {
                let mut end = rest.len();
                let mut prev_esc = false;
                for (j, c) in chars {
                    if c == BEL || (prev_esc && c == '\\') {
                        end = j + c.len_utf8();
                        break;
                    }
                    prev_esc = c == ESC;
                }
                end
            }
            Some((i, c)) => i + c.len_utf8(),
        };
        self.pos += end;
        Some(Token::Escape(&rest[..end]))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SgrKind {
    Reset,
    ResetForeground,
    ResetBackground,
    Foreground,
    Background,
    Other,
}

fn classify(seq: &str) -> SgrKind {
    let Some(params) = seq.strip_prefix("\x1b[").and_then(|s| s.strip_suffix('m')) else {
        return SgrKind::Other;
    };
    let first = params.split(';').next().unwrap_or("");
    match first.parse::<u16>() {
        _ if params.is_empty() => SgrKind::Reset,
        Ok(0) if !params.contains(';') => SgrKind::Reset,
        Ok(39) if !params.contains(';') => SgrKind::ResetForeground,
        Ok(49) if !params.contains(';') => SgrKind::ResetBackground,
        Ok(30..=38 | 90..=97) => SgrKind::Foreground,
        Ok(40..=48 | 100..=107) => SgrKind::Background,
        _ => SgrKind::Other,
    }
}

/// The escape sequences currently in force on a line.
///
/// Full resets clear everything; foreground and background resets drop only
/// their own color, and a new color replaces the previous one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Style {
    seqs: Vec<(SgrKind, String)>,
}

impl Style {
    pub fn apply(&mut self, seq: &str) {
        let kind = classify(seq);
        match kind {
            SgrKind::Reset => self.seqs.clear(),
            SgrKind::ResetForeground => self.seqs.retain(|(k, _)| *k != SgrKind::Foreground),
            SgrKind::ResetBackground => self.seqs.retain(|(k, _)| *k != SgrKind::Background),
            SgrKind::Foreground | SgrKind::Background => {
                self.seqs.retain(|(k, _)| *k != kind);
                self.seqs.push((kind, seq.to_string()));
            }
            SgrKind::Other => {
                if !self.seqs.iter().any(|(_, s)| s == seq) {
                    self.seqs.push((kind, seq.to_string()));
                }
            }
        }
    }

    /// Whether a background color is in force.
    pub fn has_background(&self) -> bool {
        self.seqs.iter().any(|(k, _)| *k == SgrKind::Background)
    }

    /// Concatenated sequences; empty for the default style.
    pub fn prefix(&self) -> String {
        self.seqs.iter().map(|(_, s)| s.as_str()).collect()
    }
}

/// Terminal columns taken by a single character. Controls take none.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Rendered width of one line: wide glyphs count two, escapes count zero.
pub fn display_width(line: &str) -> usize {
    tokens(line)
        .map(|t| match t {
            Token::Char(c) => char_width(c),
            Token::Escape(_) => 0,
        })
        .sum()
}

/// Width of the widest line of a block.
pub fn max_width(block: &str) -> usize {
    block.split('\n').map(display_width).max().unwrap_or(0)
}
