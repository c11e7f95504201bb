//! Inline style markup and visual length.
//!
//! Cell text may carry terminal style codes (`ESC [ ... m`). They are parsed
//! out as [`Segment::Style`] so that measuring and wrapping only see the
//! visible text, while the codes themselves are preserved verbatim.

use unicode_width::UnicodeWidthChar;

use super::options::CharWidth;

const ESC: char = '\x1b';

/// Tab stops are every 8 columns.
pub const TAB_STOP: usize = 8;

/// A run of cell text: either visible characters or one style code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Style(&'a str),
}

/// Split text into visible runs and style codes.
///
/// A style code starts at `ESC` and runs up to and including the next `m`.
/// An `ESC` with no closing `m` is ordinary text.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(ESC) {
        let esc = pos + offset;
        match text[esc..].find('m') {
            Some(m) => {
                if esc > text_start {
                    out.push(Segment::Text(&text[text_start..esc]));
                }
                let end = esc + m + 1;
                out.push(Segment::Style(&text[esc..end]));
                text_start = end;
                pos = end;
            }
            None => break,
        }
    }
    if text_start < text.len() {
        out.push(Segment::Text(&text[text_start..]));
    }
    out
}

/// Remove every style code, keeping only visible text.
pub fn strip_styles(text: &str) -> String {
    segments(text)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Text(t) => Some(t),
            Segment::Style(_) => None,
        })
        .collect()
}

/// True if a style code resets all attributes.
pub fn is_reset(code: &str) -> bool {
    code == "\x1b[0m" || code == "\x1b[m"
}

/// Width of a single visible character.
pub fn char_width(c: char, mode: CharWidth) -> usize {
    match mode {
        CharWidth::Narrow => 1,
        CharWidth::Unicode => c.width().unwrap_or(0),
    }
}

/// Width of a run of visible characters (no tabs or newlines expected).
pub fn str_width(s: &str, mode: CharWidth) -> usize {
    s.chars().map(|c| char_width(c, mode)).sum()
}

/// Visual length of cell text.
///
/// Style codes are ignored, tabs advance to the next tab stop and the result
/// is the widest of the `\n`-separated lines.
pub fn visual_len(text: &str, mode: CharWidth) -> usize {
    let plain = strip_styles(text);
    plain
        .split('\n')
        .map(|line| {
            let mut parts = line.split('\t').peekable();
            let mut length = 0;
            while let Some(part) = parts.next() {
                length += str_width(part, mode);
                if parts.peek().is_some() {
                    length = (length / TAB_STOP + 1) * TAB_STOP;
                }
            }
            length
        })
        .max()
        .unwrap_or(0)
}
