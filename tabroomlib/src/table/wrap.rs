//! Word wrapping of cells and vertical filling of rows.
//!
//! Wrapping works on the visible characters only. Style codes keep their
//! position relative to the visible text and are re-emitted around it, so a
//! code left open at a wrap point is reset at the end of that physical line
//! and re-opened at the start of the next one.

use std::collections::VecDeque;

use super::measure::{char_width, is_reset, segments, Segment, TAB_STOP};
use super::options::{CharWidth, VAlign};

const RESET: &str = "\x1b[0m";

/// Visible characters of one logical line, with the style codes lifted out.
struct Line<'a> {
    chars: Vec<char>,
    widths: Vec<usize>,
    /// (number of visible chars before the code, code)
    codes: Vec<(usize, &'a str)>,
}

impl<'a> Line<'a> {
    /// Expand tabs to spaces and turn other whitespace controls into spaces.
    fn parse(text: &'a str, mode: CharWidth) -> Self {
        let mut line = Line {
            chars: Vec::new(),
            widths: Vec::new(),
            codes: Vec::new(),
        };
        let mut column = 0;
        for seg in segments(text) {
            match seg {
                Segment::Style(code) => line.codes.push((line.chars.len(), code)),
                Segment::Text(t) => {
                    for c in t.chars() {
                        match c {
                            '\t' => {
                                let next = (column / TAB_STOP + 1) * TAB_STOP;
                                for _ in column..next {
                                    line.push(' ', 1);
                                }
                                column = next;
                            }
                            '\r' | '\x0b' | '\x0c' => {
                                line.push(' ', 1);
                                column += 1;
                            }
                            _ => {
                                let w = char_width(c, mode);
                                line.push(c, w);
                                column += w;
                            }
                        }
                    }
                }
            }
        }
        line
    }

    fn push(&mut self, c: char, width: usize) {
        self.chars.push(c);
        self.widths.push(width);
    }
}

#[derive(Debug, Clone, Copy)]
struct Chunk {
    start: usize,
    end: usize,
    space: bool,
}

/// Split visible text into whitespace runs and words. Words are further
/// split after a hyphen joining two runs of letters (`well-known`).
fn chunks(chars: &[char]) -> VecDeque<Chunk> {
    let mut out = VecDeque::new();
    let mut start = 0;
    for i in 1..=chars.len() {
        let boundary = i == chars.len()
            || chars[i].is_whitespace() != chars[i - 1].is_whitespace()
            || hyphen_break(chars, i);
        if boundary {
            out.push_back(Chunk {
                start,
                end: i,
                space: chars[start].is_whitespace(),
            });
            start = i;
        }
    }
    out
}

fn hyphen_break(chars: &[char], i: usize) -> bool {
    i >= 3
        && chars[i - 1] == '-'
        && chars[i - 2].is_alphabetic()
        && chars[i - 3].is_alphabetic()
        && chars[i].is_alphabetic()
}

/// Greedy line filling. Returns visible-char ranges, one per physical line.
///
/// Whitespace at the start of a continuation line and at the end of every
/// line is dropped; words wider than the line are broken.
fn break_lines(chars: &[char], widths: &[usize], width: usize) -> Vec<(usize, usize)> {
    let width = width.max(1);
    let chunk_width = |c: &Chunk| widths[c.start..c.end].iter().sum::<usize>();
    let mut pending = chunks(chars);
    let mut lines = Vec::new();

    while !pending.is_empty() {
        if !lines.is_empty() && pending.front().is_some_and(|c| c.space) {
            pending.pop_front();
        }

        let mut line: Vec<Chunk> = Vec::new();
        let mut used = 0;
        while let Some(chunk) = pending.front() {
            let w = chunk_width(chunk);
            if used + w > width {
                break;
            }
            used += w;
            line.push(*chunk);
            pending.pop_front();
        }

        let mut exhausted = false;
        if let Some(chunk) = pending.front_mut() {
            if chunk_width(&*chunk) > width {
                let space_left = width - used;
                let mut taken = 0;
                let mut acc = 0;
                while chunk.start + taken < chunk.end {
                    let w = widths[chunk.start + taken];
                    if acc + w > space_left {
                        break;
                    }
                    acc += w;
                    taken += 1;
                }
                if taken == 0 && line.is_empty() {
                    taken = 1;
                }
                if taken > 0 {
                    line.push(Chunk {
                        start: chunk.start,
                        end: chunk.start + taken,
                        space: chunk.space,
                    });
                    chunk.start += taken;
                    exhausted = chunk.start == chunk.end;
                }
            }
        }
        if exhausted {
            pending.pop_front();
        }

        if line.last().is_some_and(|c| c.space) {
            line.pop();
        }
        if let (Some(first), Some(last)) = (line.first(), line.last()) {
            lines.push((first.start, last.end));
        }
    }
    lines
}

fn apply_code(open: &mut Vec<String>, code: &str) {
    if is_reset(code) {
        open.clear();
    } else {
        open.push(code.to_string());
    }
}

/// Wrap cell text to `width` columns.
///
/// The text is split on `\n` first and each line is wrapped on its own.
/// Every logical line yields at least one physical line, so an empty cell
/// is one empty line.
pub fn wrap_cell(text: &str, width: usize, mode: CharWidth) -> Vec<String> {
    let mut out = Vec::new();
    let mut open: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        let line = Line::parse(raw, mode);
        let mut ranges = break_lines(&line.chars, &line.widths, width);
        if ranges.is_empty() {
            ranges.push((0, 0));
        }

        let mut next_code = 0;
        let last_range = ranges.len() - 1;
        for (k, &(start, end)) in ranges.iter().enumerate() {
            // codes before the first visible char of this line only change
            // the open state; the state is then re-opened as a prefix
            while let Some(&(pos, code)) = line.codes.get(next_code) {
                if pos > start {
                    break;
                }
                apply_code(&mut open, code);
                next_code += 1;
            }

            let mut physical: String = open.concat();
            for i in start..end {
                while let Some(&(pos, code)) = line.codes.get(next_code) {
                    if pos != i {
                        break;
                    }
                    physical.push_str(code);
                    apply_code(&mut open, code);
                    next_code += 1;
                }
                physical.push(line.chars[i]);
            }
            if k == last_range {
                for &(_, code) in &line.codes[next_code..] {
                    physical.push_str(code);
                    apply_code(&mut open, code);
                }
            }
            if !open.is_empty() {
                physical.push_str(RESET);
            }
            out.push(physical);
        }
    }
    out
}

/// Pad a wrapped cell with empty lines up to `height`.
pub fn fill_vertical(mut cell: Vec<String>, height: usize, valign: VAlign) -> Vec<String> {
    let missing = height.saturating_sub(cell.len());
    if missing == 0 {
        return cell;
    }
    match valign {
        VAlign::Top => cell.extend(std::iter::repeat(String::new()).take(missing)),
        VAlign::Bottom => {
            cell.splice(0..0, std::iter::repeat(String::new()).take(missing));
        }
        VAlign::Middle => {
            let above = missing / 2;
            cell.splice(0..0, std::iter::repeat(String::new()).take(above));
            cell.extend(std::iter::repeat(String::new()).take(missing - above));
        }
    }
    cell
}

/// Wrap every cell of a row and pad them all to the tallest cell.
pub fn wrap_row(
    cells: &[String],
    widths: &[usize],
    valigns: &[VAlign],
    mode: CharWidth,
) -> Vec<Vec<String>> {
    let wrapped: Vec<Vec<String>> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| wrap_cell(cell, width, mode))
        .collect();
    let height = wrapped.iter().map(Vec::len).max().unwrap_or(0);
    wrapped
        .into_iter()
        .zip(valigns)
        .map(|(cell, &valign)| fill_vertical(cell, height, valign))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::measure::{strip_styles, visual_len};

    fn wrap(text: &str, width: usize) -> Vec<String> {
        wrap_cell(text, width, CharWidth::Unicode)
    }

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(wrap("hello", 10), vec!["hello"]);
    }

    #[test]
    fn test_wraps_on_words() {
        assert_eq!(
            wrap("Example Invitational Tournament", 12),
            vec!["Example", "Invitational", "Tournament"]
        );
        assert_eq!(wrap("a b c d e", 3), vec!["a b", "c d", "e"]);
    }

    #[test]
    fn test_breaks_long_words() {
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("ab cdefghij", 4), vec!["ab c", "defg", "hij"]);
    }

    #[test]
    fn test_breaks_after_hyphen() {
        assert_eq!(wrap("state-wide final", 11), vec!["state-wide", "final"]);
        assert_eq!(wrap("state-wide", 7), vec!["state-", "wide"]);
        assert_eq!(wrap("2024-01-15", 10), vec!["2024-01-15"]);
    }

    #[test]
    fn test_leading_space_kept_only_on_first_line() {
        assert_eq!(wrap("  ab cd", 4), vec!["  ab", "cd"]);
    }

    #[test]
    fn test_newlines_wrap_independently() {
        assert_eq!(wrap("one two\nthree", 4), vec!["one", "two", "thre", "e"]);
        assert_eq!(wrap("a\n\nb", 4), vec!["a", "", "b"]);
    }

    #[test]
    fn test_empty_cell_is_one_line() {
        assert_eq!(wrap("", 5), vec![""]);
        assert_eq!(wrap("   ", 5), vec![""]);
    }

    #[test]
    fn test_tabs_expand() {
        assert_eq!(wrap("a\tb", 20), vec!["a       b"]);
    }

    #[test]
    fn test_styles_preserved_without_counting() {
        let lines = wrap("\x1b[1mbold\x1b[0m text", 9);
        assert_eq!(lines, vec!["\x1b[1mbold\x1b[0m text"]);
    }

    #[test]
    fn test_open_style_closed_and_reopened_across_wrap() {
        let lines = wrap("\x1b[92mgreen words here\x1b[0m", 6);
        assert_eq!(
            lines,
            vec![
                "\x1b[92mgreen\x1b[0m",
                "\x1b[92mwords\x1b[0m",
                "\x1b[92mhere\x1b[0m",
            ]
        );
        for line in &lines {
            assert!(visual_len(line, CharWidth::Unicode) <= 6);
        }
    }

    #[test]
    fn test_unclosed_style_is_reset_at_cell_end() {
        let lines = wrap("\x1b[1mloud", 10);
        assert_eq!(lines, vec!["\x1b[1mloud\x1b[0m"]);
    }

    #[test]
    fn test_style_carries_across_newline() {
        let lines = wrap("\x1b[4mone\ntwo\x1b[0m", 10);
        assert_eq!(lines, vec!["\x1b[4mone\x1b[0m", "\x1b[4mtwo\x1b[0m"]);
        assert_eq!(strip_styles(&lines[1]), "two");
    }

    #[test]
    fn test_wide_chars_wrap_by_display_width() {
        assert_eq!(wrap("日本語", 4), vec!["日本", "語"]);
        assert_eq!(
            wrap_cell("日本語", 4, CharWidth::Narrow),
            vec!["日本語"]
        );
    }

    #[test]
    fn test_wide_chars_wider_than_column() {
        assert_eq!(
            wrap_cell("日本語 ab", 1, CharWidth::Unicode),
            vec!["日", "本", "語", "a", "b"]
        );
        let styled = wrap_cell("日本語 \x1b[92mtext\x1b[0m", 1, CharWidth::Unicode);
        assert_eq!(styled.len(), 7);
        assert!(styled.iter().all(|line| !strip_styles(line).is_empty()));
    }

    #[test]
    fn test_fill_vertical() {
        let cell = vec!["x".to_string()];
        assert_eq!(fill_vertical(cell.clone(), 3, VAlign::Top), vec!["x", "", ""]);
        assert_eq!(
            fill_vertical(cell.clone(), 3, VAlign::Bottom),
            vec!["", "", "x"]
        );
        assert_eq!(
            fill_vertical(cell.clone(), 4, VAlign::Middle),
            vec!["", "x", "", ""]
        );
        assert_eq!(fill_vertical(cell, 1, VAlign::Middle), vec!["x"]);
    }

    #[test]
    fn test_wrap_row_pads_to_tallest() {
        let cells = vec!["a b c".to_string(), "z".to_string()];
        let rows = wrap_row(
            &cells,
            &[1, 1],
            &[VAlign::Top, VAlign::Bottom],
            CharWidth::Unicode,
        );
        assert_eq!(rows[0], vec!["a", "b", "c"]);
        assert_eq!(rows[1], vec!["", "", "z"]);
    }
}
