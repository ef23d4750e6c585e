//! Text measurement and wrapping for slide overlays.
//!
//! No font shaping happens at layout time. Widths are estimated in cells:
//! one cell per narrow grapheme, two per East Asian wide grapheme, each cell
//! [`ADVANCE_PER_CELL`] of the font size. Lines break greedily at spaces and
//! fall back to breaking inside a word when the word alone is too wide.
//! Explicit newlines always break, and blank lines are kept.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Average horizontal advance of one cell, as a fraction of the font size.
pub const ADVANCE_PER_CELL: f32 = 0.55;

/// Display width of a grapheme cluster in cells.
#[must_use]
pub fn grapheme_cells(grapheme: &str) -> usize {
    grapheme.width()
}

/// Display width of a string in cells.
#[must_use]
pub fn text_cells(text: &str) -> usize {
    text.graphemes(true).map(grapheme_cells).sum()
}

/// How many cells fit into `width_px` at `font_px`. Never less than one.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cells_per_line(width_px: f32, font_px: f32) -> usize {
    let advance = font_px * ADVANCE_PER_CELL;
    if advance <= 0.0 || width_px <= 0.0 {
        return 1;
    }
    ((width_px / advance).floor() as usize).max(1)
}

/// Wrap `text` into lines of at most `max_cells` cells.
#[must_use]
pub fn wrap_text(text: &str, max_cells: usize) -> Vec<String> {
    let max_cells = max_cells.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        wrap_paragraph(paragraph.trim_end_matches('\r'), max_cells, &mut lines);
    }
    lines
}

fn wrap_paragraph(paragraph: &str, max_cells: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut width = 0usize;
    let mut started = false;

    for word in paragraph.split(' ') {
        let word_width = text_cells(word);

        if started {
            if width + 1 + word_width <= max_cells {
                line.push(' ');
                line.push_str(word);
                width += 1 + word_width;
                continue;
            }
            out.push(std::mem::take(&mut line));
            width = 0;
        }

        started = true;
        if word_width <= max_cells {
            line.push_str(word);
            width = word_width;
            continue;
        }

        for grapheme in word.graphemes(true) {
            let gw = grapheme_cells(grapheme);
            if width > 0 && width + gw > max_cells {
                out.push(std::mem::take(&mut line));
                width = 0;
            }
            line.push_str(grapheme);
            width += gw;
        }
    }

    out.push(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_spaces() {
        assert_eq!(wrap_text("hello world", 5), vec!["hello", "world"]);
        assert_eq!(wrap_text("hello world", 11), vec!["hello world"]);
        assert_eq!(wrap_text("a b c d", 3), vec!["a b", "c d"]);
    }

    #[test]
    fn breaks_long_words() {
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("go abcdefgh", 4), vec!["go", "abcd", "efgh"]);
    }

    #[test]
    fn keeps_explicit_and_blank_lines() {
        assert_eq!(wrap_text("one\n\ntwo", 20), vec!["one", "", "two"]);
        assert_eq!(wrap_text("one\r\ntwo", 20), vec!["one", "two"]);
        assert_eq!(wrap_text("", 20), vec![""]);
    }

    #[test]
    fn wide_graphemes_take_two_cells() {
        assert_eq!(text_cells("你好"), 4);
        assert_eq!(wrap_text("你好世界", 4), vec!["你好", "世界"]);
    }

    #[test]
    fn combining_marks_stay_attached() {
        let word = "e\u{301}e\u{301}e\u{301}";
        assert_eq!(text_cells(word), 3);
        let lines = wrap_text(word, 2);
        assert_eq!(lines, vec!["e\u{301}e\u{301}", "e\u{301}"]);
    }

    #[test]
    fn cells_per_line_is_at_least_one() {
        assert_eq!(cells_per_line(0.0, 24.0), 1);
        assert_eq!(cells_per_line(10.0, 200.0), 1);
        assert_eq!(cells_per_line(1048.0, 24.0), 79);
    }
}
