//! Conversions between display columns and byte offsets.
//!
//! A column is one terminal cell. Wide glyphs occupy two columns and
//! zero-width characters (combining marks) ride along with the glyph
//! before them, so every column handed back by this module sits on a
//! glyph boundary.

use unicode_width::UnicodeWidthChar;

/// Display width of a single character.
///
/// Control characters have no width in `unicode-width`; they count as
/// one cell so the cursor can still step over them.
pub fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(1)
}

/// Display width of a string in columns.
pub fn column_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Byte offset of the glyph that starts at `column`.
///
/// A column inside a wide glyph resolves to the glyph after it. Columns
/// past the end of the text clamp to `text.len()`, which is the valid
/// insertion point after the last character.
pub fn column_to_byte(text: &str, column: usize) -> usize {
    let mut col = 0;
    for (idx, ch) in text.char_indices() {
        let width = char_width(ch);
        if col >= column && (width > 0 || idx == 0) {
            return idx;
        }
        col += width;
    }
    text.len()
}

/// Move `column` onto the nearest glyph boundary at or after it.
pub fn snap_column(text: &str, column: usize) -> usize {
    column_width(&text[..column_to_byte(text, column)])
}

/// Column where the glyph before `column` starts.
pub fn prev_glyph_column(text: &str, column: usize) -> usize {
    let end = column_to_byte(text, column);
    let start = text[..end]
        .char_indices()
        .rev()
        .find(|&(idx, ch)| char_width(ch) > 0 || idx == 0)
        .map_or(0, |(idx, _)| idx);
    column_width(&text[..start])
}

/// Column just past the glyph that starts at `column`.
pub fn next_glyph_column(text: &str, column: usize) -> usize {
    let start = column_to_byte(text, column);
    if start >= text.len() {
        return column_width(text);
    }
    let here = column_width(&text[..start]);
    snap_column(text, here + 1)
}

/// Letters, digits and `_` make up words.
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Column of the start of the next word after `column`.
///
/// Returns `None` when no word starts between `column` and the end of
/// the line.
pub fn next_word(text: &str, column: usize) -> Option<usize> {
    let start = column_to_byte(text, column);
    let rest = &text[start..];
    let word_end = rest.find(|c: char| !is_word_char(c))?;
    let gap = rest[word_end..].find(is_word_char)?;
    Some(column_width(&text[..start + word_end + gap]))
}

/// Column of the start of the word before `column`.
///
/// Returns `None` when there is no word between the start of the line
/// and `column`.
pub fn prev_word(text: &str, column: usize) -> Option<usize> {
    let end = column_to_byte(text, column);
    let before = text[..end].trim_end_matches(|c: char| !is_word_char(c));
    if before.is_empty() {
        return None;
    }
    let start = before
        .char_indices()
        .rev()
        .find(|&(_, ch)| !is_word_char(ch))
        .map_or(0, |(idx, ch)| idx + ch.len_utf8());
    Some(column_width(&text[..start]))
}

/// Column where the word touching `column` from the left starts.
///
/// Used to find the prefix a completion replaces.
pub fn word_start(text: &str, column: usize) -> usize {
    let end = column_to_byte(text, column);
    let start = text[..end]
        .char_indices()
        .rev()
        .take_while(|&(_, ch)| is_word_char(ch))
        .last()
        .map_or(end, |(idx, _)| idx);
    column_width(&text[..start])
}
