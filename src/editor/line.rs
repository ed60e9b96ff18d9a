//! Attributed lines: text plus styled byte ranges.

use std::ops::Range;

use ratatui::style::Style;

use super::column;

/// A style applied to a byte range of an [`AttrLine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    /// Byte range within the line text
    pub range: Range<usize>,
    /// Style patched over the range
    pub style: Style,
}

/// One line of text with style annotations.
///
/// Spans are kept in insertion order; later spans are patched over
/// earlier ones when the line is drawn. Editing operations shift,
/// shrink or split the spans so they keep covering the same text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrLine {
    text: String,
    spans: Vec<StyledSpan>,
}

impl AttrLine {
    /// Create an unstyled line.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// The raw text of the line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Style spans in application order.
    pub fn spans(&self) -> &[StyledSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Display width in columns.
    pub fn column_width(&self) -> usize {
        column::column_width(&self.text)
    }

    /// Byte offset for a display column.
    pub fn column_to_byte(&self, column: usize) -> usize {
        column::column_to_byte(&self.text, column)
    }

    /// Annotate a byte range. Empty or out-of-range spans are ignored.
    pub fn add_span(&mut self, range: Range<usize>, style: Style) {
        if range.start >= range.end || range.end > self.text.len() {
            return;
        }
        self.spans.push(StyledSpan { range, style });
    }

    pub fn clear_spans(&mut self) {
        self.spans.clear();
    }

    /// Insert text at a byte offset.
    ///
    /// Spans strictly containing the offset grow to include the new
    /// text; spans at or after it shift right.
    pub fn insert(&mut self, at: usize, text: &str) {
        let at = self.boundary(at);
        self.text.insert_str(at, text);
        let len = text.len();
        for span in &mut self.spans {
            if span.range.start >= at {
                span.range.start += len;
                span.range.end += len;
            } else if span.range.end > at {
                span.range.end += len;
            }
        }
    }

    /// Remove a byte range and return the removed text.
    pub fn erase(&mut self, range: Range<usize>) -> String {
        let start = self.boundary(range.start);
        let end = self.boundary(range.end).max(start);
        let removed: String = self.text.drain(start..end).collect();
        let len = end - start;
        let remap = |pos: usize| {
            if pos <= start {
                pos
            } else if pos >= end {
                pos - len
            } else {
                start
            }
        };
        for span in &mut self.spans {
            span.range = remap(span.range.start)..remap(span.range.end);
        }
        self.spans.retain(|span| span.range.start < span.range.end);
        removed
    }

    /// Split the line at a byte offset, returning the tail.
    pub fn split_off(&mut self, at: usize) -> Self {
        let at = self.boundary(at);
        let tail_text = self.text.split_off(at);
        let mut tail_spans = Vec::new();
        for span in &mut self.spans {
            if span.range.end > at {
                tail_spans.push(StyledSpan {
                    range: span.range.start.saturating_sub(at)..span.range.end - at,
                    style: span.style,
                });
                span.range.end = at;
            }
        }
        self.spans.retain(|span| span.range.start < span.range.end);
        Self {
            text: tail_text,
            spans: tail_spans,
        }
    }

    /// Append another line, keeping its spans.
    pub fn append(&mut self, other: Self) {
        let offset = self.text.len();
        self.text.push_str(&other.text);
        self.spans.extend(other.spans.into_iter().map(|span| StyledSpan {
            range: span.range.start + offset..span.range.end + offset,
            style: span.style,
        }));
    }

    /// Partition the text into contiguous runs with their combined style.
    pub fn styled_segments(&self) -> Vec<(Range<usize>, Style)> {
        let mut bounds = vec![0, self.text.len()];
        for span in &self.spans {
            bounds.push(span.range.start);
            bounds.push(span.range.end);
        }
        bounds.sort_unstable();
        bounds.dedup();

        bounds
            .windows(2)
            .filter(|pair| pair[0] < pair[1])
            .map(|pair| {
                let style = self
                    .spans
                    .iter()
                    .filter(|span| span.range.start <= pair[0] && pair[1] <= span.range.end)
                    .fold(Style::default(), |acc, span| acc.patch(span.style));
                (pair[0]..pair[1], style)
            })
            .collect()
    }

    /// Nearest char boundary at or before `at`, clamped to the text.
    fn boundary(&self, at: usize) -> usize {
        let mut at = at.min(self.text.len());
        while !self.text.is_char_boundary(at) {
            at -= 1;
        }
        at
    }
}

impl From<&str> for AttrLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for AttrLine {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::{Color, Modifier};

    fn red() -> Style {
        Style::default().fg(Color::Red)
    }

    #[test]
    fn test_insert_shifts_following_spans() {
        let mut line = AttrLine::new("select x");
        line.add_span(7..8, red());
        line.insert(0, "  ");
        assert_eq!(line.text(), "  select x");
        assert_eq!(line.spans()[0].range, 9..10);
    }

    #[test]
    fn test_insert_inside_span_extends_it() {
        let mut line = AttrLine::new("abcd");
        line.add_span(0..4, red());
        line.insert(2, "XY");
        assert_eq!(line.spans()[0].range, 0..6);
    }

    #[test]
    fn test_insert_at_span_end_does_not_extend() {
        let mut line = AttrLine::new("ab cd");
        line.add_span(0..2, red());
        line.insert(2, "!");
        assert_eq!(line.spans()[0].range, 0..2);
    }

    #[test]
    fn test_erase_returns_removed_text() {
        let mut line = AttrLine::new("hello");
        assert_eq!(line.erase(2..5), "llo");
        assert_eq!(line.text(), "he");
    }

    #[test]
    fn test_erase_drops_covered_spans_and_shrinks_others() {
        let mut line = AttrLine::new("one two three");
        line.add_span(0..3, red());
        line.add_span(4..7, red());
        line.add_span(8..13, red());
        line.erase(2..9);
        assert_eq!(line.text(), "onhree");
        let ranges: Vec<_> = line.spans().iter().map(|s| s.range.clone()).collect();
        assert_eq!(ranges, vec![0..2, 2..6]);
    }

    #[test]
    fn test_erase_clamps_to_char_boundaries() {
        let mut line = AttrLine::new("é");
        assert_eq!(line.erase(0..1), "");
        assert_eq!(line.text(), "é");
    }

    #[test]
    fn test_split_off_divides_spans() {
        let mut line = AttrLine::new("hello");
        line.add_span(1..4, red());
        let tail = line.split_off(3);
        assert_eq!(line.text(), "hel");
        assert_eq!(tail.text(), "lo");
        assert_eq!(line.spans()[0].range, 1..3);
        assert_eq!(tail.spans()[0].range, 0..1);
    }

    #[test]
    fn test_append_offsets_spans() {
        let mut head = AttrLine::new("ab");
        let mut tail = AttrLine::new("cd");
        tail.add_span(0..1, red());
        head.append(tail);
        assert_eq!(head.text(), "abcd");
        assert_eq!(head.spans()[0].range, 2..3);
    }

    #[test]
    fn test_add_span_ignores_invalid_ranges() {
        let mut line = AttrLine::new("abc");
        line.add_span(2..2, red());
        line.add_span(1..9, red());
        assert!(line.spans().is_empty());
    }

    #[test]
    fn test_styled_segments_patch_overlaps() {
        let mut line = AttrLine::new("abcdef");
        line.add_span(0..4, red());
        line.add_span(2..6, Style::default().add_modifier(Modifier::BOLD));
        let segments = line.styled_segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], (0..2, red()));
        assert_eq!(segments[1].0, 2..4);
        assert_eq!(segments[1].1.fg, Some(Color::Red));
        assert!(segments[1].1.add_modifier.contains(Modifier::BOLD));
        assert_eq!(segments[2].1.fg, None);
    }

    #[test]
    fn test_styled_segments_of_plain_line() {
        let line = AttrLine::new("plain");
        assert_eq!(line.styled_segments(), vec![(0..5, Style::default())]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn insert_then_erase_restores_line(
                base in "[a-z é中]{0,12}",
                insert in "[a-z é中]{0,6}",
                column in 0..16usize,
            ) {
                let mut line = AttrLine::new(base.clone());
                let at = line.column_to_byte(column);
                line.insert(at, &insert);
                let removed = line.erase(at..at + insert.len());
                prop_assert_eq!(removed, insert);
                prop_assert_eq!(line.text(), base.as_str());
            }
        }
    }
}
