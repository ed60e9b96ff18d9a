//! Cursor and viewport management.
//!
//! [`CursorView`] owns the cursor position and the visible window into
//! the document. Every movement ends with [`CursorView::ensure_visible`],
//! which clamps the cursor into the document and scrolls the window so
//! the cursor can be seen.

use super::column;
use super::document::Document;

/// Cursor position in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based row index.
    pub row: usize,
    /// Zero-based display column within the row.
    pub column: usize,
}

impl Cursor {
    /// Create a cursor at a specific position.
    pub const fn at(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// The visible window into the document.
///
/// # Example
///
/// ```
/// use textinput::editor::{CursorView, Document};
///
/// let doc = Document::from_text(&"line\n".repeat(100));
/// let mut view = CursorView::new(80, 10);
/// view.move_to(50, 0, &doc);
/// assert_eq!(view.viewport().top, 41);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row
    pub top: usize,
    /// First visible column
    pub left: usize,
    /// Visible rows
    pub height: usize,
    /// Visible columns
    pub width: usize,
}

impl Viewport {
    /// Rows `top..top + height`, clamped to the document.
    pub fn visible_rows(&self, line_count: usize) -> std::ops::Range<usize> {
        let start = self.top.min(line_count);
        let end = (self.top + self.height).min(line_count);
        start..end
    }
}

/// Cursor plus viewport, kept consistent with a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorView {
    cursor: Cursor,
    viewport: Viewport,
}

impl CursorView {
    /// Create a view at the origin with the given window size.
    pub const fn new(width: usize, height: usize) -> Self {
        Self {
            cursor: Cursor { row: 0, column: 0 },
            viewport: Viewport {
                top: 0,
                left: 0,
                height,
                width,
            },
        }
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Put the cursor and the window back at the origin.
    pub const fn reset(&mut self) {
        self.cursor = Cursor { row: 0, column: 0 };
        self.viewport.top = 0;
        self.viewport.left = 0;
    }

    /// Change the window size and keep the cursor visible.
    pub fn resize(&mut self, width: usize, height: usize, doc: &Document) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.ensure_visible(doc);
    }

    /// Clamp the cursor into the document and scroll it into view.
    ///
    /// Idempotent: a second call with the same document changes nothing.
    pub fn ensure_visible(&mut self, doc: &Document) {
        let line_count = doc.line_count();
        let cursor = &mut self.cursor;
        let vp = &mut self.viewport;
        let width = vp.width.max(1);
        let height = vp.height.max(1);

        cursor.row = cursor.row.min(line_count.saturating_sub(1));
        let text = doc.line(cursor.row).map_or("", |line| line.text());
        cursor.column = column::snap_column(text, cursor.column);

        if cursor.column < vp.left {
            vp.left = cursor.column;
        }
        if cursor.column >= vp.left + (width - 1) {
            vp.left = cursor.column + 1 - width;
        }
        if cursor.row < vp.top {
            vp.top = cursor.row;
        }
        if cursor.row >= vp.top + height {
            vp.top = cursor.row + 1 - height;
        }
        if vp.top + height > line_count {
            vp.top = line_count.saturating_sub(height);
        }
    }

    /// Move to an absolute position.
    pub fn move_to(&mut self, row: usize, column: usize, doc: &Document) {
        self.cursor = Cursor { row, column };
        self.ensure_visible(doc);
    }

    /// Move by a relative number of rows and columns.
    pub fn move_by(&mut self, drow: isize, dcolumn: isize, doc: &Document) {
        let row = self.cursor.row.saturating_add_signed(drow);
        let column = self.cursor.column.saturating_add_signed(dcolumn);
        self.move_to(row, column, doc);
    }

    /// Move to the first column of the first row.
    pub fn home(&mut self, doc: &Document) {
        self.move_to(0, 0, doc);
    }

    /// Move to the first column of the last row.
    pub fn end(&mut self, doc: &Document) {
        self.move_to(doc.line_count().saturating_sub(1), 0, doc);
    }

    pub fn line_start(&mut self, doc: &Document) {
        self.move_to(self.cursor.row, 0, doc);
    }

    pub fn line_end(&mut self, doc: &Document) {
        self.move_to(self.cursor.row, doc.column_width(self.cursor.row), doc);
    }

    /// Scroll the cursor and the window up one page.
    pub fn page_up(&mut self, doc: &Document) {
        if self.cursor.row == 0 {
            return;
        }
        let height = self.viewport.height.max(1);
        if self.cursor.row < height {
            self.cursor.row = 0;
        } else {
            self.viewport.top = self.viewport.top.saturating_sub(height);
            self.cursor.row -= height;
        }
        self.ensure_visible(doc);
    }

    /// Scroll the cursor and the window down one page.
    pub fn page_down(&mut self, doc: &Document) {
        let line_count = doc.line_count();
        let bottom = line_count.saturating_sub(1);
        if self.cursor.row >= bottom {
            return;
        }
        let height = self.viewport.height.max(1);
        if self.cursor.row + height < line_count {
            self.viewport.top += height;
            self.cursor.row += height;
        } else {
            self.cursor.row = bottom;
        }
        self.ensure_visible(doc);
    }

    /// One glyph left, wrapping to the end of the previous row.
    pub fn left(&mut self, doc: &Document) {
        let Cursor { row, column: col } = self.cursor;
        if col > 0 {
            let text = doc.line(row).map_or("", |line| line.text());
            self.move_to(row, column::prev_glyph_column(text, col), doc);
        } else if row > 0 {
            self.move_to(row - 1, doc.column_width(row - 1), doc);
        }
    }

    /// One glyph right, wrapping to the start of the next row.
    pub fn right(&mut self, doc: &Document) {
        let Cursor { row, column: col } = self.cursor;
        if col < doc.column_width(row) {
            let text = doc.line(row).map_or("", |line| line.text());
            self.move_to(row, column::next_glyph_column(text, col), doc);
        } else if row + 1 < doc.line_count() {
            self.move_to(row + 1, 0, doc);
        }
    }

    pub fn up(&mut self, doc: &Document) {
        if self.cursor.row > 0 {
            self.move_by(-1, 0, doc);
        }
    }

    pub fn down(&mut self, doc: &Document) {
        if self.cursor.row + 1 < doc.line_count() {
            self.move_by(1, 0, doc);
        }
    }

    /// Start of the previous word on the row, or column 0.
    pub fn word_left(&mut self, doc: &Document) {
        let text = doc.line(self.cursor.row).map_or("", |line| line.text());
        let target = column::prev_word(text, self.cursor.column).unwrap_or(0);
        self.move_to(self.cursor.row, target, doc);
    }

    /// Start of the next word on the row, or the end of the row.
    pub fn word_right(&mut self, doc: &Document) {
        let text = doc.line(self.cursor.row).map_or("", |line| line.text());
        let target = column::next_word(text, self.cursor.column)
            .unwrap_or_else(|| column::column_width(text));
        self.move_to(self.cursor.row, target, doc);
    }

    /// Screen offset of the cursor inside the window, if it is visible.
    pub const fn relative_position(&self) -> Option<(usize, usize)> {
        let vp = self.viewport;
        if self.cursor.row < vp.top
            || self.cursor.column < vp.left
            || self.cursor.row >= vp.top + vp.height
            || self.cursor.column >= vp.left + vp.width
        {
            return None;
        }
        Some((self.cursor.column - vp.left, self.cursor.row - vp.top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(count: usize) -> Document {
        let text = (0..count)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        Document::from_text(&text)
    }

    #[test]
    fn test_new_view_starts_at_origin() {
        let view = CursorView::new(80, 24);
        assert_eq!(view.cursor(), Cursor::at(0, 0));
        assert_eq!(view.viewport().top, 0);
    }

    #[test]
    fn test_move_to_clamps_row_and_column() {
        let doc = Document::from_text("hello\nhi");
        let mut view = CursorView::new(80, 24);
        view.move_to(100, 100, &doc);
        assert_eq!(view.cursor(), Cursor::at(1, 2));
    }

    #[test]
    fn test_move_to_snaps_inside_wide_glyph() {
        let doc = Document::from_text("中文");
        let mut view = CursorView::new(80, 24);
        view.move_to(0, 1, &doc);
        assert_eq!(view.cursor().column, 2);
    }

    #[test]
    fn test_scrolls_down_to_follow_cursor() {
        let doc = numbered(100);
        let mut view = CursorView::new(80, 10);
        view.move_to(15, 0, &doc);
        assert_eq!(view.viewport().top, 6);
    }

    #[test]
    fn test_scrolls_up_to_follow_cursor() {
        let doc = numbered(100);
        let mut view = CursorView::new(80, 10);
        view.move_to(50, 0, &doc);
        view.move_to(20, 0, &doc);
        assert_eq!(view.viewport().top, 20);
    }

    #[test]
    fn test_short_document_keeps_top_at_zero() {
        let doc = numbered(3);
        let mut view = CursorView::new(80, 10);
        view.move_to(2, 0, &doc);
        assert_eq!(view.viewport().top, 0);
    }

    #[test]
    fn test_top_pulled_back_after_document_shrinks() {
        let mut view = CursorView::new(80, 10);
        view.move_to(90, 0, &numbered(100));
        assert_eq!(view.viewport().top, 81);
        view.ensure_visible(&numbered(12));
        assert_eq!(view.cursor().row, 11);
        assert_eq!(view.viewport().top, 2);
    }

    #[test]
    fn test_scrolls_horizontally() {
        let doc = Document::from_text(&"x".repeat(200));
        let mut view = CursorView::new(20, 5);
        view.move_to(0, 50, &doc);
        assert_eq!(view.viewport().left, 31);
        view.move_to(0, 10, &doc);
        assert_eq!(view.viewport().left, 10);
    }

    #[test]
    fn test_move_by_saturates_at_origin() {
        let doc = numbered(5);
        let mut view = CursorView::new(80, 10);
        view.move_by(-3, -3, &doc);
        assert_eq!(view.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_page_down_moves_cursor_and_top() {
        let doc = numbered(100);
        let mut view = CursorView::new(80, 10);
        view.page_down(&doc);
        assert_eq!(view.cursor().row, 10);
        assert_eq!(view.viewport().top, 10);
    }

    #[test]
    fn test_page_down_near_bottom_goes_to_last_row() {
        let doc = numbered(15);
        let mut view = CursorView::new(80, 10);
        view.move_to(8, 0, &doc);
        view.page_down(&doc);
        assert_eq!(view.cursor().row, 14);
        assert_eq!(view.viewport().top, 5);
    }

    #[test]
    fn test_page_up_moves_cursor_and_top() {
        let doc = numbered(100);
        let mut view = CursorView::new(80, 10);
        view.page_down(&doc);
        view.page_down(&doc);
        view.page_up(&doc);
        assert_eq!(view.cursor().row, 10);
        assert_eq!(view.viewport().top, 10);
    }

    #[test]
    fn test_page_up_near_top_goes_to_first_row() {
        let doc = numbered(100);
        let mut view = CursorView::new(80, 10);
        view.move_to(4, 0, &doc);
        view.page_up(&doc);
        assert_eq!(view.cursor().row, 0);
    }

    #[test]
    fn test_home_and_end() {
        let doc = numbered(30);
        let mut view = CursorView::new(80, 10);
        view.end(&doc);
        assert_eq!(view.cursor(), Cursor::at(29, 0));
        assert_eq!(view.viewport().top, 20);
        view.home(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 0));
        assert_eq!(view.viewport().top, 0);
    }

    #[test]
    fn test_left_wraps_to_previous_row_end() {
        let doc = Document::from_text("hello\nworld");
        let mut view = CursorView::new(80, 10);
        view.move_to(1, 0, &doc);
        view.left(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_right_wraps_to_next_row_start() {
        let doc = Document::from_text("hello\nworld");
        let mut view = CursorView::new(80, 10);
        view.move_to(0, 5, &doc);
        view.right(&doc);
        assert_eq!(view.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_right_at_document_end_is_noop() {
        let doc = Document::from_text("hi");
        let mut view = CursorView::new(80, 10);
        view.move_to(0, 2, &doc);
        view.right(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_left_right_step_over_wide_glyph() {
        let doc = Document::from_text("a中b");
        let mut view = CursorView::new(80, 10);
        view.move_to(0, 1, &doc);
        view.right(&doc);
        assert_eq!(view.cursor().column, 3);
        view.left(&doc);
        assert_eq!(view.cursor().column, 1);
    }

    #[test]
    fn test_up_clamps_column_to_shorter_row() {
        let doc = Document::from_text("hi\nhello");
        let mut view = CursorView::new(80, 10);
        view.move_to(1, 4, &doc);
        view.up(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 2));
    }

    #[test]
    fn test_word_movement_stays_on_row() {
        let doc = Document::from_text("hello world\nnext");
        let mut view = CursorView::new(80, 10);
        view.word_right(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 6));
        view.word_right(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 11));
        view.word_left(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 6));
        view.word_left(&doc);
        view.word_left(&doc);
        assert_eq!(view.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_relative_position() {
        let doc = numbered(100);
        let mut view = CursorView::new(80, 10);
        view.move_to(15, 3, &doc);
        assert_eq!(view.relative_position(), Some((3, 9)));
    }

    #[test]
    fn test_visible_rows_clamped_to_document() {
        let vp = Viewport {
            top: 0,
            left: 0,
            height: 10,
            width: 80,
        };
        assert_eq!(vp.visible_rows(4), 0..4);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cursor_always_visible_after_ensure(
                widths in proptest::collection::vec(0..120usize, 1..200),
                height in 1..40usize,
                width in 1..100usize,
                row in 0..300usize,
                column in 0..200usize,
            ) {
                let text = widths
                    .iter()
                    .map(|w| "x".repeat(*w))
                    .collect::<Vec<_>>()
                    .join("\n");
                let doc = Document::from_text(&text);
                let mut view = CursorView::new(width, height);
                view.move_to(row, column, &doc);

                let cursor = view.cursor();
                let vp = view.viewport();
                prop_assert!(cursor.row < doc.line_count());
                prop_assert!(cursor.row >= vp.top);
                prop_assert!(cursor.row < vp.top + height);
                prop_assert!(cursor.column <= doc.column_width(cursor.row));
                prop_assert!(cursor.column >= vp.left);
                prop_assert!(cursor.column < vp.left + width);

                let before = view;
                view.ensure_visible(&doc);
                prop_assert_eq!(before, view);
            }

            #[test]
            fn navigation_keeps_cursor_in_document(
                count in 1..60usize,
                steps in proptest::collection::vec(0..8u8, 0..50),
            ) {
                let doc = Document::from_text(&"ab cd\n".repeat(count));
                let mut view = CursorView::new(10, 5);
                for step in steps {
                    match step {
                        0 => view.up(&doc),
                        1 => view.down(&doc),
                        2 => view.left(&doc),
                        3 => view.right(&doc),
                        4 => view.page_up(&doc),
                        5 => view.page_down(&doc),
                        6 => view.word_right(&doc),
                        _ => view.end(&doc),
                    }
                    let cursor = view.cursor();
                    let vp = view.viewport();
                    prop_assert!(cursor.row < doc.line_count());
                    prop_assert!(cursor.row >= vp.top && cursor.row < vp.top + 5);
                    prop_assert!(cursor.column <= doc.column_width(cursor.row));
                }
            }
        }
    }
}
