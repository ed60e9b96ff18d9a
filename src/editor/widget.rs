//! The `TextInput` editing engine.
//!
//! Owns the document, cursor, viewport, popup and clipboard for one
//! input. Key chords are translated by [`action_for_key`] and applied
//! here; every content change goes through one pipeline that
//! re-highlights, re-clamps the cursor, closes the popup and fires the
//! change callback.

use std::fmt;

use crossterm::event::{KeyEvent, MouseButton, MouseEventKind};
use ratatui::layout::{Position, Rect};

use super::column;
use super::cursor::{Cursor, CursorView, Viewport};
use super::document::Document;
use super::keymap::{EditAction, action_for_key};
use super::line::AttrLine;
use super::popup::Popup;
use crate::config::DEFAULT_MAX_POPUP_HEIGHT;
use crate::highlight::{self, Highlighter, TextFormat};

/// Handler invoked with the input that fired it.
pub type Callback = Box<dyn FnMut(&mut TextInput)>;

#[derive(Debug, Clone, Copy)]
enum Hook {
    Change,
    Completion,
    Abort,
}

/// A multi-line text input.
///
/// # Example
///
/// ```
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
/// use textinput::editor::TextInput;
///
/// let mut input = TextInput::new(40, 5);
/// input.set_content("hllo");
/// input.handle_key(&KeyEvent::new(KeyCode::Right, KeyModifiers::NONE));
/// input.handle_key(&KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));
/// assert_eq!(input.content(), "hello");
/// ```
pub struct TextInput {
    document: Document,
    view: CursorView,
    popup: Popup,
    clipboard: String,
    format: TextFormat,
    highlighters: Vec<Highlighter>,
    max_popup_height: usize,
    needs_update: bool,
    on_change: Option<Callback>,
    on_completion: Option<Callback>,
    on_abort: Option<Callback>,
}

impl TextInput {
    /// Create an empty input with a window of `width` x `height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            document: Document::new(),
            view: CursorView::new(width, height),
            popup: Popup::default(),
            clipboard: String::new(),
            format: TextFormat::Plain,
            highlighters: Vec::new(),
            max_popup_height: DEFAULT_MAX_POPUP_HEIGHT,
            needs_update: true,
            on_change: None,
            on_completion: None,
            on_abort: None,
        }
    }

    /// Set the syntax used for highlighting.
    #[must_use]
    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self.highlight();
        self
    }

    #[must_use]
    pub fn with_highlighters(mut self, highlighters: Vec<Highlighter>) -> Self {
        self.highlighters = highlighters;
        self.highlight();
        self
    }

    #[must_use]
    pub fn with_max_popup_height(mut self, height: usize) -> Self {
        self.max_popup_height = height.max(1);
        self
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&mut Self) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn set_on_completion(&mut self, callback: impl FnMut(&mut Self) + 'static) {
        self.on_completion = Some(Box::new(callback));
    }

    pub fn set_on_abort(&mut self, callback: impl FnMut(&mut Self) + 'static) {
        self.on_abort = Some(Box::new(callback));
    }

    // --- Content ---

    /// Replace the whole document and move back to the origin.
    ///
    /// Does not fire the change callback.
    pub fn set_content(&mut self, text: &str) {
        self.document = Document::from_text(text);
        self.view.reset();
        self.highlight();
        self.view.ensure_visible(&self.document);
        self.popup.hide();
        self.needs_update = true;
    }

    /// The document text, lines joined with `\n`.
    pub fn content(&self) -> String {
        self.document.text()
    }

    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn format(&self) -> TextFormat {
        self.format
    }

    pub const fn cursor(&self) -> Cursor {
        self.view.cursor()
    }

    pub const fn viewport(&self) -> Viewport {
        self.view.viewport()
    }

    pub const fn popup(&self) -> &Popup {
        &self.popup
    }

    /// Text saved by the last kill.
    pub fn clipboard(&self) -> &str {
        &self.clipboard
    }

    /// The word the cursor is in or just after, and its start column.
    pub fn word_before_cursor(&self) -> (usize, &str) {
        let Cursor { row, column: col } = self.view.cursor();
        let line = self.document.line(row).map_or("", AttrLine::text);
        let start = column::word_start(line, col);
        let from = column::column_to_byte(line, start);
        let to = column::column_to_byte(line, col);
        (start, &line[from..to])
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.view.resize(width, height, &self.document);
        self.needs_update = true;
    }

    // --- Input ---

    /// Handle a key chord. Returns `false` when the chord is not bound.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let Some(action) = action_for_key(key, self.popup.is_visible()) else {
            return false;
        };
        self.apply(action);
        true
    }

    /// Handle a mouse event at a position relative to the input.
    pub fn handle_mouse(&mut self, kind: MouseEventKind, x: usize, y: usize) -> bool {
        tracing::trace!(?kind, x, y, "mouse event");
        match kind {
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Up(MouseButton::Left) => {
                let vp = self.view.viewport();
                self.view.move_to(vp.top + y, vp.left + x, &self.document);
            }
            MouseEventKind::ScrollUp => self.view.up(&self.document),
            MouseEventKind::ScrollDown => self.view.down(&self.document),
            _ => {}
        }
        self.needs_update = true;
        true
    }

    /// Apply one action to the input.
    pub fn apply(&mut self, action: EditAction) {
        let doc = &self.document;
        let view = &mut self.view;
        match action {
            EditAction::WordLeft => view.word_left(doc),
            EditAction::WordRight => view.word_right(doc),
            EditAction::LineStart => view.line_start(doc),
            EditAction::LineEnd => view.line_end(doc),
            EditAction::Left => view.left(doc),
            EditAction::Right => view.right(doc),
            EditAction::Up => view.up(doc),
            EditAction::Down => view.down(doc),
            EditAction::DocumentStart => view.home(doc),
            EditAction::DocumentEnd => view.end(doc),
            EditAction::PageUp => view.page_up(doc),
            EditAction::PageDown => view.page_down(doc),
            EditAction::PopupUp => self.popup.select_previous(),
            EditAction::PopupDown => self.popup.select_next(),
            EditAction::AcceptCompletion => {
                self.fire(Hook::Completion);
                self.popup.hide();
            }
            EditAction::ClosePopup => self.popup.hide(),
            EditAction::Abort => self.fire(Hook::Abort),
            EditAction::KillToEnd => self.kill_to_end(),
            EditAction::KillToStart => self.kill_to_start(),
            EditAction::Yank => self.yank(),
            EditAction::SplitLine => self.split_line(),
            EditAction::DeleteForward => self.delete_forward(),
            EditAction::DeleteBack => self.delete_back(),
            EditAction::Insert(c) => {
                let mut buf = [0; 4];
                self.insert_at_cursor(c.encode_utf8(&mut buf));
            }
        }
        self.needs_update = true;
    }

    // --- Popup ---

    /// Show completion candidates anchored at a document column.
    pub fn open_popup_for_completion(
        &mut self,
        anchor_column: usize,
        candidates: Vec<AttrLine>,
    ) -> bool {
        let opened = self.popup.open_for_completion(
            anchor_column,
            candidates,
            &self.view,
            self.max_popup_height,
        );
        self.needs_update |= opened;
        opened
    }

    /// Show history candidates across the top of the input.
    pub fn open_popup_for_history(&mut self, candidates: Vec<AttrLine>) -> bool {
        let opened = self
            .popup
            .open_for_history(candidates, &self.view, self.max_popup_height);
        self.needs_update |= opened;
        opened
    }

    pub fn close_popup(&mut self) {
        if self.popup.is_visible() {
            self.popup.hide();
            self.needs_update = true;
        }
    }

    // --- Programmatic edits ---

    /// Replace columns `start..end` of the cursor row and leave the
    /// cursor after the new text.
    pub fn replace_columns(&mut self, start: usize, end: usize, text: &str) {
        let row = self.view.cursor().row;
        self.document.erase(row, start, end);
        let (end_row, end_col) = self.document.insert(row, start, text);
        self.view.move_to(end_row, end_col, &self.document);
        self.update_lines();
    }

    /// Replace the whole cursor row.
    pub fn replace_line(&mut self, text: &str) {
        let width = self.document.column_width(self.view.cursor().row);
        self.replace_columns(0, width, text);
    }

    // --- Rendering hooks ---

    /// Whether anything changed since the last [`Self::clear_needs_update`].
    pub const fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub const fn clear_needs_update(&mut self) {
        self.needs_update = false;
    }

    /// Terminal position of the cursor when drawn into `area`.
    pub fn cursor_screen_position(&self, area: Rect) -> Option<Position> {
        let (x, y) = self.view.relative_position()?;
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        if x >= area.width || y >= area.height {
            return None;
        }
        Some(Position::new(area.x + x, area.y + y))
    }

    // --- Edits ---

    fn insert_at_cursor(&mut self, text: &str) {
        let Cursor { row, column: col } = self.view.cursor();
        let (end_row, end_col) = self.document.insert(row, col, text);
        self.view.move_to(end_row, end_col, &self.document);
        self.update_lines();
    }

    fn kill_to_end(&mut self) {
        let Cursor { row, column: col } = self.view.cursor();
        let width = self.document.column_width(row);
        self.clipboard = self.document.erase(row, col, width);
        self.update_lines();
    }

    fn kill_to_start(&mut self) {
        let Cursor { row, column: col } = self.view.cursor();
        self.clipboard = self.document.erase(row, 0, col);
        self.view.move_to(row, 0, &self.document);
        self.update_lines();
    }

    fn yank(&mut self) {
        if self.clipboard.is_empty() {
            return;
        }
        let text = self.clipboard.clone();
        self.insert_at_cursor(&text);
    }

    fn split_line(&mut self) {
        let Cursor { row, column: col } = self.view.cursor();
        self.document.split(row, col);
        self.view.move_to(row + 1, 0, &self.document);
        self.update_lines();
    }

    fn delete_forward(&mut self) {
        let Cursor { row, column: col } = self.view.cursor();
        if col >= self.document.column_width(row) {
            if self.document.join(row) {
                self.update_lines();
            }
            return;
        }
        let text = self.document.line(row).map_or("", AttrLine::text);
        let next = column::next_glyph_column(text, col);
        self.document.erase(row, col, next);
        self.update_lines();
    }

    fn delete_back(&mut self) {
        let Cursor { row, column: col } = self.view.cursor();
        if col > 0 {
            let text = self.document.line(row).map_or("", AttrLine::text);
            let prev = column::prev_glyph_column(text, col);
            self.document.erase(row, prev, col);
            self.view.move_to(row, prev, &self.document);
            self.update_lines();
        } else if row > 0 {
            let end = self.document.column_width(row - 1);
            self.document.join(row - 1);
            self.view.move_to(row - 1, end, &self.document);
            self.update_lines();
        }
    }

    /// Run after every content change.
    fn update_lines(&mut self) {
        self.highlight();
        self.view.ensure_visible(&self.document);
        self.popup.hide();
        self.needs_update = true;
        self.fire(Hook::Change);
    }

    fn highlight(&mut self) {
        let lines = self.document.lines_mut();
        if !highlight::highlight_document(self.format, lines) {
            highlight::apply_highlighters(&self.highlighters, self.format, lines);
        }
    }

    fn hook_mut(&mut self, hook: Hook) -> &mut Option<Callback> {
        match hook {
            Hook::Change => &mut self.on_change,
            Hook::Completion => &mut self.on_completion,
            Hook::Abort => &mut self.on_abort,
        }
    }

    // The handler is taken out while it runs so it can borrow the input
    // mutably; a handler installed during the call replaces it.
    fn fire(&mut self, hook: Hook) {
        let Some(mut callback) = self.hook_mut(hook).take() else {
            return;
        };
        callback(self);
        let slot = self.hook_mut(hook);
        if slot.is_none() {
            *slot = Some(callback);
        }
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("lines", &self.document.line_count())
            .field("cursor", &self.view.cursor())
            .field("viewport", &self.view.viewport())
            .field("popup_visible", &self.popup.is_visible())
            .field("format", &self.format)
            .field("needs_update", &self.needs_update)
            .finish_non_exhaustive()
    }
}
