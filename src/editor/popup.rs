//! Completion and history popup state.
//!
//! The popup only tracks placement and selection. Drawing the list is
//! left to the UI layer, which reads [`Popup::area`], the candidates and
//! the selection.

use super::cursor::CursorView;
use super::line::AttrLine;

/// What the popup was opened for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopupKind {
    #[default]
    Completion,
    History,
}

/// Popup placement relative to the top-left of the text input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopupArea {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Popup {
    visible: bool,
    kind: PopupKind,
    candidates: Vec<AttrLine>,
    selection: usize,
    anchor_column: usize,
    area: PopupArea,
}

impl Popup {
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn kind(&self) -> PopupKind {
        self.kind
    }

    pub fn candidates(&self) -> &[AttrLine] {
        &self.candidates
    }

    pub const fn selection(&self) -> usize {
        self.selection
    }

    /// The selected candidate, if the popup has any.
    pub fn selected(&self) -> Option<&AttrLine> {
        self.candidates.get(self.selection)
    }

    /// Document column the completion was anchored at.
    pub const fn anchor_column(&self) -> usize {
        self.anchor_column
    }

    pub const fn area(&self) -> PopupArea {
        self.area
    }

    /// Open below (or above) the cursor, anchored at a document column.
    ///
    /// Does nothing and returns `false` when there are no candidates or
    /// the window has no room for even one row.
    pub fn open_for_completion(
        &mut self,
        anchor_column: usize,
        candidates: Vec<AttrLine>,
        view: &CursorView,
        max_height: usize,
    ) -> bool {
        if candidates.is_empty() {
            return false;
        }
        let vp = view.viewport();
        let cursor = view.cursor();

        let widest = candidates
            .iter()
            .map(AttrLine::column_width)
            .max()
            .unwrap_or(1);
        let width = (widest + 2).min(vp.width);
        let mut x = anchor_column.saturating_sub(vp.left);
        if x + width > vp.width {
            x = vp.width - width;
        }

        let wanted = max_height.min(candidates.len());
        let cursor_y = cursor.row.saturating_sub(vp.top);
        let below = vp.height.saturating_sub(cursor_y + 1);
        let above = cursor_y;
        let (y, height) = if wanted <= below {
            (cursor_y + 1, wanted)
        } else if wanted <= above {
            (cursor_y - wanted, wanted)
        } else if below >= above {
            (cursor_y + 1, below)
        } else {
            (0, above)
        };
        if height == 0 || width == 0 {
            return false;
        }

        self.show(PopupKind::Completion, candidates, anchor_column);
        self.area = PopupArea {
            x,
            y,
            width,
            height,
        };
        true
    }

    /// Open across the full width, one row below the top of the input.
    pub fn open_for_history(
        &mut self,
        candidates: Vec<AttrLine>,
        view: &CursorView,
        max_height: usize,
    ) -> bool {
        if candidates.is_empty() {
            return false;
        }
        let vp = view.viewport();
        let height = max_height.min(candidates.len());
        self.show(PopupKind::History, candidates, 0);
        self.area = PopupArea {
            x: 0,
            y: 1,
            width: vp.width,
            height,
        };
        true
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Move the selection up, stopping at the first candidate.
    pub fn select_previous(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }

    /// Move the selection down, stopping at the last candidate.
    pub fn select_next(&mut self) {
        if self.selection + 1 < self.candidates.len() {
            self.selection += 1;
        }
    }

    fn show(&mut self, kind: PopupKind, candidates: Vec<AttrLine>, anchor_column: usize) {
        self.visible = true;
        self.kind = kind;
        self.candidates = candidates;
        self.selection = 0;
        self.anchor_column = anchor_column;
    }
}
