//! Key chord interpretation.
//!
//! [`action_for_key`] is a pure mapping from a key chord and the popup
//! visibility to an [`EditAction`]. It knows nothing about the document
//! or the screen, so bindings can be tested on their own.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Everything a key press can ask the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    // Navigation
    /// Start of the previous word on the row
    WordLeft,
    /// Start of the next word on the row
    WordRight,
    /// Column 0 of the current row
    LineStart,
    /// End of the current row
    LineEnd,
    Left,
    Right,
    Up,
    Down,
    /// First row, first column
    DocumentStart,
    /// Last row, first column
    DocumentEnd,
    PageUp,
    PageDown,

    // Popup
    /// Move the popup selection up
    PopupUp,
    /// Move the popup selection down
    PopupDown,
    /// Fire the completion callback and close the popup
    AcceptCompletion,
    /// Close the popup without accepting
    ClosePopup,
    /// Fire the abort callback
    Abort,

    // Editing
    /// Cut from the cursor to the end of the row into the clipboard
    KillToEnd,
    /// Cut from the start of the row to the cursor into the clipboard
    KillToStart,
    /// Insert the clipboard at the cursor
    Yank,
    /// Split the row at the cursor (Enter)
    SplitLine,
    /// Delete the glyph under the cursor, or join the next row
    DeleteForward,
    /// Delete the glyph before the cursor, or join onto the previous row
    DeleteBack,
    /// Insert a printable character
    Insert(char),
}

impl EditAction {
    /// Whether the action can change document content.
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::KillToEnd
                | Self::KillToStart
                | Self::Yank
                | Self::SplitLine
                | Self::DeleteForward
                | Self::DeleteBack
                | Self::Insert(_)
        )
    }
}

/// Map a key chord to an action.
///
/// Alt chords are checked first, then control chords, then named keys;
/// anything else with a character is inserted. Returns `None` for chords
/// the editor does not handle so the caller can apply its own default.
pub fn action_for_key(key: &KeyEvent, popup_visible: bool) -> Option<EditAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Left | KeyCode::Char('b' | 'B') => Some(EditAction::WordLeft),
            KeyCode::Right | KeyCode::Char('f' | 'F') => Some(EditAction::WordRight),
            _ => None,
        };
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('a' | 'A') => Some(EditAction::LineStart),
            KeyCode::Char('b' | 'B') => Some(EditAction::Left),
            KeyCode::Char('e' | 'E') => Some(EditAction::LineEnd),
            KeyCode::Char('f' | 'F') => Some(EditAction::Right),
            KeyCode::Char('k' | 'K') => Some(EditAction::KillToEnd),
            KeyCode::Char('u' | 'U') => Some(EditAction::KillToStart),
            KeyCode::Char('y' | 'Y') => Some(EditAction::Yank),
            KeyCode::Char(']') => Some(escape(popup_visible)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Esc => Some(escape(popup_visible)),
        KeyCode::Enter if popup_visible => Some(EditAction::AcceptCompletion),
        KeyCode::Enter => Some(EditAction::SplitLine),
        KeyCode::Tab if popup_visible => Some(EditAction::AcceptCompletion),
        KeyCode::Home => Some(EditAction::DocumentStart),
        KeyCode::End => Some(EditAction::DocumentEnd),
        KeyCode::PageUp => Some(EditAction::PageUp),
        KeyCode::PageDown => Some(EditAction::PageDown),
        KeyCode::Delete => Some(EditAction::DeleteForward),
        KeyCode::Backspace => Some(EditAction::DeleteBack),
        KeyCode::Up if popup_visible => Some(EditAction::PopupUp),
        KeyCode::Up => Some(EditAction::Up),
        KeyCode::Down if popup_visible => Some(EditAction::PopupDown),
        KeyCode::Down => Some(EditAction::Down),
        KeyCode::Left => Some(EditAction::Left),
        KeyCode::Right => Some(EditAction::Right),
        KeyCode::Char(c) if !c.is_control() => Some(EditAction::Insert(c)),
        _ => None,
    }
}

const fn escape(popup_visible: bool) -> EditAction {
    if popup_visible {
        EditAction::ClosePopup
    } else {
        EditAction::Abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn alt(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::ALT)
    }

    #[test]
    fn test_plain_char_inserts() {
        assert_eq!(
            action_for_key(&key(KeyCode::Char('x')), false),
            Some(EditAction::Insert('x'))
        );
    }

    #[test]
    fn test_shifted_char_inserts() {
        let shifted = KeyEvent::new(KeyCode::Char('X'), KeyModifiers::SHIFT);
        assert_eq!(action_for_key(&shifted, false), Some(EditAction::Insert('X')));
    }

    #[test]
    fn test_release_events_are_ignored() {
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        assert_eq!(action_for_key(&release, false), None);
    }

    #[test]
    fn test_alt_arrows_move_by_word() {
        assert_eq!(action_for_key(&alt(KeyCode::Left), false), Some(EditAction::WordLeft));
        assert_eq!(action_for_key(&alt(KeyCode::Right), false), Some(EditAction::WordRight));
        assert_eq!(action_for_key(&alt(KeyCode::Char('f')), false), Some(EditAction::WordRight));
    }

    #[test]
    fn test_alt_takes_precedence_over_control() {
        let both = KeyEvent::new(KeyCode::Left, KeyModifiers::ALT | KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&both, false), Some(EditAction::WordLeft));
    }

    #[test]
    fn test_unknown_alt_chord_is_not_handled() {
        assert_eq!(action_for_key(&alt(KeyCode::Char('x')), false), None);
    }

    #[test]
    fn test_emacs_control_chords() {
        assert_eq!(action_for_key(&ctrl('a'), false), Some(EditAction::LineStart));
        assert_eq!(action_for_key(&ctrl('E'), false), Some(EditAction::LineEnd));
        assert_eq!(action_for_key(&ctrl('b'), false), Some(EditAction::Left));
        assert_eq!(action_for_key(&ctrl('f'), false), Some(EditAction::Right));
        assert_eq!(action_for_key(&ctrl('k'), false), Some(EditAction::KillToEnd));
        assert_eq!(action_for_key(&ctrl('u'), false), Some(EditAction::KillToStart));
        assert_eq!(action_for_key(&ctrl('y'), false), Some(EditAction::Yank));
    }

    #[test]
    fn test_unknown_control_chord_is_not_handled() {
        assert_eq!(action_for_key(&ctrl('z'), false), None);
        let ctrl_left = KeyEvent::new(KeyCode::Left, KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&ctrl_left, false), None);
    }

    #[test]
    fn test_escape_depends_on_popup() {
        assert_eq!(action_for_key(&key(KeyCode::Esc), false), Some(EditAction::Abort));
        assert_eq!(action_for_key(&key(KeyCode::Esc), true), Some(EditAction::ClosePopup));
        assert_eq!(action_for_key(&ctrl(']'), true), Some(EditAction::ClosePopup));
    }

    #[test]
    fn test_enter_and_tab_accept_when_popup_visible() {
        assert_eq!(action_for_key(&key(KeyCode::Enter), false), Some(EditAction::SplitLine));
        assert_eq!(
            action_for_key(&key(KeyCode::Enter), true),
            Some(EditAction::AcceptCompletion)
        );
        assert_eq!(
            action_for_key(&key(KeyCode::Tab), true),
            Some(EditAction::AcceptCompletion)
        );
    }

    #[test]
    fn test_tab_without_popup_is_not_handled() {
        assert_eq!(action_for_key(&key(KeyCode::Tab), false), None);
    }

    #[test]
    fn test_up_down_route_to_popup() {
        assert_eq!(action_for_key(&key(KeyCode::Up), true), Some(EditAction::PopupUp));
        assert_eq!(action_for_key(&key(KeyCode::Down), true), Some(EditAction::PopupDown));
        assert_eq!(action_for_key(&key(KeyCode::Up), false), Some(EditAction::Up));
        assert_eq!(action_for_key(&key(KeyCode::Down), false), Some(EditAction::Down));
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(action_for_key(&key(KeyCode::Home), false), Some(EditAction::DocumentStart));
        assert_eq!(action_for_key(&key(KeyCode::End), false), Some(EditAction::DocumentEnd));
        assert_eq!(action_for_key(&key(KeyCode::PageUp), false), Some(EditAction::PageUp));
        assert_eq!(action_for_key(&key(KeyCode::PageDown), false), Some(EditAction::PageDown));
        assert_eq!(action_for_key(&key(KeyCode::Delete), false), Some(EditAction::DeleteForward));
        assert_eq!(action_for_key(&key(KeyCode::Backspace), false), Some(EditAction::DeleteBack));
    }

    #[test]
    fn test_function_keys_are_not_handled() {
        assert_eq!(action_for_key(&key(KeyCode::F(2)), false), None);
    }

    #[test]
    fn test_mutation_classification() {
        assert!(EditAction::Insert('a').is_mutation());
        assert!(EditAction::Yank.is_mutation());
        assert!(!EditAction::PageDown.is_mutation());
        assert!(!EditAction::AcceptCompletion.is_mutation());
    }
}
