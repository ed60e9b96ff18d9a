use crossterm::event::{KeyEvent, MouseEventKind};
use ratatui::layout::Position;

use crate::app::{Model, ToastLevel};

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Key chord for the text input
    Key(KeyEvent),
    /// Mouse event at an absolute terminal cell
    Mouse(MouseEventKind, u16, u16),
    /// Terminal resized
    Resize(u16, u16),

    /// Open word completion at the cursor
    Complete,
    /// Open line history
    History,

    /// Write the buffer to disk
    Save,
    /// Save, then edit the file in the external editor
    OpenExternalEditor,
    /// Quit, asking once when there are unsaved changes
    Quit,
}

/// Apply a message to the model.
///
/// Saving and the external editor need I/O and are carried out by the
/// side-effect pass after this returns.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Key(key) => {
            let handled = model.input.handle_key(&key);
            if model.take_abort() {
                request_quit(&mut model);
            } else if handled {
                model.quit_armed = false;
            }
        }
        Message::Mouse(kind, column, row) => {
            let area = crate::ui::input_area(model.screen_area());
            if model.mouse_enabled && area.contains(Position::new(column, row)) {
                let x = usize::from(column - area.x);
                let y = usize::from(row - area.y);
                model.input.handle_mouse(kind, x, y);
            }
        }
        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            let area = crate::ui::input_area(model.screen_area());
            model
                .input
                .resize(usize::from(area.width), usize::from(area.height));
        }
        Message::Complete => {
            let (start, candidates) = model.completion_candidates();
            if !model.input.open_popup_for_completion(start, candidates) {
                model.show_toast(ToastLevel::Info, "No completions");
            }
        }
        Message::History => {
            let candidates = model.history_candidates();
            if !model.input.open_popup_for_history(candidates) {
                model.show_toast(ToastLevel::Info, "No history");
            }
        }
        Message::Quit => request_quit(&mut model),
        Message::Save | Message::OpenExternalEditor => {}
    }
    model
}

fn request_quit(model: &mut Model) {
    if model.is_dirty() && !model.quit_armed {
        model.quit_armed = true;
        model.show_toast(
            ToastLevel::Warning,
            "Unsaved changes; quit again to discard them",
        );
    } else {
        model.should_quit = true;
    }
}
