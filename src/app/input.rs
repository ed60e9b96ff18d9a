use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Message, Model};

impl App {
    /// Translate a terminal event into a message.
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key),
            Event::Mouse(mouse) if model.mouse_enabled => {
                Some(Message::Mouse(mouse.kind, mouse.column, mouse.row))
            }
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    /// Application chords first; everything else goes to the text input.
    pub(super) fn handle_key(key: KeyEvent) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => Some(Message::Save),
            KeyCode::Char('q') if ctrl => Some(Message::Quit),
            KeyCode::Char('r') if ctrl => Some(Message::History),
            KeyCode::Char(' ') if ctrl => Some(Message::Complete),
            KeyCode::F(2) => Some(Message::OpenExternalEditor),
            _ => Some(Message::Key(key)),
        }
    }
}
