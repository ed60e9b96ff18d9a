//! Multi-line text editing engine.
//!
//! [`TextInput`] ties together a [`Document`] of attributed lines, a
//! cursor and viewport, and a completion/history [`Popup`]. Positions
//! are display columns throughout; [`column`] converts them to byte
//! offsets.

pub mod column;
mod cursor;
mod document;
mod keymap;
mod line;
mod popup;
mod widget;

pub use cursor::{Cursor, CursorView, Viewport};
pub use document::Document;
pub use keymap::{EditAction, action_for_key};
pub use line::{AttrLine, StyledSpan};
pub use popup::{Popup, PopupArea, PopupKind};
pub use widget::{Callback, TextInput};
