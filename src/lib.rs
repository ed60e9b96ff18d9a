// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditAction)
    clippy::module_name_repetitions
)]

//! # textinput
//!
//! A multi-line terminal text input widget.
//!
//! The widget provides:
//! - Emacs-style editing keys with a kill/yank clipboard
//! - Syntax highlighting through syntect, plus regex highlighters
//! - A completion/history popup placed around the cursor
//! - Hand-off to an external editor and back
//!
//! ## Architecture
//!
//! The widget ([`editor::TextInput`]) owns a document of styled lines and
//! a cursor/viewport pair; it knows nothing about the terminal. The demo
//! application wraps it using The Elm Architecture (TEA):
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: State transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`editor`]: Document, cursor, keymap, popup and the widget itself
//! - [`highlight`]: Syntax and regex highlighting
//! - [`external_editor`]: Editor detection and launching
//! - [`config`]: Saved flags and the editor list
//! - [`ui`]: Rendering with ratatui
//! - [`app`]: Demo application loop and state

pub mod app;
pub mod config;
pub mod editor;
pub mod external_editor;
pub mod highlight;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::{AttrLine, Cursor, EditAction, TextInput};
    pub use crate::highlight::{Highlighter, TextFormat};
}
