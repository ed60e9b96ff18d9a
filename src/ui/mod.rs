//! Terminal UI components.
//!
//! [`render_text_input`] draws any [`crate::editor::TextInput`] into a
//! frame area; [`render`] lays out the demo application around it.

mod render;
mod status;

pub use render::{input_area, render, render_text_input, status_area};
