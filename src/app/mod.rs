//! Demo application: edit one file in a full-screen text input.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::config::DEFAULT_MAX_POPUP_HEIGHT;
use crate::highlight::TextFormat;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    format: TextFormat,
    max_popup_height: usize,
    mouse_enabled: bool,
}

impl App {
    /// Create a new application for the given file.
    ///
    /// The format is guessed from the file extension.
    pub fn new(file_path: PathBuf) -> Self {
        let format = TextFormat::from_path(&file_path);
        Self {
            file_path,
            format,
            max_popup_height: DEFAULT_MAX_POPUP_HEIGHT,
            mouse_enabled: true,
        }
    }

    /// Override the highlighting format.
    pub const fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }

    pub const fn with_max_popup_height(mut self, height: usize) -> Self {
        self.max_popup_height = height;
        self
    }

    /// Enable or disable mouse capture.
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }
}
