use std::io::stdout;

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, ToastLevel};
use crate::external_editor;

impl App {
    /// Carry out the I/O a message asks for.
    ///
    /// Only failing to get the terminal back is returned as an error;
    /// everything else is reported on the status line.
    pub(super) fn handle_message_side_effects(
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        msg: &Message,
    ) -> Result<()> {
        match msg {
            Message::Save => match model.save() {
                Ok(()) => model.show_toast(ToastLevel::Info, "Saved"),
                Err(err) => model.show_toast(ToastLevel::Error, format!("Save failed: {err}")),
            },
            Message::OpenExternalEditor => Self::edit_externally(terminal, model)?,
            _ => {}
        }
        Ok(())
    }

    fn edit_externally(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        if let Err(err) = model.save() {
            model.show_toast(ToastLevel::Error, format!("Save failed: {err}"));
            return Ok(());
        }

        suspend_terminal(model.mouse_enabled);
        let outcome = external_editor::open(&model.file_path);
        resume_terminal(terminal, model.mouse_enabled)?;

        match outcome {
            Ok(()) => match model.reload_from_disk() {
                Ok(()) => model.show_toast(ToastLevel::Info, "Reloaded after external edit"),
                Err(err) => {
                    model.show_toast(ToastLevel::Error, format!("Reload failed: {err}"));
                }
            },
            Err(err) => {
                tracing::warn!(%err, "external editor failed");
                model.show_toast(ToastLevel::Error, err.to_string());
            }
        }
        Ok(())
    }
}

fn suspend_terminal(mouse_enabled: bool) {
    if mouse_enabled {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
    ratatui::restore();
}

fn resume_terminal(terminal: &mut DefaultTerminal, mouse_enabled: bool) -> Result<()> {
    *terminal = ratatui::try_init().context("Failed to restore the terminal after editing")?;
    if mouse_enabled {
        execute!(stdout(), EnableMouseCapture)?;
    }
    terminal.clear()?;
    Ok(())
}
