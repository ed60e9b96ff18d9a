use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::{DefaultTerminal, Frame};

use crate::app::{App, Model, update};

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the terminal cannot
    /// be initialized, or reading terminal events fails.
    pub fn run(&mut self) -> Result<()> {
        let content = match std::fs::read_to_string(&self.file_path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read {}", self.file_path.display()));
            }
        };

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; textinput requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(
            self.file_path.clone(),
            &content,
            (size.width, size.height),
            self.format,
        )
        .with_max_popup_height(self.max_popup_height)
        .with_mouse(self.mouse_enabled);

        let result = Self::event_loop(&mut terminal, &mut model);

        if model.mouse_enabled {
            let _ = execute!(stdout(), DisableMouseCapture);
        }
        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        if model.mouse_enabled {
            execute!(stdout(), EnableMouseCapture)?;
        }
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let poll_ms = if needs_render { 0 } else { 250 };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Drain everything queued so key repeat bursts render once.
                loop {
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        tracing::trace!(?msg, "message");
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(terminal, model, &side_msg)?;
                        needs_render = true;
                    }
                    if !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if model.input.needs_update() {
                needs_render = true;
            }
            if needs_render {
                terminal.draw(|frame| Self::view(model, frame))?;
                model.input.clear_needs_update();
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }

    fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}
