use std::cell::Cell;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::layout::Rect;

use crate::editor::{AttrLine, PopupKind, TextInput, column};
use crate::highlight::TextFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Flags the input callbacks raise for the application to pick up.
#[derive(Debug, Default)]
struct InputFlags {
    dirty: Cell<bool>,
    aborted: Cell<bool>,
}

/// The complete application state.
#[derive(Debug)]
pub struct Model {
    pub input: TextInput,
    pub file_path: PathBuf,
    pub terminal_size: (u16, u16),
    pub mouse_enabled: bool,
    pub should_quit: bool,
    pub(super) quit_armed: bool,
    flags: Rc<InputFlags>,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model editing `content`, sized for the terminal.
    pub fn new(
        file_path: PathBuf,
        content: &str,
        terminal_size: (u16, u16),
        format: TextFormat,
    ) -> Self {
        let input_area = crate::ui::input_area(terminal_area(terminal_size));
        let mut input = TextInput::new(usize::from(input_area.width), usize::from(input_area.height))
            .with_format(format);
        input.set_content(content);

        let flags = Rc::new(InputFlags::default());
        let on_change = Rc::clone(&flags);
        input.set_on_change(move |_| on_change.dirty.set(true));
        let on_abort = Rc::clone(&flags);
        input.set_on_abort(move |_| on_abort.aborted.set(true));
        input.set_on_completion(accept_candidate);

        Self {
            input,
            file_path,
            terminal_size,
            mouse_enabled: true,
            should_quit: false,
            quit_armed: false,
            flags,
            toast: None,
        }
    }

    #[must_use]
    pub fn with_max_popup_height(mut self, height: usize) -> Self {
        self.input = self.input.with_max_popup_height(height);
        self
    }

    #[must_use]
    pub const fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    pub const fn screen_area(&self) -> Rect {
        terminal_area(self.terminal_size)
    }

    /// Whether the buffer changed since it was loaded or saved.
    pub fn is_dirty(&self) -> bool {
        self.flags.dirty.get()
    }

    pub(super) fn take_abort(&self) -> bool {
        self.flags.aborted.replace(false)
    }

    pub fn save(&mut self) -> Result<()> {
        std::fs::write(&self.file_path, self.input.content())
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        self.flags.dirty.set(false);
        tracing::info!(path = %self.file_path.display(), "saved");
        Ok(())
    }

    pub fn reload_from_disk(&mut self) -> Result<()> {
        let content = std::fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        self.input.set_content(&content);
        self.flags.dirty.set(false);
        Ok(())
    }

    /// Words in the document that extend the word before the cursor.
    ///
    /// Returns the column the word starts at along with the candidates.
    pub fn completion_candidates(&self) -> (usize, Vec<AttrLine>) {
        let (start, prefix) = self.input.word_before_cursor();
        let words: BTreeSet<&str> = self
            .input
            .document()
            .lines()
            .iter()
            .flat_map(|line| line.text().split(|c: char| !column::is_word_char(c)))
            .filter(|word| word.len() > prefix.len() && word.starts_with(prefix))
            .collect();
        (start, words.into_iter().map(AttrLine::from).collect())
    }

    /// Distinct non-empty lines other than the cursor row, nearest first.
    pub fn history_candidates(&self) -> Vec<AttrLine> {
        let row = self.input.cursor().row;
        let mut seen = BTreeSet::new();
        let lines = self.input.document().lines();
        let above = lines[..row].iter().rev();
        let below = lines[row + 1..].iter();
        above
            .chain(below)
            .map(AttrLine::text)
            .filter(|text| !text.trim().is_empty() && seen.insert(*text))
            .map(AttrLine::from)
            .collect()
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(PathBuf::new(), "", (80, 24), TextFormat::Plain)
    }
}

const fn terminal_area((width, height): (u16, u16)) -> Rect {
    Rect {
        x: 0,
        y: 0,
        width,
        height,
    }
}

/// Completion replaces the word being typed; history replaces the row.
fn accept_candidate(input: &mut TextInput) {
    let Some(choice) = input.popup().selected().map(|line| line.text().to_string()) else {
        return;
    };
    match input.popup().kind() {
        PopupKind::Completion => {
            let start = input.popup().anchor_column();
            let end = input.cursor().column;
            input.replace_columns(start, end, &choice);
        }
        PopupKind::History => input.replace_line(&choice),
    }
}
