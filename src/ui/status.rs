use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = model.file_path.file_name().map_or_else(
        || "untitled".to_string(),
        |s| s.to_string_lossy().to_string(),
    );
    let dirty_indicator = if model.is_dirty() { " [modified]" } else { "" };
    let cursor = model.input.cursor();
    let format = format!("{:?}", model.input.format()).to_lowercase();

    let status = format!(
        " {filename}{dirty_indicator}  Ln {}, Col {}  [{format}]  ^S:save  ^Q:quit  ^Space:complete  ^R:history  F2:editor",
        cursor.row + 1,
        cursor.column + 1,
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
