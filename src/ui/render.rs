use ratatui::prelude::*;
use ratatui::widgets::{Clear, List, ListItem, ListState, Paragraph};

use crate::app::Model;
use crate::editor::{AttrLine, TextInput, column};

use super::status;

/// The part of the screen given to the text input.
pub const fn input_area(area: Rect) -> Rect {
    Rect {
        height: area.height.saturating_sub(1),
        ..area
    }
}

/// The bottom row, used for the status bar or a toast.
pub const fn status_area(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height.saturating_sub(1),
        height: if area.height > 0 { 1 } else { 0 },
        ..area
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    render_text_input(&model.input, frame, input_area(area));

    let bottom = status_area(area);
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, bottom);
    } else {
        status::render_status_bar(model, frame, bottom);
    }
}

/// Draw the visible window of a text input, its popup and the cursor.
pub fn render_text_input(input: &TextInput, frame: &mut Frame, area: Rect) {
    let vp = input.viewport();
    let doc = input.document();
    let width = vp.width.min(usize::from(area.width));
    let content: Vec<Line> = doc.lines()[vp.visible_rows(doc.line_count())]
        .iter()
        .map(|line| visible_line(line, vp.left, width))
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);
    render_popup(input, frame, area);

    if let Some(position) = input.cursor_screen_position(area) {
        frame.set_cursor_position(position);
    }
}

fn render_popup(input: &TextInput, frame: &mut Frame, area: Rect) {
    let popup = input.popup();
    if !popup.is_visible() {
        return;
    }
    let placement = popup.area();
    let rect = Rect {
        x: area.x.saturating_add(to_u16(placement.x)),
        y: area.y.saturating_add(to_u16(placement.y)),
        width: to_u16(placement.width),
        height: to_u16(placement.height),
    }
    .intersection(area);
    if rect.is_empty() {
        return;
    }

    let inner = usize::from(rect.width).saturating_sub(1);
    let items: Vec<ListItem> = popup
        .candidates()
        .iter()
        .map(|candidate| {
            let mut line = visible_line(candidate, 0, inner);
            line.spans.insert(0, Span::raw(" "));
            ListItem::new(line)
        })
        .collect();
    let list = List::new(items)
        .style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(popup.selection()));

    frame.render_widget(Clear, rect);
    frame.render_stateful_widget(list, rect, &mut state);
}

/// The styled part of a line between columns `left` and `left + width`.
///
/// Glyphs cut by either edge are dropped; zero-width characters follow
/// the glyph they attach to.
fn visible_line(line: &AttrLine, left: usize, width: usize) -> Line<'static> {
    let right = left + width;
    let mut col = 0;
    let mut keep = left == 0;
    let mut spans = Vec::new();
    for (range, style) in line.styled_segments() {
        let mut visible = String::new();
        for ch in line.text()[range].chars() {
            let w = column::char_width(ch);
            if w > 0 {
                keep = col >= left && col + w <= right;
                col += w;
            }
            if keep {
                visible.push(ch);
            }
        }
        if !visible.is_empty() {
            spans.push(Span::styled(visible, style));
        }
        if col >= right {
            break;
        }
    }
    Line::from(spans)
}

fn to_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
