#![cfg(not(coverage))]

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::explorer::Explorer;
use crate::tui_state::TuiUiState;
use crate::view::{HOW_TO_LINES, END_CONTAINER_HINT, END_HINT, END_TRIGGER_HINT};

const ELLIPSIS: &str = "…";
pub(crate) const RESERVED_ROWS: usize = 5;

pub(crate) fn content_rows(frame_height: u16, ui: &TuiUiState) -> usize {
    let help_rows = if ui.help_visible { HOW_TO_LINES.len() } else { 0 };
    (frame_height as usize)
        .saturating_sub(RESERVED_ROWS + help_rows)
        .max(1)
}

pub(crate) fn wrapped_view_lines(explorer: &Explorer<'_>, width: usize) -> Vec<String> {
    explorer
        .view()
        .lines()
        .iter()
        .flat_map(|line| wrap_line_to_width(line, width))
        .collect()
}

pub(crate) fn render_tui(frame: &mut Frame<'_>, ui: &TuiUiState, explorer: &Explorer<'_>) {
    let content_width = (frame.area().width as usize).saturating_sub(1).max(16);
    let view = explorer.view();

    let header_text = truncate_to_width(
        &format!(
            "{} | node {} | depth {} | audio {}",
            view.conversation,
            view.node_id,
            explorer.depth(),
            if explorer.audio_enabled() { "on" } else { "off" }
        ),
        content_width,
    );
    let status_text = truncate_to_width(&format!("status: {}", ui.status), content_width);

    let rows = wrapped_view_lines(explorer, content_width);
    let visible = content_rows(frame.area().height, ui);
    let start = ui.scroll_offset.min(rows.len().saturating_sub(1));
    let end = (start + visible).min(rows.len());

    let mut lines_out: Vec<Line<'_>> = Vec::new();
    lines_out.push(Line::from(header_text));
    lines_out.push(Line::from(Span::styled(
        status_text,
        Style::default().fg(Color::Gray),
    )));
    for row in &rows[start..end] {
        lines_out.push(style_row(row));
    }
    for _ in (end - start)..visible {
        lines_out.push(Line::from(""));
    }
    lines_out.push(Line::from(Span::styled(
        "─".repeat(content_width),
        Style::default().fg(Color::Gray),
    )));
    let prompt = match explorer.pending() {
        Some(number) => format!("> {}", number),
        None => "> ".to_string(),
    };
    lines_out.push(Line::from(Span::styled(
        prompt,
        Style::default().fg(Color::Green),
    )));
    lines_out.push(Line::from(Span::styled(
        truncate_to_width(
            "keys: 0-9 pick | enter commit | backspace rewind | space audio | up/down scroll | h help | esc quit",
            content_width,
        ),
        Style::default().fg(Color::Yellow),
    )));
    if ui.help_visible {
        for line in HOW_TO_LINES {
            lines_out.push(Line::from(Span::styled(
                truncate_to_width(line, content_width),
                Style::default().fg(Color::Magenta),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines_out), frame.area());
}

fn style_row(row: &str) -> Line<'static> {
    let style = if row.starts_with("[ node-") {
        Style::default().fg(Color::Cyan)
    } else if row.starts_with('(') && row.contains(") [") {
        Style::default().fg(Color::Gray)
    } else if row.starts_with("  ") {
        Style::default().fg(Color::DarkGray)
    } else if row == END_HINT || row == END_TRIGGER_HINT || row == END_CONTAINER_HINT {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(row.to_string(), style))
}

fn truncate_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.len() <= width {
        return value.to_string();
    }
    if width == 1 {
        return ELLIPSIS.to_string();
    }
    let mut out = chars.into_iter().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

fn wrap_line_to_width(value: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let chars = value.chars().collect::<Vec<_>>();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
