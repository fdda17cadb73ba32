//! Reusable UI component helpers

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
};

/// A bordered single-line input box with a trailing cursor when focused
pub fn input_box<'a>(
    title: &'a str,
    value: &'a str,
    focused: bool,
    accent: Color,
    inactive: Color,
    text: Color,
) -> Paragraph<'a> {
    let border = if focused { accent } else { inactive };
    let cursor = if focused { "_" } else { "" };
    let title_style = if focused {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive)
    };

    Paragraph::new(format!("{}{}", value, cursor))
        .style(Style::default().fg(text))
        .block(
            Block::default()
                .title(Span::styled(format!(" {} ", title), title_style))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
