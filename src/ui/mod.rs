mod components;

use std::sync::OnceLock;
use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{App, Popup, Section};
use crate::flash::BannerKind;
use crate::theme::{self, Theme};

use components::{centered_rect, input_box};

// Load theme colors once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn info() -> Color { theme().info }
fn success() -> Color { theme().success }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg() -> Color { theme().bg }
fn bg_selected() -> Color { theme().bg_selected }
fn inactive() -> Color { theme().inactive }
fn header() -> Color { theme().header }

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Banners stack above the form; the area collapses when none are up
    let banner_height = app.flashes.len().min(4) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(1),             // Info line
            Constraint::Length(banner_height), // Flash banners
            Constraint::Length(3),             // Line-item form
            Constraint::Min(4),                // Drafted line items
            Constraint::Length(1),             // Footer
        ])
        .split(area);

    draw_info_line(f, app, chunks[0]);
    draw_banners(f, app, chunks[1]);
    draw_form(f, app, chunks[2]);
    draw_drafts_box(f, app, chunks[3]);
    draw_footer(f, app, chunks[4]);

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Help => draw_help_popup(f),
    }
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if app.drafts.is_empty() {
        Line::from(Span::styled("Ready", Style::default().fg(text_dim())))
    } else {
        let plural = if app.drafts.len() == 1 { "" } else { "s" };
        Line::from(Span::styled(
            format!("{} line item{} drafted", app.drafts.len(), plural),
            Style::default().fg(text_dim()),
        ))
    };

    let info_line = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info_line, area);
}

fn banner_color(kind: BannerKind) -> Color {
    match kind {
        BannerKind::Info => info(),
        BannerKind::Success => success(),
        BannerKind::Error => danger(),
    }
}

fn draw_banners(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }

    let now = Instant::now();
    let lines: Vec<Line> = app
        .flashes
        .iter()
        .take(area.height as usize)
        .map(|banner| {
            // Fade progress pushes the banner's color toward the background
            let color = theme::fade(banner_color(banner.kind), bg(), banner.fade_progress(now));
            let icon = match banner.kind {
                BannerKind::Info => "󰋽",
                BannerKind::Success => "󰄬",
                BannerKind::Error => "󰅖",
            };
            Line::from(vec![
                Span::styled(format!(" {} ", icon), Style::default().fg(color)),
                Span::styled(banner.message.as_str(), Style::default().fg(color)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_form(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Description
            Constraint::Percentage(15), // Quantity
            Constraint::Percentage(20), // Amount
            Constraint::Percentage(25), // Add button
        ])
        .split(area);

    let inputs = [
        (Section::Description, "Description", chunks[0]),
        (Section::Quantity, "Qty", chunks[1]),
        (Section::Amount, "Amount", chunks[2]),
    ];

    for (section, title, rect) in inputs {
        let name = section.field_name().unwrap_or_default();
        let value = app.form.value_of(name).unwrap_or_default();
        let widget = input_box(
            title,
            value,
            app.section == section,
            accent(),
            inactive(),
            text(),
        );
        f.render_widget(widget, rect);
    }

    // Add button
    let is_active = app.section == Section::AddButton;
    let border_color = if is_active { accent() } else { inactive() };
    let label_style = if is_active {
        Style::default()
            .fg(success())
            .bg(bg_selected())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(text_dim())
    };

    let button = Paragraph::new(Line::from(Span::styled(" Add line item ", label_style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );
    f.render_widget(button, chunks[3]);
}

fn draw_drafts_box(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Drafted items ", Style::default().fg(header())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let rows: Vec<Row> = if app.drafts.is_empty() {
        vec![Row::new(vec![Span::styled(
            "  Nothing yet. Fill the form and press Add",
            Style::default().fg(text_dim()),
        )])]
    } else {
        app.drafts
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let description = if item.description.is_empty() {
                    Span::styled("(blank)", Style::default().fg(text_dim()))
                } else {
                    Span::styled(item.description.as_str(), Style::default().fg(text()))
                };
                Row::new(vec![
                    Span::styled(format!("{}", i + 1), Style::default().fg(text_dim())),
                    description,
                    Span::styled(item.quantity.as_str(), Style::default().fg(text())),
                    Span::styled(item.amount.as_str(), Style::default().fg(success())),
                ])
            })
            .collect()
    };

    let header_row = Row::new(vec![
        Span::styled("#", Style::default().fg(header())),
        Span::styled("Description", Style::default().fg(header())),
        Span::styled("Qty", Style::default().fg(header())),
        Span::styled("Amount", Style::default().fg(header())),
    ]);

    let widths = vec![
        Constraint::Length(4),
        Constraint::Percentage(55),
        Constraint::Percentage(15),
        Constraint::Percentage(25),
    ];

    let table = Table::new(rows, widths)
        .header(header_row.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut hints: Vec<(&str, &str)> = match app.section {
        Section::AddButton => vec![
            ("Enter", "Add"),
            ("Space", "Add"),
            ("Tab", "Next"),
            ("F1", "Help"),
        ],
        _ => vec![
            ("Tab", "Next"),
            ("Enter", "Next"),
            ("Backspace", "Erase"),
            ("F1", "Help"),
        ],
    };

    if app.flashes.is_empty() {
        hints.push(("Esc", "Quit"));
    } else {
        hints.push(("Esc", "Dismiss"));
    }

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 { 3 } else { hints.len() };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 30 { 90 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled(
            "═══ Form ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  Tab       ", Style::default().fg(accent())),
            Span::raw("Move between fields and the Add button"),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", Style::default().fg(accent())),
            Span::raw("Next field, or Add when the button has focus"),
        ]),
        Line::from(vec![
            Span::styled("  Space     ", Style::default().fg(accent())),
            Span::raw("Add (when the button has focus)"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Banners ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  Esc       ", Style::default().fg(accent())),
            Span::raw("Dismiss the oldest banner (quit once none are left)"),
        ]),
        Line::from(vec![Span::raw(
            "            Banners dismiss themselves after a few seconds",
        )]),
        Line::from(""),
        Line::from(Span::styled(
            "═══ Config ═══",
            Style::default().fg(header()).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("  ~/.config/linepad/config.toml   ", Style::default().fg(text_dim())),
        ]),
        Line::from(vec![Span::raw(
            "  dismiss_strategy = \"fade\" or \"clear\"",
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("F1", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" 󰋖 linepad Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
}
