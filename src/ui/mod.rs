// UI rendering module
//
// This module contains all UI rendering components for meshlog.
// The main draw() function orchestrates rendering of all UI panels.

mod banner;
mod detail;
mod dialog;
mod filters;
mod packet_table;
mod status_bar;

use crate::app::{Access, AppState};
use crate::theme::{ALERT_RED, MIST};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use banner::render_banner;
use detail::render_packet_detail;
use dialog::render_dialog;
use filters::render_filter_panel;
use packet_table::render_packet_table;
use status_bar::render_status_bar;

/// Rectangle centered in `area`, sized by percentage with a minimum size
pub fn centered_rect(
    area: Rect,
    percent_x: u16,
    percent_y: u16,
    min_width: u16,
    min_height: u16,
) -> Rect {
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent) / 100) as u16;
    let width = scale(area.width, percent_x).max(min_width).min(area.width);
    let height = scale(area.height, percent_y).max(min_height).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_permission_denied(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Permission denied",
            Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Viewing packets requires read access to channels and messages.",
            Style::default().fg(MIST),
        )),
        Line::from(Span::styled(
            "Press Q to close.",
            Style::default().fg(MIST),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .title(" 📡 Packet Monitor ")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(ALERT_RED)),
    );
    f.render_widget(paragraph, area);
}

/// Main UI drawing function
pub fn draw(f: &mut Frame, app: &mut AppState) {
    let size = f.area();

    if app.access == Access::Denied {
        app.layout = Default::default();
        render_permission_denied(f, size);
        return;
    }

    let filter_height = if app.show_filters { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(filter_height), // Filter panel
            Constraint::Min(0),                // Packet table
            Constraint::Length(3),             // Status bar
        ])
        .split(size);

    render_banner(f, chunks[0], app);
    if app.show_filters {
        render_filter_panel(f, chunks[1], app);
    }
    render_packet_table(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);

    if app.selected.is_some() {
        render_packet_detail(f, size, app);
    } else {
        app.layout.overlay = None;
    }

    if let Some(dialog) = &app.dialog {
        render_dialog(f, size, dialog);
    }
}
