// Filter panel rendering module
//
// Shows the active server-side filters and the keys that change them.

use crate::app::config::{encrypted_filter_label, port_filter_label};
use crate::app::AppState;
use crate::theme::{MIST, SIGNAL_BLUE};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

fn filter_spans(
    key: &'static str,
    label: &'static str,
    value: String,
    active: bool,
) -> Vec<Span<'static>> {
    let value_style = if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(MIST)
    };
    vec![
        Span::styled(key, Style::default().fg(SIGNAL_BLUE).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}: ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, value_style),
        Span::raw("   "),
    ]
}

pub fn render_filter_panel(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = vec![Span::raw(" ")];
    spans.extend(filter_spans(
        "t",
        "Type",
        port_filter_label(app.filters.portnum),
        app.filters.portnum.is_some(),
    ));
    spans.extend(filter_spans(
        "e",
        "Encryption",
        encrypted_filter_label(app.filters.encrypted).to_string(),
        app.filters.encrypted.is_some(),
    ));
    spans.push(Span::styled(
        "c",
        Style::default().fg(SIGNAL_BLUE).add_modifier(Modifier::BOLD),
    ));
    spans.push(Span::styled(" Clear filters", Style::default().fg(Color::DarkGray)));

    let panel = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(Span::styled(
                " Filters ",
                Style::default().fg(SIGNAL_BLUE).add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(SIGNAL_BLUE)),
    );

    f.render_widget(panel, area);
}
