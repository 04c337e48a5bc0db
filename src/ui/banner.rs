// Banner rendering module
//
// Renders the header line with the monitor title and log counters.

use crate::app::config::{encrypted_filter_label, port_filter_label};
use crate::app::AppState;
use crate::theme::{AMBER, MIST, SIGNAL_BLUE};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Counter text shown next to the title
pub fn stats_text(app: &AppState) -> String {
    let mut text = format!("{} shown | {} logged", app.visible_count(), app.total);
    if app.max_count > 0 {
        text.push_str(&format!(" | max {}", app.max_count));
    }
    text
}

/// Active server-side filters, if any
pub fn filter_summary(app: &AppState) -> Option<String> {
    if app.filters.is_empty() {
        return None;
    }
    let mut parts = Vec::new();
    if app.filters.portnum.is_some() {
        parts.push(port_filter_label(app.filters.portnum));
    }
    if app.filters.encrypted.is_some() {
        parts.push(encrypted_filter_label(app.filters.encrypted).to_string());
    }
    Some(parts.join(", "))
}

pub fn render_banner(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = vec![
        Span::styled(
            " 📡 Packet Monitor ",
            Style::default().fg(SIGNAL_BLUE).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  ", Style::default()),
    ];

    if !app.loading {
        spans.push(Span::styled(stats_text(app), Style::default().fg(MIST)));
    }

    if let Some(summary) = filter_summary(app) {
        spans.push(Span::styled(
            format!("  [{}]", summary),
            Style::default().fg(Color::Cyan),
        ));
    }

    if app.hide_own {
        if let Some(own) = app.own_node_id() {
            spans.push(Span::styled(
                format!("  (hiding {})", own),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    if app.fetch_failed {
        spans.push(Span::styled(
            "  ⚠ refresh failed, showing last data",
            Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
        ));
    }

    let banner = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(SIGNAL_BLUE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(banner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{packet, page, FakeSource};
    use crate::app::{HostCallbacks, ViewerConfig};

    #[test]
    fn test_stats_text_counts() {
        let (source, handle) = FakeSource::granted(false);
        handle.push_page(page(vec![packet(1, 1), packet(2, 2)], 57, 1000));
        let mut app = AppState::new(
            Box::new(source),
            ViewerConfig::default(),
            HostCallbacks::default(),
        );
        app.activate();
        assert_eq!(stats_text(&app), "2 shown | 57 logged | max 1000");
    }

    #[test]
    fn test_stats_text_without_retention_limit() {
        let (source, handle) = FakeSource::granted(false);
        handle.push_page(page(vec![], 0, 0));
        let mut app = AppState::new(
            Box::new(source),
            ViewerConfig::default(),
            HostCallbacks::default(),
        );
        app.activate();
        assert_eq!(stats_text(&app), "0 shown | 0 logged");
    }

    #[test]
    fn test_filter_summary() {
        let (source, _handle) = FakeSource::granted(false);
        let mut app = AppState::new(
            Box::new(source),
            ViewerConfig::default(),
            HostCallbacks::default(),
        );
        app.activate();
        assert_eq!(filter_summary(&app), None);

        app.cycle_port_filter();
        app.cycle_encrypted_filter();
        assert_eq!(
            filter_summary(&app).as_deref(),
            Some("Text Message, Encrypted only")
        );
    }
}
