// Packet detail overlay
//
// Renders the drill-down for the selected packet over the table. Full long
// names, raw counters, payload and metadata are shown here since table
// cells truncate them.

use super::centered_rect;
use crate::app::AppState;
use crate::format::{self, DisplaySettings, PayloadDisplay};
use crate::net::PacketRecord;
use crate::theme::{port_color, AMBER, MIST, SIGNAL_BLUE};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

// ============================================================================
// Packet Detail View Model
// ============================================================================

/// Everything the overlay shows, extracted from one packet
#[derive(Debug, Clone)]
pub struct PacketDetailView {
    pub title: String,
    /// Label, value, value color
    pub fields: Vec<(&'static str, String, Color)>,
    pub payload: PayloadDisplay,
    pub metadata: Option<String>,
}

fn node_text(long_name: Option<&str>, node_id: Option<String>) -> String {
    match (long_name.filter(|n| !n.is_empty()), node_id) {
        (Some(name), Some(id)) => format!("{} ({})", name, id),
        (Some(name), None) => name.to_string(),
        (None, Some(id)) => id,
        (None, None) => format::NOT_APPLICABLE.to_string(),
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| format::NOT_APPLICABLE.to_string())
}

/// Build the overlay content for a packet
pub fn build_packet_detail(packet: &PacketRecord, display: &DisplaySettings) -> PacketDetailView {
    let time = match format::packet_local_time(packet) {
        Some(dt) => format!(
            "{} (+{:03} ms)",
            format::format_date_time(&dt, display),
            format::packet_millis(packet)
        ),
        None => format::NOT_APPLICABLE.to_string(),
    };

    let to = if packet.is_broadcast() {
        "Broadcast".to_string()
    } else {
        node_text(
            packet.to_node_long_name.as_deref(),
            format::destination_node_id(packet),
        )
    };

    let hops = match format::hop_count(packet) {
        Some(hops) => format!(
            "{} (start {}, limit {})",
            hops,
            or_dash(packet.hop_start),
            or_dash(packet.hop_limit)
        ),
        None => format::NOT_APPLICABLE.to_string(),
    };

    let fields = vec![
        ("Packet ID", or_dash(packet.packet_id), MIST),
        ("Time", time, MIST),
        (
            "From",
            node_text(
                packet.from_node_long_name.as_deref(),
                Some(format::source_node_id(packet)),
            ),
            Color::Cyan,
        ),
        ("To", to, Color::Cyan),
        (
            "Type",
            format!("{} ({})", format::type_label(packet), packet.portnum),
            port_color(packet.portnum),
        ),
        ("Channel", format::channel_cell(packet), MIST),
        ("SNR", format::snr_cell(packet), MIST),
        ("RSSI", format::rssi_cell(packet), MIST),
        ("Hops", hops, MIST),
        ("Size", format::size_cell(packet), MIST),
        (
            "Encrypted",
            if packet.encrypted { "Yes" } else { "No" }.to_string(),
            if packet.encrypted { AMBER } else { MIST },
        ),
    ];

    PacketDetailView {
        title: format!(" Packet #{} ", packet.id),
        fields,
        payload: format::payload_display(packet),
        metadata: format::metadata_text(packet),
    }
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(SIGNAL_BLUE).add_modifier(Modifier::BOLD),
    ))
}

pub fn render_packet_detail(f: &mut Frame, area: Rect, app: &mut AppState) {
    let Some(packet) = app.selected.as_ref() else {
        app.layout.overlay = None;
        return;
    };
    let view = build_packet_detail(packet, &app.display);

    let mut lines = vec![Line::from("")];
    for (label, value, color) in &view.fields {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<10} ", label), Style::default().fg(Color::DarkGray)),
            Span::styled(value.clone(), Style::default().fg(*color)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(section_title("  Payload"));
    let payload_style = match view.payload {
        PayloadDisplay::Encrypted => Style::default().fg(AMBER).add_modifier(Modifier::BOLD),
        _ => Style::default().fg(MIST),
    };
    lines.push(Line::from(Span::styled(format!("  {}", view.payload), payload_style)));

    if let Some(metadata) = &view.metadata {
        lines.push(Line::from(""));
        lines.push(section_title("  Metadata"));
        for line in metadata.lines() {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default().fg(Color::Gray),
            )));
        }
    }

    let overlay = centered_rect(area, 70, 80, 60, 18);
    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(Span::styled(
                    view.title,
                    Style::default().fg(SIGNAL_BLUE).add_modifier(Modifier::BOLD),
                ))
                .title_bottom(Line::from(" Esc: close | ↑↓: prev/next packet ").right_aligned())
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(SIGNAL_BLUE)),
        );

    f.render_widget(Clear, overlay);
    f.render_widget(detail, overlay);
    app.layout.overlay = Some(overlay);
}
