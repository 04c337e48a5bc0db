// Packet table rendering module
//
// Renders the scrollable packet list with per-type coloring, and records
// the row and column geometry the mouse handler hit-tests against.

use crate::app::{AppState, ColumnSpan, TableColumn};
use crate::format::{self, DisplaySettings, PayloadDisplay, TimeFormat};
use crate::net::PacketRecord;
use crate::theme::{port_color, AMBER, MIST, ROW_HIGHLIGHT, SIGNAL_BLUE};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

const COLUMN_SPACING: u16 = 1;

/// Column constraints in `TableColumn::ALL` order
pub fn column_widths(type_width: u16, time_format: TimeFormat) -> [Constraint; 10] {
    let time_width = match time_format {
        TimeFormat::Hour12 => 15,
        TimeFormat::Hour24 => 12,
    };
    [
        Constraint::Length(time_width),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(type_width),
        Constraint::Length(3),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Fill(2),
    ]
}

/// Where each column lands inside the table's inner area
fn column_spans(inner: Rect, widths: &[Constraint]) -> Vec<ColumnSpan> {
    let areas = Layout::horizontal(widths.iter().copied())
        .flex(Flex::Start)
        .spacing(COLUMN_SPACING)
        .split(inner);
    TableColumn::ALL
        .iter()
        .zip(areas.iter())
        .map(|(column, rect)| ColumnSpan {
            column: *column,
            x: rect.x,
            width: rect.width,
        })
        .collect()
}

fn packet_row(packet: &PacketRecord, display: &DisplaySettings, linkable: bool) -> Row<'static> {
    let node_style = if linkable {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let to_cell = if packet.is_broadcast() {
        Cell::from(format::destination_label(packet))
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
    } else {
        Cell::from(format::destination_label(packet)).style(node_style)
    };

    let payload = format::payload_display(packet);
    let payload_cell = match &payload {
        PayloadDisplay::Encrypted => {
            Cell::from(payload.to_string()).style(Style::default().fg(AMBER))
        }
        PayloadDisplay::Preview(text) => Cell::from(text.replace(['\n', '\r'], " ")),
        PayloadDisplay::Empty => {
            Cell::from(payload.to_string()).style(Style::default().fg(Color::DarkGray))
        }
    };

    Row::new(vec![
        Cell::from(format::packet_time_cell(packet, display))
            .style(Style::default().fg(Color::DarkGray)),
        Cell::from(format::source_label(packet)).style(node_style),
        to_cell,
        Cell::from(format::type_label(packet))
            .style(Style::default().fg(port_color(packet.portnum))),
        Cell::from(format::channel_cell(packet)),
        Cell::from(format::snr_cell(packet)),
        Cell::from(format::rssi_cell(packet)),
        Cell::from(format::hop_cell(packet)),
        Cell::from(format::size_cell(packet)),
        payload_cell,
    ])
}

fn placeholder(f: &mut Frame, area: Rect, block: Block, message: &str) {
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(MIST))),
    ])
    .alignment(Alignment::Center)
    .block(block);
    f.render_widget(text, area);
}

pub fn render_packet_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title(Span::styled(
            " Packets ",
            Style::default().fg(SIGNAL_BLUE).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(SIGNAL_BLUE));
    let inner = block.inner(area);

    app.layout.rows_area = Rect::default();
    app.layout.columns.clear();

    if app.loading {
        placeholder(f, area, block, "Loading packets...");
        return;
    }

    if app.visible_count() == 0 {
        let message = if !app.filters.is_empty() || (app.hide_own && app.own_node().is_some()) {
            "No packets match the current filters"
        } else {
            "No packets logged yet"
        };
        placeholder(f, area, block, message);
        return;
    }

    let widths = column_widths(app.type_column_width(), app.display.time_format);
    let linkable = app.can_navigate();
    let rows: Vec<Row<'static>> = app
        .visible_packets()
        .map(|p| packet_row(p, &app.display, linkable))
        .collect();

    let header = Row::new(TableColumn::ALL.map(|c| Cell::from(c.title())))
        .style(Style::default().fg(MIST).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .row_highlight_style(Style::default().bg(ROW_HIGHLIGHT));

    // Header takes the first inner line
    app.layout.rows_area = Rect {
        x: inner.x,
        y: inner.y.saturating_add(1),
        width: inner.width,
        height: inner.height.saturating_sub(1),
    };
    app.layout.columns = column_spans(inner, &widths);

    f.render_stateful_widget(table, area, &mut app.table_state);
}
