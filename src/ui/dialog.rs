// Modal dialog rendering module
//
// Confirmation before clearing the log, and blocking alerts.

use super::centered_rect;
use crate::app::Dialog;
use crate::theme::{ALERT_RED, AMBER, MIST};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_dialog(f: &mut Frame, area: Rect, dialog: &Dialog) {
    let (title, color, lines) = match dialog {
        Dialog::ConfirmClear => (
            " Clear Packet Log ",
            AMBER,
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Clear all packet logs?",
                    Style::default().fg(MIST).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    "This cannot be undone.",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        "[y]",
                        Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" Clear   "),
                    Span::styled("[n]", Style::default().fg(MIST).add_modifier(Modifier::BOLD)),
                    Span::raw(" Cancel"),
                ]),
            ],
        ),
        Dialog::Alert(message) => (
            " Error ",
            ALERT_RED,
            vec![
                Line::from(""),
                Line::from(Span::styled(message.clone(), Style::default().fg(MIST))),
                Line::from(""),
                Line::from(Span::styled(
                    "Press any key",
                    Style::default().fg(Color::DarkGray),
                )),
            ],
        ),
    };

    let rect = centered_rect(area, 50, 30, 36, 8);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    title,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(color)),
        );

    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}
