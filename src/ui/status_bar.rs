// Status Bar rendering module
//
// Renders the bottom status bar with keyboard shortcuts and toggle indicators.

use crate::app::AppState;
use crate::format::TimeFormat;
use crate::theme::{AMBER, LINK_GREEN, MIST, SIGNAL_BLUE};
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

struct Hint {
    priority: u8,
    key: &'static str,
    desc: &'static str,
    color: Color,
}

fn hints(app: &AppState) -> Vec<Hint> {
    let mut hints = vec![
        Hint {
            priority: 1,
            key: "Q:",
            desc: "Quit | ",
            color: Color::Red,
        },
        Hint {
            priority: 1,
            key: "↑↓:",
            desc: "Select | ",
            color: SIGNAL_BLUE,
        },
        Hint {
            priority: 1,
            key: "Enter:",
            desc: "Details | ",
            color: SIGNAL_BLUE,
        },
        Hint {
            priority: 2,
            key: "F:",
            desc: "Filters | ",
            color: SIGNAL_BLUE,
        },
        Hint {
            priority: 2,
            key: "H:",
            desc: "Hide own | ",
            color: SIGNAL_BLUE,
        },
        Hint {
            priority: 2,
            key: "A:",
            desc: "Auto-scroll | ",
            color: SIGNAL_BLUE,
        },
        Hint {
            priority: 3,
            key: "R:",
            desc: "Refresh | ",
            color: SIGNAL_BLUE,
        },
    ];

    if app.is_admin() {
        hints.push(Hint {
            priority: 2,
            key: "D:",
            desc: "Clear log | ",
            color: AMBER,
        });
    }

    if app.can_navigate() {
        hints.push(Hint {
            priority: 3,
            key: "g/G:",
            desc: "Go to from/to node | ",
            color: SIGNAL_BLUE,
        });
    }

    hints
}

pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let indicators = build_toggle_indicators(app);
    let indicators_width: usize = indicators.iter().map(|s| s.content.width()).sum();

    // Subtract borders, icon and indicators
    let available_width =
        usize::from(area.width.saturating_sub(4)).saturating_sub(indicators_width + 1);

    let hints = hints(app);
    let mut spans = vec![Span::styled(" 📡 ", Style::default().fg(SIGNAL_BLUE))];
    let mut current_length = 4;

    // Process hints by priority
    for priority in 1..=3 {
        for hint in hints.iter().filter(|h| h.priority == priority) {
            let hint_length = hint.key.width() + hint.desc.width();
            if current_length + hint_length <= available_width {
                spans.push(Span::styled(
                    hint.key,
                    Style::default().fg(hint.color).add_modifier(Modifier::BOLD),
                ));
                spans.push(Span::raw(hint.desc));
                current_length += hint_length;
            }
        }
    }

    spans.push(Span::raw(" "));
    spans.extend(indicators);

    let status_bar = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(SIGNAL_BLUE)),
        )
        .alignment(Alignment::Left);

    f.render_widget(status_bar, area);
}

fn clock(at: &DateTime<Local>, time_format: TimeFormat) -> String {
    match time_format {
        TimeFormat::Hour24 => at.format("%H:%M:%S").to_string(),
        TimeFormat::Hour12 => at.format("%-I:%M:%S %p").to_string(),
    }
}

fn toggle_spans(key: &'static str, enabled: bool) -> Vec<Span<'static>> {
    let (state, color) = if enabled {
        ("ON", LINK_GREEN)
    } else {
        ("OFF", MIST)
    };
    vec![
        Span::styled(format!("[{}:", key), Style::default().fg(MIST)),
        Span::styled(state, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled("] ", Style::default().fg(MIST)),
    ]
}

/// Build toggle status indicator spans for the status bar
/// Shows [H:ON/OFF] [A:ON/OFF] followed by the last refresh time
pub fn build_toggle_indicators(app: &AppState) -> Vec<Span<'static>> {
    let mut spans = toggle_spans("H", app.hide_own);
    spans.extend(toggle_spans("A", app.auto_scroll));

    match app.last_refresh {
        Some(at) => {
            let style = if app.fetch_failed {
                Style::default().fg(AMBER)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(
                format!("⟳ {}", clock(&at, app.display.time_format)),
                style,
            ));
        }
        None if app.fetch_failed => {
            spans.push(Span::styled("⟳ failed", Style::default().fg(AMBER)));
        }
        None => {}
    }

    spans
}
