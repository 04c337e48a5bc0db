// Keyboard and mouse event handling
//
// This module routes user input to AppState. Dialogs take every key while
// open; the detail overlay swallows clicks on its own content so only the
// background closes it.

use super::{AppState, Dialog, TableColumn};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings
/// - `q`, `Q` - Quit (`Esc` quits when nothing is open)
/// - `Up`/`k`, `Down`/`j` - Move the cursor (retargets an open overlay)
/// - `Enter` - Open details for the cursor row
/// - `Esc` - Close the detail overlay
/// - `f` - Toggle the filter panel; inside it `t` port type, `e` encryption, `c` clear
/// - `h` - Hide own packets
/// - `a` - Auto-scroll to newest
/// - `r` - Refresh now
/// - `D` - Clear the packet log (admins)
/// - `g`, `G` - Go to the source / destination node of the cursor row
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    if let Some(dialog) = app.dialog.clone() {
        handle_dialog_key(app, &dialog, key);
        return app.running;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.close(),
        KeyCode::Esc => {
            if app.is_detail_open() {
                app.close_detail();
            } else {
                app.close();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_row(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_row(),
        KeyCode::Enter => app.activate_cursor_row(),
        KeyCode::Char('f') | KeyCode::Char('F') => app.toggle_filter_panel(),
        KeyCode::Char('t') | KeyCode::Char('T') if app.show_filters => app.cycle_port_filter(),
        KeyCode::Char('e') | KeyCode::Char('E') if app.show_filters => {
            app.cycle_encrypted_filter()
        }
        KeyCode::Char('c') | KeyCode::Char('C') if app.show_filters => app.clear_filters(),
        KeyCode::Char('h') | KeyCode::Char('H') => app.toggle_hide_own(),
        KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_auto_scroll(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.refresh_packets(),
        KeyCode::Char('D') => {
            app.request_clear();
        }
        KeyCode::Char('g') => navigate_cursor(app, TableColumn::From),
        KeyCode::Char('G') => navigate_cursor(app, TableColumn::To),
        _ => {}
    }
    app.running
}

fn handle_dialog_key(app: &mut AppState, dialog: &Dialog, key: KeyCode) {
    match dialog {
        Dialog::ConfirmClear => match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_clear(),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.dismiss_dialog(),
            _ => {}
        },
        Dialog::Alert(_) => app.dismiss_dialog(),
    }
}

fn navigate_cursor(app: &mut AppState, column: TableColumn) {
    if let Some(row) = app.table_state.selected() {
        app.navigate_from_row(row, column);
    }
}

/// Handle mouse events using the geometry of the last frame
pub fn handle_mouse_event(app: &mut AppState, mouse: MouseEvent) {
    if app.dialog.is_some() {
        return;
    }

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_click(app, Position::new(mouse.column, mouse.row));
        }
        MouseEventKind::ScrollDown if !app.is_detail_open() => app.select_next_row(),
        MouseEventKind::ScrollUp if !app.is_detail_open() => app.select_previous_row(),
        _ => {}
    }
}

fn handle_click(app: &mut AppState, pos: Position) {
    if app.is_detail_open() {
        // Content clicks stay inside the overlay
        if app.layout.overlay.is_some_and(|overlay| overlay.contains(pos)) {
            return;
        }
        app.close_detail();
        return;
    }

    let Some((row, column)) = app.layout.hit_test(pos, app.table_state.offset()) else {
        return;
    };

    if let Some(column @ (TableColumn::From | TableColumn::To)) = column {
        if app.navigate_from_row(row, column) {
            return;
        }
    }
    app.open_detail(row);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{page, packet, FakeSource};
    use crate::app::{ColumnSpan, HostCallbacks, LayoutCache, ViewerConfig};
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn table_layout() -> LayoutCache {
        LayoutCache {
            rows_area: Rect::new(1, 4, 100, 20),
            columns: vec![
                ColumnSpan {
                    column: TableColumn::Time,
                    x: 1,
                    width: 12,
                },
                ColumnSpan {
                    column: TableColumn::From,
                    x: 14,
                    width: 20,
                },
                ColumnSpan {
                    column: TableColumn::To,
                    x: 35,
                    width: 20,
                },
                ColumnSpan {
                    column: TableColumn::Type,
                    x: 56,
                    width: 20,
                },
            ],
            overlay: None,
        }
    }

    fn app_with_rows(
        admin: bool,
        callbacks: HostCallbacks,
    ) -> (AppState, crate::app::testing::FakeHandle) {
        let (source, handle) = FakeSource::granted(admin);
        handle.push_page(page(vec![packet(1, 0x10), packet(2, 0x20), packet(3, 0x30)], 3, 100));
        let mut app = AppState::new(Box::new(source), ViewerConfig::default(), callbacks);
        app.activate();
        app.layout = table_layout();
        (app, handle)
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        assert!(app.running);
        assert!(!handle_key_event(&mut app, KeyCode::Char('q')));
        assert!(!app.running);

        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        assert!(!handle_key_event(&mut app, KeyCode::Esc));
    }

    #[test]
    fn test_esc_closes_overlay_before_quitting() {
        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        handle_key_event(&mut app, KeyCode::Enter);
        assert!(app.is_detail_open());

        assert!(handle_key_event(&mut app, KeyCode::Esc));
        assert!(!app.is_detail_open());
        assert!(app.running);
    }

    #[test]
    fn test_filter_keys_need_open_panel() {
        let (mut app, handle) = app_with_rows(false, HostCallbacks::default());
        handle_key_event(&mut app, KeyCode::Char('t'));
        assert_eq!(app.filters.portnum, None);
        assert_eq!(handle.fetch_count(), 1);

        handle_key_event(&mut app, KeyCode::Char('f'));
        handle_key_event(&mut app, KeyCode::Char('t'));
        handle_key_event(&mut app, KeyCode::Char('e'));
        assert_eq!(app.filters.portnum, Some(1));
        assert_eq!(app.filters.encrypted, Some(true));
        assert_eq!(handle.fetch_count(), 3);

        handle_key_event(&mut app, KeyCode::Char('c'));
        assert!(app.filters.is_empty());
    }

    #[test]
    fn test_toggle_keys() {
        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        assert!(!app.hide_own);
        handle_key_event(&mut app, KeyCode::Char('h'));
        assert!(app.hide_own);

        assert!(app.auto_scroll);
        handle_key_event(&mut app, KeyCode::Char('a'));
        assert!(!app.auto_scroll);
    }

    #[test]
    fn test_clear_dialog_flow() {
        let (mut app, handle) = app_with_rows(true, HostCallbacks::default());
        handle_key_event(&mut app, KeyCode::Char('D'));
        assert_eq!(app.dialog, Some(Dialog::ConfirmClear));

        // Other keys are swallowed by the dialog
        handle_key_event(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.dialog, Some(Dialog::ConfirmClear));

        handle_key_event(&mut app, KeyCode::Char('n'));
        assert!(app.dialog.is_none());
        assert_eq!(handle.clear_count(), 0);

        handle_key_event(&mut app, KeyCode::Char('D'));
        handle_key_event(&mut app, KeyCode::Char('y'));
        assert_eq!(handle.clear_count(), 1);
    }

    #[test]
    fn test_alert_dismissed_by_any_key() {
        let (mut app, handle) = app_with_rows(true, HostCallbacks::default());
        handle.fail_clear(true);
        handle_key_event(&mut app, KeyCode::Char('D'));
        handle_key_event(&mut app, KeyCode::Char('y'));
        assert!(matches!(app.dialog, Some(Dialog::Alert(_))));

        handle_key_event(&mut app, KeyCode::Char('x'));
        assert!(app.dialog.is_none());
        assert!(app.running);
    }

    #[test]
    fn test_row_click_opens_overlay() {
        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        handle_mouse_event(&mut app, click(60, 5));
        assert_eq!(app.selected.as_ref().map(|p| p.id), Some(2));
        assert_eq!(app.table_state.selected(), Some(1));
    }

    #[test]
    fn test_overlay_background_click_closes() {
        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        handle_mouse_event(&mut app, click(60, 4));
        assert!(app.is_detail_open());
        app.layout.overlay = Some(Rect::new(20, 6, 40, 12));

        // Inside the overlay content: stays open
        handle_mouse_event(&mut app, click(30, 10));
        assert!(app.is_detail_open());

        // Background: closes
        handle_mouse_event(&mut app, click(2, 2));
        assert!(!app.is_detail_open());
    }

    #[test]
    fn test_node_click_navigates_instead_of_selecting() {
        let visited = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&visited);
        let callbacks =
            HostCallbacks::default()
                .with_navigation(move |id| sink.borrow_mut().push(id.to_string()));
        let (mut app, _) = app_with_rows(false, callbacks);

        handle_mouse_event(&mut app, click(20, 4));
        assert_eq!(*visited.borrow(), vec!["!00000010".to_string()]);
        assert!(!app.is_detail_open());

        handle_mouse_event(&mut app, click(40, 6));
        assert_eq!(visited.borrow().last().map(String::as_str), Some("!0badcafe"));
        assert!(!app.is_detail_open());
    }

    #[test]
    fn test_node_click_without_callback_selects_row() {
        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        handle_mouse_event(&mut app, click(20, 4));
        assert_eq!(app.selected.as_ref().map(|p| p.id), Some(1));
    }

    #[test]
    fn test_click_below_last_row_ignored() {
        let (mut app, _) = app_with_rows(false, HostCallbacks::default());
        handle_mouse_event(&mut app, click(60, 15));
        assert!(!app.is_detail_open());
    }

    #[test]
    fn test_clicks_ignored_while_dialog_open() {
        let (mut app, _) = app_with_rows(true, HostCallbacks::default());
        app.request_clear();
        handle_mouse_event(&mut app, click(60, 4));
        assert!(!app.is_detail_open());
    }

    #[test]
    fn test_go_to_node_keys() {
        let visited = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&visited);
        let callbacks =
            HostCallbacks::default()
                .with_navigation(move |id| sink.borrow_mut().push(id.to_string()));
        let (mut app, _) = app_with_rows(false, callbacks);

        handle_key_event(&mut app, KeyCode::Down);
        handle_key_event(&mut app, KeyCode::Char('g'));
        handle_key_event(&mut app, KeyCode::Char('G'));
        assert_eq!(
            *visited.borrow(),
            vec!["!00000020".to_string(), "!0badcafe".to_string()]
        );
    }
}
