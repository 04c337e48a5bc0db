// Application state management
//
// This module contains the main AppState struct: the packet store filled by
// polling, the derived view, filter and toggle state, the detail overlay and
// dialogs, and the callbacks back into the host.

pub mod config;
pub mod event;
pub mod sync;
pub mod view;

#[cfg(test)]
pub mod testing;

pub use config::ViewerConfig;

use crate::format::{self, DisplaySettings};
use crate::net::{
    Action, Capabilities, PacketFilters, PacketPage, PacketRecord, PacketSource, Resource,
    SourceError, BROADCAST_NODE_ID,
};
use chrono::{DateTime, Local};
use config::{next_encrypted_filter, next_port_filter, PAGE_SIZE};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::TableState;
use std::time::Instant;
use sync::{FetchSequence, PollTimer};
use view::{PacketView, ViewKey};

// ============================================================================
// Supporting types
// ============================================================================

/// Whether the viewer may show packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Permissions not evaluated yet
    Pending,
    Granted { admin: bool },
    Denied,
}

impl Access {
    pub fn is_granted(self) -> bool {
        matches!(self, Access::Granted { .. })
    }
}

/// Modal dialogs drawn over everything else
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Asks before emptying the remote log
    ConfirmClear,
    /// Blocking notification, dismissed by any key
    Alert(String),
}

/// Table columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableColumn {
    Time,
    From,
    To,
    Type,
    Channel,
    Snr,
    Rssi,
    Hops,
    Size,
    Content,
}

impl TableColumn {
    pub const ALL: [TableColumn; 10] = [
        TableColumn::Time,
        TableColumn::From,
        TableColumn::To,
        TableColumn::Type,
        TableColumn::Channel,
        TableColumn::Snr,
        TableColumn::Rssi,
        TableColumn::Hops,
        TableColumn::Size,
        TableColumn::Content,
    ];

    pub fn title(self) -> &'static str {
        match self {
            TableColumn::Time => "Time",
            TableColumn::From => "From",
            TableColumn::To => "To",
            TableColumn::Type => "Type",
            TableColumn::Channel => "Ch",
            TableColumn::Snr => "SNR",
            TableColumn::Rssi => "RSSI",
            TableColumn::Hops => "Hops",
            TableColumn::Size => "Size",
            TableColumn::Content => "Content",
        }
    }
}

/// Horizontal span of one rendered column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpan {
    pub column: TableColumn,
    pub x: u16,
    pub width: u16,
}

/// Screen geometry from the last frame, used to route mouse clicks
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    /// Body rows of the table, below the header and inside the border
    pub rows_area: Rect,
    pub columns: Vec<ColumnSpan>,
    /// Detail overlay content, when open
    pub overlay: Option<Rect>,
}

impl LayoutCache {
    /// Visible row index and column under a screen position
    pub fn hit_test(&self, pos: Position, offset: usize) -> Option<(usize, Option<TableColumn>)> {
        if !self.rows_area.contains(pos) {
            return None;
        }
        let row = offset + usize::from(pos.y - self.rows_area.y);
        let column = self
            .columns
            .iter()
            .find(|span| pos.x >= span.x && pos.x < span.x.saturating_add(span.width))
            .map(|span| span.column);
        Some((row, column))
    }
}

/// Callbacks into the host application
pub struct HostCallbacks {
    pub on_close: Box<dyn FnMut()>,
    pub on_navigate: Option<Box<dyn FnMut(&str)>>,
}

impl HostCallbacks {
    pub fn new(on_close: impl FnMut() + 'static) -> Self {
        Self {
            on_close: Box::new(on_close),
            on_navigate: None,
        }
    }

    pub fn with_navigation(mut self, on_navigate: impl FnMut(&str) + 'static) -> Self {
        self.on_navigate = Some(Box::new(on_navigate));
        self
    }
}

impl Default for HostCallbacks {
    fn default() -> Self {
        Self::new(|| {})
    }
}

// ============================================================================
// AppState
// ============================================================================

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    source: Box<dyn PacketSource>,

    callbacks: HostCallbacks,

    /// Result of the last permission check
    pub access: Access,

    /// Raw packets from the last successful fetch, newest first
    packets: Vec<PacketRecord>,

    /// Bumped on every replacement of `packets`
    generation: u64,

    /// Packets logged on the server
    pub total: u64,

    /// Server retention limit
    pub max_count: u64,

    /// True until the first fetch completes
    pub loading: bool,

    /// Local time of the last successful fetch
    pub last_refresh: Option<DateTime<Local>>,

    /// Whether the most recent fetch failed (data on screen is stale)
    pub fetch_failed: bool,

    sequence: FetchSequence,

    /// Server-side filter criteria
    pub filters: PacketFilters,

    /// Filter panel visibility
    pub show_filters: bool,

    /// Hide packets sent by our own node (client-side only)
    pub hide_own: bool,

    /// Jump to the newest packet after each refresh
    pub auto_scroll: bool,

    own_node_id: Option<String>,
    own_node: Option<u32>,

    view: PacketView,

    /// Cursor and scroll offset of the packet table
    pub table_state: TableState,

    /// Packet shown in the detail overlay
    pub selected: Option<PacketRecord>,

    pub dialog: Option<Dialog>,

    /// Time and date preferences
    pub display: DisplaySettings,

    poll: PollTimer,

    /// Geometry of the last rendered frame
    pub layout: LayoutCache,
}

impl AppState {
    /// Create the viewer state; nothing is fetched until `activate`
    pub fn new(
        source: Box<dyn PacketSource>,
        config: ViewerConfig,
        callbacks: HostCallbacks,
    ) -> Self {
        let own_node = config.own_node_id.as_deref().and_then(format::parse_node_num);
        if config.own_node_id.is_some() && own_node.is_none() {
            tracing::warn!(
                own_node_id = config.own_node_id.as_deref().unwrap_or_default(),
                "Own node id is not of the form !<hex>; hiding own packets is unavailable"
            );
        }

        Self {
            running: true,
            source,
            callbacks,
            access: Access::Pending,
            packets: Vec::new(),
            generation: 0,
            total: 0,
            max_count: 0,
            loading: true,
            last_refresh: None,
            fetch_failed: false,
            sequence: FetchSequence::default(),
            filters: PacketFilters::default(),
            show_filters: false,
            hide_own: config.hide_own,
            auto_scroll: config.auto_scroll,
            own_node_id: config.own_node_id,
            own_node,
            view: PacketView::default(),
            table_state: TableState::default(),
            selected: None,
            dialog: None,
            display: config.display,
            poll: PollTimer::new(config.poll_interval),
            layout: LayoutCache::default(),
        }
    }

    // ------------------------------------------------------------------------
    // Sync
    // ------------------------------------------------------------------------

    /// Check permissions, perform the first fetch and start polling
    pub fn activate(&mut self) {
        self.activate_at(Instant::now());
    }

    /// Activation against an explicit clock
    pub fn activate_at(&mut self, now: Instant) {
        self.evaluate_access();
        self.poll.start(now);
        tracing::info!(
            interval_secs = self.poll.interval().as_secs(),
            access = ?self.access,
            "Packet polling started"
        );
        self.refresh_packets();
    }

    /// Update state on each loop iteration
    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now());
    }

    /// Poll step against an explicit clock
    pub fn on_tick_at(&mut self, now: Instant) {
        if !self.poll.due(now) {
            return;
        }
        self.poll.rearm(now);
        self.evaluate_access();
        self.refresh_packets();
    }

    /// Re-query the capability oracle
    ///
    /// A failed lookup keeps the last known state; before any successful
    /// lookup it counts as denied.
    pub fn evaluate_access(&mut self) {
        let next = match self.source.fetch_capabilities() {
            Ok(caps) => {
                tracing::debug!(
                    authenticated = caps.authenticated,
                    admin = caps.is_admin(),
                    messages_write = caps.has_permission(Resource::Messages, Action::Write),
                    "Loaded permissions"
                );
                access_from(&caps)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load permissions");
                match self.access {
                    Access::Pending => Access::Denied,
                    current => current,
                }
            }
        };

        if next != self.access {
            tracing::info!(from = ?self.access, to = ?next, "Packet monitor access changed");
            self.access = next;
        }
    }

    /// Fetch page zero with the current filters and apply it
    pub fn refresh_packets(&mut self) {
        if !self.access.is_granted() {
            return;
        }
        let seq = self.issue_fetch();
        let result = self.source.fetch_packets(0, PAGE_SIZE, &self.filters);
        self.apply_fetch_result(seq, result);
    }

    /// Reserve a sequence number for a fetch about to be sent
    pub fn issue_fetch(&mut self) -> u64 {
        self.sequence.issue()
    }

    /// Apply a fetch outcome unless a newer one was already applied
    pub fn apply_fetch_result(&mut self, seq: u64, result: Result<PacketPage, SourceError>) {
        if !self.sequence.accept(seq) {
            tracing::debug!(
                seq,
                latest = self.sequence.last_applied(),
                "Dropping out-of-order packet response"
            );
            return;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.packets = page.packets;
                self.total = page.total;
                self.max_count = page.max_count;
                self.generation += 1;
                self.fetch_failed = false;
                self.last_refresh = Some(Local::now());
                self.recompute_view();

                if self.auto_scroll {
                    self.scroll_to_top();
                } else {
                    self.clamp_cursor();
                }
            }
            Err(e) => {
                // Keep showing what we had
                tracing::warn!(error = %e, seq, "Failed to fetch packets");
                self.fetch_failed = true;
            }
        }
    }

    /// Cancel polling; no state updates follow
    pub fn shutdown(&mut self) {
        if self.poll.is_active() {
            tracing::debug!("Stopping packet polling");
        }
        self.poll.cancel();
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_active()
    }

    /// Close the viewer and notify the host
    pub fn close(&mut self) {
        if !self.running {
            return;
        }
        self.shutdown();
        self.running = false;
        (self.callbacks.on_close)();
    }

    // ------------------------------------------------------------------------
    // Derived view
    // ------------------------------------------------------------------------

    fn recompute_view(&mut self) {
        let key = ViewKey {
            generation: self.generation,
            hide_own: self.hide_own,
            own_node: self.own_node,
        };
        self.view.refresh(&self.packets, key);
    }

    /// Raw packets from the last successful fetch
    #[cfg(test)]
    pub fn packets(&self) -> &[PacketRecord] {
        &self.packets
    }

    /// Packets visible after client-side filtering, in display order
    pub fn visible_packets(&self) -> impl Iterator<Item = &PacketRecord> + '_ {
        self.view.rows().iter().filter_map(|&idx| self.packets.get(idx))
    }

    pub fn visible_count(&self) -> usize {
        self.view.len()
    }

    /// Packet at a visible row
    pub fn visible_packet(&self, row: usize) -> Option<&PacketRecord> {
        self.view
            .rows()
            .get(row)
            .and_then(|&idx| self.packets.get(idx))
    }

    pub fn type_column_width(&self) -> u16 {
        self.view.type_width()
    }

    pub fn own_node(&self) -> Option<u32> {
        self.own_node
    }

    pub fn own_node_id(&self) -> Option<&str> {
        self.own_node_id.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.access, Access::Granted { admin: true })
    }

    pub fn can_navigate(&self) -> bool {
        self.callbacks.on_navigate.is_some()
    }

    // ------------------------------------------------------------------------
    // Cursor and detail overlay
    // ------------------------------------------------------------------------

    fn scroll_to_top(&mut self) {
        *self.table_state.offset_mut() = 0;
        if self.view.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(0));
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.view.len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(row) if row >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    pub fn is_detail_open(&self) -> bool {
        self.selected.is_some()
    }

    /// Open (or retarget) the detail overlay on a visible row
    pub fn open_detail(&mut self, row: usize) {
        let Some(packet) = self.visible_packet(row).cloned() else {
            return;
        };
        tracing::debug!(packet_id = packet.id, row, "Opening packet details");
        self.table_state.select(Some(row));
        self.selected = Some(packet);
    }

    pub fn close_detail(&mut self) {
        self.selected = None;
        self.layout.overlay = None;
    }

    /// Open the overlay on the cursor row
    pub fn activate_cursor_row(&mut self) {
        if let Some(row) = self.table_state.selected() {
            self.open_detail(row);
        }
    }

    /// Move cursor down; an open overlay follows the cursor
    pub fn select_next_row(&mut self) {
        let len = self.view.len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }

        let next = match self.table_state.selected() {
            None => 0,
            Some(row) => (row + 1).min(len - 1),
        };
        self.move_cursor(next);
    }

    /// Move cursor up; an open overlay follows the cursor
    pub fn select_previous_row(&mut self) {
        let len = self.view.len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }

        let prev = match self.table_state.selected() {
            // Start at the last row
            None => len - 1,
            Some(row) => row.saturating_sub(1),
        };
        self.move_cursor(prev);
    }

    fn move_cursor(&mut self, row: usize) {
        self.table_state.select(Some(row));
        if self.is_detail_open() {
            self.open_detail(row);
        }
    }

    // ------------------------------------------------------------------------
    // Node navigation
    // ------------------------------------------------------------------------

    /// Hand a node id to the host; false when nothing was navigated
    pub fn navigate_to_node(&mut self, node_id: &str) -> bool {
        if node_id == BROADCAST_NODE_ID {
            return false;
        }
        match self.callbacks.on_navigate.as_mut() {
            Some(on_navigate) => {
                tracing::info!(node_id, "Navigating to node");
                on_navigate(node_id);
                true
            }
            None => false,
        }
    }

    /// Navigate to the source or destination node of a visible row
    pub fn navigate_from_row(&mut self, row: usize, column: TableColumn) -> bool {
        let Some(packet) = self.visible_packet(row) else {
            return false;
        };
        let node_id = match column {
            TableColumn::From => Some(format::source_node_id(packet)),
            TableColumn::To => format::destination_node_id(packet),
            _ => None,
        };
        match node_id {
            Some(id) => self.navigate_to_node(&id),
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // Clear log
    // ------------------------------------------------------------------------

    /// Ask for confirmation before clearing; admins only
    pub fn request_clear(&mut self) -> bool {
        if !self.is_admin() {
            return false;
        }
        self.dialog = Some(Dialog::ConfirmClear);
        true
    }

    /// Clear the remote log after confirmation, then refetch
    pub fn confirm_clear(&mut self) {
        if self.dialog != Some(Dialog::ConfirmClear) {
            return;
        }
        self.dialog = None;

        // Access may have changed while the dialog was open
        if !self.is_admin() {
            tracing::warn!("Clear confirmed without admin access; ignoring");
            return;
        }

        match self.source.clear_packets() {
            Ok(()) => {
                tracing::info!("Cleared remote packet log");
                self.refresh_packets();
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear packet log");
                self.dialog = Some(Dialog::Alert(format!("Failed to clear packet logs: {}", e)));
            }
        }
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    // ------------------------------------------------------------------------
    // Filters and toggles
    // ------------------------------------------------------------------------

    pub fn toggle_filter_panel(&mut self) {
        self.show_filters = !self.show_filters;
    }

    pub fn cycle_port_filter(&mut self) {
        let filters = PacketFilters {
            portnum: next_port_filter(self.filters.portnum),
            ..self.filters
        };
        self.set_filters(filters);
    }

    pub fn cycle_encrypted_filter(&mut self) {
        let filters = PacketFilters {
            encrypted: next_encrypted_filter(self.filters.encrypted),
            ..self.filters
        };
        self.set_filters(filters);
    }

    /// Drop every server-side constraint
    pub fn clear_filters(&mut self) {
        self.set_filters(PacketFilters::default());
    }

    /// Replace the filter criteria; refetches and restarts the poll interval
    pub fn set_filters(&mut self, filters: PacketFilters) {
        self.set_filters_at(filters, Instant::now());
    }

    /// Filter change against an explicit clock
    pub fn set_filters_at(&mut self, filters: PacketFilters, now: Instant) {
        if filters == self.filters {
            return;
        }
        tracing::debug!(
            portnum = ?filters.portnum,
            encrypted = ?filters.encrypted,
            "Filters changed"
        );
        self.filters = filters;
        self.refresh_packets();
        self.poll.rearm(now);
    }

    pub fn toggle_hide_own(&mut self) {
        self.hide_own = !self.hide_own;
        self.recompute_view();
        self.clamp_cursor();
        // An open overlay keeps its captured record
    }

    pub fn toggle_auto_scroll(&mut self) {
        self.auto_scroll = !self.auto_scroll;
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn access_from(caps: &Capabilities) -> Access {
    if caps.can_view_packets() {
        Access::Granted {
            admin: caps.is_admin(),
        }
    } else {
        Access::Denied
    }
}
