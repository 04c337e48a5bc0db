// Application configuration types
//
// This module contains constants and configuration structs for:
// - Poll timing and page size
// - Filter choices offered in the filter panel
// - Viewer startup options

use crate::format::DisplaySettings;
use std::time::Duration;

// ============================================================================
// Constants
// ============================================================================

/// Packets requested per fetch (always page zero)
pub const PAGE_SIZE: usize = 100;

/// Default interval between packet fetches in seconds
pub const DEFAULT_POLL_SECS: u64 = 5;

/// Lower bound accepted for the poll interval
pub const MIN_POLL_SECS: u64 = 1;

/// How long the event loop waits for input before ticking again
pub const UI_TICK_MS: u64 = 250;

/// Default HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

/// Padding added to the longest type label
pub const TYPE_COLUMN_PADDING: usize = 5;

/// Type column never gets narrower than this
pub const TYPE_COLUMN_MIN_WIDTH: usize = 12;

/// Port types offered by the filter panel, in cycle order
pub const PORT_FILTER_OPTIONS: &[(u32, &str)] = &[
    (1, "Text Message"),
    (3, "Position"),
    (4, "Node Info"),
    (5, "Routing"),
    (6, "Admin"),
    (67, "Telemetry"),
    (70, "Traceroute"),
    (71, "Neighbor Info"),
];

// ============================================================================
// Filter cycling
// ============================================================================

/// Next port selection: any -> first option -> ... -> last option -> any
///
/// A selection not in the option list (set programmatically) restarts the
/// cycle at the first option.
pub fn next_port_filter(current: Option<u32>) -> Option<u32> {
    match current {
        None => PORT_FILTER_OPTIONS.first().map(|(code, _)| *code),
        Some(code) => {
            match PORT_FILTER_OPTIONS.iter().position(|(c, _)| *c == code) {
                Some(idx) => PORT_FILTER_OPTIONS.get(idx + 1).map(|(c, _)| *c),
                None => PORT_FILTER_OPTIONS.first().map(|(c, _)| *c),
            }
        }
    }
}

/// Next encrypted selection: any -> encrypted only -> decoded only -> any
pub fn next_encrypted_filter(current: Option<bool>) -> Option<bool> {
    match current {
        None => Some(true),
        Some(true) => Some(false),
        Some(false) => None,
    }
}

pub fn port_filter_label(selection: Option<u32>) -> String {
    match selection {
        None => "All types".to_string(),
        Some(code) => PORT_FILTER_OPTIONS
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| format!("Port {}", code)),
    }
}

pub fn encrypted_filter_label(selection: Option<bool>) -> &'static str {
    match selection {
        None => "All packets",
        Some(true) => "Encrypted only",
        Some(false) => "Decoded only",
    }
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Startup options for the viewer
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Interval between packet fetches
    pub poll_interval: Duration,

    /// Own node id (`!xxxxxxxx`) if the device identity is known
    pub own_node_id: Option<String>,

    /// Time and date preferences
    pub display: DisplaySettings,

    /// Jump back to the newest packet after every refresh
    pub auto_scroll: bool,

    /// Start with own packets hidden
    pub hide_own: bool,
}

impl ViewerConfig {
    pub fn with_poll_secs(secs: u64) -> Self {
        Self {
            poll_interval: Duration::from_secs(secs.max(MIN_POLL_SECS)),
            ..Self::default()
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_SECS),
            own_node_id: None,
            display: DisplaySettings::default(),
            auto_scroll: true,
            hide_own: false,
        }
    }
}
