// Port-type color coding
//
// Fixed mapping from Meshtastic port numbers to the color used for the
// type column. Related ports share a bucket; anything unmapped is gray.

use ratatui::style::Color;

pub const TEXT_BLUE: Color = Color::Rgb(74, 158, 255);
pub const POSITION_GREEN: Color = Color::Rgb(76, 175, 80);
pub const NODEINFO_CYAN: Color = Color::Rgb(0, 188, 212);
pub const ROUTING_RED: Color = Color::Rgb(244, 67, 54);
pub const TELEMETRY_ORANGE: Color = Color::Rgb(255, 152, 0);
pub const TRACE_PURPLE: Color = Color::Rgb(156, 39, 176);
pub const NEIGHBOR_BROWN: Color = Color::Rgb(161, 110, 90);
pub const DEFAULT_GRAY: Color = Color::Rgb(158, 158, 158);

/// Color for a port number's type label
pub fn port_color(portnum: u32) -> Color {
    match portnum {
        // TEXT_MESSAGE_APP, TEXT_MESSAGE_COMPRESSED_APP
        1 | 7 => TEXT_BLUE,
        // POSITION_APP, WAYPOINT_APP
        3 | 8 => POSITION_GREEN,
        // NODEINFO_APP
        4 => NODEINFO_CYAN,
        // ROUTING_APP, ADMIN_APP
        5 | 6 => ROUTING_RED,
        // TELEMETRY_APP
        67 => TELEMETRY_ORANGE,
        // TRACEROUTE_APP
        70 => TRACE_PURPLE,
        // NEIGHBORINFO_APP, STORE_FORWARD_APP, RANGE_TEST_APP, MAP_REPORT_APP
        71 | 65 | 66 | 73 => NEIGHBOR_BROWN,
        _ => DEFAULT_GRAY,
    }
}
