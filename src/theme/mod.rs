// Theme module - Color constants and theme re-exports
//
// This module provides the color palette used by the packet monitor.
// Port-type colors live in the ports submodule.

pub mod ports;

use ratatui::style::Color;

/// Primary accent color - used for borders, titles, selected rows
/// RGB: (74, 158, 255)
pub const SIGNAL_BLUE: Color = Color::Rgb(74, 158, 255);

/// Warning color - used for stale data, confirmation dialogs
/// RGB: (255, 152, 0)
pub const AMBER: Color = Color::Rgb(255, 152, 0);

/// Danger color - used for errors, permission denial, clear action
/// RGB: (244, 67, 54)
pub const ALERT_RED: Color = Color::Rgb(244, 67, 54);

/// Healthy indicator - used for enabled toggles, fresh data
/// RGB: (76, 175, 80)
pub const LINK_GREEN: Color = Color::Rgb(76, 175, 80);

/// Neutral text - used for general text, disabled toggles
/// RGB: (200, 204, 214)
pub const MIST: Color = Color::Rgb(200, 204, 214);

/// Row highlight background
/// RGB: (40, 48, 68)
pub const ROW_HIGHLIGHT: Color = Color::Rgb(40, 48, 68);

pub use ports::*;
