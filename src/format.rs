// Display formatting for packet fields
//
// Pure functions of a single packet record plus the user's time/date
// preferences. Nothing here touches application state.

use crate::net::{PacketRecord, BROADCAST_NODE_ID};
use chrono::{DateTime, Local, TimeZone};
use clap::ValueEnum;
use std::fmt::Display;

/// Long names beyond this many characters are cut in table cells
pub const LONG_NAME_LIMIT: usize = 30;

/// Shown in place of a value that cannot be computed
pub const NOT_APPLICABLE: &str = "-";

// ============================================================================
// Formatting preferences
// ============================================================================

/// Clock style for timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeFormat {
    #[value(name = "12")]
    Hour12,
    #[default]
    #[value(name = "24")]
    Hour24,
}

/// Order of day, month and year in full dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DateFormat {
    /// MM/DD/YYYY
    #[default]
    #[value(name = "mdy")]
    MonthFirst,
    /// DD/MM/YYYY
    #[value(name = "dmy")]
    DayFirst,
    /// YYYY-MM-DD
    #[value(name = "iso")]
    Iso,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::MonthFirst => "%m/%d/%Y",
            DateFormat::DayFirst => "%d/%m/%Y",
            DateFormat::Iso => "%Y-%m-%d",
        }
    }
}

/// User formatting preferences
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplaySettings {
    pub time_format: TimeFormat,
    pub date_format: DateFormat,
}

// ============================================================================
// Time
// ============================================================================

/// Clock time with a zero-padded millisecond suffix
///
/// 24-hour: `15:04:05.123`, 12-hour: `3:04:05.123 PM`.
pub fn format_time<Tz>(dt: &DateTime<Tz>, millis: u32, time_format: TimeFormat) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let millis = millis % 1000;
    match time_format {
        TimeFormat::Hour24 => format!("{}.{:03}", dt.format("%H:%M:%S"), millis),
        TimeFormat::Hour12 => format!(
            "{}.{:03} {}",
            dt.format("%-I:%M:%S"),
            millis,
            dt.format("%p")
        ),
    }
}

/// Full date and time without sub-second precision
pub fn format_date_time<Tz>(dt: &DateTime<Tz>, settings: &DisplaySettings) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = match settings.time_format {
        TimeFormat::Hour24 => dt.format("%H:%M:%S").to_string(),
        TimeFormat::Hour12 => dt.format("%-I:%M:%S %p").to_string(),
    };
    format!("{} {}", dt.format(settings.date_format.pattern()), time)
}

/// Millisecond remainder of the packet's capture time
pub fn packet_millis(packet: &PacketRecord) -> u32 {
    packet
        .created_at
        .map(|ms| ms.rem_euclid(1000) as u32)
        .unwrap_or(0)
}

/// Capture time in the local zone; `None` for out-of-range timestamps
pub fn packet_local_time(packet: &PacketRecord) -> Option<DateTime<Local>> {
    Local.timestamp_opt(packet.timestamp, 0).single()
}

/// Table cell for the capture time
pub fn packet_time_cell(packet: &PacketRecord, settings: &DisplaySettings) -> String {
    match packet_local_time(packet) {
        Some(dt) => format_time(&dt, packet_millis(packet), settings.time_format),
        None => NOT_APPLICABLE.to_string(),
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// Parse a `!`-prefixed hex node id into its node number
///
/// Returns `None` when the id is missing the prefix, empty, not hex, or
/// wider than 32 bits.
pub fn parse_node_num(node_id: &str) -> Option<u32> {
    let hex = node_id.strip_prefix('!')?;
    if hex.is_empty() || hex.len() > 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Cut a long name to `LONG_NAME_LIMIT` characters plus `...`
pub fn truncate_long_name(name: &str) -> String {
    if name.chars().count() > LONG_NAME_LIMIT {
        let head: String = name.chars().take(LONG_NAME_LIMIT).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

fn node_label(long_name: Option<&str>, node_id: Option<&str>, node_num: Option<u32>) -> String {
    if let Some(name) = long_name.filter(|n| !n.is_empty()) {
        return truncate_long_name(name);
    }
    match (node_id, node_num) {
        (Some(id), _) => id.to_string(),
        (None, Some(num)) => format!("!{:08x}", num),
        (None, None) => NOT_APPLICABLE.to_string(),
    }
}

/// Source node as shown in the table
pub fn source_label(packet: &PacketRecord) -> String {
    node_label(
        packet.from_node_long_name.as_deref(),
        packet.from_node_id.as_deref(),
        Some(packet.from_node),
    )
}

/// Destination node as shown in the table; broadcast wins over any name
pub fn destination_label(packet: &PacketRecord) -> String {
    if packet.is_broadcast() {
        return "Broadcast".to_string();
    }
    node_label(
        packet.to_node_long_name.as_deref(),
        packet.to_node_id.as_deref(),
        packet.to_node,
    )
}

/// Node id a click on the source cell navigates to
pub fn source_node_id(packet: &PacketRecord) -> String {
    packet
        .from_node_id
        .clone()
        .unwrap_or_else(|| format!("!{:08x}", packet.from_node))
}

/// Node id a click on the destination cell navigates to
pub fn destination_node_id(packet: &PacketRecord) -> Option<String> {
    if packet.is_broadcast() {
        return Some(BROADCAST_NODE_ID.to_string());
    }
    packet
        .to_node_id
        .clone()
        .or_else(|| packet.to_node.map(|n| format!("!{:08x}", n)))
}

// ============================================================================
// Packet fields
// ============================================================================

/// Relay traversals, only when both counters are present
pub fn hop_count(packet: &PacketRecord) -> Option<i64> {
    match (packet.hop_start, packet.hop_limit) {
        (Some(start), Some(limit)) => Some(i64::from(start) - i64::from(limit)),
        _ => None,
    }
}

pub fn hop_cell(packet: &PacketRecord) -> String {
    hop_count(packet)
        .map(|h| h.to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// Port name when known, otherwise the numeric code
pub fn type_label(packet: &PacketRecord) -> String {
    match packet.portnum_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => packet.portnum.to_string(),
    }
}

pub fn snr_cell(packet: &PacketRecord) -> String {
    packet
        .snr
        .map(|snr| format!("{:.1} dB", snr))
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

pub fn rssi_cell(packet: &PacketRecord) -> String {
    packet
        .rssi
        .map(|rssi| format!("{} dBm", rssi))
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

pub fn size_cell(packet: &PacketRecord) -> String {
    packet
        .payload_size
        .map(|size| format!("{} B", size))
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

pub fn channel_cell(packet: &PacketRecord) -> String {
    packet
        .channel
        .map(|c| c.to_string())
        .unwrap_or_else(|| NOT_APPLICABLE.to_string())
}

/// What the content column shows for a packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadDisplay {
    Encrypted,
    Preview(String),
    Empty,
}

pub fn payload_display(packet: &PacketRecord) -> PayloadDisplay {
    if packet.encrypted {
        return PayloadDisplay::Encrypted;
    }
    match packet.visible_payload() {
        Some(preview) => PayloadDisplay::Preview(preview.to_string()),
        None => PayloadDisplay::Empty,
    }
}

impl Display for PayloadDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayloadDisplay::Encrypted => write!(f, "🔒 Encrypted"),
            PayloadDisplay::Preview(text) => write!(f, "{}", text),
            PayloadDisplay::Empty => write!(f, "{}", NOT_APPLICABLE),
        }
    }
}

/// Metadata pretty-printed as JSON, or verbatim when it does not parse
pub fn metadata_text(packet: &PacketRecord) -> Option<String> {
    let raw = packet.metadata.as_deref().filter(|m| !m.trim().is_empty())?;
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => serde_json::to_string_pretty(&value)
            .ok()
            .or_else(|| Some(raw.to_string())),
        Err(_) => Some(raw.to_string()),
    }
}
