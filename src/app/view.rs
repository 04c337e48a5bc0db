// Derived view of the packet list
//
// Turns the raw packet list plus the hide-own toggle into the ordered rows
// the table shows, and sizes the type column to fit them. The raw list is
// only ever read here.

use super::config::{TYPE_COLUMN_MIN_WIDTH, TYPE_COLUMN_PADDING};
use crate::format::type_label;
use crate::net::PacketRecord;
use unicode_width::UnicodeWidthStr;

/// Indices into `packets` that remain visible, in their original order
pub fn effective_rows(
    packets: &[PacketRecord],
    hide_own: bool,
    own_node: Option<u32>,
) -> Vec<usize> {
    match (hide_own, own_node) {
        (true, Some(own)) => packets
            .iter()
            .enumerate()
            .filter(|(_, p)| p.from_node != own)
            .map(|(idx, _)| idx)
            .collect(),
        _ => (0..packets.len()).collect(),
    }
}

/// Width of the type column for the given visible rows
///
/// `max(longest label + padding, minimum)` in terminal cells.
pub fn type_column_width(packets: &[PacketRecord], rows: &[usize]) -> u16 {
    let longest = rows
        .iter()
        .filter_map(|&idx| packets.get(idx))
        .map(|p| type_label(p).width())
        .max()
        .unwrap_or(0);
    let width = (longest + TYPE_COLUMN_PADDING).max(TYPE_COLUMN_MIN_WIDTH);
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Inputs the derived rows depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewKey {
    /// Bumped every time the raw list is replaced
    pub generation: u64,
    pub hide_own: bool,
    pub own_node: Option<u32>,
}

/// Memoized rows and type-column width
#[derive(Debug, Clone)]
pub struct PacketView {
    key: Option<ViewKey>,
    rows: Vec<usize>,
    type_width: u16,
}

impl Default for PacketView {
    fn default() -> Self {
        Self {
            key: None,
            rows: Vec::new(),
            type_width: TYPE_COLUMN_MIN_WIDTH as u16,
        }
    }
}

impl PacketView {
    /// Recompute if any input changed; returns whether work was done
    pub fn refresh(&mut self, packets: &[PacketRecord], key: ViewKey) -> bool {
        if self.key == Some(key) {
            return false;
        }
        self.rows = effective_rows(packets, key.hide_own, key.own_node);
        self.type_width = type_column_width(packets, &self.rows);
        self.key = Some(key);
        tracing::trace!(
            rows = self.rows.len(),
            type_width = self.type_width,
            "Recomputed packet view"
        );
        true
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn type_width(&self) -> u16 {
        self.type_width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
