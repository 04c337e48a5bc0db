// Packet data source module
//
// Wire model for packets served by the mesh monitoring server, the
// PacketSource seam the viewer polls through, and the capability set
// reported by the server's auth endpoint.

pub mod client;

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use thiserror::Error;

pub use client::HttpSource;

/// Reserved destination id meaning "all nodes"
pub const BROADCAST_NODE_ID: &str = "!ffffffff";

/// Numeric form of the broadcast destination
pub const BROADCAST_NODE_NUM: u32 = 0xffff_ffff;

// ============================================================================
// Errors
// ============================================================================

/// Failures talking to the packet data source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Body could not be decoded into the expected shape
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Packet model
// ============================================================================

/// One logged mesh packet, already decoded by the server
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PacketRecord {
    pub id: i64,
    pub packet_id: Option<u64>,
    /// Capture time in whole seconds since the epoch
    pub timestamp: i64,
    /// Capture time in milliseconds; supplies the sub-second part
    pub created_at: Option<i64>,
    pub from_node: u32,
    pub from_node_id: Option<String>,
    #[serde(rename = "from_node_longName")]
    pub from_node_long_name: Option<String>,
    /// Absent means broadcast
    pub to_node: Option<u32>,
    pub to_node_id: Option<String>,
    #[serde(rename = "to_node_longName")]
    pub to_node_long_name: Option<String>,
    pub channel: Option<u32>,
    pub portnum: u32,
    pub portnum_name: Option<String>,
    #[serde(default, deserialize_with = "flag_from_bool_or_int")]
    pub encrypted: bool,
    pub snr: Option<f64>,
    pub rssi: Option<i32>,
    pub hop_start: Option<u32>,
    pub hop_limit: Option<u32>,
    pub payload_size: Option<u32>,
    pub payload_preview: Option<String>,
    /// Free-form JSON blob, only parsed for display
    pub metadata: Option<String>,
}

impl PacketRecord {
    /// Whether the destination is the broadcast sentinel or absent
    pub fn is_broadcast(&self) -> bool {
        match (self.to_node_id.as_deref(), self.to_node) {
            (None, None) => true,
            (id, num) => id == Some(BROADCAST_NODE_ID) || num == Some(BROADCAST_NODE_NUM),
        }
    }

    /// Payload preview as it may be displayed; never shown for encrypted packets
    pub fn visible_payload(&self) -> Option<&str> {
        if self.encrypted {
            return None;
        }
        self.payload_preview.as_deref().filter(|p| !p.is_empty())
    }
}

/// SQLite-backed servers emit the encrypted flag as 0/1
fn flag_from_bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

/// One page of the packet log plus the server's counters
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PacketPage {
    pub packets: Vec<PacketRecord>,
    /// Number of packets currently logged on the server
    #[serde(default)]
    pub total: u64,
    /// Configured retention limit
    #[serde(default, rename = "maxCount")]
    pub max_count: u64,
}

// ============================================================================
// Filters
// ============================================================================

/// Server-side filter criteria sent with every fetch
///
/// `None` on a field means no constraint on that field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketFilters {
    pub portnum: Option<u32>,
    /// `Some(true)` for encrypted only, `Some(false)` for decoded only
    pub encrypted: Option<bool>,
}

impl PacketFilters {
    pub fn is_empty(&self) -> bool {
        self.portnum.is_none() && self.encrypted.is_none()
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Permission resources checked by the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Channels,
    Messages,
}

impl Resource {
    fn key(self) -> &'static str {
        match self {
            Resource::Channels => "channels",
            Resource::Messages => "messages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PermissionSet {
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    #[serde(default, rename = "isAdmin")]
    pub is_admin: bool,
}

/// Capability snapshot from the server's auth status endpoint
///
/// The default value grants nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub permissions: HashMap<String, PermissionSet>,
}

impl Capabilities {
    pub fn has_permission(&self, resource: Resource, action: Action) -> bool {
        self.permissions
            .get(resource.key())
            .map(|set| match action {
                Action::Read => set.read,
                Action::Write => set.write,
            })
            .unwrap_or(false)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    /// Both read permissions the packet monitor needs
    pub fn can_view_packets(&self) -> bool {
        self.has_permission(Resource::Channels, Action::Read)
            && self.has_permission(Resource::Messages, Action::Read)
    }

    /// Build a capability set from a list of granted read resources
    #[cfg(test)]
    pub fn with_read(resources: &[Resource], admin: bool) -> Self {
        let permissions = resources
            .iter()
            .map(|r| {
                (
                    r.key().to_string(),
                    PermissionSet {
                        read: true,
                        write: false,
                    },
                )
            })
            .collect();
        Self {
            authenticated: true,
            user: Some(UserInfo { is_admin: admin }),
            permissions,
        }
    }
}

// ============================================================================
// Source seam
// ============================================================================

/// Everything the viewer consumes from the monitoring server
pub trait PacketSource {
    /// Up to `limit` packets starting at `offset`, newest first
    fn fetch_packets(
        &self,
        offset: usize,
        limit: usize,
        filters: &PacketFilters,
    ) -> Result<PacketPage, SourceError>;

    /// Empty the remote packet log
    fn clear_packets(&self) -> Result<(), SourceError>;

    /// Current permissions of the viewer's session
    fn fetch_capabilities(&self) -> Result<Capabilities, SourceError>;

    /// Node id (`!xxxxxxxx`) of the device the server is attached to
    fn fetch_own_node_id(&self) -> Result<Option<String>, SourceError>;
}
