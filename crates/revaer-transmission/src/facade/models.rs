//! Typed arguments and results for facade operations.

use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::Arguments;

/// Where the daemon should fetch a new torrent from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TorrentSource {
    /// Magnet link, URL, or path readable by the daemon.
    Filename(String),
    /// Base64-encoded `.torrent` contents.
    Metainfo(String),
}

impl TorrentSource {
    /// Source from raw `.torrent` bytes.
    #[must_use]
    pub fn metainfo_bytes(bytes: &[u8]) -> Self {
        Self::Metainfo(general_purpose::STANDARD.encode(bytes))
    }

    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Self::Filename(value) | Self::Metainfo(value) => value.trim().is_empty(),
        }
    }
}

/// Arguments for `torrent-add`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AddTorrent {
    /// Torrent source.
    #[serde(flatten)]
    pub source: TorrentSource,
    /// Cookie header forwarded when fetching a URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    /// Download directory override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    /// Add without starting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    /// Maximum peers for this torrent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_limit: Option<u32>,
    /// Bandwidth priority (-1 low, 0 normal, 1 high).
    #[serde(rename = "bandwidthPriority", skip_serializing_if = "Option::is_none")]
    pub bandwidth_priority: Option<i8>,
    /// File indices to download.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files_wanted: Vec<u32>,
    /// File indices to skip.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files_unwanted: Vec<u32>,
    /// Labels attached to the torrent.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl AddTorrent {
    /// Minimal request for the given source.
    #[must_use]
    pub const fn new(source: TorrentSource) -> Self {
        Self {
            source,
            cookies: None,
            download_dir: None,
            paused: None,
            peer_limit: None,
            bandwidth_priority: None,
            files_wanted: Vec::new(),
            files_unwanted: Vec::new(),
            labels: Vec::new(),
        }
    }
}

/// Outcome of `torrent-add`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AddedTorrent {
    /// Daemon-assigned id.
    pub id: i64,
    /// Torrent name.
    #[serde(default)]
    pub name: String,
    /// Info-hash.
    #[serde(rename = "hashString", default)]
    pub hash_string: String,
    /// `true` when the daemon already had this torrent.
    #[serde(default)]
    pub duplicate: bool,
}

/// Arguments for `torrent-set`. Only populated fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TorrentMutation {
    /// Bandwidth priority (-1 low, 0 normal, 1 high).
    #[serde(rename = "bandwidthPriority", skip_serializing_if = "Option::is_none")]
    pub bandwidth_priority: Option<i8>,
    /// Download cap in KB/s.
    #[serde(rename = "downloadLimit", skip_serializing_if = "Option::is_none")]
    pub download_limit: Option<u64>,
    /// Whether the download cap applies.
    #[serde(rename = "downloadLimited", skip_serializing_if = "Option::is_none")]
    pub download_limited: Option<bool>,
    /// Whether session-wide limits apply.
    #[serde(rename = "honorsSessionLimits", skip_serializing_if = "Option::is_none")]
    pub honors_session_limits: Option<bool>,
    /// Replacement label set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// New data location (without moving data).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Maximum peers.
    #[serde(rename = "peer-limit", skip_serializing_if = "Option::is_none")]
    pub peer_limit: Option<u32>,
    /// Queue position.
    #[serde(rename = "queuePosition", skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<u32>,
    /// Seed ratio limit.
    #[serde(rename = "seedRatioLimit", skip_serializing_if = "Option::is_none")]
    pub seed_ratio_limit: Option<f64>,
    /// Seed ratio mode (0 global, 1 single, 2 unlimited).
    #[serde(rename = "seedRatioMode", skip_serializing_if = "Option::is_none")]
    pub seed_ratio_mode: Option<u8>,
    /// Upload cap in KB/s.
    #[serde(rename = "uploadLimit", skip_serializing_if = "Option::is_none")]
    pub upload_limit: Option<u64>,
    /// Whether the upload cap applies.
    #[serde(rename = "uploadLimited", skip_serializing_if = "Option::is_none")]
    pub upload_limited: Option<bool>,
    /// Additional fields passed through verbatim.
    #[serde(flatten)]
    pub extra: Arguments,
}

/// Result of a `recently-active` torrent query.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecentlyActive {
    /// Torrents that changed recently.
    #[serde(default)]
    pub torrents: Vec<Value>,
    /// Ids of torrents removed recently.
    #[serde(default)]
    pub removed: Vec<Value>,
}

/// Result of `free-space`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FreeSpace {
    /// Directory that was queried.
    pub path: String,
    /// Free bytes available.
    pub size_bytes: i64,
}
