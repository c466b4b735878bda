//! Named daemon operations layered over `TransmissionClient::perform_call`.
//!
//! Each operation builds an argument map with the daemon's field names and a
//! fixed method name. No retry or error translation happens here.

mod models;
mod session;
mod torrents;

pub use models::{
    AddTorrent, AddedTorrent, FreeSpace, RecentlyActive, TorrentMutation, TorrentSource,
};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{RpcError, RpcResult, Violation};
use crate::params::Arguments;

/// Wire method names used by the facade.
pub mod methods {
    /// Start torrents (respecting the queue).
    pub const TORRENT_START: &str = "torrent-start";
    /// Start torrents immediately, bypassing the queue.
    pub const TORRENT_START_NOW: &str = "torrent-start-now";
    /// Stop torrents.
    pub const TORRENT_STOP: &str = "torrent-stop";
    /// Re-verify local data.
    pub const TORRENT_VERIFY: &str = "torrent-verify";
    /// Ask trackers for more peers.
    pub const TORRENT_REANNOUNCE: &str = "torrent-reannounce";
    /// Mutate torrent properties.
    pub const TORRENT_SET: &str = "torrent-set";
    /// Read torrent fields.
    pub const TORRENT_GET: &str = "torrent-get";
    /// Add a torrent.
    pub const TORRENT_ADD: &str = "torrent-add";
    /// Remove torrents.
    pub const TORRENT_REMOVE: &str = "torrent-remove";
    /// Move torrent data.
    pub const TORRENT_SET_LOCATION: &str = "torrent-set-location";
    /// Rename a file or directory inside a torrent.
    pub const TORRENT_RENAME_PATH: &str = "torrent-rename-path";
    /// Move to the top of the queue.
    pub const QUEUE_MOVE_TOP: &str = "queue-move-top";
    /// Move one step up the queue.
    pub const QUEUE_MOVE_UP: &str = "queue-move-up";
    /// Move one step down the queue.
    pub const QUEUE_MOVE_DOWN: &str = "queue-move-down";
    /// Move to the bottom of the queue.
    pub const QUEUE_MOVE_BOTTOM: &str = "queue-move-bottom";
    /// Read session settings.
    pub const SESSION_GET: &str = "session-get";
    /// Mutate session settings.
    pub const SESSION_SET: &str = "session-set";
    /// Read session statistics.
    pub const SESSION_STATS: &str = "session-stats";
    /// Shut the daemon down.
    pub const SESSION_CLOSE: &str = "session-close";
    /// Refresh the blocklist.
    pub const BLOCKLIST_UPDATE: &str = "blocklist-update";
    /// Test whether the peer port is reachable.
    pub const PORT_TEST: &str = "port-test";
    /// Query free space for a directory.
    pub const FREE_SPACE: &str = "free-space";
}

/// Serialise a typed argument struct into an argument map.
fn to_arguments<T: Serialize>(value: &T, field: &'static str) -> RpcResult<Arguments> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(RpcError::invalid(field, "must serialise to a JSON object")),
    }
}

/// Decode a success payload into a typed value.
fn from_arguments<T: DeserializeOwned>(arguments: Arguments) -> RpcResult<T> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|_| RpcError::violation(Violation::MalformedBody, 200))
}

/// Pull a required field out of a success payload.
fn take_field(arguments: &mut Arguments, key: &str) -> RpcResult<Value> {
    arguments
        .remove(key)
        .ok_or_else(|| RpcError::violation(Violation::MalformedBody, 200))
}
