//! Torrent operations.

use serde_json::Value;
use tracing::debug;

use super::methods::{
    QUEUE_MOVE_BOTTOM, QUEUE_MOVE_DOWN, QUEUE_MOVE_TOP, QUEUE_MOVE_UP, TORRENT_ADD, TORRENT_GET,
    TORRENT_REANNOUNCE, TORRENT_REMOVE, TORRENT_RENAME_PATH, TORRENT_SET, TORRENT_SET_LOCATION,
    TORRENT_START, TORRENT_START_NOW, TORRENT_STOP, TORRENT_VERIFY,
};
use super::models::{AddTorrent, AddedTorrent, RecentlyActive, TorrentMutation};
use super::{from_arguments, take_field, to_arguments};
use crate::client::TransmissionClient;
use crate::error::{RpcError, RpcResult, Violation};
use crate::params::{Arguments, Selector};

fn selected(selector: &Selector) -> Arguments {
    let mut arguments = Arguments::new();
    selector.apply(&mut arguments);
    arguments
}

fn fields_value(fields: &[&str]) -> Value {
    Value::Array(fields.iter().map(|field| Value::from(*field)).collect())
}

impl TransmissionClient {
    fn torrent_action(&self, method: &str, selector: &Selector) -> RpcResult<()> {
        self.perform_call(method, &selected(selector)).map(|_| ())
    }

    /// Start torrents, respecting the download queue.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn start(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(TORRENT_START, selector)
    }

    /// Start torrents immediately, bypassing the queue.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn start_now(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(TORRENT_START_NOW, selector)
    }

    /// Stop torrents.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn stop(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(TORRENT_STOP, selector)
    }

    /// Queue torrents for verification.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn verify(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(TORRENT_VERIFY, selector)
    }

    /// Ask trackers for more peers.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn reannounce(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(TORRENT_REANNOUNCE, selector)
    }

    /// Apply a mutation to the selected torrents.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn set_torrents(&self, selector: &Selector, mutation: &TorrentMutation) -> RpcResult<()> {
        let mut arguments = to_arguments(mutation, "mutation")?;
        selector.apply(&mut arguments);
        self.perform_call(TORRENT_SET, &arguments).map(|_| ())
    }

    /// Read the given fields of the selected torrents.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `fields` is empty and `ProtocolViolation`
    /// when the response lacks a `torrents` list.
    pub fn get_torrents(&self, selector: &Selector, fields: &[&str]) -> RpcResult<Vec<Value>> {
        if fields.is_empty() {
            return Err(RpcError::invalid("fields", "at least one field is required"));
        }
        let mut arguments = selected(selector);
        arguments.insert("fields".to_string(), fields_value(fields));

        let mut response = self.perform_call(TORRENT_GET, &arguments)?;
        match take_field(&mut response, "torrents")? {
            Value::Array(torrents) => Ok(torrents),
            _ => Err(RpcError::violation(Violation::MalformedBody, 200)),
        }
    }

    /// Read torrents that changed recently, plus ids removed recently.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `fields` is empty.
    pub fn recently_active(&self, fields: &[&str]) -> RpcResult<RecentlyActive> {
        if fields.is_empty() {
            return Err(RpcError::invalid("fields", "at least one field is required"));
        }
        let mut arguments = selected(&Selector::RecentlyActive);
        arguments.insert("fields".to_string(), fields_value(fields));
        from_arguments(self.perform_call(TORRENT_GET, &arguments)?)
    }

    /// Add a torrent.
    ///
    /// A torrent the daemon already knows is reported with `duplicate: true`
    /// rather than as an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty source or when the response
    /// carries neither an added nor a duplicate torrent.
    pub fn add_torrent(&self, request: &AddTorrent) -> RpcResult<AddedTorrent> {
        if request.source.is_empty() {
            return Err(RpcError::invalid("source", "must not be empty"));
        }
        let arguments = to_arguments(request, "request")?;
        let added: AddedTorrent = from_arguments(self.perform_call(TORRENT_ADD, &arguments)?)?;
        debug!(id = added.id, duplicate = added.duplicate, "torrent add acknowledged");
        Ok(added)
    }

    /// Remove torrents, optionally deleting downloaded data.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn remove_torrents(&self, selector: &Selector, delete_local_data: bool) -> RpcResult<()> {
        let mut arguments = selected(selector);
        arguments.insert(
            "delete-local-data".to_string(),
            Value::Bool(delete_local_data),
        );
        self.perform_call(TORRENT_REMOVE, &arguments).map(|_| ())
    }

    /// Point torrents at a new location, moving data when `move_data` is set.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty location.
    pub fn set_location(
        &self,
        selector: &Selector,
        location: &str,
        move_data: bool,
    ) -> RpcResult<()> {
        if location.trim().is_empty() {
            return Err(RpcError::invalid("location", "must not be empty"));
        }
        let mut arguments = selected(selector);
        arguments.insert("location".to_string(), Value::from(location));
        arguments.insert("move".to_string(), Value::Bool(move_data));
        self.perform_call(TORRENT_SET_LOCATION, &arguments)
            .map(|_| ())
    }

    /// Rename a file or directory inside a torrent; returns the daemon's payload.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn rename_path(&self, selector: &Selector, path: &str, name: &str) -> RpcResult<Arguments> {
        let mut arguments = selected(selector);
        arguments.insert("path".to_string(), Value::from(path));
        arguments.insert("name".to_string(), Value::from(name));
        self.perform_call(TORRENT_RENAME_PATH, &arguments)
    }

    /// Move torrents to the top of the queue.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn queue_move_top(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(QUEUE_MOVE_TOP, selector)
    }

    /// Move torrents one position up the queue.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn queue_move_up(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(QUEUE_MOVE_UP, selector)
    }

    /// Move torrents one position down the queue.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn queue_move_down(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(QUEUE_MOVE_DOWN, selector)
    }

    /// Move torrents to the bottom of the queue.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn queue_move_bottom(&self, selector: &Selector) -> RpcResult<()> {
        self.torrent_action(QUEUE_MOVE_BOTTOM, selector)
    }
}
