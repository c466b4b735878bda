//! Session-wide and miscellaneous daemon operations.

use serde_json::Value;

use super::methods::{
    BLOCKLIST_UPDATE, FREE_SPACE, PORT_TEST, SESSION_CLOSE, SESSION_GET, SESSION_SET,
    SESSION_STATS,
};
use super::models::FreeSpace;
use super::{from_arguments, take_field};
use crate::client::TransmissionClient;
use crate::error::{RpcError, RpcResult, Violation};
use crate::params::Arguments;

impl TransmissionClient {
    /// Read session settings, optionally restricted to `fields`.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn session_get(&self, fields: &[&str]) -> RpcResult<Arguments> {
        let mut arguments = Arguments::new();
        if !fields.is_empty() {
            arguments.insert(
                "fields".to_string(),
                Value::Array(fields.iter().map(|field| Value::from(*field)).collect()),
            );
        }
        self.perform_call(SESSION_GET, &arguments)
    }

    /// Apply session settings verbatim.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty mutation.
    pub fn session_set(&self, settings: &Arguments) -> RpcResult<()> {
        if settings.is_empty() {
            return Err(RpcError::invalid("settings", "at least one setting is required"));
        }
        self.perform_call(SESSION_SET, settings).map(|_| ())
    }

    /// Read transfer statistics.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn session_stats(&self) -> RpcResult<Arguments> {
        self.perform_call(SESSION_STATS, &Arguments::new())
    }

    /// Ask the daemon to shut down.
    ///
    /// # Errors
    ///
    /// Propagates any pipeline failure.
    pub fn session_close(&self) -> RpcResult<()> {
        self.perform_call(SESSION_CLOSE, &Arguments::new())
            .map(|_| ())
    }

    /// Refresh the blocklist and return the number of rules loaded.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolViolation` when the response lacks `blocklist-size`.
    pub fn blocklist_update(&self) -> RpcResult<u64> {
        let mut response = self.perform_call(BLOCKLIST_UPDATE, &Arguments::new())?;
        take_field(&mut response, "blocklist-size")?
            .as_u64()
            .ok_or_else(|| RpcError::violation(Violation::MalformedBody, 200))
    }

    /// Check whether the daemon's peer port is reachable from outside.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolViolation` when the response lacks `port-is-open`.
    pub fn port_test(&self) -> RpcResult<bool> {
        let mut response = self.perform_call(PORT_TEST, &Arguments::new())?;
        take_field(&mut response, "port-is-open")?
            .as_bool()
            .ok_or_else(|| RpcError::violation(Violation::MalformedBody, 200))
    }

    /// Query free space in a directory on the daemon's host.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty path.
    pub fn free_space(&self, path: &str) -> RpcResult<FreeSpace> {
        if path.trim().is_empty() {
            return Err(RpcError::invalid("path", "must not be empty"));
        }
        let mut arguments = Arguments::new();
        arguments.insert("path".to_string(), Value::from(path));
        from_arguments(self.perform_call(FREE_SPACE, &arguments)?)
    }
}
