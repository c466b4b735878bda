//! Client construction parameters.

use std::net::Ipv6Addr;
use std::time::Duration;

use reqwest::Url;

use crate::error::{RpcError, RpcResult};
use crate::session::SessionToken;

/// Default daemon host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default daemon RPC port.
pub const DEFAULT_PORT: u16 = 9091;
/// Default RPC endpoint path.
pub const DEFAULT_RPC_PATH: &str = "/transmission/rpc";
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a `TransmissionClient`.
#[derive(Clone)]
pub struct ClientConfig {
    /// Daemon host name or address.
    pub host: String,
    /// Daemon RPC port.
    pub port: u16,
    /// Use `https` instead of `http`.
    pub tls: bool,
    /// RPC endpoint path.
    pub rpc_path: String,
    /// Optional user name for Basic authentication.
    pub username: Option<String>,
    /// Optional password for Basic authentication.
    pub password: Option<String>,
    /// Timeout applied by the default transport.
    pub timeout: Duration,
    /// Session id to seed the client with, e.g. one persisted across restarts.
    pub session_token: Option<SessionToken>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tls: false,
            rpc_path: DEFAULT_RPC_PATH.to_string(),
            username: None,
            password: None,
            timeout: DEFAULT_TIMEOUT,
            session_token: None,
        }
    }
}

impl ClientConfig {
    /// Set the daemon host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the daemon port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Toggle TLS (changes the scheme only).
    #[must_use]
    pub const fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// Set the RPC endpoint path.
    #[must_use]
    pub fn with_rpc_path(mut self, path: impl Into<String>) -> Self {
        self.rpc_path = path.into();
        self
    }

    /// Set Basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Set the default transport's timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Seed the session id.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(SessionToken::new(token));
        self
    }

    /// Credentials when a user name is configured; a missing password is empty.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.username
            .as_deref()
            .map(|user| (user, self.password.as_deref().unwrap_or_default()))
    }

    /// Fully qualified RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the host, port, or path do not form a valid URL.
    pub fn endpoint(&self) -> RpcResult<Url> {
        if self.host.trim().is_empty() {
            return Err(RpcError::invalid("host", "must not be empty"));
        }
        if self.port == 0 {
            return Err(RpcError::invalid("port", "must be non-zero"));
        }
        let scheme = if self.tls { "https" } else { "http" };
        let path = if self.rpc_path.starts_with('/') {
            self.rpc_path.clone()
        } else {
            format!("/{}", self.rpc_path)
        };
        let host = self.host.trim();
        let host = if host.parse::<Ipv6Addr>().is_ok() {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        format!("{scheme}://{host}:{}{path}", self.port)
            .parse::<Url>()
            .map_err(|_| RpcError::invalid("host", "does not form a valid URL"))
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("rpc_path", &self.rpc_path)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("session_token", &self.session_token)
            .finish()
    }
}
