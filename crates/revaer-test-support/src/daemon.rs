//! In-process stand-in for the daemon's RPC endpoint.

use httpmock::prelude::*;
use httpmock::{Mock, MockServer};
use serde_json::Value;

use crate::envelope;

/// Path the daemon serves RPC on by default.
pub const RPC_PATH: &str = "/transmission/rpc";

/// Header carrying the session id.
pub const SESSION_HEADER: &str = "x-transmission-session-id";

/// Mock daemon bound to an ephemeral local port.
pub struct MockDaemon {
    server: MockServer,
}

impl MockDaemon {
    /// Start a fresh mock daemon.
    #[must_use]
    pub fn start() -> Self {
        Self {
            server: MockServer::start(),
        }
    }

    /// Host the daemon listens on.
    #[must_use]
    pub fn host(&self) -> String {
        self.server.host()
    }

    /// Port the daemon listens on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.server.port()
    }

    /// Underlying server, for bespoke expectations.
    #[must_use]
    pub const fn server(&self) -> &MockServer {
        &self.server
    }

    /// Answer requests lacking a session id with `409` and a fresh `token`.
    #[must_use]
    pub fn conflict_without_session(&self, token: &str) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST).path(RPC_PATH).header_missing(SESSION_HEADER);
            then.status(409)
                .header(SESSION_HEADER, token)
                .body("<h1>409: Conflict</h1>");
        })
    }

    /// Answer every request carrying `token` with `409` and `next`.
    #[must_use]
    pub fn conflict_for(&self, token: &str, next: &str) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST).path(RPC_PATH).header(SESSION_HEADER, token);
            then.status(409)
                .header(SESSION_HEADER, next)
                .body("<h1>409: Conflict</h1>");
        })
    }

    /// Answer `request` sent with `token` by the given envelope.
    #[must_use]
    pub fn respond(&self, token: &str, request: &Value, envelope: &Value) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST)
                .path(RPC_PATH)
                .header(SESSION_HEADER, token)
                .json_body(request.clone());
            then.status(200)
                .header("content-type", "application/json")
                .json_body(envelope.clone());
        })
    }

    /// Answer a `method` call with a success envelope carrying `arguments`.
    #[must_use]
    pub fn succeed(
        &self,
        token: &str,
        method: &str,
        request_arguments: &Value,
        arguments: &Value,
    ) -> Mock<'_> {
        self.respond(
            token,
            &envelope::request(method, request_arguments),
            &envelope::success(arguments),
        )
    }

    /// Answer every request with a bare status code.
    #[must_use]
    pub fn status(&self, status: u16) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST).path(RPC_PATH);
            then.status(status);
        })
    }
}

impl std::fmt::Debug for MockDaemon {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("MockDaemon")
            .field("address", self.server.address())
            .finish()
    }
}
