//! Error types for the RPC pipeline.
//!
//! # Design
//! - Keep display messages constant; carry operational context in fields.
//! - Only session conflicts are recovered locally; every variant here is surfaced.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

use crate::transport::TransportError;

/// Primary error type for RPC calls.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The transport could not complete the exchange.
    #[error("network failure")]
    Network {
        /// Coarse classification of the transport failure.
        kind: NetworkErrorKind,
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },
    /// The daemon answered in a way the protocol does not allow.
    #[error("protocol violation")]
    ProtocolViolation {
        /// Which protocol rule was broken.
        violation: Violation,
        /// HTTP status of the offending response.
        status: u16,
    },
    /// The daemon parsed the request but reported a failure in `result`.
    #[error("daemon rejected request")]
    Domain {
        /// RPC method that was rejected.
        method: String,
        /// Message reported by the daemon, verbatim.
        message: String,
    },
    /// The daemon refused the supplied credentials.
    #[error("daemon rejected credentials")]
    Unauthorized {
        /// HTTP status returned by the daemon.
        status: u16,
    },
    /// A call was shaped incorrectly before or after contacting the daemon.
    #[error("invalid argument")]
    InvalidArgument {
        /// Field or argument that failed validation.
        field: &'static str,
        /// Static reason describing the problem.
        reason: &'static str,
    },
}

/// Convenience alias for RPC results.
pub type RpcResult<T> = Result<T, RpcError>;

impl RpcError {
    /// Build an `InvalidArgument` error.
    #[must_use]
    pub const fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { field, reason }
    }

    /// Build a `ProtocolViolation` error for the given status.
    #[must_use]
    pub const fn violation(violation: Violation, status: u16) -> Self {
        Self::ProtocolViolation { violation, status }
    }

    /// Human-readable description including the structured context.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Network { kind, source } => format!("{self} ({kind}): {source}"),
            Self::ProtocolViolation { violation, status } => {
                format!("{self}: {violation} (status {status})")
            }
            Self::Domain { method, message } => format!("{self}: {method}: {message}"),
            Self::Unauthorized { status } => format!("{self} (status {status})"),
            Self::InvalidArgument { field, reason } => format!("{self}: {field}: {reason}"),
        }
    }
}

/// Classification of transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// The connection could not be established.
    Connect,
    /// The request or response timed out.
    Timeout,
    /// TLS negotiation failed.
    Tls,
    /// Host name resolution failed.
    Dns,
    /// Any other transport failure.
    Other,
}

impl Display for NetworkErrorKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Tls => "tls",
            Self::Dns => "dns",
            Self::Other => "other",
        })
    }
}

/// Protocol rules the daemon can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// A 409 response arrived without a usable session header.
    MissingSessionHeader,
    /// The response body was not a valid `{result, arguments}` envelope.
    MalformedBody,
    /// The retried attempt was rejected with a second session conflict.
    RepeatedConflict,
    /// The daemon answered with a status the protocol does not define.
    UnexpectedStatus,
}

impl Display for Violation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::MissingSessionHeader => "session conflict without session id header",
            Self::MalformedBody => "response body is not a valid envelope",
            Self::RepeatedConflict => "session conflict after renewing the session id",
            Self::UnexpectedStatus => "unexpected HTTP status",
        })
    }
}
