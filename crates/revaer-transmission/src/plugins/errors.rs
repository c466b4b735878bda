//! Transport error classification plugin.

use std::error::Error;
use std::io;

use super::Next;
use crate::error::{NetworkErrorKind, RpcError, RpcResult};
use crate::transport::{HttpRequest, HttpResponse, TransportError};

/// Innermost plugin: calls the transport and classifies its failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportErrorMapper;

impl TransportErrorMapper {
    #[allow(
        clippy::needless_pass_by_value,
        reason = "every plugin handler takes ownership of the request"
    )]
    pub(super) fn handle(&self, request: HttpRequest, next: Next<'_>) -> RpcResult<HttpResponse> {
        next.transport()
            .send(&request)
            .map_err(|source| self.map(source))
    }

    /// Wrap a transport failure as `RpcError::Network` with a classified kind.
    #[must_use]
    pub fn map(&self, source: TransportError) -> RpcError {
        let kind = classify(source.as_ref());
        tracing::debug!(kind = %kind, error = %source, "transport failure");
        RpcError::Network { kind, source }
    }
}

fn chain<'a>(
    error: &'a (dyn Error + 'static),
) -> impl Iterator<Item = &'a (dyn Error + 'static)> {
    std::iter::successors(Some(error), |err: &&'a (dyn Error + 'static)| (*err).source())
}

fn classify(error: &(dyn Error + 'static)) -> NetworkErrorKind {
    let mut connect = false;
    for err in chain(error) {
        if let Some(http) = err.downcast_ref::<reqwest::Error>() {
            if http.is_timeout() {
                return NetworkErrorKind::Timeout;
            }
            connect |= http.is_connect();
        } else if let Some(io) = err.downcast_ref::<io::Error>() {
            match io.kind() {
                io::ErrorKind::TimedOut => return NetworkErrorKind::Timeout,
                io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected => return NetworkErrorKind::Connect,
                _ => {}
            }
        }
    }

    // reqwest messages embed the request URL, so only lower layers are read.
    for err in chain(error).filter(|err| !err.is::<reqwest::Error>()) {
        let text = err.to_string().to_ascii_lowercase();
        if text.contains("dns error") || text.contains("failed to lookup address") {
            return NetworkErrorKind::Dns;
        }
        if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
            return NetworkErrorKind::Tls;
        }
    }

    if connect {
        NetworkErrorKind::Connect
    } else {
        NetworkErrorKind::Other
    }
}
