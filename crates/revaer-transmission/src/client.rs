//! Request orchestration and the public client entry points.
//!
//! # Design
//! - One logical call is `Building → Sending → Classifying`, with a single
//!   `Renewing → Sending` detour when the daemon reports a session conflict.
//! - The renewed token is pinned on the retried request, so a concurrent
//!   renewal by another call cannot leak into this call's retry.
//! - The plugin chain is swapped as a whole; each call runs on a snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{RpcError, RpcResult, Violation};
use crate::mediator::{STATUS_CONFLICT, Verdict, classify, decode_success};
use crate::params::{Arguments, normalize};
use crate::plugins::{
    BasicAuth, HistoryRecorder, LastExchange, Plugin, PluginChain, PluginKind, SessionInjector,
    TransportErrorMapper,
};
use crate::session::{SessionState, SessionToken};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

#[derive(Serialize)]
struct RequestBody<'a> {
    method: &'a str,
    arguments: &'a Arguments,
}

/// Which attempt of a logical call is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Attempt {
    First,
    Renewed(SessionToken),
}

impl Attempt {
    const fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Renewed(_) => 2,
        }
    }
}

/// Session-aware client for the daemon's RPC endpoint.
///
/// The client is `Send + Sync`; share it across threads behind an `Arc`.
pub struct TransmissionClient {
    endpoint: Url,
    transport: Arc<dyn Transport>,
    session: SessionState,
    history: HistoryRecorder,
    chain: RwLock<Arc<PluginChain>>,
}

impl TransmissionClient {
    /// Build a client using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unusable endpoint and `Network` when the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig) -> RpcResult<Self> {
        let transport =
            ReqwestTransport::new(config.timeout).map_err(|source| TransportErrorMapper.map(source))?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client over a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the configured endpoint is not a valid URL.
    pub fn with_transport(config: &ClientConfig, transport: Arc<dyn Transport>) -> RpcResult<Self> {
        let endpoint = config.endpoint()?;
        let session = config
            .session_token
            .clone()
            .map_or_else(SessionState::new, SessionState::seeded);
        let history = HistoryRecorder::default();

        let mut chain = PluginChain::new()
            .with(Plugin::TransportErrors(TransportErrorMapper))
            .with(Plugin::History(history.clone()))
            .with(Plugin::Session(SessionInjector::new(session.clone())));
        if let Some((username, password)) = config.credentials() {
            chain.install(Plugin::Authentication(BasicAuth::new(username, password)));
        }

        Ok(Self {
            endpoint,
            transport,
            session,
            history,
            chain: RwLock::new(Arc::new(chain)),
        })
    }

    /// RPC endpoint this client talks to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Perform one RPC call and return the decoded `arguments` on success.
    ///
    /// A session conflict is renewed and retried exactly once; every other
    /// failure is returned to the caller.
    ///
    /// # Errors
    ///
    /// - `Network` when the transport fails.
    /// - `Domain` when the daemon reports a non-success `result`.
    /// - `ProtocolViolation` for malformed responses or a second conflict.
    /// - `Unauthorized` when the daemon refuses the credentials.
    pub fn perform_call(&self, method: &str, arguments: &Arguments) -> RpcResult<Arguments> {
        let body = Self::build_body(method, arguments)?;
        let chain = self.chain_snapshot();
        let mut attempt = Attempt::First;

        loop {
            let mut request = HttpRequest::json(self.endpoint.clone(), method, body.clone());
            if let Attempt::Renewed(token) = &attempt {
                request.renewed_session = Some(token.clone());
            }

            debug!(method, attempt = attempt.number(), "sending rpc request");
            let response = chain.execute(request, self.transport.as_ref())?;

            match (classify(&response)?, attempt) {
                (Verdict::Success(envelope), _) => {
                    return decode_success(method, envelope.arguments);
                }
                (Verdict::Rejected(envelope), _) => {
                    debug!(method, result = %envelope.result, "daemon rejected request");
                    return Err(RpcError::Domain {
                        method: method.to_string(),
                        message: envelope.result,
                    });
                }
                (Verdict::Conflict(token), Attempt::First) => {
                    debug!(method, "session conflict; renewing session id");
                    self.session.set(token.clone());
                    attempt = Attempt::Renewed(token);
                }
                (Verdict::Conflict(_), Attempt::Renewed(_)) => {
                    warn!(method, "session conflict persisted after renewal");
                    return Err(RpcError::violation(
                        Violation::RepeatedConflict,
                        STATUS_CONFLICT,
                    ));
                }
            }
        }
    }

    /// Replace the Basic authentication credentials.
    pub fn set_credentials(&self, username: impl Into<String>, password: impl Into<String>) {
        let auth = BasicAuth::new(username, password);
        self.update_chain(|chain| chain.install(Plugin::Authentication(auth)));
    }

    /// Stop sending credentials.
    pub fn clear_credentials(&self) {
        self.update_chain(|chain| {
            chain.remove(PluginKind::Authentication);
        });
    }

    /// User name currently sent with requests, if any.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        match self.chain_snapshot().get(PluginKind::Authentication) {
            Some(Plugin::Authentication(auth)) => Some(auth.username().to_string()),
            _ => None,
        }
    }

    /// Pre-seed or override the session id.
    pub fn set_session_token(&self, token: impl Into<String>) {
        self.session.set(SessionToken::new(token));
    }

    /// Currently known session id.
    #[must_use]
    pub fn session_token(&self) -> Option<SessionToken> {
        self.session.get()
    }

    /// Most recent request/response pair, including retried attempts.
    #[must_use]
    pub fn last_exchange(&self) -> Option<LastExchange> {
        self.history.last()
    }

    fn build_body(method: &str, arguments: &Arguments) -> RpcResult<Vec<u8>> {
        if method.trim().is_empty() {
            return Err(RpcError::invalid("method", "must not be empty"));
        }
        let arguments = normalize(arguments);
        serde_json::to_vec(&RequestBody {
            method,
            arguments: &arguments,
        })
        .map_err(|_| RpcError::invalid("arguments", "not serialisable as JSON"))
    }

    fn chain_snapshot(&self) -> Arc<PluginChain> {
        Arc::clone(&self.chain.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update_chain(&self, update: impl FnOnce(&mut PluginChain)) {
        let mut guard = self.chain.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = PluginChain::clone(&guard);
        update(&mut next);
        *guard = Arc::new(next);
    }
}

impl std::fmt::Debug for TransmissionClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TransmissionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("session", &self.session)
            .field("plugins", &self.chain_snapshot().kinds())
            .finish_non_exhaustive()
    }
}
