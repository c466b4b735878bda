//! Session id injection plugin.

use reqwest::header::HeaderValue;

use super::Next;
use crate::error::{RpcError, RpcResult};
use crate::mediator::SESSION_ID_HEADER;
use crate::session::SessionState;
use crate::transport::{HttpRequest, HttpResponse};

/// Adds the current session id to every request.
///
/// The state is read at send time, so renewals are picked up without
/// reinstalling the plugin. A token pinned on the request by a renewing call
/// wins over the shared state.
#[derive(Debug, Clone)]
pub struct SessionInjector {
    state: SessionState,
}

impl SessionInjector {
    /// Injector reading from the given session state.
    #[must_use]
    pub const fn new(state: SessionState) -> Self {
        Self { state }
    }

    pub(super) fn handle(
        &self,
        mut request: HttpRequest,
        next: Next<'_>,
    ) -> RpcResult<HttpResponse> {
        let token = request
            .renewed_session
            .clone()
            .or_else(|| self.state.get());
        if let Some(token) = token {
            let value = HeaderValue::from_str(token.as_str()).map_err(|_| {
                RpcError::invalid("session_token", "contains characters not allowed in a header")
            })?;
            request.headers.insert(SESSION_ID_HEADER, value);
        }
        next.run(request)
    }
}
