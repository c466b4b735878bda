//! Last-exchange recorder.

use std::sync::{Arc, Mutex, PoisonError};

use super::Next;
use crate::error::RpcResult;
use crate::transport::{HttpRequest, HttpResponse};

/// Most recent request and the response it received.
#[derive(Debug, Clone)]
pub struct LastExchange {
    /// Request as it left the chain's inner plugins.
    pub request: HttpRequest,
    /// Response, or `None` when the transport failed.
    pub response: Option<HttpResponse>,
}

/// Keeps the last exchange for diagnostics. Never consulted for control flow.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    last: Arc<Mutex<Option<LastExchange>>>,
}

impl HistoryRecorder {
    /// Recorded exchange, if any attempt has been made.
    #[must_use]
    pub fn last(&self) -> Option<LastExchange> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, exchange: LastExchange) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(exchange);
    }

    pub(super) fn handle(&self, request: HttpRequest, next: Next<'_>) -> RpcResult<HttpResponse> {
        let sent = request.clone();
        let outcome = next.run(request);
        self.record(LastExchange {
            request: sent,
            response: outcome.as_ref().ok().cloned(),
        });
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{Plugin, PluginChain};
    use crate::transport::{Transport, TransportError};
    use reqwest::Url;

    struct StatusTransport(u16);

    impl Transport for StatusTransport {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Ok(HttpResponse::new(self.0, Vec::new()))
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(Box::new(std::io::Error::other("down")))
        }
    }

    fn request(method: &str) -> HttpRequest {
        let url: Url = "http://localhost:9091/transmission/rpc"
            .parse()
            .expect("valid URL");
        HttpRequest::json(url, method, Vec::new())
    }

    #[test]
    fn each_attempt_overwrites_the_record() {
        let recorder = HistoryRecorder::default();
        let chain = PluginChain::new().with(Plugin::History(recorder.clone()));
        assert!(recorder.last().is_none());

        let _ = chain.execute(request("torrent-get"), &StatusTransport(409));
        let _ = chain.execute(request("torrent-get"), &StatusTransport(200));

        let last = recorder.last().expect("exchange recorded");
        assert_eq!(last.response.map(|response| response.status), Some(200));
    }

    #[test]
    fn transport_failures_are_recorded_without_response() {
        let recorder = HistoryRecorder::default();
        let chain = PluginChain::new().with(Plugin::History(recorder.clone()));

        let _ = chain.execute(request("session-get"), &FailingTransport);

        let last = recorder.last().expect("exchange recorded");
        assert_eq!(last.request.method, "session-get");
        assert!(last.response.is_none());
    }
}
