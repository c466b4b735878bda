//! Ordered request/response interceptors wrapped around the transport call.
//!
//! # Design
//! - Plugins are tagged variants; the chain keeps them sorted by `PluginKind` rank.
//! - Installing a plugin replaces the one with the same kind in place.
//! - Execution is middleware-style: each plugin receives the request and a `Next`
//!   continuation, so it can act before sending, after receiving, or both.

mod auth;
mod errors;
mod history;
mod session;

pub use auth::BasicAuth;
pub use errors::TransportErrorMapper;
pub use history::{HistoryRecorder, LastExchange};
pub use session::SessionInjector;

use crate::error::{NetworkErrorKind, RpcError, RpcResult};
use crate::transport::{HttpRequest, HttpResponse, Transport};

/// Capability tag used to look plugins up and to fix their order.
///
/// Declaration order is outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PluginKind {
    /// Attaches credentials.
    Authentication,
    /// Attaches the session id header.
    Session,
    /// Records the last exchange.
    History,
    /// Translates transport failures into `RpcError::Network`.
    TransportErrors,
}

/// A single interceptor in the chain.
#[derive(Debug, Clone)]
pub enum Plugin {
    /// Basic credentials.
    Authentication(BasicAuth),
    /// Session id injection.
    Session(SessionInjector),
    /// Exchange recording.
    History(HistoryRecorder),
    /// Transport error classification.
    TransportErrors(TransportErrorMapper),
}

impl Plugin {
    /// Capability tag of this plugin.
    #[must_use]
    pub const fn kind(&self) -> PluginKind {
        match self {
            Self::Authentication(_) => PluginKind::Authentication,
            Self::Session(_) => PluginKind::Session,
            Self::History(_) => PluginKind::History,
            Self::TransportErrors(_) => PluginKind::TransportErrors,
        }
    }

    fn handle(&self, request: HttpRequest, next: Next<'_>) -> RpcResult<HttpResponse> {
        match self {
            Self::Authentication(plugin) => plugin.handle(request, next),
            Self::Session(plugin) => plugin.handle(request, next),
            Self::History(plugin) => plugin.handle(request, next),
            Self::TransportErrors(plugin) => plugin.handle(request, next),
        }
    }
}

/// Remaining plugins plus the transport at the bottom of the chain.
pub struct Next<'a> {
    plugins: &'a [Plugin],
    transport: &'a dyn Transport,
}

impl Next<'_> {
    /// Hand the request to the next plugin, or to the transport when none remain.
    ///
    /// # Errors
    ///
    /// Propagates failures from inner plugins or the transport.
    pub fn run(self, request: HttpRequest) -> RpcResult<HttpResponse> {
        match self.plugins.split_first() {
            Some((plugin, rest)) => plugin.handle(
                request,
                Next {
                    plugins: rest,
                    transport: self.transport,
                },
            ),
            None => self
                .transport
                .send(&request)
                .map_err(|source| RpcError::Network {
                    kind: NetworkErrorKind::Other,
                    source,
                }),
        }
    }

    /// Transport at the bottom of the chain, bypassing any remaining plugins.
    fn transport(&self) -> &dyn Transport {
        self.transport
    }
}

/// Ordered collection of plugins, outermost first.
#[derive(Debug, Clone, Default)]
pub struct PluginChain {
    plugins: Vec<Plugin>,
}

impl PluginChain {
    /// Empty chain; requests go straight to the transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a plugin, replacing any plugin of the same kind.
    pub fn install(&mut self, plugin: Plugin) {
        let kind = plugin.kind();
        match self.plugins.binary_search_by_key(&kind, Plugin::kind) {
            Ok(index) => self.plugins[index] = plugin,
            Err(index) => self.plugins.insert(index, plugin),
        }
    }

    /// Builder-style variant of [`PluginChain::install`].
    #[must_use]
    pub fn with(mut self, plugin: Plugin) -> Self {
        self.install(plugin);
        self
    }

    /// Remove the plugin of the given kind, returning it when present.
    pub fn remove(&mut self, kind: PluginKind) -> Option<Plugin> {
        self.plugins
            .binary_search_by_key(&kind, Plugin::kind)
            .ok()
            .map(|index| self.plugins.remove(index))
    }

    /// Plugin of the given kind, when installed.
    #[must_use]
    pub fn get(&self, kind: PluginKind) -> Option<&Plugin> {
        self.plugins
            .binary_search_by_key(&kind, Plugin::kind)
            .ok()
            .map(|index| &self.plugins[index])
    }

    /// Installed plugin kinds, outermost first.
    #[must_use]
    pub fn kinds(&self) -> Vec<PluginKind> {
        self.plugins.iter().map(Plugin::kind).collect()
    }

    /// Run the request through every plugin and the transport.
    ///
    /// # Errors
    ///
    /// Returns whatever error a plugin or the transport produced.
    pub fn execute(
        &self,
        request: HttpRequest,
        transport: &dyn Transport,
    ) -> RpcResult<HttpResponse> {
        Next {
            plugins: &self.plugins,
            transport,
        }
        .run(request)
    }
}
