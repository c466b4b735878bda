#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Session-aware client for the Transmission RPC protocol.
//!
//! Layout:
//! - `params.rs`: identifier selectors and argument normalisation
//! - `session.rs`: shared session token state
//! - `transport.rs`: raw HTTP exchange types and the default `reqwest` transport
//! - `plugins/`: ordered request/response interceptors (auth, session, history, errors)
//! - `mediator.rs`: response envelope decoding and conflict detection
//! - `client.rs`: request orchestration, session renewal, and public entry points
//! - `facade/`: named daemon operations built on `TransmissionClient::perform_call`

pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod mediator;
pub mod params;
pub mod plugins;
pub mod session;
pub mod transport;

pub use client::TransmissionClient;
pub use config::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RPC_PATH};
pub use error::{NetworkErrorKind, RpcError, RpcResult, Violation};
pub use facade::{
    AddTorrent, AddedTorrent, FreeSpace, RecentlyActive, TorrentMutation, TorrentSource,
};
pub use mediator::{Envelope, SESSION_ID_HEADER, Verdict, classify, decode_success};
pub use params::{Arguments, Selector, TorrentRef, normalize};
pub use plugins::{LastExchange, Plugin, PluginChain, PluginKind};
pub use session::{SessionState, SessionToken};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
