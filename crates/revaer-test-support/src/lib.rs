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

//! Shared test helpers used across integration suites.
//! Layout: daemon.rs (mock RPC daemon), envelope.rs (response body builders).

pub mod daemon;
pub mod envelope;

pub use daemon::{MockDaemon, RPC_PATH, SESSION_HEADER};
