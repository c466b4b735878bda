//! End-to-end pipeline behaviour against an in-process mock daemon.

use std::time::Duration;

use httpmock::prelude::*;
use revaer_test_support::envelope;
use revaer_test_support::{MockDaemon, RPC_PATH, SESSION_HEADER};
use revaer_transmission::{
    AddTorrent, ClientConfig, NetworkErrorKind, RpcError, Selector, SessionToken, TorrentSource,
    TransmissionClient, Violation,
};
use serde_json::json;

fn config_for(daemon: &MockDaemon) -> ClientConfig {
    ClientConfig::default()
        .with_host(daemon.host())
        .with_port(daemon.port())
        .with_timeout(Duration::from_secs(5))
}

fn client_for(daemon: &MockDaemon) -> TransmissionClient {
    TransmissionClient::new(&config_for(daemon)).expect("client")
}

#[test]
fn conflict_is_renewed_and_retried_once() {
    let daemon = MockDaemon::start();
    let conflict = daemon.conflict_without_session("abc123");
    let success = daemon.succeed(
        "abc123",
        "torrent-get",
        &json!({"ids": [1], "fields": ["id", "name"]}),
        &json!({"torrents": [{"id": 1, "name": "demo"}]}),
    );
    let client = client_for(&daemon);

    let torrents = client
        .get_torrents(&Selector::from(vec![1_i64]), &["id", "name"])
        .expect("torrents");

    assert_eq!(torrents, vec![json!({"id": 1, "name": "demo"})]);
    conflict.assert();
    success.assert();
    assert_eq!(client.session_token(), Some(SessionToken::new("abc123")));
}

#[test]
fn renewed_token_is_reused_by_later_calls() {
    let daemon = MockDaemon::start();
    let conflict = daemon.conflict_without_session("abc123");
    let first = daemon.succeed("abc123", "torrent-start", &json!({"ids": 4}), &json!({}));
    let second = daemon.succeed("abc123", "torrent-stop", &json!({"ids": 4}), &json!({}));
    let client = client_for(&daemon);

    client.start(&Selector::from(4_i64)).expect("start");
    client.stop(&Selector::from(4_i64)).expect("stop");

    conflict.assert();
    first.assert();
    second.assert();
}

#[test]
fn second_conflict_surfaces_as_protocol_violation() {
    let daemon = MockDaemon::start();
    let first = daemon.conflict_without_session("abc123");
    let second = daemon.conflict_for("abc123", "def456");
    let client = client_for(&daemon);

    let err = client.session_stats().expect_err("repeated conflict");

    assert!(matches!(
        err,
        RpcError::ProtocolViolation {
            violation: Violation::RepeatedConflict,
            status: 409
        }
    ));
    first.assert();
    second.assert();
}

#[test]
fn domain_failure_is_reported_verbatim() {
    let daemon = MockDaemon::start();
    let rejected = daemon.respond(
        "T1",
        &envelope::request("torrent-verify", &json!({"ids": [99]})),
        &envelope::failure("no such torrent"),
    );
    let client =
        TransmissionClient::new(&config_for(&daemon).with_session_token("T1")).expect("client");

    let err = client
        .verify(&Selector::from(vec![99_i64]))
        .expect_err("domain failure");

    match err {
        RpcError::Domain { method, message } => {
            assert_eq!(method, "torrent-verify");
            assert_eq!(message, "no such torrent");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    rejected.assert();
}

#[test]
fn credentials_travel_as_basic_auth() {
    let daemon = MockDaemon::start();
    let mock = daemon.server().mock(|when, then| {
        when.method(POST)
            .path(RPC_PATH)
            .header(SESSION_HEADER, "T1")
            .header("authorization", "Basic dXNlcjpwYXNz");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(envelope::success(&json!({"port-is-open": false})));
    });
    let config = config_for(&daemon)
        .with_session_token("T1")
        .with_credentials("user", "pass");
    let client = TransmissionClient::new(&config).expect("client");

    assert!(!client.port_test().expect("port test"));
    mock.assert();
}

#[test]
fn refused_credentials_are_unauthorized() {
    let daemon = MockDaemon::start();
    let mock = daemon.status(401);
    let client = client_for(&daemon);

    let err = client.session_get(&[]).expect_err("unauthorized");

    assert!(matches!(err, RpcError::Unauthorized { status: 401 }));
    mock.assert();
}

#[test]
fn conflict_without_header_is_a_protocol_violation() {
    let daemon = MockDaemon::start();
    let mock = daemon.status(409);
    let client = client_for(&daemon);

    let err = client.session_close().expect_err("missing header");

    assert!(matches!(
        err,
        RpcError::ProtocolViolation {
            violation: Violation::MissingSessionHeader,
            status: 409
        }
    ));
    mock.assert();
}

#[test]
fn duplicate_add_is_a_success() {
    let daemon = MockDaemon::start();
    let magnet = "magnet:?xt=urn:btih:c0ffee";
    let mock = daemon.succeed(
        "T1",
        "torrent-add",
        &json!({"filename": magnet, "paused": true}),
        &json!({"torrent-duplicate": {"id": 7, "name": "demo", "hashString": "c0ffee"}}),
    );
    let client = client_for(&daemon);
    client.set_session_token("T1");

    let mut request = AddTorrent::new(TorrentSource::Filename(magnet.to_string()));
    request.paused = Some(true);
    let added = client.add_torrent(&request).expect("added");

    assert!(added.duplicate);
    assert_eq!(added.id, 7);
    mock.assert();
}

#[test]
fn unreachable_daemon_is_a_connect_failure() {
    let config = ClientConfig::default()
        .with_port(1)
        .with_timeout(Duration::from_secs(2));
    let client = TransmissionClient::new(&config).expect("client");

    let err = client.session_get(&[]).expect_err("connect failure");

    assert!(matches!(
        err,
        RpcError::Network {
            kind: NetworkErrorKind::Connect,
            ..
        }
    ));
    let last = client.last_exchange().expect("recorded");
    assert!(last.response.is_none());
}

#[test]
fn url_text_does_not_change_failure_kind() {
    let config = ClientConfig::default()
        .with_port(1)
        .with_rpc_path("/tls/rpc")
        .with_timeout(Duration::from_secs(2));
    let client = TransmissionClient::new(&config).expect("client");

    let err = client.session_get(&[]).expect_err("connect failure");

    assert!(
        matches!(
            err,
            RpcError::Network {
                kind: NetworkErrorKind::Connect,
                ..
            }
        ),
        "unexpected error: {err:?}"
    );
}
