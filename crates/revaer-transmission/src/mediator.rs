//! Response classification.
//!
//! # Design
//! - Conflict is recognised from the status code alone; the new token comes from the header.
//! - Success versus domain failure is decided by the envelope's `result` field.
//! - Anything the protocol does not define becomes a `ProtocolViolation`.
//! - `torrent-add` payloads are reduced to the torrent they describe, with a
//!   `duplicate` marker, so callers never branch on the two response keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{RpcError, RpcResult, Violation};
use crate::params::Arguments;
use crate::session::SessionToken;
use crate::transport::HttpResponse;

/// Header carrying the session id in both directions.
pub const SESSION_ID_HEADER: &str = "x-transmission-session-id";

/// `result` value signalling success.
pub const RESULT_SUCCESS: &str = "success";

/// Status reserved for "resend with a session id".
pub const STATUS_CONFLICT: u16 = 409;

/// Method whose success payload is reshaped by [`decode_success`].
pub const METHOD_TORRENT_ADD: &str = "torrent-add";

/// `torrent-add` response key for a newly added torrent.
pub const TORRENT_ADDED: &str = "torrent-added";

/// `torrent-add` response key for a torrent the daemon already had.
pub const TORRENT_DUPLICATE: &str = "torrent-duplicate";

/// Marker merged into `torrent-add` results.
pub const DUPLICATE_KEY: &str = "duplicate";

const STATUS_OK: u16 = 200;
const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_FORBIDDEN: u16 = 403;

/// The `{result, arguments}` wrapper every RPC response shares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// `"success"` or the daemon's error message.
    pub result: String,
    /// Method-specific payload.
    #[serde(default)]
    pub arguments: Arguments,
}

impl Envelope {
    /// Whether the daemon reported success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == RESULT_SUCCESS
    }
}

/// Outcome of classifying one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The daemon accepted the request.
    Success(Envelope),
    /// The daemon parsed the request but reported a failure.
    Rejected(Envelope),
    /// The daemon demands a (new) session id.
    Conflict(SessionToken),
}

/// Classify a raw response.
///
/// # Errors
///
/// Returns `ProtocolViolation` when a conflict carries no session id, when the
/// body is not a valid envelope, or when the status is not part of the
/// protocol; `Unauthorized` when the daemon refuses the credentials.
pub fn classify(response: &HttpResponse) -> RpcResult<Verdict> {
    match response.status {
        STATUS_CONFLICT => response
            .header(SESSION_ID_HEADER)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Verdict::Conflict(SessionToken::new(token)))
            .ok_or_else(|| {
                RpcError::violation(Violation::MissingSessionHeader, response.status)
            }),
        STATUS_OK => {
            let envelope = serde_json::from_slice::<Envelope>(&response.body)
                .map_err(|_| RpcError::violation(Violation::MalformedBody, response.status))?;
            if envelope.is_success() {
                Ok(Verdict::Success(envelope))
            } else {
                Ok(Verdict::Rejected(envelope))
            }
        }
        STATUS_UNAUTHORIZED | STATUS_FORBIDDEN => Err(RpcError::Unauthorized {
            status: response.status,
        }),
        status => Err(RpcError::violation(Violation::UnexpectedStatus, status)),
    }
}

/// Turn a success payload into the value handed back to the caller.
///
/// Only `torrent-add` is reshaped; every other payload passes through.
///
/// # Errors
///
/// Returns `InvalidArgument` when a `torrent-add` payload holds neither an
/// added nor a duplicate torrent, and `ProtocolViolation` when that payload is
/// not an object.
pub fn decode_success(method: &str, mut arguments: Arguments) -> RpcResult<Arguments> {
    if method != METHOD_TORRENT_ADD {
        return Ok(arguments);
    }

    let (payload, duplicate) = if let Some(added) = arguments.remove(TORRENT_ADDED) {
        (added, false)
    } else if let Some(existing) = arguments.remove(TORRENT_DUPLICATE) {
        (existing, true)
    } else {
        return Err(RpcError::invalid(
            "response",
            "neither torrent-added nor torrent-duplicate present",
        ));
    };

    let Value::Object(mut torrent) = payload else {
        return Err(RpcError::violation(Violation::MalformedBody, STATUS_OK));
    };
    torrent.insert(DUPLICATE_KEY.to_string(), Value::Bool(duplicate));
    Ok(torrent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(200, body.as_bytes().to_vec())
    }

    #[test]
    fn success_envelope_yields_arguments() {
        let verdict = classify(&ok(r#"{"result":"success","arguments":{"x":1}}"#))
            .expect("valid envelope");
        let Verdict::Success(envelope) = verdict else {
            panic!("expected success, got {verdict:?}");
        };
        assert_eq!(json!(envelope.arguments), json!({"x": 1}));
    }

    #[test]
    fn non_success_result_is_rejected_with_message() {
        let verdict =
            classify(&ok(r#"{"result":"bad id","arguments":{}}"#)).expect("valid envelope");
        assert!(matches!(verdict, Verdict::Rejected(ref env) if env.result == "bad id"));
    }

    #[test]
    fn missing_arguments_default_to_empty() {
        let verdict = classify(&ok(r#"{"result":"success"}"#)).expect("valid envelope");
        assert!(matches!(verdict, Verdict::Success(ref env) if env.arguments.is_empty()));
    }

    #[test]
    fn conflict_reads_session_header() {
        let mut response = HttpResponse::new(409, b"<h1>409: Conflict</h1>".to_vec());
        response
            .headers
            .insert(SESSION_ID_HEADER, HeaderValue::from_static("abc123"));
        assert_eq!(
            classify(&response).expect("conflict"),
            Verdict::Conflict(SessionToken::new("abc123"))
        );
    }

    #[test]
    fn conflict_without_header_is_a_violation() {
        let err = classify(&HttpResponse::new(409, Vec::new())).expect_err("violation");
        assert!(matches!(
            err,
            RpcError::ProtocolViolation {
                violation: Violation::MissingSessionHeader,
                status: 409
            }
        ));
    }

    #[test]
    fn conflict_with_blank_header_is_a_violation() {
        let mut response = HttpResponse::new(409, Vec::new());
        response
            .headers
            .insert(SESSION_ID_HEADER, HeaderValue::from_static("  "));
        assert!(classify(&response).is_err());
    }

    #[test]
    fn unparsable_body_is_a_violation() {
        let err = classify(&ok("not json")).expect_err("violation");
        assert!(matches!(
            err,
            RpcError::ProtocolViolation {
                violation: Violation::MalformedBody,
                ..
            }
        ));
    }

    #[test]
    fn auth_and_unknown_statuses_are_classified() {
        assert!(matches!(
            classify(&HttpResponse::new(401, Vec::new())),
            Err(RpcError::Unauthorized { status: 401 })
        ));
        assert!(matches!(
            classify(&HttpResponse::new(500, Vec::new())),
            Err(RpcError::ProtocolViolation {
                violation: Violation::UnexpectedStatus,
                status: 500
            })
        ));
    }

    fn object(value: serde_json::Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn duplicate_add_is_marked_not_rejected() {
        let decoded = decode_success(
            "torrent-add",
            object(json!({"torrent-duplicate": {"id": 5, "hashString": "c0ffee"}})),
        )
        .expect("duplicate is a success");
        assert_eq!(
            Value::Object(decoded),
            json!({"id": 5, "hashString": "c0ffee", "duplicate": true})
        );
    }

    #[test]
    fn fresh_add_is_marked_as_new() {
        let decoded = decode_success(
            "torrent-add",
            object(json!({"torrent-added": {"id": 6}})),
        )
        .expect("added");
        assert_eq!(Value::Object(decoded), json!({"id": 6, "duplicate": false}));
    }

    #[test]
    fn add_without_torrent_payload_is_invalid() {
        assert!(matches!(
            decode_success("torrent-add", Arguments::new()),
            Err(RpcError::InvalidArgument {
                field: "response",
                ..
            })
        ));
        assert!(matches!(
            decode_success("torrent-add", object(json!({"torrent-added": 3}))),
            Err(RpcError::ProtocolViolation {
                violation: Violation::MalformedBody,
                ..
            })
        ));
    }

    #[test]
    fn other_methods_pass_through() {
        let payload = object(json!({"torrent-added": {"id": 1}}));
        assert_eq!(
            decode_success("session-get", payload.clone()).expect("pass-through"),
            payload
        );
    }
}
