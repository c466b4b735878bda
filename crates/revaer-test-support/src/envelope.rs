//! Response envelopes as the daemon encodes them.

use serde_json::{Value, json};

/// Success envelope carrying `arguments`.
#[must_use]
pub fn success(arguments: &Value) -> Value {
    json!({"result": "success", "arguments": arguments})
}

/// Failure envelope with the daemon's `result` message.
#[must_use]
pub fn failure(result: &str) -> Value {
    json!({"result": result, "arguments": {}})
}

/// Request body the client is expected to send.
#[must_use]
pub fn request(method: &str, arguments: &Value) -> Value {
    json!({"method": method, "arguments": arguments})
}
