//! Basic authentication plugin.

use std::fmt::{self, Debug, Formatter};

use base64::{Engine as _, engine::general_purpose};
use reqwest::header::{AUTHORIZATION, HeaderValue};

use super::Next;
use crate::error::{RpcError, RpcResult};
use crate::transport::{HttpRequest, HttpResponse};

/// Adds an `Authorization: Basic` header to every request.
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Credentials for the daemon's RPC endpoint.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Configured user name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    fn header_value(&self) -> RpcResult<HeaderValue> {
        let encoded =
            general_purpose::STANDARD.encode(format!("{}:{}", self.username, self.password));
        let mut value = HeaderValue::try_from(format!("Basic {encoded}"))
            .map_err(|_| RpcError::invalid("credentials", "not representable as a header"))?;
        value.set_sensitive(true);
        Ok(value)
    }

    pub(super) fn handle(
        &self,
        mut request: HttpRequest,
        next: Next<'_>,
    ) -> RpcResult<HttpResponse> {
        request.headers.insert(AUTHORIZATION, self.header_value()?);
        next.run(request)
    }
}

impl Debug for BasicAuth {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_base64_of_user_and_password() {
        let auth = BasicAuth::new("admin", "s3cret");
        let value = auth.header_value().expect("valid header");
        assert_eq!(value.to_str().ok(), Some("Basic YWRtaW46czNjcmV0"));
        assert!(value.is_sensitive());
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", BasicAuth::new("admin", "s3cret"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("s3cret"));
    }
}
