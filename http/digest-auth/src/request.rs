use crate::AuthResult;
use auth_types::{CredentialsError, DigestCredentials};
use bytesstr::BytesStr;
use http::{HeaderMap, Method, header};
use std::net::IpAddr;

/// The parts of an inbound HTTP request relevant for authentication.
///
/// Also remembers the outcome of the first authentication attempt, so that
/// enforcing authentication multiple times during a request is cheap.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub remote_addr: IpAddr,
    /// Raw value of the `Authorization` header
    pub authorization: Option<BytesStr>,
    /// Value of the session cookie
    pub session_id: Option<String>,

    pub(crate) outcome: Option<AuthResult>,
}

impl IncomingRequest {
    pub fn new(method: Method, remote_addr: IpAddr) -> Self {
        Self {
            method,
            remote_addr,
            authorization: None,
            session_id: None,
            outcome: None,
        }
    }

    pub fn with_authorization<A>(mut self, authorization: A) -> Self
    where
        A: Into<BytesStr>,
    {
        self.authorization = Some(authorization.into());
        self
    }

    pub fn with_session<S>(mut self, sid: S) -> Self
    where
        S: Into<String>,
    {
        self.session_id = Some(sid.into());
        self
    }

    /// Extract the `Authorization` header and the session cookie named `cookie_name`
    pub fn from_headers(
        method: Method,
        headers: &HeaderMap,
        cookie_name: &str,
        remote_addr: IpAddr,
    ) -> Self {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| BytesStr::from(value.to_owned()));

        Self {
            method,
            remote_addr,
            authorization,
            session_id: session_cookie(headers, cookie_name),
            outcome: None,
        }
    }

    pub fn from_http<B>(
        request: &http::Request<B>,
        cookie_name: &str,
        remote_addr: IpAddr,
    ) -> Self {
        Self::from_headers(
            request.method().clone(),
            request.headers(),
            cookie_name,
            remote_addr,
        )
    }

    /// Outcome of the authentication already performed for this request
    pub fn outcome(&self) -> Option<&AuthResult> {
        self.outcome.as_ref()
    }

    /// Session id, if a non-empty session cookie was sent
    pub(crate) fn session(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|sid| !sid.is_empty())
    }

    pub(crate) fn credentials(&self) -> Result<DigestCredentials, CredentialsError> {
        let authorization = self.authorization.as_ref().ok_or(CredentialsError::Empty)?;

        DigestCredentials::parse_header(authorization)
    }
}

fn session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.to_owned())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn extract_from_http_request() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/secure")
            .header(header::AUTHORIZATION, r#"Digest username="alice""#)
            .header(header::COOKIE, "theme=dark; sid=abc123")
            .header(header::COOKIE, "sid=ignored")
            .body(())
            .unwrap();

        let request =
            IncomingRequest::from_http(&request, "sid", IpAddr::V4(Ipv4Addr::LOCALHOST));

        assert_eq!(request.method, Method::POST);
        assert_eq!(
            request.authorization.as_deref(),
            Some(r#"Digest username="alice""#)
        );
        assert_eq!(request.session_id.as_deref(), Some("abc123"));
        assert!(request.outcome().is_none());
    }

    #[test]
    fn empty_session_cookie_is_no_session() {
        let request = IncomingRequest::new(Method::GET, IpAddr::V4(Ipv4Addr::LOCALHOST))
            .with_session("");

        assert_eq!(request.session(), None);
    }

    #[test]
    fn missing_authorization() {
        let request = IncomingRequest::new(Method::GET, IpAddr::V4(Ipv4Addr::LOCALHOST));

        assert_eq!(request.credentials(), Err(CredentialsError::Empty));
    }
}
