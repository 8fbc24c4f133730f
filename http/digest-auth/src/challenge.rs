use crate::{Rejection, Result};
use auth_types::DigestChallenge;
use http::{StatusCode, header};

/// A `401 Unauthorized` response to send to the client
#[derive(Debug, Clone)]
pub struct Challenge {
    pub header: DigestChallenge,
    /// Browser session the challenge's opaque value is bound to
    pub session: String,
    /// Why the request was challenged, never sent to the client
    pub reason: Option<Rejection>,
    /// Processing of the request must stop after sending the challenge.
    ///
    /// Logout challenges are advisory and leave this unset.
    pub terminal: bool,
}

impl Challenge {
    /// Build the `401` response carrying the `WWW-Authenticate` header and the session cookie
    pub fn to_response(&self, cookie_name: &str) -> Result<http::Response<()>> {
        let response = http::Response::builder()
            .status(StatusCode::UNAUTHORIZED)
            .header(header::WWW_AUTHENTICATE, self.header.to_string())
            .header(header::SET_COOKIE, session_cookie(cookie_name, &self.session))
            .body(())?;

        Ok(response)
    }
}

/// `Set-Cookie` value for the browser session
pub fn session_cookie(cookie_name: &str, sid: &str) -> String {
    format!("{cookie_name}={sid}; Path=/; HttpOnly")
}
