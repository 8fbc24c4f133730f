//! Server side HTTP Digest access authentication (`MD5-sess`, `qop=auth`)
//! bound to browser sessions.
//!
//! The [`DigestAuthenticator`] decides per request whether a client is
//! authenticated. Users and sessions are owned by the application and accessed
//! through the [`CredentialStore`] and [`SessionRegistry`] traits.
//!
//! Nonces are never stored. They are derived from a time window, the client
//! address and a server secret, see [`NonceGenerator`].

mod challenge;
mod config;
mod digest;
mod error;
mod memory;
mod nonce;
mod request;
mod response;
mod store;

pub use challenge::{Challenge, session_cookie};
pub use config::DigestConfig;
pub use digest::DigestAuthenticator;
pub use error::{BoxError, Error, Rejection, Result};
pub use memory::{MemoryStore, Session};
pub use nonce::{NonceGenerator, NonceStatus};
pub use request::IncomingRequest;
pub use response::ResponseValidator;
pub use store::{CredentialStore, SessionRegistry, SessionState, UserId, UserRecord};

/// Outcome of enforcing authentication on a request
#[derive(Debug, Clone)]
#[allow(clippy::large_enum_variant)]
pub enum AuthResult {
    /// The user is authenticated and bound to `session`
    Authenticated { user: UserRecord, session: String },
    /// No authentication was attempted (lazy enforcement without session)
    Unauthenticated,
    /// The session was destroyed after a successful logout handshake
    LoggedOut,
    /// A challenge must be sent to the client
    ChallengeIssued(Challenge),
}

impl AuthResult {
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            AuthResult::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Returns if the HTTP layer must stop processing the request and respond
    /// with the challenge
    pub fn ends_request(&self) -> bool {
        matches!(self, AuthResult::ChallengeIssued(challenge) if challenge.terminal)
    }
}
