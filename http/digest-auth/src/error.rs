use auth_types::Algorithm;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that prevent an authentication decision from being made at all.
///
/// Authentication failures are never errors, they result in a challenge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("credential store lookup failed")]
    CredentialStore(#[source] BoxError),
    #[error("session registry operation failed")]
    SessionRegistry(#[source] BoxError),
    #[error("unsupported digest algorithm {0}, expected a -sess algorithm")]
    UnsupportedAlgorithm(Algorithm),
    #[error(transparent)]
    Http(#[from] http::Error),
}

/// Reason a request was challenged.
///
/// Only used for logging and for the calling layer, the client always receives
/// the same kind of challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("authorization header missing or malformed")]
    MalformedChallenge,
    #[error("no session cookie to bind the response to")]
    MissingSession,
    #[error("unknown user")]
    UnknownUser,
    #[error("invalid digest response")]
    InvalidResponse,
    #[error("digest response failed within a known session")]
    StaleSession,
    #[error("nonce of a previous time window")]
    StaleNonce,
    #[error("session is bound to a different user or unknown")]
    ForeignSession,
    #[error("invalid logout credentials")]
    LogoutCredentialInvalid,
}
