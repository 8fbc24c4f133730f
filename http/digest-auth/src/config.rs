use auth_types::Algorithm;
use std::time::Duration;

/// Configuration of a [`DigestAuthenticator`](crate::DigestAuthenticator)
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Protection space presented to the user, part of every stored password hash
    pub realm: String,

    /// Space separated list of URIs covered by the challenge
    pub domain: String,

    /// Server secret mixed into every nonce
    pub secret: String,

    /// Length of the time window a nonce stays fresh
    pub nonce_lifetime: Duration,

    /// Must be one of the `-sess` algorithms. Defaults to `MD5-sess`
    pub algorithm: Algorithm,

    /// Name of the cookie carrying the browser session id
    pub session_cookie: String,
}

impl DigestConfig {
    pub fn new<R, S>(realm: R, secret: S) -> Self
    where
        R: Into<String>,
        S: Into<String>,
    {
        Self {
            realm: realm.into(),
            domain: "/".into(),
            secret: secret.into(),
            nonce_lifetime: Duration::from_secs(300),
            algorithm: Algorithm::MD5Sess,
            session_cookie: "sid".into(),
        }
    }
}
