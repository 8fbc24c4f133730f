use crate::algorithm::{Algorithm, QopOption};
use bytesstr::BytesStr;
use std::fmt;

/// Value of the `WWW-Authenticate` header sent with a `401 Unauthorized` response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestChallenge {
    pub realm: BytesStr,
    pub domain: BytesStr,
    pub qop: QopOption,
    pub algorithm: Algorithm,
    pub nonce: BytesStr,
    pub opaque: BytesStr,
    /// The previous request was rejected only because its nonce is outdated,
    /// clients may retry without prompting the user
    pub stale: bool,
}

impl fmt::Display for DigestChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"Digest realm="{}", domain="{}", qop="{}", algorithm={}, nonce="{}", opaque="{}""#,
            self.realm, self.domain, self.qop, self.algorithm, self.nonce, self.opaque
        )?;

        if self.stale {
            f.write_str(", stale=true")?;
        }

        Ok(())
    }
}
