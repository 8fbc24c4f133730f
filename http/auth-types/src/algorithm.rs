use bytesstr::BytesStr;
use std::fmt;

/// Quality of protection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QopOption {
    Auth,
    AuthInt,
    Other(BytesStr),
}

impl From<BytesStr> for QopOption {
    fn from(value: BytesStr) -> Self {
        match value.as_ref() {
            "auth" => Self::Auth,
            "auth-int" => Self::AuthInt,
            token => Self::Other(value.slice_ref(token)),
        }
    }
}

impl fmt::Display for QopOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QopOption::Auth => f.write_str("auth"),
            QopOption::AuthInt => f.write_str("auth-int"),
            QopOption::Other(token) => f.write_str(token),
        }
    }
}

/// Digest algorithm names (RFC7616 Section 3.3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Algorithm {
    MD5,
    MD5Sess,
    SHA256,
    SHA256Sess,
    SHA512256,
    SHA512256Sess,
    Other(BytesStr),
}

impl Algorithm {
    /// Returns if the algorithm is one of the `-sess` variants, which mix the
    /// nonce and cnonce into HA1
    pub fn is_session(&self) -> bool {
        matches!(
            self,
            Algorithm::MD5Sess | Algorithm::SHA256Sess | Algorithm::SHA512256Sess
        )
    }
}

impl From<BytesStr> for Algorithm {
    fn from(value: BytesStr) -> Self {
        if value.eq_ignore_ascii_case("MD5") {
            Algorithm::MD5
        } else if value.eq_ignore_ascii_case("MD5-sess") {
            Algorithm::MD5Sess
        } else if value.eq_ignore_ascii_case("SHA-256") {
            Algorithm::SHA256
        } else if value.eq_ignore_ascii_case("SHA-256-sess") {
            Algorithm::SHA256Sess
        } else if value.eq_ignore_ascii_case("SHA-512-256") {
            Algorithm::SHA512256
        } else if value.eq_ignore_ascii_case("SHA-512-256-sess") {
            Algorithm::SHA512256Sess
        } else {
            Algorithm::Other(value)
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::MD5 => f.write_str("MD5"),
            Algorithm::MD5Sess => f.write_str("MD5-sess"),
            Algorithm::SHA256 => f.write_str("SHA-256"),
            Algorithm::SHA256Sess => f.write_str("SHA-256-sess"),
            Algorithm::SHA512256 => f.write_str("SHA-512-256"),
            Algorithm::SHA512256Sess => f.write_str("SHA-512-256-sess"),
            Algorithm::Other(other) => f.write_str(other),
        }
    }
}
