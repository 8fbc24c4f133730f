//! Typed values of the HTTP `WWW-Authenticate` and `Authorization` headers
//! used by the Digest access authentication scheme.
//!
//! Parsing is lenient in the way browsers expect: parameters may appear in any
//! order, separated by anything, and unknown parameters are kept aside.

mod algorithm;
mod challenge;
mod credentials;
mod param;

pub use algorithm::{Algorithm, QopOption};
pub use challenge::DigestChallenge;
pub use credentials::{CredentialsError, DigestCredentials};
pub use param::AuthParam;
