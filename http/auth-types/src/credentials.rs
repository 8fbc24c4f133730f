use crate::param::AuthParam;
use bytesstr::BytesStr;
use internal::{Finish, IResult, scan, whitespace, ws};
use nom::bytes::complete::take_while1;
use nom::combinator::rest;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("authorization header is empty")]
    Empty,
    #[error("unsupported authorization scheme {0}")]
    UnsupportedScheme(BytesStr),
    #[error("missing {0} in authorization header")]
    Missing(&'static str),
}

/// Credentials sent by the client in the `Authorization` header in response to a
/// [`DigestChallenge`](crate::DigestChallenge)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestCredentials {
    pub username: BytesStr,
    pub realm: Option<BytesStr>,
    pub nonce: BytesStr,
    pub cnonce: BytesStr,
    /// Nonce count as sent by the client (8 hex digits)
    pub nc: BytesStr,
    pub qop: BytesStr,
    pub uri: BytesStr,
    pub response: BytesStr,
    pub opaque: BytesStr,
    /// Remaining fields
    pub other: Vec<AuthParam>,
}

impl DigestCredentials {
    /// Parse a complete `Authorization` header value including the `Digest` scheme
    pub fn parse_header(src: &BytesStr) -> Result<Self, CredentialsError> {
        let (_, (scheme, params)) = split_scheme(&**src)
            .finish()
            .map_err(|_| CredentialsError::Empty)?;

        if !scheme.eq_ignore_ascii_case("Digest") {
            return Err(CredentialsError::UnsupportedScheme(src.slice_ref(scheme)));
        }

        Self::parse(&src.slice_ref(params))
    }

    /// Parse the parameter list following the scheme token.
    ///
    /// Every `name=value` pair found is collected in a single pass, the last
    /// occurrence of a name wins. Fails if any of the required fields is missing.
    pub fn parse(src: &BytesStr) -> Result<Self, CredentialsError> {
        let (_, params) = scan(AuthParam::parse(src))(&**src)
            .finish()
            .map_err(|_| CredentialsError::Missing("parameters"))?;

        let mut username = None;
        let mut realm = None;
        let mut nonce = None;
        let mut cnonce = None;
        let mut nc = None;
        let mut qop = None;
        let mut uri = None;
        let mut response = None;
        let mut opaque = None;

        let mut other: Vec<AuthParam> = vec![];

        for param in params {
            match param.name.as_ref() {
                "username" => username = Some(param.value),
                "realm" => realm = Some(param.value),
                "nonce" => nonce = Some(param.value),
                "cnonce" => cnonce = Some(param.value),
                "nc" => nc = Some(param.value),
                "qop" => qop = Some(param.value),
                "uri" => uri = Some(param.value),
                "response" => response = Some(param.value),
                "opaque" => opaque = Some(param.value),
                _ => {
                    other.retain(|p| p.name != param.name);
                    other.push(param)
                }
            }
        }

        Ok(Self {
            nonce: nonce.ok_or(CredentialsError::Missing("nonce"))?,
            nc: nc.ok_or(CredentialsError::Missing("nc"))?,
            cnonce: cnonce.ok_or(CredentialsError::Missing("cnonce"))?,
            qop: qop.ok_or(CredentialsError::Missing("qop"))?,
            username: username.ok_or(CredentialsError::Missing("username"))?,
            uri: uri.ok_or(CredentialsError::Missing("uri"))?,
            response: response.ok_or(CredentialsError::Missing("response"))?,
            opaque: opaque.ok_or(CredentialsError::Missing("opaque"))?,
            realm,
            other,
        })
    }

    /// Nonce count decoded from its hex representation
    pub fn nonce_count(&self) -> Option<u32> {
        u32::from_str_radix(&self.nc, 16).ok()
    }
}

fn split_scheme(i: &str) -> IResult<&str, (&str, &str)> {
    ws((take_while1(|c: char| !whitespace(c)), rest))(i)
}

impl fmt::Display for DigestCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"Digest username="{}""#, self.username)?;

        if let Some(realm) = &self.realm {
            write!(f, r#", realm="{}""#, realm)?;
        }

        write!(
            f,
            r#", nonce="{}", uri="{}", qop={}, nc={}, cnonce="{}", response="{}", opaque="{}""#,
            self.nonce, self.uri, self.qop, self.nc, self.cnonce, self.response, self.opaque
        )?;

        for param in &self.other {
            write!(f, ", {}", param)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const HEADER: &str = r#"Digest username="alice", realm="secure area", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c0", uri="/secure/index.html", algorithm=MD5-sess, response="6629fae49393a05397450978507c4ef1", opaque="5ccc069c403ebaf9f0171e9517f40e41", qop=auth, nc=00000001, cnonce="0a4f113b""#;

    #[test]
    fn parse_browser_header() {
        let credentials = DigestCredentials::parse_header(&BytesStr::from_static(HEADER)).unwrap();

        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.realm.as_deref(), Some("secure area"));
        assert_eq!(credentials.nonce, "dcd98b7102dd2f0e8b11d0f600bfb0c0");
        assert_eq!(credentials.uri, "/secure/index.html");
        assert_eq!(credentials.response, "6629fae49393a05397450978507c4ef1");
        assert_eq!(credentials.opaque, "5ccc069c403ebaf9f0171e9517f40e41");
        assert_eq!(credentials.qop, "auth");
        assert_eq!(credentials.nc, "00000001");
        assert_eq!(credentials.cnonce, "0a4f113b");
        assert_eq!(credentials.nonce_count(), Some(1));

        // algorithm=MD5-sess only matches up to the dash
        assert_eq!(
            credentials.other,
            vec![AuthParam {
                name: "algorithm".into(),
                value: "MD5".into()
            }]
        );
    }

    #[test]
    fn every_required_field_is_checked() {
        for field in [
            "nonce", "nc", "cnonce", "qop", "username", "uri", "response", "opaque",
        ] {
            let params = HEADER
                .trim_start_matches("Digest ")
                .split(", ")
                .filter(|param| !param.starts_with(&format!("{field}=")))
                .collect::<Vec<_>>()
                .join(", ");

            let result = DigestCredentials::parse(&BytesStr::from(params));

            assert_eq!(result, Err(CredentialsError::Missing(field)), "{field}");
        }
    }

    #[test]
    fn realm_is_optional() {
        let src = BytesStr::from_static(
            r#"username="a", nonce="n", uri="/", response="r", opaque="o", qop=auth, nc=00000002, cnonce="c""#,
        );

        let credentials = DigestCredentials::parse(&src).unwrap();
        assert_eq!(credentials.realm, None);
        assert_eq!(credentials.nonce_count(), Some(2));
    }

    #[test]
    fn last_occurrence_wins() {
        let src = BytesStr::from_static(
            r#"username="a", username="b", nonce="n", uri="/", response="r", opaque="o", qop=auth, nc=1, cnonce="c""#,
        );

        let credentials = DigestCredentials::parse(&src).unwrap();
        assert_eq!(credentials.username, "b");
    }

    #[test]
    fn no_separators_required() {
        let src = BytesStr::from_static(
            r#"username="a"nonce="n";uri="/x/y" response=r opaque=o qop=auth,,nc=1 cnonce=c"#,
        );

        let credentials = DigestCredentials::parse(&src).unwrap();
        assert_eq!(credentials.uri, "/x/y");
        assert_eq!(credentials.cnonce, "c");
    }

    #[test]
    fn unsupported_scheme() {
        let result =
            DigestCredentials::parse_header(&BytesStr::from_static("Basic YWxpY2U6cGFzcw=="));

        assert_eq!(
            result,
            Err(CredentialsError::UnsupportedScheme("Basic".into()))
        );
    }

    #[test]
    fn empty_header() {
        let result = DigestCredentials::parse_header(&BytesStr::from_static(""));
        assert_eq!(result, Err(CredentialsError::Empty));
    }

    #[test]
    fn print_credentials() {
        let credentials = DigestCredentials {
            username: "alice".into(),
            realm: None,
            nonce: "N".into(),
            cnonce: "C".into(),
            nc: "00000001".into(),
            qop: "auth".into(),
            uri: "/secure".into(),
            response: "R".into(),
            opaque: "O".into(),
            other: vec![],
        };

        assert_eq!(
            credentials.to_string(),
            r#"Digest username="alice", nonce="N", uri="/secure", qop=auth, nc=00000001, cnonce="C", response="R", opaque="O""#
        );
    }
}
