use bytesstr::BytesStr;
use internal::IResult;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::char;
use nom::combinator::map;
use nom::sequence::{delimited, tuple};
use std::fmt;

/// Single `name=value` pair of an auth header.
///
/// Always printed with a quoted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthParam {
    pub name: BytesStr,
    pub value: BytesStr,
}

impl fmt::Display for AuthParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"{}="{}""#, self.name, self.value)
    }
}

fn word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn bare(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '/'
}

fn quoted(quote: char) -> impl Fn(&str) -> IResult<&str, &str> {
    move |i| delimited(char(quote), take_while(|c| c != quote), char(quote))(i)
}

impl AuthParam {
    /// Parse a single `name=value` pair, where value is either quoted with `"` or `'`,
    /// or a bare `[A-Za-z0-9/]+` token
    pub(crate) fn parse(src: &BytesStr) -> impl Fn(&str) -> IResult<&str, Self> + '_ {
        move |i| {
            map(
                tuple((
                    take_while1(word),
                    tag("="),
                    alt((quoted('"'), quoted('\''), take_while1(bare))),
                )),
                |(name, _, value)| AuthParam {
                    name: src.slice_ref(name),
                    value: src.slice_ref(value),
                },
            )(i)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_quoted_and_bare() {
        let src = BytesStr::from_static(r#"uri="/a b", nc=00000001"#);

        let (rem, param) = AuthParam::parse(&src)(&*src).unwrap();
        assert_eq!(param.name, "uri");
        assert_eq!(param.value, "/a b");
        assert_eq!(rem, ", nc=00000001");

        let (rem, param) = AuthParam::parse(&src)(&rem[2..]).unwrap();
        assert_eq!(param.name, "nc");
        assert_eq!(param.value, "00000001");
        assert_eq!(rem, "");
    }

    #[test]
    fn bare_value_stops_at_token_end() {
        let src = BytesStr::from_static("qop=auth-int");

        let (rem, param) = AuthParam::parse(&src)(&*src).unwrap();
        assert_eq!(param.value, "auth");
        assert_eq!(rem, "-int");
    }

    #[test]
    fn single_quotes() {
        let src = BytesStr::from_static("realm='test realm'");

        let (_, param) = AuthParam::parse(&src)(&*src).unwrap();
        assert_eq!(param.value, "test realm");
    }
}
