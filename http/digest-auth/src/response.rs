use crate::{Error, Result};
use auth_types::{Algorithm, DigestCredentials};
use sha2::Digest;

pub(crate) type HashFn = fn(&[u8]) -> String;

/// Computes the digest a client must answer a challenge with and compares it
/// against the one it sent
#[derive(Debug, Clone, Copy)]
pub struct ResponseValidator {
    hash: HashFn,
}

impl ResponseValidator {
    /// Create a validator for one of the `-sess` algorithms
    pub fn new(algorithm: &Algorithm) -> Result<Self> {
        let hash: HashFn = match algorithm {
            Algorithm::MD5Sess => hash_md5,
            Algorithm::SHA256Sess => hash_sha256,
            Algorithm::SHA512256Sess => hash_sha512_trunc256,
            other => return Err(Error::UnsupportedAlgorithm(other.clone())),
        };

        Ok(Self { hash })
    }

    pub(crate) fn hash_fn(&self) -> HashFn {
        self.hash
    }

    pub(crate) fn hash(&self, i: &[u8]) -> String {
        (self.hash)(i)
    }

    /// Password hash as it is kept in the credential store (`H(username:realm:password)`)
    pub fn hash_password(&self, username: &str, realm: &str, password: &str) -> String {
        self.hash(format!("{username}:{realm}:{password}").as_bytes())
    }

    /// Fixed pseudo password hash clients use to prove their intent to log out
    pub fn logout_hash(&self, realm: &str) -> String {
        self.hash_password("logout", realm, "")
    }

    /// Expected response for the given stored password hash (HA1)
    pub fn expected_response(
        &self,
        password_hash: &str,
        method: &str,
        credentials: &DigestCredentials,
    ) -> String {
        let ha1 = self.hash(
            format!(
                "{}:{}:{}",
                password_hash, credentials.nonce, credentials.cnonce
            )
            .as_bytes(),
        );

        let ha2 = self.hash(format!("{}:{}", method, credentials.uri).as_bytes());

        self.hash(
            format!(
                "{}:{}:{}:{}:{}:{}",
                ha1, credentials.nonce, credentials.nc, credentials.cnonce, credentials.qop, ha2
            )
            .as_bytes(),
        )
    }

    /// Returns if the client's response matches the expected response
    ///
    /// The nonce count is not checked for replays.
    pub fn validate(
        &self,
        password_hash: &str,
        method: &str,
        credentials: &DigestCredentials,
    ) -> bool {
        self.expected_response(password_hash, method, credentials) == *credentials.response
    }
}

fn hash_md5(i: &[u8]) -> String {
    format!("{:x}", md5::compute(i))
}

fn hash_sha256(i: &[u8]) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(i);
    format!("{:x}", hasher.finalize())
}

fn hash_sha512_trunc256(i: &[u8]) -> String {
    let mut hasher = sha2::Sha512_256::new();
    hasher.update(i);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod test {
    use super::*;

    fn md5_hex(i: &str) -> String {
        format!("{:x}", md5::compute(i))
    }

    fn credentials(response: &str) -> DigestCredentials {
        DigestCredentials {
            username: "alice".into(),
            realm: None,
            nonce: "N".into(),
            cnonce: "C".into(),
            nc: "00000001".into(),
            qop: "auth".into(),
            uri: "/secure".into(),
            response: response.to_owned().into(),
            opaque: "O".into(),
            other: vec![],
        }
    }

    fn worked_example() -> String {
        let ha1 = md5_hex("h:N:C");
        let ha2 = md5_hex("GET:/secure");

        md5_hex(&format!("{ha1}:N:00000001:C:auth:{ha2}"))
    }

    #[test]
    fn worked_example_validates() {
        let validator = ResponseValidator::new(&Algorithm::MD5Sess).unwrap();
        let response = worked_example();

        assert_eq!(
            validator.expected_response("h", "GET", &credentials(&response)),
            response
        );
        assert!(validator.validate("h", "GET", &credentials(&response)));
    }

    #[test]
    fn flipped_digit_fails() {
        let validator = ResponseValidator::new(&Algorithm::MD5Sess).unwrap();
        let mut response = worked_example().into_bytes();
        response[0] = if response[0] == b'0' { b'1' } else { b'0' };
        let response = String::from_utf8(response).unwrap();

        assert!(!validator.validate("h", "GET", &credentials(&response)));
    }

    #[test]
    fn altering_any_input_invalidates() {
        let validator = ResponseValidator::new(&Algorithm::MD5Sess).unwrap();
        let response = worked_example();

        assert!(!validator.validate("x", "GET", &credentials(&response)));
        assert!(!validator.validate("h", "POST", &credentials(&response)));

        let alterations: [fn(&mut DigestCredentials); 5] = [
            |c| c.nonce = "M".into(),
            |c| c.cnonce = "D".into(),
            |c| c.nc = "00000002".into(),
            |c| c.qop = "auth-int".into(),
            |c| c.uri = "/public".into(),
        ];

        for alter in alterations {
            let mut credentials = credentials(&response);
            alter(&mut credentials);

            assert!(!validator.validate("h", "GET", &credentials));
        }
    }

    #[test]
    fn empty_password_hash_only_matches_its_own_response() {
        let validator = ResponseValidator::new(&Algorithm::MD5Sess).unwrap();
        let response = validator.expected_response("", "GET", &credentials(""));

        assert!(validator.validate("", "GET", &credentials(&response)));
        assert!(!validator.validate("h", "GET", &credentials(&response)));
    }

    #[test]
    fn logout_hash() {
        let validator = ResponseValidator::new(&Algorithm::MD5Sess).unwrap();

        assert_eq!(validator.logout_hash("secure area"), md5_hex("logout:secure area:"));
    }

    #[test]
    fn sha256_sess() {
        let validator = ResponseValidator::new(&Algorithm::SHA256Sess).unwrap();

        assert_eq!(
            validator.hash_password("Mufasa", "http-auth@example.org", "Circle of Life"),
            "7987c64c30e25f1b74be53f966b49b90f2808aa92faf9a00262392d7b4794232"
        );
    }

    #[test]
    fn non_session_algorithms_are_rejected() {
        assert!(matches!(
            ResponseValidator::new(&Algorithm::MD5),
            Err(Error::UnsupportedAlgorithm(Algorithm::MD5))
        ));
    }
}
