use crate::response::{HashFn, ResponseValidator};
use crate::{DigestConfig, Result};
use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

/// Freshness of a nonce presented by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceStatus {
    /// Issued in the current time window
    Fresh,
    /// Issued in the previous time window, the client must retry with a fresh nonce
    Stale,
    /// Never issued to this address
    Invalid,
}

/// Generates nonces that are valid for a single time window and bound to the
/// client's address.
///
/// Nothing is stored, every nonce can be recomputed from the time window, the
/// address and the server secret.
#[derive(Debug, Clone)]
pub struct NonceGenerator {
    secret: String,
    lifetime: u64,
    hash: HashFn,
}

impl NonceGenerator {
    pub fn new(config: &DigestConfig) -> Result<Self> {
        let validator = ResponseValidator::new(&config.algorithm)?;

        Ok(Self::with_hash(
            config.secret.clone(),
            config.nonce_lifetime.as_secs(),
            validator.hash_fn(),
        ))
    }

    fn with_hash(secret: String, lifetime: u64, hash: HashFn) -> Self {
        Self {
            secret,
            lifetime: lifetime.max(1),
            hash,
        }
    }

    /// End of the time window `now` falls into, in seconds since the unix epoch
    pub fn time_bucket(&self, now: SystemTime) -> u64 {
        let now = now
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_secs())
            .unwrap_or_default();

        now.div_ceil(self.lifetime) * self.lifetime
    }

    /// Nonce of the time window `now` falls into for a client at `addr`
    pub fn nonce_at(&self, now: SystemTime, addr: IpAddr) -> String {
        self.nonce_for_bucket(self.time_bucket(now), addr)
    }

    fn nonce_for_bucket(&self, bucket: u64, addr: IpAddr) -> String {
        (self.hash)(format!("{}:{}:{}", bucket, addr, self.secret).as_bytes())
    }

    pub fn verify(&self, nonce: &str, now: SystemTime, addr: IpAddr) -> NonceStatus {
        let bucket = self.time_bucket(now);

        if nonce == self.nonce_for_bucket(bucket, addr) {
            NonceStatus::Fresh
        } else if bucket >= self.lifetime
            && nonce == self.nonce_for_bucket(bucket - self.lifetime, addr)
        {
            NonceStatus::Stale
        } else {
            NonceStatus::Invalid
        }
    }

    /// Opaque value bound to the session id
    pub fn opaque(&self, sid: &str) -> String {
        (self.hash)(sid.as_bytes())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::Ipv4Addr;
    use std::time::Duration;

    const ALICE: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
    const BOB: IpAddr = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 2));

    fn generator() -> NonceGenerator {
        NonceGenerator::new(&DigestConfig::new("secure area", "s3cret")).unwrap()
    }

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn bucket_rounds_up_to_the_window_end() {
        let generator = generator();

        assert_eq!(generator.time_bucket(at(1)), 300);
        assert_eq!(generator.time_bucket(at(300)), 300);
        assert_eq!(generator.time_bucket(at(301)), 600);
        assert_eq!(generator.time_bucket(at(0)), 0);
    }

    #[test]
    fn nonce_is_reproducible() {
        let generator = generator();

        assert_eq!(generator.nonce_at(at(1000), ALICE), generator.nonce_at(at(1100), ALICE));
        assert_eq!(
            generator.nonce_at(at(1000), ALICE),
            format!("{:x}", md5::compute("1200:192.0.2.1:s3cret"))
        );
    }

    #[test]
    fn nonce_depends_on_window_address_and_secret() {
        let generator = generator();
        let nonce = generator.nonce_at(at(1000), ALICE);

        assert_ne!(nonce, generator.nonce_at(at(1300), ALICE));
        assert_ne!(nonce, generator.nonce_at(at(1000), BOB));

        let other = NonceGenerator::new(&DigestConfig::new("secure area", "other")).unwrap();
        assert_ne!(nonce, other.nonce_at(at(1000), ALICE));
    }

    #[test]
    fn verify_fresh_stale_invalid() {
        let generator = generator();
        let nonce = generator.nonce_at(at(1000), ALICE);

        assert_eq!(generator.verify(&nonce, at(1000), ALICE), NonceStatus::Fresh);
        assert_eq!(generator.verify(&nonce, at(1250), ALICE), NonceStatus::Stale);
        assert_eq!(generator.verify(&nonce, at(1550), ALICE), NonceStatus::Invalid);
        assert_eq!(generator.verify(&nonce, at(1000), BOB), NonceStatus::Invalid);
        assert_eq!(generator.verify("garbage", at(1000), ALICE), NonceStatus::Invalid);
    }

    #[test]
    fn opaque_is_bound_to_session() {
        let generator = generator();

        assert_eq!(generator.opaque(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_ne!(generator.opaque("a"), generator.opaque("b"));
    }
}
