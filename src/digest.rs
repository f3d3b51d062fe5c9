//! Define the [`MessageDigest`] abstraction used throughout the algorithm,
//! and the [`HashAlgorithm`] tags it accepts.

use std::fmt::Write;
use std::str::FromStr;

use sha2::Digest;

use crate::C14nError;

/// The hash algorithms that [`MessageDigest`] can compute.
///
/// URDNA2015 mandates SHA-256; the algorithm tag exists so that callers can
/// request it explicitly (and get a clean error for anything else).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// [SHA-256](https://en.wikipedia.org/wiki/SHA-2)
    #[default]
    Sha256,
}

impl FromStr for HashAlgorithm {
    type Err = C14nError;

    fn from_str(tag: &str) -> Result<Self, C14nError> {
        match tag {
            "sha256" => Ok(HashAlgorithm::Sha256),
            other => Err(C14nError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// An incremental hasher producing a lowercase hexadecimal digest.
pub struct MessageDigest {
    inner: sha2::Sha256,
}

impl MessageDigest {
    /// Start the computation of a hash.
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sha256 => MessageDigest {
                inner: sha2::Sha256::new(),
            },
        }
    }

    /// Update the internal state by hashing `data`.
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.inner.update(data.as_ref());
    }

    /// Finalize and return the hex encoding of the hash.
    ///
    /// Consumes the digest, so an instance can not be reused.
    pub fn digest(self) -> String {
        let bytes = self.inner.finalize();
        let mut digest = String::with_capacity(2 * bytes.len());
        for b in bytes {
            write!(&mut digest, "{b:02x}").unwrap();
        }
        digest
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_case::test_case;

    #[test_case("sha256"; "lowercase tag")]
    fn supported(tag: &str) {
        assert!(tag.parse::<HashAlgorithm>().is_ok());
    }

    #[test_case("sha1"; "sha1")]
    #[test_case("sha384"; "sha384")]
    #[test_case("md5"; "md5")]
    #[test_case("SHA256"; "uppercase")]
    #[test_case(""; "empty")]
    fn unsupported(tag: &str) {
        assert!(matches!(
            tag.parse::<HashAlgorithm>(),
            Err(C14nError::UnsupportedAlgorithm(t)) if t == tag
        ));
    }

    #[test]
    fn empty_input() {
        let md = MessageDigest::new(HashAlgorithm::Sha256);
        assert_eq!(
            md.digest(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn abc() {
        let mut md = MessageDigest::new(HashAlgorithm::Sha256);
        md.update("a");
        md.update("bc");
        assert_eq!(
            md.digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let mut md = MessageDigest::new(HashAlgorithm::Sha256);
        md.update("arbitrary");
        let digest = md.digest();
        assert_eq!(digest.len(), 64);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
