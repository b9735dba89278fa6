use sha2::{Digest, Sha256};

/// SHA-256 digest of a password, hex encoded.
///
/// Only the digest is ever stored, the plaintext is dropped right after hashing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
  pub fn of(password: &str) -> Self {
    Self(hex::encode(Sha256::digest(password.as_bytes())))
  }

  /// Wraps an already computed digest, as found in persisted records
  pub fn from_hex(digest: String) -> Self {
    Self(digest.to_ascii_lowercase())
  }

  pub fn as_hex(&self) -> &str {
    &self.0
  }

  pub fn matches(&self, password: &str) -> bool {
    *self == Self::of(password)
  }
}
