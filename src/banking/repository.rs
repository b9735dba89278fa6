use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use super::Account;

/// Failures of the persistence backends
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("I/O error on {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Corrupt accounts data in {path}: {source}")]
  Corrupt {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Invalid account record: {0}")]
  InvalidRecord(String),
}

/// Interface implemented by the persistence backends of an [`AccountStore`](super::AccountStore).
///
/// The collection is always loaded and saved as a whole, there are no partial updates.
#[async_trait]
pub trait AccountsRepository {
  /// Load every persisted account, in the order they were saved.
  /// It returns an empty collection when nothing was persisted yet.
  async fn load_all(&self) -> Result<Vec<Account>, StorageError>;

  /// Replace the whole persisted collection with `accounts`.
  async fn save_all(&mut self, accounts: &[Account]) -> Result<(), StorageError>;
}
