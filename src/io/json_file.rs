use std::convert::TryFrom;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::account;
use crate::banking::{Account, AccountsRepository, StorageError};

/// Implementation of [`AccountsRepository`] storing all the accounts as a JSON array in a single file.
///
/// Saving writes a temporary file next to the target and renames it over the target,
/// so a failure in the middle of a save never leaves a truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonFileAccountsRepository {
  path: PathBuf,
}

impl JsonFileAccountsRepository {
  pub fn new<P: Into<PathBuf>>(path: P) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn temp_path(&self) -> PathBuf {
    let mut name = self
      .path
      .file_name()
      .map(|name| name.to_os_string())
      .unwrap_or_default();
    name.push(".tmp");
    self.path.with_file_name(name)
  }

  async fn write_temp(&self, temp_path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::File::create(temp_path).await?;
    file.write_all(data).await?;
    file.sync_all().await
  }
}

#[async_trait]
impl AccountsRepository for JsonFileAccountsRepository {
  async fn load_all(&self) -> Result<Vec<Account>, StorageError> {
    let data = match tokio::fs::read(&self.path).await {
      Ok(data) => data,
      Err(err) if err.kind() == ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "Accounts file not found, starting empty");
        return Ok(Vec::new());
      }
      Err(source) => return Err(io_error(&self.path, source)),
    };

    if data.iter().all(u8::is_ascii_whitespace) {
      return Ok(Vec::new());
    }

    let records: Vec<account::Account> =
      serde_json::from_slice(&data).map_err(|source| StorageError::Corrupt {
        path: self.path.clone(),
        source,
      })?;

    let accounts = records
      .into_iter()
      .map(Account::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    debug!(path = %self.path.display(), accounts = accounts.len(), "Accounts loaded");
    Ok(accounts)
  }

  async fn save_all(&mut self, accounts: &[Account]) -> Result<(), StorageError> {
    let records: Vec<account::Account> = accounts.iter().map(account::Account::from).collect();
    let data = serde_json::to_vec_pretty(&records)
      .map_err(|err| StorageError::InvalidRecord(err.to_string()))?;

    let temp_path = self.temp_path();
    let written = match self.write_temp(&temp_path, &data).await {
      Ok(()) => tokio::fs::rename(&temp_path, &self.path)
        .await
        .map_err(|source| io_error(&self.path, source)),
      Err(source) => Err(io_error(&temp_path, source)),
    };
    if written.is_err() {
      // Leave no temp file behind, the save error is the one returned
      let _ = tokio::fs::remove_file(&temp_path).await;
    }
    written?;

    debug!(path = %self.path.display(), accounts = accounts.len(), "Accounts saved");
    Ok(())
  }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
  StorageError::Io {
    path: path.to_path_buf(),
    source,
  }
}
